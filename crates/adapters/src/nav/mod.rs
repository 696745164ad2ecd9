// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! UI navigation adapters
//!
//! The engine's only outbound UI call: bring up the ringing experience for
//! one alarm. The UI calls back through the engine's ringing-session API.

mod noop;

pub use noop::NoOpNavAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNavAdapter, NavCall};

use async_trait::async_trait;
use chime_core::AlarmId;
use thiserror::Error;

/// Errors from navigation requests
#[derive(Debug, Error)]
pub enum NavError {
    #[error("navigation failed: {0}")]
    Failed(String),
}

/// Adapter for the UI navigation collaborator
#[async_trait]
pub trait NavAdapter: Clone + Send + Sync + 'static {
    /// Present the ringing experience for the alarm
    async fn navigate_to_ringing(&self, id: &AlarmId) -> Result<(), NavError>;
}
