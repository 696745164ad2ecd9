// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification delivery adapters
//!
//! The delivery collaborator accepts scheduled requests and hands back an
//! opaque handle per request. Delivered/response events flow back into the
//! engine through its reconciliation entry points; this trait only carries
//! the one-shot "last response" query used on cold start.

mod noop;

pub use noop::NoOpDeliveryAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DeliveryCall, FakeDeliveryAdapter, ScheduledDelivery};

use async_trait::async_trait;
use chime_core::{DeliveryEvent, DeliveryHandle, DeliveryPayload};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors from delivery operations
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery service rejected request: {0}")]
    Rejected(String),
    #[error("unknown delivery handle: {0}")]
    UnknownHandle(DeliveryHandle),
}

/// Adapter for the notification delivery collaborator
#[async_trait]
pub trait DeliveryAdapter: Clone + Send + Sync + 'static {
    /// Request a delivery at the given instant; returns the handle owned by
    /// the requesting alarm
    async fn schedule(
        &self,
        at: DateTime<Utc>,
        payload: DeliveryPayload,
    ) -> Result<DeliveryHandle, DeliveryError>;

    /// Cancel an outstanding delivery
    async fn cancel(&self, handle: &DeliveryHandle) -> Result<(), DeliveryError>;

    /// Handles of notifications currently presented on the device
    async fn list_presented(&self) -> Result<Vec<DeliveryHandle>, DeliveryError>;

    /// Remove a presented notification
    async fn dismiss(&self, handle: &DeliveryHandle) -> Result<(), DeliveryError>;

    /// The response that launched the app, if any (cold-start query)
    async fn last_response(&self) -> Result<Option<DeliveryEvent>, DeliveryError>;
}
