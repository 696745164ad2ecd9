// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence adapters
//!
//! Alarm records are opaque key-value documents to the store; the engine
//! converts to/from its in-memory model at this boundary.

mod noop;

pub use noop::NoOpStoreAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStoreAdapter, StoreCall};

use async_trait::async_trait;
use chime_core::{AlarmId, AlarmRecord};
use thiserror::Error;

/// Errors from persistence operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(AlarmId),
    #[error("store rejected request: {0}")]
    Rejected(String),
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Adapter for the alarm persistence collaborator
#[async_trait]
pub trait StoreAdapter: Clone + Send + Sync + 'static {
    /// List all records belonging to an owner
    async fn list(&self, owner: &str) -> Result<Vec<AlarmRecord>, StoreError>;

    /// Persist a new record. The store assigns the id; the input id is
    /// ignored.
    async fn create(&self, record: AlarmRecord) -> Result<AlarmRecord, StoreError>;

    /// Replace the record stored under `id`
    async fn update(&self, id: &AlarmId, record: AlarmRecord) -> Result<(), StoreError>;

    /// Delete the record stored under `id`
    async fn delete(&self, id: &AlarmId) -> Result<(), StoreError>;
}
