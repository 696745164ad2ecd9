// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the alarm engine

use chime_adapters::{DeliveryError, StoreError};
use chime_core::ValidationError;
use thiserror::Error;

/// Errors surfaced to CRUD callers.
///
/// Reconciliation-pipeline failures never appear here; they are logged and
/// swallowed since no synchronous caller waits on them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("scheduling failure: {0}")]
    Scheduling(#[from] DeliveryError),
}
