// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op delivery adapter for embeddings without a notification service

use super::{DeliveryAdapter, DeliveryError};
use async_trait::async_trait;
use chime_core::{DeliveryEvent, DeliveryHandle, DeliveryPayload, IdGen, UuidIdGen};
use chrono::{DateTime, Utc};

/// Delivery adapter that schedules nothing. Handles are still minted so
/// alarm bookkeeping stays intact; no notification will ever fire.
#[derive(Clone, Default)]
pub struct NoOpDeliveryAdapter {
    ids: UuidIdGen,
}

impl NoOpDeliveryAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeliveryAdapter for NoOpDeliveryAdapter {
    async fn schedule(
        &self,
        _at: DateTime<Utc>,
        _payload: DeliveryPayload,
    ) -> Result<DeliveryHandle, DeliveryError> {
        Ok(DeliveryHandle(self.ids.next()))
    }

    async fn cancel(&self, _handle: &DeliveryHandle) -> Result<(), DeliveryError> {
        Ok(())
    }

    async fn list_presented(&self) -> Result<Vec<DeliveryHandle>, DeliveryError> {
        Ok(vec![])
    }

    async fn dismiss(&self, _handle: &DeliveryHandle) -> Result<(), DeliveryError> {
        Ok(())
    }

    async fn last_response(&self) -> Result<Option<DeliveryEvent>, DeliveryError> {
        Ok(None)
    }
}
