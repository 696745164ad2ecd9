// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::delivery::{DeliveryAdapter, DeliveryError};
use crate::store::{StoreAdapter, StoreError};
use async_trait::async_trait;
use chime_core::{AlarmId, AlarmRecord, DeliveryEvent, DeliveryHandle, DeliveryPayload};
use chrono::{DateTime, Utc};

/// Wrapper that adds tracing to any StoreAdapter
#[derive(Clone)]
pub struct TracedStoreAdapter<S> {
    inner: S,
}

impl<S> TracedStoreAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: StoreAdapter> StoreAdapter for TracedStoreAdapter<S> {
    async fn list(&self, owner: &str) -> Result<Vec<AlarmRecord>, StoreError> {
        let span = tracing::info_span!("store.list", owner);
        let _guard = span.enter();

        let result = self.inner.list(owner).await;
        match &result {
            Ok(records) => tracing::debug!(count = records.len(), "listed"),
            Err(e) => tracing::error!(error = %e, "list failed"),
        }
        result
    }

    async fn create(&self, record: AlarmRecord) -> Result<AlarmRecord, StoreError> {
        let span = tracing::info_span!("store.create", owner = %record.owner);
        let _guard = span.enter();

        let result = self.inner.create(record).await;
        match &result {
            Ok(created) => tracing::info!(id = %created.id, "record created"),
            Err(e) => tracing::error!(error = %e, "create failed"),
        }
        result
    }

    async fn update(&self, id: &AlarmId, record: AlarmRecord) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.update", id = %id);
        let _guard = span.enter();

        let result = self.inner.update(id, record).await;
        match &result {
            Ok(()) => tracing::debug!("record updated"),
            Err(e) => tracing::error!(error = %e, "update failed"),
        }
        result
    }

    async fn delete(&self, id: &AlarmId) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.delete", id = %id);
        let _guard = span.enter();

        let result = self.inner.delete(id).await;
        match &result {
            Ok(()) => tracing::info!("record deleted"),
            Err(e) => tracing::error!(error = %e, "delete failed"),
        }
        result
    }
}

/// Wrapper that adds tracing to any DeliveryAdapter
#[derive(Clone)]
pub struct TracedDeliveryAdapter<D> {
    inner: D,
}

impl<D> TracedDeliveryAdapter<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<D: DeliveryAdapter> DeliveryAdapter for TracedDeliveryAdapter<D> {
    async fn schedule(
        &self,
        at: DateTime<Utc>,
        payload: DeliveryPayload,
    ) -> Result<DeliveryHandle, DeliveryError> {
        let span = tracing::info_span!(
            "delivery.schedule",
            alarm_id = %payload.alarm_id,
            kind = %payload.kind,
        );
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.schedule(at, payload).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(handle) => tracing::info!(
                %handle,
                at = %at,
                elapsed_ms = elapsed.as_millis() as u64,
                "delivery scheduled"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "schedule failed"
            ),
        }
        result
    }

    async fn cancel(&self, handle: &DeliveryHandle) -> Result<(), DeliveryError> {
        let span = tracing::info_span!("delivery.cancel", %handle);
        let _guard = span.enter();

        let result = self.inner.cancel(handle).await;
        match &result {
            Ok(()) => tracing::debug!("cancelled"),
            Err(e) => tracing::warn!(error = %e, "cancel failed"),
        }
        result
    }

    async fn list_presented(&self) -> Result<Vec<DeliveryHandle>, DeliveryError> {
        let result = self.inner.list_presented().await;
        if let Ok(handles) = &result {
            tracing::debug!(count = handles.len(), "listed presented notifications");
        }
        result
    }

    async fn dismiss(&self, handle: &DeliveryHandle) -> Result<(), DeliveryError> {
        let span = tracing::info_span!("delivery.dismiss", %handle);
        let _guard = span.enter();

        let result = self.inner.dismiss(handle).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "dismiss failed");
        }
        result
    }

    async fn last_response(&self) -> Result<Option<DeliveryEvent>, DeliveryError> {
        let result = self.inner.last_response().await;
        match &result {
            Ok(Some(event)) => tracing::info!(handle = %event.handle, "cold-start response found"),
            Ok(None) => tracing::debug!("no cold-start response"),
            Err(e) => tracing::error!(error = %e, "last-response query failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
