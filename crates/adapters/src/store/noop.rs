// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op store for embeddings without persistence

use super::{StoreAdapter, StoreError};
use async_trait::async_trait;
use chime_core::{AlarmId, AlarmRecord, IdGen, UuidIdGen};

/// Store adapter that persists nothing. Ids are still minted so the rest of
/// the engine behaves normally; alarms simply do not survive a restart.
#[derive(Clone, Default)]
pub struct NoOpStoreAdapter {
    ids: UuidIdGen,
}

impl NoOpStoreAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreAdapter for NoOpStoreAdapter {
    async fn list(&self, _owner: &str) -> Result<Vec<AlarmRecord>, StoreError> {
        Ok(vec![])
    }

    async fn create(&self, mut record: AlarmRecord) -> Result<AlarmRecord, StoreError> {
        record.id = AlarmId::new(self.ids.next());
        Ok(record)
    }

    async fn update(&self, _id: &AlarmId, _record: AlarmRecord) -> Result<(), StoreError> {
        Ok(())
    }

    async fn delete(&self, _id: &AlarmId) -> Result<(), StoreError> {
        Ok(())
    }
}
