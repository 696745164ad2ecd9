// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake store adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{StoreAdapter, StoreError};
use async_trait::async_trait;
use chime_core::{AlarmId, AlarmRecord, IdGen, SequentialIdGen};
use std::sync::{Arc, Mutex};

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List { owner: String },
    Create { id: AlarmId },
    Update { id: AlarmId },
    Delete { id: AlarmId },
}

/// In-memory store for testing. Records round-trip through JSON so the
/// document shape is exercised the way a real document store would.
#[derive(Clone)]
pub struct FakeStoreAdapter {
    docs: Arc<Mutex<Vec<(AlarmId, serde_json::Value)>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    ids: SequentialIdGen,
    fail_next: Arc<Mutex<bool>>,
}

impl Default for FakeStoreAdapter {
    fn default() -> Self {
        Self {
            docs: Arc::default(),
            calls: Arc::default(),
            ids: SequentialIdGen::new("alarm"),
            fail_next: Arc::default(),
        }
    }
}

impl FakeStoreAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make the next operation fail
    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap_or_else(|e| e.into_inner()) = true;
    }

    /// All stored records, in insertion order
    pub fn records(&self) -> Vec<AlarmRecord> {
        self.docs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter_map(|(_, doc)| serde_json::from_value(doc.clone()).ok())
            .collect()
    }

    fn record_call(&self, call: StoreCall) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
    }

    fn take_fail(&self) -> bool {
        std::mem::take(&mut *self.fail_next.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn encode(record: &AlarmRecord) -> Result<serde_json::Value, StoreError> {
        serde_json::to_value(record).map_err(|e| StoreError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl StoreAdapter for FakeStoreAdapter {
    async fn list(&self, owner: &str) -> Result<Vec<AlarmRecord>, StoreError> {
        self.record_call(StoreCall::List {
            owner: owner.to_string(),
        });
        if self.take_fail() {
            return Err(StoreError::Rejected("injected failure".to_string()));
        }
        let docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        let mut records = Vec::new();
        for (_, doc) in docs.iter() {
            let record: AlarmRecord = serde_json::from_value(doc.clone())
                .map_err(|e| StoreError::Malformed(e.to_string()))?;
            if record.owner == owner {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn create(&self, mut record: AlarmRecord) -> Result<AlarmRecord, StoreError> {
        if self.take_fail() {
            return Err(StoreError::Rejected("injected failure".to_string()));
        }
        record.id = AlarmId::new(self.ids.next());
        self.record_call(StoreCall::Create {
            id: record.id.clone(),
        });
        let doc = Self::encode(&record)?;
        self.docs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((record.id.clone(), doc));
        Ok(record)
    }

    async fn update(&self, id: &AlarmId, mut record: AlarmRecord) -> Result<(), StoreError> {
        self.record_call(StoreCall::Update { id: id.clone() });
        if self.take_fail() {
            return Err(StoreError::Rejected("injected failure".to_string()));
        }
        record.id = id.clone();
        let doc = Self::encode(&record)?;
        let mut docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        let Some(slot) = docs.iter_mut().find(|(doc_id, _)| doc_id == id) else {
            return Err(StoreError::NotFound(id.clone()));
        };
        slot.1 = doc;
        Ok(())
    }

    async fn delete(&self, id: &AlarmId) -> Result<(), StoreError> {
        self.record_call(StoreCall::Delete { id: id.clone() });
        if self.take_fail() {
            return Err(StoreError::Rejected("injected failure".to_string()));
        }
        let mut docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        let before = docs.len();
        docs.retain(|(doc_id, _)| doc_id != id);
        if docs.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
