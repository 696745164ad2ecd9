// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake navigation adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{NavAdapter, NavError};
use async_trait::async_trait;
use chime_core::AlarmId;
use std::sync::{Arc, Mutex};

/// Recorded navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavCall {
    pub alarm_id: AlarmId,
}

/// Fake navigation adapter for testing
#[derive(Clone, Default)]
pub struct FakeNavAdapter {
    calls: Arc<Mutex<Vec<NavCall>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl FakeNavAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded navigation requests
    pub fn calls(&self) -> Vec<NavCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make the next navigation request fail
    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap_or_else(|e| e.into_inner()) = true;
    }
}

#[async_trait]
impl NavAdapter for FakeNavAdapter {
    async fn navigate_to_ringing(&self, id: &AlarmId) -> Result<(), NavError> {
        if std::mem::take(&mut *self.fail_next.lock().unwrap_or_else(|e| e.into_inner())) {
            return Err(NavError::Failed("injected failure".to_string()));
        }
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(NavCall {
                alarm_id: id.clone(),
            });
        Ok(())
    }
}
