// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op navigation adapter for headless embeddings

use super::{NavAdapter, NavError};
use async_trait::async_trait;
use chime_core::AlarmId;

/// Navigation adapter that accepts every request without presenting anything
#[derive(Clone, Default)]
pub struct NoOpNavAdapter;

impl NoOpNavAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NavAdapter for NoOpNavAdapter {
    async fn navigate_to_ringing(&self, _id: &AlarmId) -> Result<(), NavError> {
        Ok(())
    }
}
