// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake delivery adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DeliveryAdapter, DeliveryError};
use chime_core::{DeliveryEvent, DeliveryHandle, DeliveryPayload, EventSource, IdGen, SequentialIdGen};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

/// Recorded delivery call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryCall {
    Schedule { handle: DeliveryHandle },
    Cancel { handle: DeliveryHandle },
    ListPresented,
    Dismiss { handle: DeliveryHandle },
    LastResponse,
}

/// An outstanding or presented delivery held by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDelivery {
    pub handle: DeliveryHandle,
    pub at: DateTime<Utc>,
    pub payload: DeliveryPayload,
}

/// Fake delivery service. Tests drive it directly: `fire` moves an
/// outstanding delivery onto the device and returns the delivered event,
/// `tap` synthesizes the user's response.
#[derive(Clone)]
pub struct FakeDeliveryAdapter {
    outstanding: Arc<Mutex<Vec<ScheduledDelivery>>>,
    presented: Arc<Mutex<Vec<ScheduledDelivery>>>,
    calls: Arc<Mutex<Vec<DeliveryCall>>>,
    last: Arc<Mutex<Option<DeliveryEvent>>>,
    ids: SequentialIdGen,
    fail_next_schedule: Arc<Mutex<bool>>,
    fail_next_cancel: Arc<Mutex<bool>>,
}

impl Default for FakeDeliveryAdapter {
    fn default() -> Self {
        Self {
            outstanding: Arc::default(),
            presented: Arc::default(),
            calls: Arc::default(),
            last: Arc::default(),
            ids: SequentialIdGen::new("ntf"),
            fail_next_schedule: Arc::default(),
            fail_next_cancel: Arc::default(),
        }
    }
}

impl FakeDeliveryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<DeliveryCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Outstanding (scheduled, not yet fired or cancelled) deliveries
    pub fn outstanding(&self) -> Vec<ScheduledDelivery> {
        self.outstanding
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Make the next schedule call fail
    pub fn fail_next_schedule(&self) {
        *self
            .fail_next_schedule
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = true;
    }

    /// Make the next cancel call fail
    pub fn fail_next_cancel(&self) {
        *self
            .fail_next_cancel
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = true;
    }

    /// Seed the cold-start "last response" answer
    pub fn set_last_response(&self, event: DeliveryEvent) {
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = Some(event);
    }

    /// Deliver an outstanding notification: it moves onto the device and the
    /// delivered event is returned for the engine to reconcile.
    pub fn fire(&self, handle: &DeliveryHandle, at: DateTime<Utc>) -> Option<DeliveryEvent> {
        let mut outstanding = self.outstanding.lock().unwrap_or_else(|e| e.into_inner());
        let index = outstanding.iter().position(|d| &d.handle == handle)?;
        let delivery = outstanding.remove(index);
        drop(outstanding);

        let event = DeliveryEvent {
            handle: delivery.handle.clone(),
            alarm_id: Some(delivery.payload.alarm_id.clone()),
            occurred_at: at,
            source: EventSource::Delivered,
        };
        self.presented
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(delivery);
        Some(event)
    }

    /// Synthesize the user tapping a presented notification
    pub fn tap(&self, handle: &DeliveryHandle, at: DateTime<Utc>) -> Option<DeliveryEvent> {
        let presented = self.presented.lock().unwrap_or_else(|e| e.into_inner());
        let delivery = presented.iter().find(|d| &d.handle == handle)?;
        Some(DeliveryEvent {
            handle: delivery.handle.clone(),
            alarm_id: Some(delivery.payload.alarm_id.clone()),
            occurred_at: at,
            source: EventSource::Response,
        })
    }

    fn record_call(&self, call: DeliveryCall) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
    }
}

#[async_trait]
impl DeliveryAdapter for FakeDeliveryAdapter {
    async fn schedule(
        &self,
        at: DateTime<Utc>,
        payload: DeliveryPayload,
    ) -> Result<DeliveryHandle, DeliveryError> {
        if std::mem::take(
            &mut *self
                .fail_next_schedule
                .lock()
                .unwrap_or_else(|e| e.into_inner()),
        ) {
            return Err(DeliveryError::Rejected("injected failure".to_string()));
        }
        let handle = DeliveryHandle(self.ids.next());
        self.record_call(DeliveryCall::Schedule {
            handle: handle.clone(),
        });
        self.outstanding
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ScheduledDelivery {
                handle: handle.clone(),
                at,
                payload,
            });
        Ok(handle)
    }

    async fn cancel(&self, handle: &DeliveryHandle) -> Result<(), DeliveryError> {
        self.record_call(DeliveryCall::Cancel {
            handle: handle.clone(),
        });
        if std::mem::take(
            &mut *self
                .fail_next_cancel
                .lock()
                .unwrap_or_else(|e| e.into_inner()),
        ) {
            return Err(DeliveryError::Rejected("injected failure".to_string()));
        }
        let mut outstanding = self.outstanding.lock().unwrap_or_else(|e| e.into_inner());
        let before = outstanding.len();
        outstanding.retain(|d| &d.handle != handle);
        if outstanding.len() == before {
            return Err(DeliveryError::UnknownHandle(handle.clone()));
        }
        Ok(())
    }

    async fn list_presented(&self) -> Result<Vec<DeliveryHandle>, DeliveryError> {
        self.record_call(DeliveryCall::ListPresented);
        Ok(self
            .presented
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|d| d.handle.clone())
            .collect())
    }

    async fn dismiss(&self, handle: &DeliveryHandle) -> Result<(), DeliveryError> {
        self.record_call(DeliveryCall::Dismiss {
            handle: handle.clone(),
        });
        self.presented
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|d| &d.handle != handle);
        Ok(())
    }

    async fn last_response(&self) -> Result<Option<DeliveryEvent>, DeliveryError> {
        self.record_call(DeliveryCall::LastResponse);
        Ok(self.last.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
