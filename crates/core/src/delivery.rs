// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery domain types
//!
//! A scheduled alarm turns into one primary delivery plus a bounded nag
//! sequence. The delivery collaborator hands back an opaque handle per
//! request, and later reports [`DeliveryEvent`]s when a notification lands
//! on the device or the user taps it.

use crate::alarm::AlarmId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a scheduled delivery, minted by the delivery collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryHandle(pub String);

impl fmt::Display for DeliveryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DeliveryHandle {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DeliveryHandle {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Whether a delivery is the primary fire or a nag follow-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryKind {
    Primary,
    Nag { index: u8 },
}

impl fmt::Display for DeliveryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryKind::Primary => write!(f, "primary"),
            DeliveryKind::Nag { index } => write!(f, "nag-{}", index),
        }
    }
}

/// Content attached to a delivery request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPayload {
    pub alarm_id: AlarmId,
    pub kind: DeliveryKind,
    pub title: String,
    pub body: String,
}

/// Which asynchronous source produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    /// Notification reached the device
    Delivered,
    /// User tapped the notification
    Response,
    /// One-shot "last response" query on cold start
    ColdStart,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSource::Delivered => write!(f, "delivered"),
            EventSource::Response => write!(f, "response"),
            EventSource::ColdStart => write!(f, "cold-start"),
        }
    }
}

/// An inbound delivery/response event awaiting reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryEvent {
    pub handle: DeliveryHandle,
    /// Alarm id carried in the notification payload, if still intact
    pub alarm_id: Option<AlarmId>,
    /// When the notification was delivered/tapped
    pub occurred_at: DateTime<Utc>,
    pub source: EventSource,
}
