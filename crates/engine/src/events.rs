// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events emitted by the engine for observers
//!
//! The UI (or anything else) subscribes through
//! [`AlarmService::events`](crate::AlarmService::events). Delivery is
//! best-effort: a lagging subscriber misses events rather than blocking the
//! engine.

use chime_core::{AlarmId, DeliveryHandle, DiscardReason};
use chrono::{DateTime, Utc};

/// Observable engine transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    AlarmCreated {
        id: AlarmId,
    },
    AlarmUpdated {
        id: AlarmId,
    },
    AlarmDeleted {
        id: AlarmId,
    },
    /// Deliveries were (re)scheduled for an alarm
    AlarmScheduled {
        id: AlarmId,
        next_trigger_at: DateTime<Utc>,
        deliveries: usize,
    },
    /// A ringing session started and navigation was requested
    AlarmRinging {
        id: AlarmId,
    },
    RingingCleared {
        id: AlarmId,
    },
    /// An inbound event was discarded by the reconciler
    TriggerDiscarded {
        handle: DeliveryHandle,
        reason: DiscardReason,
    },
    /// An inbound event could not be resolved yet and was queued
    TriggerQueued {
        handle: DeliveryHandle,
    },
}

impl EngineEvent {
    /// Stable event name for logs
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::AlarmCreated { .. } => "alarm:created",
            EngineEvent::AlarmUpdated { .. } => "alarm:updated",
            EngineEvent::AlarmDeleted { .. } => "alarm:deleted",
            EngineEvent::AlarmScheduled { .. } => "alarm:scheduled",
            EngineEvent::AlarmRinging { .. } => "alarm:ringing",
            EngineEvent::RingingCleared { .. } => "ringing:cleared",
            EngineEvent::TriggerDiscarded { .. } => "trigger:discarded",
            EngineEvent::TriggerQueued { .. } => "trigger:queued",
        }
    }
}
