// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification scheduling
//!
//! Turns an alarm into one primary delivery request plus a bounded nag
//! sequence, and cancels previously issued requests. Rescheduling is always
//! cancel-then-schedule, never incremental, so an alarm can never hold
//! duplicate outstanding triggers.

use chime_adapters::{DeliveryAdapter, DeliveryError};
use chime_core::{
    next_trigger, Alarm, AlarmId, DeliveryHandle, DeliveryKind, DeliveryPayload, EngineConfig,
};
use chrono::{DateTime, Duration, Utc};

/// The instants one schedule pass will request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePlan {
    /// The primary fire instant, cached on the alarm as `next_trigger_at`
    pub next_trigger_at: DateTime<Utc>,
    pub deliveries: Vec<(DateTime<Utc>, DeliveryKind)>,
}

/// Compute the deliveries for an alarm: the primary at the next trigger,
/// then nags at the configured offsets. Offsets that do not land strictly in
/// the future are skipped, never retroactively scheduled. `None` means the
/// alarm's fire time is not representable.
pub fn plan(
    alarm: &Alarm,
    nag_offsets: &[std::time::Duration],
    now: DateTime<Utc>,
) -> Option<SchedulePlan> {
    let first = next_trigger(&alarm.repeat_days, alarm.hour, alarm.minute, now)?;
    let mut deliveries = vec![(first, DeliveryKind::Primary)];
    for (index, offset) in nag_offsets.iter().enumerate() {
        let Ok(offset) = Duration::from_std(*offset) else {
            continue;
        };
        let at = first + offset;
        if at > now {
            deliveries.push((
                at,
                DeliveryKind::Nag {
                    index: index as u8,
                },
            ));
        }
    }
    Some(SchedulePlan {
        next_trigger_at: first,
        deliveries,
    })
}

/// Handles produced by one schedule pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleOutcome {
    pub handles: Vec<DeliveryHandle>,
    pub next_trigger_at: Option<DateTime<Utc>>,
}

/// Issues and cancels delivery requests for alarms
#[derive(Clone)]
pub struct NotificationScheduler<D> {
    delivery: D,
    nag_offsets: Vec<std::time::Duration>,
}

impl<D: DeliveryAdapter> NotificationScheduler<D> {
    pub fn new(delivery: D, config: &EngineConfig) -> Self {
        Self {
            delivery,
            nag_offsets: config.nag_offsets.clone(),
        }
    }

    /// Schedule the primary and nag deliveries for an alarm.
    ///
    /// A fire time that cannot be represented fails softly: the alarm is
    /// left with an empty trigger set and a diagnostic. A rejected primary
    /// propagates to the caller; rejected nags are logged and skipped.
    pub async fn schedule(
        &self,
        alarm: &Alarm,
        now: DateTime<Utc>,
    ) -> Result<ScheduleOutcome, DeliveryError> {
        let Some(plan) = plan(alarm, &self.nag_offsets, now) else {
            tracing::warn!(
                id = %alarm.id,
                hour = alarm.hour,
                minute = alarm.minute,
                "fire time not representable, alarm left unscheduled"
            );
            return Ok(ScheduleOutcome::default());
        };

        let mut handles = Vec::with_capacity(plan.deliveries.len());
        for (at, kind) in plan.deliveries {
            match self.delivery.schedule(at, payload_for(alarm, kind)).await {
                Ok(handle) => handles.push(handle),
                Err(e) if kind == DeliveryKind::Primary => {
                    tracing::error!(id = %alarm.id, error = %e, "primary delivery rejected");
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(id = %alarm.id, kind = %kind, error = %e, "nag delivery rejected");
                }
            }
        }
        tracing::debug!(
            id = %alarm.id,
            next_trigger_at = %plan.next_trigger_at,
            deliveries = handles.len(),
            "alarm scheduled"
        );
        Ok(ScheduleOutcome {
            handles,
            next_trigger_at: Some(plan.next_trigger_at),
        })
    }

    /// Best-effort cancellation: each failure is logged and the remaining
    /// handles are still attempted.
    pub async fn cancel(&self, id: &AlarmId, handles: &[DeliveryHandle]) {
        for handle in handles {
            if let Err(e) = self.delivery.cancel(handle).await {
                tracing::warn!(alarm_id = %id, %handle, error = %e, "failed to cancel delivery");
            }
        }
    }
}

fn payload_for(alarm: &Alarm, kind: DeliveryKind) -> DeliveryPayload {
    DeliveryPayload {
        alarm_id: alarm.id.clone(),
        kind,
        title: alarm
            .label
            .clone()
            .unwrap_or_else(|| "Alarm".to_string()),
        body: alarm.time_label(),
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
