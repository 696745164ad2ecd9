// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation state machine
//!
//! Delivery and response events arrive from independent asynchronous sources
//! and may duplicate, race, or reference stale alarms. The [`Reconciler`]
//! owns every piece of shared reconciliation state (the active ringing
//! session, the navigation lock, the last-handled stamp, the
//! processed-handle set, and the pending queue) and decides, per event,
//! whether to start a ringing session.
//!
//! The state machine is pure: callers supply the alarm collection and the
//! reference time, and execute the returned [`Outcome`].

use crate::alarm::{Alarm, AlarmId};
use crate::config::EngineConfig;
use crate::delivery::{DeliveryEvent, DeliveryHandle};
use crate::trigger::wall_clock_distance;
use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use std::fmt;

fn window(duration: std::time::Duration) -> Duration {
    // Config windows are seconds-to-minutes scale; out-of-range values
    // saturate rather than fail.
    Duration::from_std(duration).unwrap_or_else(|_| Duration::seconds(i64::MAX / 2_000))
}

/// Decision for one inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Start a ringing session for the alarm. `reschedule` is set for
    /// repeating alarms, whose next occurrence must be queued before the
    /// session begins.
    Ring { alarm_id: AlarmId, reschedule: bool },
    /// No alarm resolves right now; the event is queued and retried when
    /// the alarm collection next changes.
    Queued,
    /// The event must not start a session
    Discarded(DiscardReason),
}

/// Why an event was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Same physical notification was already handled
    DuplicateHandle,
    /// The resolved alarm is already the active session
    AlreadyRinging,
    /// A navigation transition is already in flight
    NavigationInFlight,
    /// The cached fire instant is still too far in the future
    Premature,
    /// The same alarm rang moments ago
    RecentlyHandled,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscardReason::DuplicateHandle => write!(f, "duplicate-handle"),
            DiscardReason::AlreadyRinging => write!(f, "already-ringing"),
            DiscardReason::NavigationInFlight => write!(f, "navigation-in-flight"),
            DiscardReason::Premature => write!(f, "premature"),
            DiscardReason::RecentlyHandled => write!(f, "recently-handled"),
        }
    }
}

/// Shared reconciliation state behind the engine's single lock
#[derive(Debug, Clone)]
pub struct Reconciler {
    premature_guard: Duration,
    recency_window: Duration,
    match_window: Duration,
    pending_ttl: Duration,
    processed_capacity: usize,
    /// At most one alarm is presented to the user at a time
    active: Option<AlarmId>,
    /// At most one navigation transition in flight at a time
    nav_in_flight: bool,
    last_handled: Option<(AlarmId, DateTime<Utc>)>,
    processed: VecDeque<DeliveryHandle>,
    pending: Vec<DeliveryEvent>,
}

impl Reconciler {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            premature_guard: window(config.premature_guard),
            recency_window: window(config.recency_window),
            match_window: window(config.match_window),
            pending_ttl: window(config.pending_ttl),
            processed_capacity: config.processed_capacity,
            active: None,
            nav_in_flight: false,
            last_handled: None,
            processed: VecDeque::new(),
            pending: Vec::new(),
        }
    }

    /// The alarm currently presented to the user, if any
    pub fn active(&self) -> Option<&AlarmId> {
        self.active.as_ref()
    }

    pub fn nav_in_flight(&self) -> bool {
        self.nav_in_flight
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Decide whether `event` starts a ringing session.
    ///
    /// On `Ring` the session is marked active, the handle is marked
    /// processed, the handled stamp is recorded, and the navigation lock is
    /// taken; the caller performs the reschedule and the navigation request.
    pub fn resolve(
        &mut self,
        event: &DeliveryEvent,
        alarms: &[Alarm],
        now: DateTime<Utc>,
    ) -> Outcome {
        if self.is_processed(&event.handle) {
            return Outcome::Discarded(DiscardReason::DuplicateHandle);
        }

        let Some(alarm) = self.find_match(event, alarms, now) else {
            self.queue_pending(event);
            return Outcome::Queued;
        };
        let alarm_id = alarm.id.clone();

        if self.active.as_ref() == Some(&alarm_id) {
            return Outcome::Discarded(DiscardReason::AlreadyRinging);
        }
        if self.nav_in_flight {
            return Outcome::Discarded(DiscardReason::NavigationInFlight);
        }
        if let Some(fire_at) = alarm.next_trigger_at {
            if fire_at - now > self.premature_guard {
                return Outcome::Discarded(DiscardReason::Premature);
            }
        }
        if let Some((id, handled_at)) = &self.last_handled {
            if *id == alarm_id && now - *handled_at < self.recency_window {
                return Outcome::Discarded(DiscardReason::RecentlyHandled);
            }
        }

        let reschedule = alarm.is_repeating();
        self.active = Some(alarm_id.clone());
        self.nav_in_flight = true;
        self.last_handled = Some((alarm_id.clone(), now));
        self.mark_processed(event.handle.clone());
        Outcome::Ring {
            alarm_id,
            reschedule,
        }
    }

    /// Take queued events still within the freshness window for a retry.
    /// Stale events are dropped.
    pub fn drain_pending(&mut self, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        let pending = std::mem::take(&mut self.pending);
        let (fresh, stale): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .partition(|event| now - event.occurred_at <= self.pending_ttl);
        for event in &stale {
            tracing::debug!(
                handle = %event.handle,
                source = %event.source,
                "dropping stale pending event"
            );
        }
        fresh
    }

    /// UI confirmation that the ringing screen is up; releases the
    /// navigation lock.
    pub fn mark(&mut self, id: &AlarmId) {
        self.active = Some(id.clone());
        self.nav_in_flight = false;
    }

    /// Clear the session for this specific alarm. Resets the navigation
    /// lock, the handled stamp, and the processed-handle set so the same
    /// alarm can fire and be handled again later. Returns `false` for a
    /// non-matching id.
    pub fn clear(&mut self, id: &AlarmId) -> bool {
        if self.active.as_ref() != Some(id) {
            return false;
        }
        self.active = None;
        self.nav_in_flight = false;
        self.last_handled = None;
        self.processed.clear();
        true
    }

    /// Roll back a session whose navigation request failed, so the lock
    /// cannot stick. The handled stamp is kept, so retries stay rate-limited
    /// by the recency window.
    pub fn abort(&mut self, id: &AlarmId) {
        if self.active.as_ref() == Some(id) {
            self.active = None;
            self.nav_in_flight = false;
        }
    }

    /// Exact id match first, over enabled alarms only; otherwise first
    /// enabled alarm within the wall-clock tolerance window. The proximity
    /// fallback is best-effort: two enabled alarms with close times resolve
    /// to the first match.
    fn find_match<'a>(
        &self,
        event: &DeliveryEvent,
        alarms: &'a [Alarm],
        now: DateTime<Utc>,
    ) -> Option<&'a Alarm> {
        if let Some(id) = &event.alarm_id {
            if let Some(alarm) = alarms.iter().find(|a| a.enabled && &a.id == id) {
                return Some(alarm);
            }
        }
        alarms.iter().find(|a| {
            a.enabled && wall_clock_distance(a.hour, a.minute, now) <= self.match_window
        })
    }

    fn queue_pending(&mut self, event: &DeliveryEvent) {
        let duplicate = self
            .pending
            .iter()
            .any(|p| p.handle == event.handle && p.source == event.source);
        if !duplicate {
            self.pending.push(event.clone());
        }
    }

    fn is_processed(&self, handle: &DeliveryHandle) -> bool {
        self.processed.contains(handle)
    }

    fn mark_processed(&mut self, handle: DeliveryHandle) {
        self.processed.push_back(handle);
        while self.processed.len() > self.processed_capacity {
            self.processed.pop_front();
        }
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
