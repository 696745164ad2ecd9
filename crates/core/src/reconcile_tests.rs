// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::alarm::Weekday;
use crate::delivery::EventSource;
use chrono::TimeZone;
use std::collections::BTreeSet;

// 2024-03-04 is a Monday.
fn base_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap()
}

fn alarm(id: &str, hour: u8, minute: u8) -> Alarm {
    Alarm {
        id: AlarmId::new(id),
        owner: "user-1".to_string(),
        label: None,
        hour,
        minute,
        repeat_days: BTreeSet::new(),
        puzzle: false,
        enabled: true,
        scheduled: vec![],
        next_trigger_at: None,
    }
}

fn event(handle: &str, alarm_id: Option<&str>, at: DateTime<Utc>) -> DeliveryEvent {
    DeliveryEvent {
        handle: DeliveryHandle::from(handle),
        alarm_id: alarm_id.map(AlarmId::new),
        occurred_at: at,
        source: EventSource::Delivered,
    }
}

fn reconciler() -> Reconciler {
    Reconciler::new(&EngineConfig::default())
}

#[test]
fn exact_id_match_rings_one_shot_without_reschedule() {
    let mut rec = reconciler();
    let alarms = vec![alarm("a", 7, 0)];

    let outcome = rec.resolve(&event("ntf-1", Some("a"), base_now()), &alarms, base_now());

    assert_eq!(
        outcome,
        Outcome::Ring {
            alarm_id: AlarmId::new("a"),
            reschedule: false
        }
    );
    assert_eq!(rec.active(), Some(&AlarmId::new("a")));
    assert!(rec.nav_in_flight());
}

#[test]
fn repeating_alarm_requests_reschedule_before_ringing() {
    let mut rec = reconciler();
    let mut repeating = alarm("a", 7, 0);
    repeating.repeat_days = [Weekday::Mon].into_iter().collect();

    let outcome = rec.resolve(
        &event("ntf-1", Some("a"), base_now()),
        &[repeating],
        base_now(),
    );

    assert_eq!(
        outcome,
        Outcome::Ring {
            alarm_id: AlarmId::new("a"),
            reschedule: true
        }
    );
}

#[test]
fn duplicate_handle_is_discarded_after_ring() {
    let mut rec = reconciler();
    let alarms = vec![alarm("a", 7, 0)];
    let first = event("ntf-1", Some("a"), base_now());

    assert!(matches!(
        rec.resolve(&first, &alarms, base_now()),
        Outcome::Ring { .. }
    ));

    // Same physical notification reported again (delivered + response)
    let mut second = first.clone();
    second.source = EventSource::Response;
    assert_eq!(
        rec.resolve(&second, &alarms, base_now()),
        Outcome::Discarded(DiscardReason::DuplicateHandle)
    );
}

#[test]
fn disabled_alarm_does_not_resolve_and_event_is_queued() {
    let mut rec = reconciler();
    let mut disabled = alarm("a", 7, 0);
    disabled.enabled = false;

    let outcome = rec.resolve(
        &event("ntf-1", Some("a"), base_now()),
        &[disabled],
        base_now(),
    );

    assert_eq!(outcome, Outcome::Queued);
    assert_eq!(rec.pending_len(), 1);
    assert_eq!(rec.active(), None);
}

#[test]
fn stale_id_falls_back_to_wall_clock_match() {
    let mut rec = reconciler();
    // 07:01 wall clock, alarm set for 07:00: inside the 2 minute window
    let now = base_now() + Duration::minutes(1);

    let outcome = rec.resolve(&event("ntf-1", Some("gone"), now), &[alarm("a", 7, 0)], now);

    assert!(matches!(outcome, Outcome::Ring { alarm_id, .. } if alarm_id == AlarmId::new("a")));
}

#[test]
fn wall_clock_fallback_skips_disabled_and_distant_alarms() {
    let mut rec = reconciler();
    let mut disabled_near = alarm("a", 7, 0);
    disabled_near.enabled = false;
    let enabled_far = alarm("b", 9, 0);

    let outcome = rec.resolve(
        &event("ntf-1", None, base_now()),
        &[disabled_near, enabled_far],
        base_now(),
    );

    assert_eq!(outcome, Outcome::Queued);
}

#[test]
fn fallback_takes_first_match_when_two_alarms_are_close() {
    let mut rec = reconciler();
    let alarms = vec![alarm("a", 7, 0), alarm("b", 7, 1)];

    let outcome = rec.resolve(&event("ntf-1", None, base_now()), &alarms, base_now());

    // Documented best-effort: first match wins
    assert!(matches!(outcome, Outcome::Ring { alarm_id, .. } if alarm_id == AlarmId::new("a")));
}

#[test]
fn active_session_discards_further_events_for_that_alarm() {
    let mut rec = reconciler();
    let alarms = vec![alarm("a", 7, 0)];

    assert!(matches!(
        rec.resolve(&event("ntf-1", Some("a"), base_now()), &alarms, base_now()),
        Outcome::Ring { .. }
    ));
    rec.mark(&AlarmId::new("a"));

    // A nag for the same alarm arrives while it is ringing
    assert_eq!(
        rec.resolve(&event("ntf-2", Some("a"), base_now()), &alarms, base_now()),
        Outcome::Discarded(DiscardReason::AlreadyRinging)
    );
}

#[test]
fn navigation_lock_discards_events_for_other_alarms() {
    let mut rec = reconciler();
    let alarms = vec![alarm("a", 7, 0), alarm("b", 7, 0)];

    assert!(matches!(
        rec.resolve(&event("ntf-1", Some("a"), base_now()), &alarms, base_now()),
        Outcome::Ring { .. }
    ));

    // Transition still in flight; a second alarm resolves but must wait
    assert_eq!(
        rec.resolve(&event("ntf-2", Some("b"), base_now()), &alarms, base_now()),
        Outcome::Discarded(DiscardReason::NavigationInFlight)
    );
}

#[test]
fn premature_trigger_is_discarded() {
    let mut rec = reconciler();
    let mut early = alarm("a", 7, 0);
    early.next_trigger_at = Some(base_now() + Duration::minutes(10));

    let outcome = rec.resolve(&event("ntf-1", Some("a"), base_now()), &[early], base_now());

    assert_eq!(outcome, Outcome::Discarded(DiscardReason::Premature));
}

#[test]
fn trigger_within_the_guard_window_rings() {
    let mut rec = reconciler();
    let mut due = alarm("a", 7, 0);
    due.next_trigger_at = Some(base_now() + Duration::seconds(10));

    let outcome = rec.resolve(&event("ntf-1", Some("a"), base_now()), &[due], base_now());

    assert!(matches!(outcome, Outcome::Ring { .. }));
}

#[test]
fn recently_handled_alarm_is_rate_limited() {
    let mut rec = reconciler();
    let alarms = vec![alarm("a", 7, 0)];

    assert!(matches!(
        rec.resolve(&event("ntf-1", Some("a"), base_now()), &alarms, base_now()),
        Outcome::Ring { .. }
    ));
    // Navigation failed; the session rolls back but the stamp remains
    rec.abort(&AlarmId::new("a"));

    let soon = base_now() + Duration::seconds(60);
    assert_eq!(
        rec.resolve(&event("ntf-2", Some("a"), soon), &alarms, soon),
        Outcome::Discarded(DiscardReason::RecentlyHandled)
    );

    // Past the recency window the alarm may ring again
    let later = base_now() + Duration::minutes(3);
    assert!(matches!(
        rec.resolve(&event("ntf-3", Some("a"), later), &alarms, later),
        Outcome::Ring { .. }
    ));
}

#[test]
fn clear_resets_session_lock_stamp_and_processed_set() {
    let mut rec = reconciler();
    let alarms = vec![alarm("a", 7, 0)];
    let first = event("ntf-1", Some("a"), base_now());

    assert!(matches!(
        rec.resolve(&first, &alarms, base_now()),
        Outcome::Ring { .. }
    ));
    rec.mark(&AlarmId::new("a"));
    assert!(rec.clear(&AlarmId::new("a")));

    assert_eq!(rec.active(), None);
    assert!(!rec.nav_in_flight());

    // Even the same handle may start a fresh session now
    assert!(matches!(
        rec.resolve(&first, &alarms, base_now()),
        Outcome::Ring { .. }
    ));
}

#[test]
fn clear_ignores_non_matching_ids() {
    let mut rec = reconciler();
    let alarms = vec![alarm("a", 7, 0)];

    assert!(matches!(
        rec.resolve(&event("ntf-1", Some("a"), base_now()), &alarms, base_now()),
        Outcome::Ring { .. }
    ));

    assert!(!rec.clear(&AlarmId::new("b")));
    assert_eq!(rec.active(), Some(&AlarmId::new("a")));
}

#[test]
fn pending_events_are_deduplicated_and_expire() {
    let mut rec = reconciler();
    let orphan = event("ntf-1", Some("gone"), base_now());

    assert_eq!(rec.resolve(&orphan, &[], base_now()), Outcome::Queued);
    assert_eq!(rec.resolve(&orphan, &[], base_now()), Outcome::Queued);
    assert_eq!(rec.pending_len(), 1);

    // Still fresh one minute later
    let drained = rec.drain_pending(base_now() + Duration::minutes(1));
    assert_eq!(drained.len(), 1);

    // Re-queued, then dropped once the freshness window has elapsed
    assert_eq!(
        rec.resolve(&orphan, &[], base_now() + Duration::minutes(1)),
        Outcome::Queued
    );
    let drained = rec.drain_pending(base_now() + Duration::minutes(5));
    assert!(drained.is_empty());
    assert_eq!(rec.pending_len(), 0);
}

#[test]
fn processed_handle_set_is_bounded() {
    let config = EngineConfig {
        processed_capacity: 1,
        ..EngineConfig::default()
    };
    let mut rec = Reconciler::new(&config);
    let alarms = vec![alarm("a", 7, 0)];

    let first = event("ntf-1", Some("a"), base_now());
    assert!(matches!(
        rec.resolve(&first, &alarms, base_now()),
        Outcome::Ring { .. }
    ));
    rec.abort(&AlarmId::new("a"));

    // A second ring past the recency window evicts the first handle
    let later = base_now() + Duration::minutes(3);
    assert!(matches!(
        rec.resolve(&event("ntf-2", Some("a"), later), &alarms, later),
        Outcome::Ring { .. }
    ));
    rec.abort(&AlarmId::new("a"));

    // The evicted handle is no longer deduplicated
    let much_later = base_now() + Duration::minutes(6);
    assert!(matches!(
        rec.resolve(&first, &alarms, much_later),
        Outcome::Ring { .. }
    ));
}
