// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

#[test]
fn fake_clock_advance_moves_time_forward() {
    let start = Utc.with_ymd_and_hms(2024, 3, 4, 6, 0, 0).unwrap();
    let clock = FakeClock::at(start);

    clock.advance(Duration::minutes(90));

    assert_eq!(clock.now(), start + Duration::minutes(90));
}

#[test]
fn fake_clock_set_overrides_current_time() {
    let clock = FakeClock::at(Utc.with_ymd_and_hms(2024, 3, 4, 6, 0, 0).unwrap());
    let later = Utc.with_ymd_and_hms(2024, 3, 11, 7, 0, 0).unwrap();

    clock.set(later);

    assert_eq!(clock.now(), later);
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::at(Utc.with_ymd_and_hms(2024, 3, 4, 6, 0, 0).unwrap());
    let other = clock.clone();

    clock.advance(Duration::seconds(30));

    assert_eq!(clock.now(), other.now());
}

#[test]
fn system_clock_is_monotonic_enough() {
    let clock = SystemClock;
    let a = clock.now();
    let b = clock.now();
    assert!(b >= a);
}
