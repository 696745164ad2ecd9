// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use yare::parameterized;

// 2024-03-04 is a Monday.
fn monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, hour, minute, 0).unwrap()
}

fn days(set: &[Weekday]) -> BTreeSet<Weekday> {
    set.iter().copied().collect()
}

#[test]
fn one_shot_later_today_fires_same_day() {
    // Scenario: 07:00 alarm, Monday 06:00
    let next = next_trigger(&BTreeSet::new(), 7, 0, monday_at(6, 0)).unwrap();
    assert_eq!(next, monday_at(7, 0));
}

#[test]
fn one_shot_already_passed_fires_tomorrow() {
    // Scenario: 07:00 alarm, Monday 08:00
    let next = next_trigger(&BTreeSet::new(), 7, 0, monday_at(8, 0)).unwrap();
    assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 5, 7, 0, 0).unwrap());
}

#[test]
fn one_shot_at_exact_candidate_advances_one_day() {
    let next = next_trigger(&BTreeSet::new(), 7, 0, monday_at(7, 0)).unwrap();
    assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 5, 7, 0, 0).unwrap());
}

#[test]
fn repeating_skips_todays_passed_occurrence() {
    // Scenario: Mon/Wed/Fri 07:00, Monday 07:01 -> Wednesday 07:00
    let set = days(&[Weekday::Mon, Weekday::Wed, Weekday::Fri]);
    let next = next_trigger(&set, 7, 0, monday_at(7, 1)).unwrap();
    assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 6, 7, 0, 0).unwrap());
}

#[test]
fn repeating_today_still_ahead_fires_today() {
    let set = days(&[Weekday::Mon, Weekday::Wed, Weekday::Fri]);
    let next = next_trigger(&set, 7, 0, monday_at(6, 59)).unwrap();
    assert_eq!(next, monday_at(7, 0));
}

#[test]
fn repeating_single_day_wraps_a_full_week() {
    let set = days(&[Weekday::Mon]);
    let next = next_trigger(&set, 7, 0, monday_at(7, 0)).unwrap();
    assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 11, 7, 0, 0).unwrap());
}

#[parameterized(
    tuesday = { Weekday::Tue, 1 },
    thursday = { Weekday::Thu, 3 },
    sunday = { Weekday::Sun, 6 },
)]
fn repeating_offset_from_monday(day: Weekday, expected_days: i64) {
    let next = next_trigger(&days(&[day]), 7, 0, monday_at(8, 0)).unwrap();
    assert_eq!(next, monday_at(7, 0) + Duration::days(expected_days));
}

#[test]
fn result_zeroes_seconds() {
    let now = Utc.with_ymd_and_hms(2024, 3, 4, 6, 12, 45).unwrap();
    let next = next_trigger(&BTreeSet::new(), 7, 30, now).unwrap();
    assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 4, 7, 30, 0).unwrap());
}

#[test]
fn unrepresentable_time_yields_none() {
    assert!(next_trigger(&BTreeSet::new(), 24, 0, monday_at(6, 0)).is_none());
    assert!(next_trigger(&days(&[Weekday::Mon]), 7, 61, monday_at(6, 0)).is_none());
}

#[test]
fn wall_clock_distance_wraps_midnight() {
    let now = Utc.with_ymd_and_hms(2024, 3, 4, 23, 59, 0).unwrap();
    assert_eq!(wall_clock_distance(0, 0, now), Duration::minutes(1));
    assert_eq!(wall_clock_distance(23, 59, now), Duration::zero());

    let now = Utc.with_ymd_and_hms(2024, 3, 4, 0, 1, 0).unwrap();
    assert_eq!(wall_clock_distance(23, 59, now), Duration::minutes(2));
    assert_eq!(wall_clock_distance(12, 0, now), Duration::minutes(11 * 60 + 59));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn arb_now() -> impl Strategy<Value = DateTime<Utc>> {
        // 2001..2033, second resolution
        (1_000_000_000i64..2_000_000_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn arb_days() -> impl Strategy<Value = BTreeSet<Weekday>> {
        let all = [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ];
        proptest::collection::btree_set(proptest::sample::select(all.to_vec()), 1..=7)
    }

    proptest! {
        #[test]
        fn one_shot_is_strictly_future_within_a_day(
            hour in 0u8..24, minute in 0u8..60, now in arb_now()
        ) {
            let next = next_trigger(&BTreeSet::new(), hour, minute, now).unwrap();
            prop_assert!(next > now);
            prop_assert!(next - now <= Duration::days(1));
            prop_assert_eq!(next.time().hour(), u32::from(hour));
            prop_assert_eq!(next.time().minute(), u32::from(minute));
            prop_assert_eq!(next.time().second(), 0);
        }

        #[test]
        fn repeating_lands_on_the_earliest_allowed_weekday(
            hour in 0u8..24, minute in 0u8..60, set in arb_days(), now in arb_now()
        ) {
            let next = next_trigger(&set, hour, minute, now).unwrap();
            prop_assert!(next > now);
            prop_assert!(set.contains(&Weekday::from_chrono(next.weekday())));
            prop_assert_eq!(next.time().hour(), u32::from(hour));
            prop_assert_eq!(next.time().minute(), u32::from(minute));

            // No earlier instant with the same wall-clock time satisfies the
            // weekday constraint.
            let base = now
                .date_naive()
                .and_time(NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), 0).unwrap())
                .and_utc();
            for offset in 0..7 {
                let candidate = base + Duration::days(offset);
                if candidate > now && set.contains(&Weekday::from_chrono(candidate.weekday())) {
                    prop_assert!(next <= candidate);
                }
            }
        }
    }
}
