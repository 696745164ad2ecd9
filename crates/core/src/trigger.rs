// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Next-fire-instant arithmetic
//!
//! Pure functions over (repeat weekdays, hour, minute, reference now).
//! Validation happens upstream; `None` here only means the hour/minute pair
//! is not representable as a time of day, which the scheduler treats as a
//! soft failure.

use crate::alarm::Weekday;
use chrono::{DateTime, Datelike, Duration, NaiveTime, Timelike, Utc};
use std::collections::BTreeSet;

/// Compute the next fire instant strictly after `now`.
///
/// - Empty `repeat_days`: the same-day candidate at hour:minute if it is
///   strictly in the future, otherwise the candidate one calendar day out.
///   A reference exactly equal to the candidate also advances one day.
/// - Non-empty `repeat_days`: for each weekday the offset
///   `(weekday - today + 7) % 7`, where offset 0 with a non-future candidate
///   counts as a full week out; the minimum offset wins. Ties all name the
///   same instant since hour/minute are fixed per alarm.
///
/// The result has seconds and subseconds zeroed.
pub fn next_trigger(
    repeat_days: &BTreeSet<Weekday>,
    hour: u8,
    minute: u8,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), 0)?;
    let candidate = now.date_naive().and_time(time).and_utc();

    if repeat_days.is_empty() {
        return Some(if candidate > now {
            candidate
        } else {
            candidate + Duration::days(1)
        });
    }

    let today = Weekday::from_chrono(now.weekday());
    let offset = repeat_days
        .iter()
        .map(|day| {
            let days = i64::from(day.days_from_sunday())
                - i64::from(today.days_from_sunday());
            let days = days.rem_euclid(7);
            if days == 0 && candidate <= now {
                7
            } else {
                days
            }
        })
        .min()?;

    Some(candidate + Duration::days(offset))
}

/// Circular distance between an alarm's wall-clock fire time and `now`,
/// wrapping around midnight. Used for the fallback time-window match when an
/// event carries no usable alarm id.
pub fn wall_clock_distance(hour: u8, minute: u8, now: DateTime<Utc>) -> Duration {
    let target = i64::from(hour) * 3600 + i64::from(minute) * 60;
    let current = i64::from(now.time().num_seconds_from_midnight());
    let diff = (target - current).rem_euclid(86_400);
    Duration::seconds(diff.min(86_400 - diff))
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
