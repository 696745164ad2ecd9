// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alarm domain model
//!
//! An [`Alarm`] is the engine's in-memory view of a user-defined alarm: a
//! wall-clock fire time, an optional set of repeat weekdays, and the handles
//! of the deliveries currently scheduled for it. [`AlarmRecord`] is the
//! document shape crossing the persistence boundary, where the fire time is
//! a seconds-since-epoch integer whose date component is ignored.

use crate::delivery::DeliveryHandle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

const SECS_PER_DAY: i64 = 86_400;

/// Unique identifier for an alarm, assigned by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlarmId(pub String);

impl AlarmId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for AlarmId {
    fn default() -> Self {
        Self(String::new())
    }
}

impl From<String> for AlarmId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AlarmId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Day of the week an alarm repeats on
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// Days since Sunday, 0..=6
    pub fn days_from_sunday(self) -> u8 {
        match self {
            Weekday::Sun => 0,
            Weekday::Mon => 1,
            Weekday::Tue => 2,
            Weekday::Wed => 3,
            Weekday::Thu => 4,
            Weekday::Fri => 5,
            Weekday::Sat => 6,
        }
    }

    pub fn from_chrono(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Sun => Weekday::Sun,
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Weekday::Sun => "sun",
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
        };
        write!(f, "{}", tag)
    }
}

/// Malformed alarm fields, rejected before any scheduling side effect
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("alarm owner is required")]
    MissingOwner,
    #[error("hour out of range: {0}")]
    HourOutOfRange(u8),
    #[error("minute out of range: {0}")]
    MinuteOutOfRange(u8),
}

fn validate_time(hour: u8, minute: u8) -> Result<(), ValidationError> {
    if hour > 23 {
        return Err(ValidationError::HourOutOfRange(hour));
    }
    if minute > 59 {
        return Err(ValidationError::MinuteOutOfRange(minute));
    }
    Ok(())
}

/// In-memory alarm state owned by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alarm {
    pub id: AlarmId,
    pub owner: String,
    pub label: Option<String>,
    /// Wall-clock fire hour, 0..=23
    pub hour: u8,
    /// Wall-clock fire minute, 0..=59
    pub minute: u8,
    /// Empty set = fire once
    pub repeat_days: BTreeSet<Weekday>,
    /// Dismissal requires solving arithmetic challenges (opaque to the engine)
    pub puzzle: bool,
    pub enabled: bool,
    /// Outstanding delivery handles, owned exclusively by this alarm.
    /// Empty iff the alarm is disabled or between cancel-and-reschedule.
    pub scheduled: Vec<DeliveryHandle>,
    /// Cached instant of the next expected primary delivery, used to reject
    /// premature triggers
    pub next_trigger_at: Option<DateTime<Utc>>,
}

impl Alarm {
    pub fn is_repeating(&self) -> bool {
        !self.repeat_days.is_empty()
    }

    /// "HH:MM" rendering of the fire time
    pub fn time_label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    /// Convert a persisted record into engine state.
    ///
    /// The record's fire time is reduced modulo one day, so any epoch value
    /// with the right wall-clock components round-trips.
    pub fn from_record(record: AlarmRecord) -> Self {
        let secs = record.fire_at.rem_euclid(SECS_PER_DAY);
        Self {
            id: record.id,
            owner: record.owner,
            label: record.label,
            hour: (secs / 3600) as u8,
            minute: ((secs % 3600) / 60) as u8,
            repeat_days: record.repeat_days,
            puzzle: record.puzzle,
            enabled: record.enabled,
            scheduled: record
                .scheduled_ids
                .into_iter()
                .map(DeliveryHandle)
                .collect(),
            next_trigger_at: record
                .next_trigger_at
                .and_then(|t| DateTime::from_timestamp(t, 0)),
        }
    }

    /// Convert engine state into the persisted record shape
    pub fn to_record(&self) -> AlarmRecord {
        AlarmRecord {
            id: self.id.clone(),
            owner: self.owner.clone(),
            label: self.label.clone(),
            fire_at: i64::from(self.hour) * 3600 + i64::from(self.minute) * 60,
            repeat_days: self.repeat_days.clone(),
            puzzle: self.puzzle,
            enabled: self.enabled,
            scheduled_ids: self.scheduled.iter().map(|h| h.0.clone()).collect(),
            next_trigger_at: self.next_trigger_at.map(|t| t.timestamp()),
        }
    }
}

/// Document shape at the persistence boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRecord {
    #[serde(default)]
    pub id: AlarmId,
    pub owner: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Seconds since epoch; only the time-of-day component is meaningful
    pub fire_at: i64,
    #[serde(default)]
    pub repeat_days: BTreeSet<Weekday>,
    #[serde(default)]
    pub puzzle: bool,
    pub enabled: bool,
    #[serde(default)]
    pub scheduled_ids: Vec<String>,
    #[serde(default)]
    pub next_trigger_at: Option<i64>,
}

/// Input for creating a new alarm
#[derive(Debug, Clone)]
pub struct AlarmDraft {
    pub owner: String,
    pub label: Option<String>,
    pub hour: u8,
    pub minute: u8,
    pub repeat_days: BTreeSet<Weekday>,
    pub puzzle: bool,
    pub enabled: bool,
}

impl AlarmDraft {
    pub fn new(owner: impl Into<String>, hour: u8, minute: u8) -> Self {
        Self {
            owner: owner.into(),
            label: None,
            hour,
            minute,
            repeat_days: BTreeSet::new(),
            puzzle: false,
            enabled: true,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_repeat_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.repeat_days = days.into_iter().collect();
        self
    }

    pub fn with_puzzle(mut self) -> Self {
        self.puzzle = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Reject malformed drafts before any side effect
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.owner.trim().is_empty() {
            return Err(ValidationError::MissingOwner);
        }
        validate_time(self.hour, self.minute)
    }

    /// Record shape for the initial persistence round trip. The id is
    /// assigned by the store.
    pub fn to_record(&self) -> AlarmRecord {
        AlarmRecord {
            id: AlarmId::default(),
            owner: self.owner.clone(),
            label: self.label.clone(),
            fire_at: i64::from(self.hour) * 3600 + i64::from(self.minute) * 60,
            repeat_days: self.repeat_days.clone(),
            puzzle: self.puzzle,
            enabled: self.enabled,
            scheduled_ids: vec![],
            next_trigger_at: None,
        }
    }
}

/// Partial update merged over an existing alarm. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct AlarmPatch {
    pub label: Option<String>,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub repeat_days: Option<BTreeSet<Weekday>>,
    pub puzzle: Option<bool>,
    pub enabled: Option<bool>,
}

impl AlarmPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn time(mut self, hour: u8, minute: u8) -> Self {
        self.hour = Some(hour);
        self.minute = Some(minute);
        self
    }

    pub fn repeat_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.repeat_days = Some(days.into_iter().collect());
        self
    }

    pub fn puzzle(mut self, puzzle: bool) -> Self {
        self.puzzle = Some(puzzle);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Merge over an existing alarm, validating the merged fire time.
    /// Scheduling state (`scheduled`, `next_trigger_at`) is not part of a
    /// patch; the service recomputes it on reschedule.
    pub fn apply(&self, alarm: &Alarm) -> Result<Alarm, ValidationError> {
        let mut merged = alarm.clone();
        if let Some(label) = &self.label {
            merged.label = Some(label.clone());
        }
        if let Some(hour) = self.hour {
            merged.hour = hour;
        }
        if let Some(minute) = self.minute {
            merged.minute = minute;
        }
        if let Some(days) = &self.repeat_days {
            merged.repeat_days = days.clone();
        }
        if let Some(puzzle) = self.puzzle {
            merged.puzzle = puzzle;
        }
        if let Some(enabled) = self.enabled {
            merged.enabled = enabled;
        }
        validate_time(merged.hour, merged.minute)?;
        Ok(merged)
    }
}

#[cfg(test)]
#[path = "alarm_tests.rs"]
mod tests;
