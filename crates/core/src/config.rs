// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration
//!
//! All scheduling offsets and reconciliation windows live here. The defaults
//! match the shipped product; they are tunable constants, not protocol
//! guarantees.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable constants for scheduling and reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Offsets past the primary instant at which nag follow-ups fire
    #[serde(default = "default_nag_offsets")]
    pub nag_offsets: Vec<Duration>,
    /// Discard a trigger whose cached fire instant is still further out
    /// than this
    #[serde(with = "humantime_serde", default = "default_premature_guard")]
    pub premature_guard: Duration,
    /// Discard a trigger for an alarm that already rang within this window
    #[serde(with = "humantime_serde", default = "default_recency_window")]
    pub recency_window: Duration,
    /// Tolerance for resolving an id-less event against an enabled alarm's
    /// wall-clock time
    #[serde(with = "humantime_serde", default = "default_match_window")]
    pub match_window: Duration,
    /// How long an unresolvable event stays queued for retry before it is
    /// dropped
    #[serde(with = "humantime_serde", default = "default_pending_ttl")]
    pub pending_ttl: Duration,
    /// Bound on the recently-processed notification-handle set
    #[serde(default = "default_processed_capacity")]
    pub processed_capacity: usize,
}

fn default_nag_offsets() -> Vec<Duration> {
    [60, 180, 300, 420, 540]
        .into_iter()
        .map(Duration::from_secs)
        .collect()
}

fn default_premature_guard() -> Duration {
    Duration::from_secs(15)
}

fn default_recency_window() -> Duration {
    Duration::from_secs(120)
}

fn default_match_window() -> Duration {
    Duration::from_secs(120)
}

fn default_pending_ttl() -> Duration {
    Duration::from_secs(120)
}

fn default_processed_capacity() -> usize {
    32
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nag_offsets: default_nag_offsets(),
            premature_guard: default_premature_guard(),
            recency_window: default_recency_window(),
            match_window: default_match_window(),
            pending_ttl: default_pending_ttl(),
            processed_capacity: default_processed_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_constants() {
        let config = EngineConfig::default();
        assert_eq!(
            config.nag_offsets,
            vec![
                Duration::from_secs(60),
                Duration::from_secs(180),
                Duration::from_secs(300),
                Duration::from_secs(420),
                Duration::from_secs(540),
            ]
        );
        assert_eq!(config.premature_guard, Duration::from_secs(15));
        assert_eq!(config.recency_window, Duration::from_secs(120));
        assert_eq!(config.match_window, Duration::from_secs(120));
        assert_eq!(config.pending_ttl, Duration::from_secs(120));
        assert_eq!(config.processed_capacity, 32);
    }

    #[test]
    fn windows_parse_from_humantime_strings() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"premature_guard": "30s", "recency_window": "5m"}"#,
        )
        .unwrap();
        assert_eq!(config.premature_guard, Duration::from_secs(30));
        assert_eq!(config.recency_window, Duration::from_secs(300));
        // Unspecified fields fall back to defaults
        assert_eq!(config.pending_ttl, Duration::from_secs(120));
    }
}
