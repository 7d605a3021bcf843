//! Completion statistics, live progress, and the save-game payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics computed once, when the last pair is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub completion_time_seconds: u64,
    pub total_pairs: u32,
    pub total_attempts: u32,
    pub accuracy_percent: u32,
    pub average_seconds_per_match: u64,
}

impl GameStats {
    /// Compute stats for a finished game.
    ///
    /// Percentages and averages round half up. A completion time that would be
    /// negative (clock moved backwards) counts as zero.
    pub fn compute(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total_pairs: u32,
        total_attempts: u32,
    ) -> Self {
        let completion_time_seconds = whole_seconds_between(started_at, completed_at);

        let accuracy_percent = if total_attempts == 0 {
            0
        } else {
            round_half_up_div(u64::from(total_pairs) * 100, u64::from(total_attempts)) as u32
        };

        let average_seconds_per_match = if total_pairs == 0 {
            0
        } else {
            round_half_up_div(completion_time_seconds, u64::from(total_pairs))
        };

        Self {
            completion_time_seconds,
            total_pairs,
            total_attempts,
            accuracy_percent,
            average_seconds_per_match,
        }
    }
}

/// Floor of the seconds between two instants, never negative.
pub(crate) fn whole_seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    (to - from).num_seconds().max(0) as u64
}

/// `round(numerator / denominator)` with ties going up, in integer arithmetic.
fn round_half_up_div(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

/// Live counters for a session in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameProgress {
    pub matched_pairs: u32,
    pub total_pairs: u32,
    pub attempts: u32,
}

/// Payload reported to the result sink after a win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub deck_id: i64,
    #[serde(rename = "completionTimeInSeconds")]
    pub completion_time_seconds: u64,
    pub total_pairs: u32,
    pub total_attempts: u32,
}

impl GameResult {
    pub fn from_stats(deck_id: i64, stats: &GameStats) -> Self {
        Self {
            deck_id,
            completion_time_seconds: stats.completion_time_seconds,
            total_pairs: stats.total_pairs,
            total_attempts: stats.total_attempts,
        }
    }
}

/// Render seconds as `m:ss`.
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
