//! Review window and high-water mark

use super::types::TapState;
use crate::auth::skewed_timestamp;
use tracing::{debug, warn};

/// Lookback used when neither a cursor nor a start date is available
pub const DEFAULT_LOOKBACK_SECS: i64 = 7 * 24 * 60 * 60;

/// The `updatedAt` range requested for every review page of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewWindow {
    /// Lower bound (Unix seconds)
    pub from_timestamp: i64,
    /// Upper bound (Unix seconds), fixed for the run
    pub to_timestamp: i64,
}

impl ReviewWindow {
    /// Derive the window for a run starting at `now`
    ///
    /// The lower bound is the persisted cursor, else `start_date`, else a
    /// week before `now`. The upper bound trails `now` by the clock skew
    /// allowance.
    pub fn compute(state: &TapState, start_date: Option<i64>, now: i64) -> Self {
        let from_timestamp = match (state.last_update, start_date) {
            (Some(last_update), _) => last_update,
            (None, Some(start)) => start,
            (None, None) => now - DEFAULT_LOOKBACK_SECS,
        };
        let to_timestamp = skewed_timestamp(now);

        if from_timestamp > to_timestamp {
            warn!(
                from_timestamp,
                to_timestamp, "Review window starts after it ends"
            );
        }
        debug!(from_timestamp, to_timestamp, "Computed review window");

        Self {
            from_timestamp,
            to_timestamp,
        }
    }

    /// Value of the `updatedAt` query filter
    pub fn updated_at_range(&self) -> String {
        format!("{}..{}", self.from_timestamp, self.to_timestamp)
    }
}

/// Running max of review `updatedAt` values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighWaterMark {
    fallback: i64,
    max: Option<i64>,
}

impl HighWaterMark {
    /// Start tracking; `fallback` is used when nothing is observed
    pub fn new(fallback: i64) -> Self {
        Self {
            fallback,
            max: None,
        }
    }

    /// Record one emitted review's `updatedAt`
    ///
    /// Non-positive values come from reviews without the field and are
    /// ignored.
    pub fn observe(&mut self, updated_at: i64) {
        if updated_at <= 0 {
            return;
        }
        self.max = Some(self.max.map_or(updated_at, |m| m.max(updated_at)));
    }

    /// Whether any value was observed
    pub fn is_empty(&self) -> bool {
        self.max.is_none()
    }

    /// The new cursor value
    pub fn value(&self) -> i64 {
        self.max.unwrap_or(self.fallback)
    }
}
