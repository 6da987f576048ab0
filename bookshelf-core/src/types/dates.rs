//! Reading dates and the "not set" sentinel

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds from the Unix epoch to 0001-01-01T00:00:00Z
const NOT_SET_SECS: i64 = -62_135_596_800;

/// Sentinel for a date that has not happened yet.
///
/// A far-past timestamp rather than `Option`, so unset dates sort first and
/// comparisons stay total.
pub fn not_set() -> DateTime<Utc> {
    DateTime::from_timestamp(NOT_SET_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Whether a date holds a real value
pub fn is_set(date: &DateTime<Utc>) -> bool {
    *date > not_set()
}

/// The three timestamps that track a book's reading history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingDates {
    pub added: DateTime<Utc>,
    pub started: DateTime<Utc>,
    pub completed: DateTime<Utc>,
}

impl ReadingDates {
    /// Dates for a book added at `added` and not yet started
    pub fn added_at(added: DateTime<Utc>) -> Self {
        Self {
            added,
            started: not_set(),
            completed: not_set(),
        }
    }

    /// Pairs that are set but out of order, as (earlier, later) field names
    pub fn ordering_violations(&self) -> Vec<(&'static str, &'static str)> {
        let mut violations = Vec::new();
        if is_set(&self.started) && self.started < self.added {
            violations.push(("date added", "date started"));
        }
        if is_set(&self.started) && is_set(&self.completed) && self.completed < self.started {
            violations.push(("date started", "date completed"));
        }
        violations
    }
}
