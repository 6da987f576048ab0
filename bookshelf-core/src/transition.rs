//! Date side effects of changing a book's reading status

use crate::types::{not_set, ReadingDates, Status};
use chrono::{DateTime, Utc};

/// Compute the reading dates after a status change from `old` to `new`.
///
/// Only called when the status actually changes. Does not check that the
/// resulting dates are in order.
pub fn apply_status_change(
    old: Status,
    new: Status,
    dates: ReadingDates,
    now: DateTime<Utc>,
) -> ReadingDates {
    let mut next = dates;
    match new {
        Status::OnShelf => {
            next.started = not_set();
            next.completed = not_set();
        }
        Status::InProgress => match old {
            Status::Completed => next.completed = not_set(),
            Status::OnShelf => next.started = now,
            Status::InProgress => {}
        },
        Status::Completed => {
            if old == Status::OnShelf {
                // never explicitly started
                next.started = next.added;
            }
            next.completed = now;
        }
    }
    next
}
