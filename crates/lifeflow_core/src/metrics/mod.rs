//! Derived dashboard metrics.
//!
//! # Responsibility
//! - Compute per-view aggregates (counts, rates, streak math, weekly buckets,
//!   priority distribution) over already-fetched snapshots.
//!
//! # Invariants
//! - Functions here are pure: no I/O, no clock reads. Callers pass a
//!   `CalendarContext` captured once per render.
//! - Percentages use half-up integer rounding and are 0 for empty inputs.

use crate::clock::{calendar_day, Clock};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

pub mod goal_metrics;
pub mod habit_metrics;
pub mod task_metrics;

/// Snapshot of "now" used for day-granular rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarContext {
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
    pub offset: FixedOffset,
}

impl CalendarContext {
    pub fn from_clock(clock: &dyn Clock) -> Self {
        Self::new(clock.now(), clock.offset())
    }

    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now,
            today: calendar_day(now, offset),
            offset,
        }
    }

    /// Calendar day of `instant` in this context's offset.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        calendar_day(instant, self.offset)
    }
}

/// `round(100 * part / whole)` with half-up rounding; 0 when `whole == 0`.
pub fn rounded_percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    let scaled = (200 * part + whole) / (2 * whole);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// `round(sum / count)` with half-up rounding; 0 when `count == 0`.
pub fn rounded_mean(sum: u64, count: u64) -> u32 {
    if count == 0 {
        return 0;
    }
    let mean = (2 * sum + count) / (2 * count);
    u32::try_from(mean).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{rounded_mean, rounded_percent};

    #[test]
    fn rounded_percent_rounds_half_up() {
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(0, 0), 0);
        assert_eq!(rounded_percent(5, 5), 100);
    }

    #[test]
    fn rounded_mean_rounds_half_up() {
        assert_eq!(rounded_mean(5, 2), 3);
        assert_eq!(rounded_mean(4, 3), 1);
        assert_eq!(rounded_mean(0, 0), 0);
    }
}
