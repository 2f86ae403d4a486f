//! Wall-clock and calendar-day helpers.
//!
//! # Responsibility
//! - Provide the current instant and the user's calendar-day offset.
//! - Convert UTC instants into calendar days for day-granular rules.
//!
//! # Invariants
//! - Calendar-day comparisons always go through the clock's offset, never
//!   through the raw UTC date.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Offset, Utc};

/// Source of "now" for services and views.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Offset that defines the user's calendar day.
    fn offset(&self) -> FixedOffset;

    /// Calendar day containing `now()`.
    fn today(&self) -> NaiveDate {
        calendar_day(self.now(), self.offset())
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn offset(&self) -> FixedOffset {
        (**self).offset()
    }
}

/// Clock backed by the system time and local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset(&self) -> FixedOffset {
        Local::now().offset().fix()
    }
}

/// Clock pinned to a given instant; used by tests and replay tooling.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Fixed clock in UTC.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }

    /// Moves the pinned instant forward by `days`.
    pub fn advance_days(&mut self, days: i64) {
        self.now += Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

/// Calendar day of `instant` as seen from `offset`.
pub fn calendar_day(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// The last `count` calendar days ending at `today`, oldest first.
pub fn trailing_days(today: NaiveDate, count: u32) -> Vec<NaiveDate> {
    (0..i64::from(count))
        .rev()
        .map(|back| today - Duration::days(back))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{calendar_day, trailing_days, Clock, FixedClock};
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    #[test]
    fn calendar_day_respects_offset() {
        let instant = Utc.with_ymd_and_hms(2026, 5, 1, 23, 30, 0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            calendar_day(instant, plus_two),
            NaiveDate::from_ymd_opt(2026, 5, 2).unwrap()
        );
    }

    #[test]
    fn trailing_days_are_oldest_first() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        let days = trailing_days(today, 7);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2026, 2, 25).unwrap());
        assert_eq!(days[6], today);
    }

    #[test]
    fn fixed_clock_advances_by_whole_days() {
        let mut clock = FixedClock::utc(Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap());
        clock.advance_days(1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }
}
