use chrono::{Days, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        TimeRange { start, end }
    }

    pub fn is_overlapping(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    /// The `length`-day window, counted from `origin`, that contains `instant`.
    pub fn day_window(origin: NaiveDate, length: u64, instant: NaiveDateTime) -> TimeRange {
        let origin_start = origin.and_hms_opt(0, 0, 0).unwrap_or_default();
        let elapsed_days = (instant - origin_start).num_days().max(0) as u64;
        let index = elapsed_days / length.max(1);
        let start = origin_start + Days::new(index * length);
        TimeRange::new(start, start + Days::new(length))
    }

    /// The calendar-month window (origin + k months) that contains `instant`.
    pub fn month_window(origin: NaiveDate, instant: NaiveDateTime) -> TimeRange {
        let origin_start = origin.and_hms_opt(0, 0, 0).unwrap_or_default();
        let mut start = origin_start;
        let mut k = 0u32;
        loop {
            let Some(end) = origin_start.checked_add_months(Months::new(k + 1)) else {
                return TimeRange::new(start, NaiveDateTime::MAX);
            };
            if instant < end {
                return TimeRange::new(start, end);
            }
            start = end;
            k += 1;
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}
