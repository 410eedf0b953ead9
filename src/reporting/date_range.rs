//! Inclusive report date ranges.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{ClockError, ClockResult};
use crate::models::TimeEntry;

/// A range of days, inclusive of both endpoints.
///
/// An entry belongs to the range when its clock-in falls between
/// `start 00:00:00` and the end of `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting a start after the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use timeclock::reporting::DateRange;
    /// use chrono::NaiveDate;
    ///
    /// let jan = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
    /// assert!(DateRange::new(jan(1), jan(31)).is_ok());
    /// assert!(DateRange::new(jan(31), jan(1)).is_err());
    /// ```
    pub fn new(start: NaiveDate, end: NaiveDate) -> ClockResult<Self> {
        if start > end {
            return Err(ClockError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range covering a single day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// First day of the range.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true if `at` falls on one of the range's days.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let day = at.date();
        day >= self.start && day <= self.end
    }

    /// Returns true if the entry's clock-in falls within the range.
    pub fn includes(&self, entry: &TimeEntry) -> bool {
        self.contains(entry.clock_in)
    }
}
