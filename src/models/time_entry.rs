//! Time entry model.
//!
//! A time entry is one shift at one station. An entry without a clock-out
//! timestamp is open: the employee is currently working.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One recorded shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier for the entry.
    pub id: String,
    /// The employee who worked the shift.
    pub employee_id: String,
    /// When the employee clocked in (terminal-local time).
    pub clock_in: NaiveDateTime,
    /// When the employee clocked out, or `None` while on shift.
    pub clock_out: Option<NaiveDateTime>,
    /// The station the employee clocked in at.
    pub station_id: String,
}

impl TimeEntry {
    /// Returns true while the employee is on shift.
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Returns the elapsed whole minutes of the entry.
    ///
    /// Open entries contribute nothing. Corrections that put clock-out
    /// before clock-in yield a negative value, which is passed through.
    ///
    /// # Examples
    ///
    /// ```
    /// use timeclock::models::TimeEntry;
    /// use chrono::NaiveDateTime;
    ///
    /// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
    /// let entry = TimeEntry {
    ///     id: "entry_001".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     clock_in: at("2026-01-15 09:00:00"),
    ///     clock_out: Some(at("2026-01-15 17:30:00")),
    ///     station_id: "st_front".to_string(),
    /// };
    /// assert_eq!(entry.duration_minutes(), 510);
    /// ```
    pub fn duration_minutes(&self) -> i64 {
        match self.clock_out {
            Some(clock_out) => (clock_out - self.clock_in).num_minutes(),
            None => 0,
        }
    }
}
