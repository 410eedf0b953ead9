//! Aggregated report model.

use serde::{Deserialize, Serialize};

use super::TimeEntry;

/// Per-employee hours over a date range. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeReport {
    /// The employee the report covers.
    pub user_id: String,
    /// The employee's display name.
    pub user_name: String,
    /// Whole hours worked (floor of `total_minutes / 60`).
    pub total_hours: i64,
    /// Total minutes worked.
    pub total_minutes: i64,
    /// Contributing entries in input order.
    pub entries: Vec<TimeEntry>,
}

impl TimeReport {
    /// Returns the minutes left over after `total_hours`.
    ///
    /// `total_hours * 60 + remaining_minutes() == total_minutes` holds for
    /// negative totals as well.
    pub fn remaining_minutes(&self) -> i64 {
        self.total_minutes.rem_euclid(60)
    }
}
