//! Reporting engine for the time clock.
//!
//! This module contains the duration calculator, the per-employee report
//! aggregator, inclusive date ranges and the CSV exporter. Everything here is
//! a pure function of its inputs except [`build_reports`], which reads the
//! entries and employees it aggregates from the store.

mod aggregate;
mod csv_export;
mod date_range;
mod duration;

pub use aggregate::{aggregate, employee_name_map};
pub use csv_export::{CSV_HEADERS, export_file_name, format_hours, to_csv};
pub use date_range::DateRange;
pub use duration::calculate_duration;

use tracing::info;

use crate::error::ClockResult;
use crate::models::{Role, TimeReport};
use crate::store::TimeClockStore;

/// Loads the entries of `range` and aggregates them per employee.
pub fn build_reports(store: &dyn TimeClockStore, range: &DateRange) -> ClockResult<Vec<TimeReport>> {
    let entries = store.list_entries(range)?;
    let employees = store.list_users(Role::Employee)?;
    let reports = aggregate(&entries, &employee_name_map(&employees));

    info!(
        start = %range.start(),
        end = %range.end(),
        entries = entries.len(),
        employees = reports.len(),
        "Built time reports"
    );
    Ok(reports)
}
