//! CSV export of aggregated reports.
//!
//! The layout is the one externally consumed artifact with a fixed shape:
//!
//! ```text
//! Employee Name,Date,Clock In,Clock Out,Hours
//! Mette Holm,2026-01-15,09:00,17:30,8.50
//! ```

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ClockError, ClockResult};
use crate::models::{TimeEntry, TimeReport};

use super::date_range::DateRange;
use super::duration::calculate_duration;

/// Column headers of the export.
pub const CSV_HEADERS: [&str; 5] = ["Employee Name", "Date", "Clock In", "Clock Out", "Hours"];

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Serializes reports to CSV text, one row per contributing entry.
///
/// Hours are `minutes / 60` with two fraction digits, not the floored
/// `total_hours` of the report. Open entries have an empty clock-out cell.
/// Records are separated by `\n` with no trailing newline. A field is quoted
/// only when it contains a comma, a quote or a line break.
///
/// # Examples
///
/// ```
/// use timeclock::models::{TimeEntry, TimeReport};
/// use timeclock::reporting::to_csv;
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let report = TimeReport {
///     user_id: "emp_001".to_string(),
///     user_name: "Mette Holm".to_string(),
///     total_hours: 8,
///     total_minutes: 510,
///     entries: vec![TimeEntry {
///         id: "entry_001".to_string(),
///         employee_id: "emp_001".to_string(),
///         clock_in: at("2026-01-15 09:00:00"),
///         clock_out: Some(at("2026-01-15 17:30:00")),
///         station_id: "st_front".to_string(),
///     }],
/// };
///
/// let csv = to_csv(&[report]).unwrap();
/// assert_eq!(
///     csv,
///     "Employee Name,Date,Clock In,Clock Out,Hours\nMette Holm,2026-01-15,09:00,17:30,8.50"
/// );
/// ```
pub fn to_csv(reports: &[TimeReport]) -> ClockResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS).map_err(export_error)?;

    for report in reports {
        for entry in &report.entries {
            writer
                .write_record(entry_row(&report.user_name, entry))
                .map_err(export_error)?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| ClockError::Export {
        message: e.to_string(),
    })?;
    let mut text = String::from_utf8(bytes).map_err(|e| ClockError::Export {
        message: e.to_string(),
    })?;

    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Formats a minute count as decimal hours with two fraction digits.
///
/// # Examples
///
/// ```
/// use timeclock::reporting::format_hours;
///
/// assert_eq!(format_hours(510), "8.50");
/// assert_eq!(format_hours(1), "0.02");
/// assert_eq!(format_hours(0), "0.00");
/// ```
pub fn format_hours(minutes: i64) -> String {
    let hours = (Decimal::from(minutes) / Decimal::from(60))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", hours)
}

/// Returns the download file name for an export over `range`.
pub fn export_file_name(range: &DateRange) -> String {
    format!(
        "timesheet-{}-{}.csv",
        range.start().format(DATE_FORMAT),
        range.end().format(DATE_FORMAT)
    )
}

fn entry_row(user_name: &str, entry: &TimeEntry) -> [String; 5] {
    [
        user_name.to_string(),
        entry.clock_in.format(DATE_FORMAT).to_string(),
        entry.clock_in.format(TIME_FORMAT).to_string(),
        entry
            .clock_out
            .map(|out| out.format(TIME_FORMAT).to_string())
            .unwrap_or_default(),
        format_hours(calculate_duration(entry)),
    ]
}

fn export_error(error: csv::Error) -> ClockError {
    ClockError::Export {
        message: error.to_string(),
    }
}
