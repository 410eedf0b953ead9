//! Duration calculation for time entries.

use crate::models::TimeEntry;

/// Computes the elapsed whole minutes of a time entry.
///
/// An entry that is still open contributes 0 minutes, so in-progress shifts
/// never inflate a report. The difference is taken between the entry's own
/// timestamps, never against the current time, and is truncated toward zero.
/// Clock-outs that precede clock-in (from a manual correction) produce a
/// negative result that is returned unchanged.
///
/// # Examples
///
/// ```
/// use timeclock::models::TimeEntry;
/// use timeclock::reporting::calculate_duration;
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let mut entry = TimeEntry {
///     id: "entry_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     clock_in: at("2026-01-15 09:00:00"),
///     clock_out: None,
///     station_id: "st_front".to_string(),
/// };
/// assert_eq!(calculate_duration(&entry), 0);
///
/// entry.clock_out = Some(at("2026-01-15 17:30:00"));
/// assert_eq!(calculate_duration(&entry), 510);
/// ```
pub fn calculate_duration(entry: &TimeEntry) -> i64 {
    entry.duration_minutes()
}
