//! Per-employee aggregation of time entries.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{TimeEntry, TimeReport, User};

use super::duration::calculate_duration;

/// Groups entries by employee and sums their durations.
///
/// The caller filters `entries` to the wanted date range beforehand.
/// Entries whose employee id is not a key of `employee_names` are skipped
/// without error, which keeps orphaned entries of deleted employees out of
/// the output. Reports appear in the order each employee is first seen, and
/// each report keeps its entries in input order. Open entries are listed but
/// add 0 minutes.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use timeclock::models::TimeEntry;
/// use timeclock::reporting::aggregate;
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let entries = vec![TimeEntry {
///     id: "entry_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     clock_in: at("2026-01-15 09:00:00"),
///     clock_out: Some(at("2026-01-15 17:30:00")),
///     station_id: "st_front".to_string(),
/// }];
/// let names = HashMap::from([("emp_001".to_string(), "Mette Holm".to_string())]);
///
/// let reports = aggregate(&entries, &names);
/// assert_eq!(reports[0].total_minutes, 510);
/// assert_eq!(reports[0].total_hours, 8);
/// assert_eq!(reports[0].remaining_minutes(), 30);
/// ```
pub fn aggregate(entries: &[TimeEntry], employee_names: &HashMap<String, String>) -> Vec<TimeReport> {
    let mut reports: Vec<TimeReport> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let Some(name) = employee_names.get(&entry.employee_id) else {
            debug!(
                entry_id = %entry.id,
                employee_id = %entry.employee_id,
                "Skipping entry for unknown employee"
            );
            continue;
        };

        let index = *positions.entry(entry.employee_id.as_str()).or_insert_with(|| {
            reports.push(TimeReport {
                user_id: entry.employee_id.clone(),
                user_name: name.clone(),
                total_hours: 0,
                total_minutes: 0,
                entries: Vec::new(),
            });
            reports.len() - 1
        });

        let report = &mut reports[index];
        report.total_minutes += calculate_duration(entry);
        report.total_hours = report.total_minutes.div_euclid(60);
        report.entries.push(entry.clone());
    }

    reports
}

/// Builds the employee id to display name map expected by [`aggregate`].
pub fn employee_name_map(users: &[User]) -> HashMap<String, String> {
    users
        .iter()
        .map(|user| (user.id.clone(), user.display_name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::NaiveDateTime;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn make_entry(id: &str, employee_id: &str, clock_in: &str, clock_out: Option<&str>) -> TimeEntry {
        TimeEntry {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            clock_in: make_datetime(clock_in),
            clock_out: clock_out.map(make_datetime),
            station_id: "st_front".to_string(),
        }
    }

    fn names() -> HashMap<String, String> {
        HashMap::from([
            ("emp_001".to_string(), "Mette Holm".to_string()),
            ("emp_002".to_string(), "Jonas Dahl".to_string()),
        ])
    }

    /// AG-001: entries of one employee are summed
    #[test]
    fn test_sums_minutes_per_employee() {
        let entries = vec![
            make_entry("e1", "emp_001", "2026-01-12 09:00:00", Some("2026-01-12 17:00:00")),
            make_entry("e2", "emp_001", "2026-01-13 09:00:00", Some("2026-01-13 12:45:00")),
        ];

        let reports = aggregate(&entries, &names());
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].total_minutes, 705);
        assert_eq!(reports[0].total_hours, 11);
        assert_eq!(reports[0].remaining_minutes(), 45);
        assert_eq!(reports[0].entries.len(), 2);
    }

    /// AG-002: output order follows first occurrence
    #[test]
    fn test_first_occurrence_order() {
        let entries = vec![
            make_entry("e1", "emp_002", "2026-01-12 09:00:00", Some("2026-01-12 10:00:00")),
            make_entry("e2", "emp_001", "2026-01-12 09:00:00", Some("2026-01-12 10:00:00")),
            make_entry("e3", "emp_002", "2026-01-13 09:00:00", Some("2026-01-13 10:00:00")),
        ];

        let reports = aggregate(&entries, &names());
        let ids: Vec<&str> = reports.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, vec!["emp_002", "emp_001"]);
        assert_eq!(reports[0].user_name, "Jonas Dahl");
        assert_eq!(reports[0].total_minutes, 120);
    }

    /// AG-003: orphaned entries are skipped
    #[test]
    fn test_unknown_employee_skipped() {
        let entries = vec![
            make_entry("e1", "emp_gone", "2026-01-12 09:00:00", Some("2026-01-12 17:00:00")),
            make_entry("e2", "emp_001", "2026-01-12 09:00:00", Some("2026-01-12 10:00:00")),
        ];

        let reports = aggregate(&entries, &names());
        assert_eq!(reports.len(), 1);
        assert!(reports.iter().all(|r| r.user_id != "emp_gone"));
    }

    /// AG-004: open entries are listed but add nothing
    #[test]
    fn test_open_entry_listed_without_minutes() {
        let entries = vec![
            make_entry("e1", "emp_001", "2026-01-12 09:00:00", Some("2026-01-12 10:30:00")),
            make_entry("e2", "emp_001", "2026-01-13 09:00:00", None),
        ];

        let reports = aggregate(&entries, &names());
        assert_eq!(reports[0].entries.len(), 2);
        assert_eq!(reports[0].total_minutes, 90);
        assert_eq!(reports[0].total_hours, 1);
    }

    /// AG-005: negative corrections reduce the total
    #[test]
    fn test_negative_duration_reduces_total() {
        let entries = vec![
            make_entry("e1", "emp_001", "2026-01-12 09:00:00", Some("2026-01-12 10:00:00")),
            make_entry("e2", "emp_001", "2026-01-13 10:00:00", Some("2026-01-13 09:30:00")),
        ];

        let reports = aggregate(&entries, &names());
        assert_eq!(reports[0].total_minutes, 30);
        assert_eq!(reports[0].total_hours, 0);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[], &names()).is_empty());
    }

    #[test]
    fn test_employee_name_map() {
        let users = vec![User {
            id: "emp_001".to_string(),
            email: "mette@example.com".to_string(),
            first_name: "Mette".to_string(),
            last_name: "Holm".to_string(),
            access_code: Some("1234".to_string()),
            role: Role::Employee,
            active: true,
        }];

        let map = employee_name_map(&users);
        assert_eq!(map.get("emp_001").map(String::as_str), Some("Mette Holm"));
    }
}
