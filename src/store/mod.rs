//! Persistence collaborator for the time clock.
//!
//! The core reads users and stations and reads/writes time entries through
//! [`TimeClockStore`]. Every call is a blocking, fallible operation; a failure
//! surfaces as [`ClockError::SystemError`](crate::error::ClockError::SystemError)
//! and is never retried automatically.
//!
//! [`InMemoryStore`] is the bundled implementation used by the server binary
//! and the tests.

mod memory;

pub use memory::InMemoryStore;

use chrono::NaiveDateTime;

use crate::error::ClockResult;
use crate::models::{Role, Station, TimeEntry, User};
use crate::reporting::DateRange;

/// Storage operations the time clock depends on.
pub trait TimeClockStore: Send + Sync {
    /// Finds the single active employee whose access code is `code`.
    ///
    /// Administrators and inactive employees never match. Returns `None`
    /// when no employee, or more than one, matches.
    fn find_active_employee_by_code(&self, code: &str) -> ClockResult<Option<User>>;

    /// Finds any user by id.
    fn find_user(&self, user_id: &str) -> ClockResult<Option<User>>;

    /// Finds the employee's open entry, if any.
    fn find_open_entry(&self, employee_id: &str) -> ClockResult<Option<TimeEntry>>;

    /// Opens a new entry and returns its id.
    ///
    /// The check for an existing open entry and the insert are one atomic
    /// step: if the employee already has an open entry the call fails with
    /// `ConcurrentOpenEntry` and nothing is written.
    fn insert_entry(
        &self,
        employee_id: &str,
        station_id: &str,
        clock_in: NaiveDateTime,
    ) -> ClockResult<String>;

    /// Sets the clock-out of the employee's open entry.
    ///
    /// Fails with `NoOpenEntry` if the employee has none.
    fn close_open_entry(&self, employee_id: &str, clock_out: NaiveDateTime) -> ClockResult<TimeEntry>;

    /// Lists entries whose clock-in falls within `range`.
    fn list_entries(&self, range: &DateRange) -> ClockResult<Vec<TimeEntry>>;

    /// Lists every open entry, most recent clock-in first.
    fn list_open_entries(&self) -> ClockResult<Vec<TimeEntry>>;

    /// Replaces the timestamps of an entry (administrator correction).
    ///
    /// Fails with `EntryNotFound` for an unknown id and with
    /// `ConcurrentOpenEntry` if re-opening the entry would give the employee
    /// a second open entry.
    fn update_entry(
        &self,
        entry_id: &str,
        clock_in: NaiveDateTime,
        clock_out: Option<NaiveDateTime>,
    ) -> ClockResult<TimeEntry>;

    /// Lists users holding `role`.
    fn list_users(&self, role: Role) -> ClockResult<Vec<User>>;

    /// Finds the single active station. Returns `None` when there is no
    /// active station or more than one.
    fn find_active_station(&self) -> ClockResult<Option<Station>>;

    /// Finds a station by id, active or not.
    fn find_station(&self, station_id: &str) -> ClockResult<Option<Station>>;
}
