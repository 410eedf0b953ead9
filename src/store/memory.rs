//! In-memory store.

use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ClockError, ClockResult};
use crate::models::{Role, Station, TimeEntry, User};
use crate::reporting::DateRange;

use super::TimeClockStore;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    stations: Vec<Station>,
    entries: Vec<TimeEntry>,
}

/// A [`TimeClockStore`] holding all records behind one mutex.
///
/// Each operation runs under a single lock acquisition, which makes the
/// open-entry check in [`insert_entry`](TimeClockStore::insert_entry) and the
/// insert itself atomic.
///
/// # Example
///
/// ```
/// use timeclock::models::{Role, User};
/// use timeclock::store::{InMemoryStore, TimeClockStore};
///
/// let store = InMemoryStore::new();
/// store.add_user(User {
///     id: "emp_001".to_string(),
///     email: "mette@example.com".to_string(),
///     first_name: "Mette".to_string(),
///     last_name: "Holm".to_string(),
///     access_code: Some("1234".to_string()),
///     role: Role::Employee,
///     active: true,
/// })?;
///
/// let found = store.find_active_employee_by_code("1234")?;
/// assert_eq!(found.map(|u| u.id), Some("emp_001".to_string()));
/// # Ok::<(), timeclock::error::ClockError>(())
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with users and stations.
    pub fn with_records(users: Vec<User>, stations: Vec<Station>) -> Self {
        Self {
            tables: Mutex::new(Tables {
                users,
                stations,
                entries: Vec::new(),
            }),
        }
    }

    /// Adds or replaces a user.
    pub fn add_user(&self, user: User) -> ClockResult<()> {
        let mut tables = self.lock()?;
        tables.users.retain(|existing| existing.id != user.id);
        tables.users.push(user);
        Ok(())
    }

    /// Adds or replaces a station.
    pub fn add_station(&self, station: Station) -> ClockResult<()> {
        let mut tables = self.lock()?;
        tables.stations.retain(|existing| existing.id != station.id);
        tables.stations.push(station);
        Ok(())
    }

    /// Activates or deactivates a station.
    pub fn set_station_active(&self, station_id: &str, active: bool) -> ClockResult<()> {
        let mut tables = self.lock()?;
        if let Some(station) = tables.stations.iter_mut().find(|s| s.id == station_id) {
            station.active = active;
        }
        Ok(())
    }

    /// Activates or deactivates a user.
    pub fn set_user_active(&self, user_id: &str, active: bool) -> ClockResult<()> {
        let mut tables = self.lock()?;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.active = active;
        }
        Ok(())
    }

    /// Returns every entry of one employee, open or closed.
    pub fn entries_for(&self, employee_id: &str) -> ClockResult<Vec<TimeEntry>> {
        let tables = self.lock()?;
        Ok(tables
            .entries
            .iter()
            .filter(|e| e.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn lock(&self) -> ClockResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| ClockError::system("in-memory store lock poisoned"))
    }
}

impl TimeClockStore for InMemoryStore {
    fn find_active_employee_by_code(&self, code: &str) -> ClockResult<Option<User>> {
        let tables = self.lock()?;
        let mut matches = tables.users.iter().filter(|u| u.matches_code(code));

        match (matches.next(), matches.next()) {
            (Some(user), None) => Ok(Some(user.clone())),
            (Some(_), Some(_)) => {
                warn!("Access code is shared by more than one active employee");
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn find_user(&self, user_id: &str) -> ClockResult<Option<User>> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    fn find_open_entry(&self, employee_id: &str) -> ClockResult<Option<TimeEntry>> {
        let tables = self.lock()?;
        Ok(tables
            .entries
            .iter()
            .filter(|e| e.employee_id == employee_id && e.is_open())
            .max_by_key(|e| e.clock_in)
            .cloned())
    }

    fn insert_entry(
        &self,
        employee_id: &str,
        station_id: &str,
        clock_in: NaiveDateTime,
    ) -> ClockResult<String> {
        let mut tables = self.lock()?;

        if tables
            .entries
            .iter()
            .any(|e| e.employee_id == employee_id && e.is_open())
        {
            return Err(ClockError::ConcurrentOpenEntry {
                employee_id: employee_id.to_string(),
            });
        }

        let id = Uuid::new_v4().to_string();
        tables.entries.push(TimeEntry {
            id: id.clone(),
            employee_id: employee_id.to_string(),
            clock_in,
            clock_out: None,
            station_id: station_id.to_string(),
        });
        debug!(entry_id = %id, employee_id, "Inserted open entry");
        Ok(id)
    }

    fn close_open_entry(&self, employee_id: &str, clock_out: NaiveDateTime) -> ClockResult<TimeEntry> {
        let mut tables = self.lock()?;

        let entry = tables
            .entries
            .iter_mut()
            .find(|e| e.employee_id == employee_id && e.is_open())
            .ok_or_else(|| ClockError::NoOpenEntry {
                employee_id: employee_id.to_string(),
            })?;

        entry.clock_out = Some(clock_out);
        debug!(entry_id = %entry.id, employee_id, "Closed open entry");
        Ok(entry.clone())
    }

    fn list_entries(&self, range: &DateRange) -> ClockResult<Vec<TimeEntry>> {
        let tables = self.lock()?;
        Ok(tables
            .entries
            .iter()
            .filter(|e| range.includes(e))
            .cloned()
            .collect())
    }

    fn list_open_entries(&self) -> ClockResult<Vec<TimeEntry>> {
        let tables = self.lock()?;
        let mut open: Vec<TimeEntry> = tables.entries.iter().filter(|e| e.is_open()).cloned().collect();
        open.sort_by(|a, b| b.clock_in.cmp(&a.clock_in));
        Ok(open)
    }

    fn update_entry(
        &self,
        entry_id: &str,
        clock_in: NaiveDateTime,
        clock_out: Option<NaiveDateTime>,
    ) -> ClockResult<TimeEntry> {
        let mut tables = self.lock()?;

        let position = tables
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| ClockError::EntryNotFound {
                entry_id: entry_id.to_string(),
            })?;

        let employee_id = tables.entries[position].employee_id.clone();
        if clock_out.is_none()
            && tables
                .entries
                .iter()
                .any(|e| e.id != entry_id && e.employee_id == employee_id && e.is_open())
        {
            return Err(ClockError::ConcurrentOpenEntry { employee_id });
        }

        let entry = &mut tables.entries[position];
        entry.clock_in = clock_in;
        entry.clock_out = clock_out;
        Ok(entry.clone())
    }

    fn list_users(&self, role: Role) -> ClockResult<Vec<User>> {
        let tables = self.lock()?;
        Ok(tables.users.iter().filter(|u| u.role == role).cloned().collect())
    }

    fn find_active_station(&self) -> ClockResult<Option<Station>> {
        let tables = self.lock()?;
        let mut active = tables.stations.iter().filter(|s| s.active);

        match (active.next(), active.next()) {
            (Some(station), None) => Ok(Some(station.clone())),
            _ => Ok(None),
        }
    }

    fn find_station(&self, station_id: &str) -> ClockResult<Option<Station>> {
        let tables = self.lock()?;
        Ok(tables.stations.iter().find(|s| s.id == station_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn make_user(id: &str, code: Option<&str>, role: Role, active: bool) -> User {
        User {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            first_name: "Test".to_string(),
            last_name: id.to_string(),
            access_code: code.map(str::to_string),
            role,
            active,
        }
    }

    fn make_station(id: &str, active: bool) -> Station {
        Station {
            id: id.to_string(),
            name: format!("Station {}", id),
            location: "Lobby".to_string(),
            device_id: format!("device-{}", id),
            active,
        }
    }

    #[test]
    fn test_code_lookup_ignores_inactive_and_admins() {
        let store = InMemoryStore::with_records(
            vec![
                make_user("adm_001", Some("1234"), Role::Admin, true),
                make_user("emp_old", Some("1234"), Role::Employee, false),
                make_user("emp_001", Some("1234"), Role::Employee, true),
            ],
            vec![],
        );

        let found = store.find_active_employee_by_code("1234").unwrap();
        assert_eq!(found.map(|u| u.id), Some("emp_001".to_string()));
    }

    #[test]
    fn test_code_lookup_ambiguous_returns_none() {
        let store = InMemoryStore::with_records(
            vec![
                make_user("emp_001", Some("1234"), Role::Employee, true),
                make_user("emp_002", Some("1234"), Role::Employee, true),
            ],
            vec![],
        );

        assert!(store.find_active_employee_by_code("1234").unwrap().is_none());
    }

    #[test]
    fn test_insert_refuses_second_open_entry() {
        let store = InMemoryStore::new();
        let at = make_datetime("2026-01-15 09:00:00");

        store.insert_entry("emp_001", "st_front", at).unwrap();
        let err = store.insert_entry("emp_001", "st_back", at).unwrap_err();

        assert_eq!(
            err,
            ClockError::ConcurrentOpenEntry {
                employee_id: "emp_001".to_string()
            }
        );
        assert_eq!(store.entries_for("emp_001").unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_inserts_leave_one_open_entry() {
        let store = Arc::new(InMemoryStore::new());
        let barrier = Arc::new(Barrier::new(8));
        let at = make_datetime("2026-01-15 09:00:00");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    store.insert_entry("emp_001", &format!("st_{}", i), at)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);

        let open: Vec<_> = store
            .entries_for("emp_001")
            .unwrap()
            .into_iter()
            .filter(TimeEntry::is_open)
            .collect();
        assert_eq!(open.len(), 1);
    }

    #[test]
    fn test_close_without_open_entry_fails() {
        let store = InMemoryStore::new();
        let err = store
            .close_open_entry("emp_001", make_datetime("2026-01-15 17:00:00"))
            .unwrap_err();
        assert!(matches!(err, ClockError::NoOpenEntry { .. }));
    }

    #[test]
    fn test_close_sets_clock_out() {
        let store = InMemoryStore::new();
        store
            .insert_entry("emp_001", "st_front", make_datetime("2026-01-15 09:00:00"))
            .unwrap();

        let closed = store
            .close_open_entry("emp_001", make_datetime("2026-01-15 17:30:00"))
            .unwrap();
        assert_eq!(closed.duration_minutes(), 510);
        assert!(store.find_open_entry("emp_001").unwrap().is_none());
    }

    #[test]
    fn test_list_entries_filters_by_clock_in_day() {
        let store = InMemoryStore::new();
        for (employee, day) in [("emp_001", "2026-01-11"), ("emp_002", "2026-01-12"), ("emp_003", "2026-01-19")] {
            store
                .insert_entry(employee, "st_front", make_datetime(&format!("{} 09:00:00", day)))
                .unwrap();
        }

        let range = DateRange::new(
            make_datetime("2026-01-12 00:00:00").date(),
            make_datetime("2026-01-18 00:00:00").date(),
        )
        .unwrap();
        let entries = store.list_entries(&range).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].employee_id, "emp_002");
    }

    #[test]
    fn test_list_open_entries_newest_first() {
        let store = InMemoryStore::new();
        store
            .insert_entry("emp_001", "st_front", make_datetime("2026-01-15 08:00:00"))
            .unwrap();
        store
            .insert_entry("emp_002", "st_front", make_datetime("2026-01-15 09:00:00"))
            .unwrap();

        let open = store.list_open_entries().unwrap();
        assert_eq!(open[0].employee_id, "emp_002");
        assert_eq!(open[1].employee_id, "emp_001");
    }

    #[test]
    fn test_update_entry_cannot_reopen_over_open_entry() {
        let store = InMemoryStore::new();
        store
            .insert_entry("emp_001", "st_front", make_datetime("2026-01-14 09:00:00"))
            .unwrap();
        let closed = store
            .close_open_entry("emp_001", make_datetime("2026-01-14 17:00:00"))
            .unwrap();
        store
            .insert_entry("emp_001", "st_front", make_datetime("2026-01-15 09:00:00"))
            .unwrap();

        let err = store.update_entry(&closed.id, closed.clock_in, None).unwrap_err();
        assert!(matches!(err, ClockError::ConcurrentOpenEntry { .. }));
    }

    #[test]
    fn test_update_entry_corrects_timestamps() {
        let store = InMemoryStore::new();
        let id = store
            .insert_entry("emp_001", "st_front", make_datetime("2026-01-15 09:00:00"))
            .unwrap();

        let updated = store
            .update_entry(
                &id,
                make_datetime("2026-01-15 08:30:00"),
                Some(make_datetime("2026-01-15 16:30:00")),
            )
            .unwrap();
        assert_eq!(updated.duration_minutes(), 480);
        assert!(store.find_open_entry("emp_001").unwrap().is_none());
    }

    #[test]
    fn test_update_unknown_entry() {
        let store = InMemoryStore::new();
        let err = store
            .update_entry("missing", make_datetime("2026-01-15 08:30:00"), None)
            .unwrap_err();
        assert_eq!(
            err,
            ClockError::EntryNotFound {
                entry_id: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_find_active_station_requires_exactly_one() {
        let store = InMemoryStore::with_records(vec![], vec![make_station("st_front", true)]);
        assert!(store.find_active_station().unwrap().is_some());

        store.add_station(make_station("st_back", true)).unwrap();
        assert!(store.find_active_station().unwrap().is_none());

        store.set_station_active("st_back", false).unwrap();
        store.set_station_active("st_front", false).unwrap();
        assert!(store.find_active_station().unwrap().is_none());
        assert!(store.find_station("st_front").unwrap().is_some());
    }

    #[test]
    fn test_list_users_by_role() {
        let store = InMemoryStore::with_records(
            vec![
                make_user("adm_001", None, Role::Admin, true),
                make_user("emp_001", Some("1234"), Role::Employee, true),
            ],
            vec![],
        );

        let employees = store.list_users(Role::Employee).unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].id, "emp_001");
    }
}
