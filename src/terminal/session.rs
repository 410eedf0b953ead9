//! Clock session state machine.
//!
//! One employee at a time interacts with the terminal:
//!
//! ```text
//! Unidentified --identify--> Identified (open entry or not) --act--> Unidentified
//! ```
//!
//! The single primary action clocks in when the employee has no open entry
//! and clocks out otherwise, so one interaction can never open a second
//! entry for the same employee.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ClockError, ClockResult};
use crate::models::{StationAuthorization, TimeEntry, User};
use crate::store::TimeClockStore;

/// Default number of digits in an access code.
pub const DEFAULT_ACCESS_CODE_LENGTH: usize = 4;

/// What the primary action does for the identified employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockAction {
    /// Open a new entry.
    In,
    /// Close the open entry.
    Out,
}

/// Session state for the employee at the terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Waiting for an access code.
    Unidentified,
    /// An employee entered a valid code.
    Identified {
        /// The identified employee.
        employee: User,
        /// The employee's open entry, if on shift.
        open_entry: Option<TimeEntry>,
    },
}

/// An identified employee and the action the terminal will take for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingClock {
    /// The identified employee.
    pub employee: User,
    /// The action the primary button performs.
    pub action: ClockAction,
}

/// The result of a completed clock action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockOutcome {
    /// The employee who clocked.
    pub employee: User,
    /// Whether the employee clocked in or out.
    pub action: ClockAction,
    /// The entry that was opened or closed.
    pub entry_id: String,
    /// When the action was recorded.
    pub at: NaiveDateTime,
}

/// Checks the shape of an access code before any lookup.
///
/// # Examples
///
/// ```
/// use timeclock::terminal::validate_access_code;
///
/// assert!(validate_access_code("1234", 4).is_ok());
/// assert!(validate_access_code("12a4", 4).is_err());
/// assert!(validate_access_code("12345", 4).is_err());
/// assert!(validate_access_code("", 4).is_err());
/// ```
pub fn validate_access_code(code: &str, max_length: usize) -> ClockResult<()> {
    if code.is_empty() || code.len() > max_length || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClockError::InvalidCode);
    }
    Ok(())
}

/// The per-terminal clock session.
#[derive(Debug)]
pub struct ClockSession {
    state: SessionState,
    access_code_length: usize,
}

impl ClockSession {
    /// Creates an unidentified session accepting codes of up to
    /// `access_code_length` digits.
    pub fn new(access_code_length: usize) -> Self {
        Self {
            state: SessionState::Unidentified,
            access_code_length,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the identified employee and the pending action, if any.
    pub fn pending(&self) -> Option<PendingClock> {
        match &self.state {
            SessionState::Unidentified => None,
            SessionState::Identified {
                employee,
                open_entry,
            } => Some(PendingClock {
                employee: employee.clone(),
                action: action_for(open_entry.as_ref()),
            }),
        }
    }

    /// Identifies the employee owning `code` and loads their open entry.
    ///
    /// A rejected code discards any previously identified employee. A store
    /// failure leaves the state as it was.
    pub fn identify(&mut self, store: &dyn TimeClockStore, code: &str) -> ClockResult<PendingClock> {
        if let Err(err) = validate_access_code(code, self.access_code_length) {
            self.reset();
            return Err(err);
        }

        let Some(employee) = store.find_active_employee_by_code(code)? else {
            info!("Access code rejected");
            self.reset();
            return Err(ClockError::InvalidCode);
        };
        let open_entry = store.find_open_entry(&employee.id)?;

        let pending = PendingClock {
            employee: employee.clone(),
            action: action_for(open_entry.as_ref()),
        };
        info!(employee_id = %employee.id, action = ?pending.action, "Employee identified");

        self.state = SessionState::Identified {
            employee,
            open_entry,
        };
        Ok(pending)
    }

    /// Performs the primary action for the identified employee.
    ///
    /// Clocks in at the authorized station when no entry is open, clocks
    /// out otherwise. On success the session returns to
    /// [`SessionState::Unidentified`]; on failure it is unchanged and the
    /// employee may retry.
    pub fn act(
        &mut self,
        store: &dyn TimeClockStore,
        authorization: &StationAuthorization,
        now: NaiveDateTime,
    ) -> ClockResult<ClockOutcome> {
        let SessionState::Identified {
            employee,
            open_entry,
        } = &self.state
        else {
            return Err(ClockError::NotIdentified);
        };

        let action = action_for(open_entry.as_ref());
        let entry_id = match action {
            ClockAction::In => store.insert_entry(&employee.id, authorization.station_id(), now)?,
            ClockAction::Out => store.close_open_entry(&employee.id, now)?.id,
        };

        info!(
            employee_id = %employee.id,
            station_id = %authorization.station_id(),
            entry_id = %entry_id,
            action = ?action,
            "Clock action recorded"
        );

        confirm_open_entry(store, &employee.id, action, &entry_id);

        let outcome = ClockOutcome {
            employee: employee.clone(),
            action,
            entry_id,
            at: now,
        };
        self.reset();
        Ok(outcome)
    }

    /// Identifies the employee and performs the primary action in one call.
    ///
    /// If the action fails after a successful identification, the session
    /// is restored to its state before the call.
    pub fn identify_and_act(
        &mut self,
        store: &dyn TimeClockStore,
        code: &str,
        authorization: &StationAuthorization,
        now: NaiveDateTime,
    ) -> ClockResult<ClockOutcome> {
        let previous = self.state.clone();
        self.identify(store, code)?;
        self.act(store, authorization, now).inspect_err(|_| {
            self.state = previous;
        })
    }

    /// Discards any identified employee.
    pub fn reset(&mut self) {
        self.state = SessionState::Unidentified;
    }
}

impl Default for ClockSession {
    fn default() -> Self {
        Self::new(DEFAULT_ACCESS_CODE_LENGTH)
    }
}

fn action_for(open_entry: Option<&TimeEntry>) -> ClockAction {
    match open_entry {
        Some(_) => ClockAction::Out,
        None => ClockAction::In,
    }
}

/// Re-reads the employee's open entry after a committed action and logs
/// any disagreement. The action itself stands either way.
fn confirm_open_entry(store: &dyn TimeClockStore, employee_id: &str, action: ClockAction, entry_id: &str) {
    match (store.find_open_entry(employee_id), action) {
        (Ok(Some(open)), ClockAction::In) if open.id == entry_id => {}
        (Ok(None), ClockAction::Out) => {}
        (Ok(open), _) => warn!(
            employee_id,
            expected = ?action,
            open_entry = ?open.map(|e| e.id),
            "Open entry state disagrees with the recorded action"
        ),
        (Err(err), _) => warn!(employee_id, error = %err, "Could not confirm open entry state"),
    }
}
