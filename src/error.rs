//! Error types for the time clock.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the terminal, the reporting engine and the store can
//! surface. None of them is fatal: each resolves to a user-facing message
//! and leaves the terminal in a reusable state.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the time clock.
///
/// # Example
///
/// ```
/// use timeclock::error::ClockError;
///
/// let error = ClockError::ConcurrentOpenEntry {
///     employee_id: "emp_001".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Employee 'emp_001' already has an open time entry"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    /// No active employee matches the entered access code.
    #[error("Invalid access code")]
    InvalidCode,

    /// A clock action was requested before an employee identified.
    #[error("No employee is identified at this terminal")]
    NotIdentified,

    /// The user granting station authorization is not an active administrator.
    #[error("User '{user_id}' is not an active administrator")]
    NotAdministrator {
        /// The user that attempted the grant.
        user_id: String,
    },

    /// The terminal has no valid station authorization.
    #[error("Station is not authorized")]
    StationNotAuthorized,

    /// Authorization could not be granted because there is not exactly one active station.
    #[error("No single active station is available for authorization")]
    NoActiveStation,

    /// The station grant is older than its time-to-live.
    #[error("Station authorization has expired")]
    StationExpired,

    /// The station bound to the grant no longer exists or is inactive.
    #[error("Station '{station_id}' is no longer active")]
    StationDeactivated {
        /// The station referenced by the grant.
        station_id: String,
    },

    /// An open entry already exists for the employee at write time.
    #[error("Employee '{employee_id}' already has an open time entry")]
    ConcurrentOpenEntry {
        /// The employee whose entry could not be opened.
        employee_id: String,
    },

    /// A clock-out found no open entry to close.
    #[error("Employee '{employee_id}' has no open time entry")]
    NoOpenEntry {
        /// The employee whose entry could not be closed.
        employee_id: String,
    },

    /// A time entry referenced by id does not exist.
    #[error("Time entry not found: {entry_id}")]
    EntryNotFound {
        /// The missing entry id.
        entry_id: String,
    },

    /// A report date range starts after it ends.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The CSV writer failed.
    #[error("Export failed: {message}")]
    Export {
        /// A description of the writer failure.
        message: String,
    },

    /// A persistence or transport failure. Retry the whole user action.
    #[error("System error: {message}")]
    SystemError {
        /// A description of the underlying failure.
        message: String,
    },
}

impl ClockError {
    /// Shorthand for building a [`ClockError::SystemError`].
    pub fn system(message: impl Into<String>) -> Self {
        ClockError::SystemError {
            message: message.into(),
        }
    }

    /// Returns true for errors that take the terminal out of the authorized state.
    pub fn is_authorization_failure(&self) -> bool {
        matches!(
            self,
            ClockError::StationNotAuthorized
                | ClockError::NoActiveStation
                | ClockError::StationExpired
                | ClockError::StationDeactivated { .. }
        )
    }
}

/// A type alias for Results that return ClockError.
pub type ClockResult<T> = Result<T, ClockError>;
