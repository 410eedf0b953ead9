//! The physical terminal employees clock in at.
//!
//! A [`Terminal`] binds the two state machines that govern it: the station
//! authorization lifecycle and the clock session. Any move to
//! unauthorized, whatever the cause, resets the clock session.

mod authorization;
mod session;

pub use authorization::{
    AuthorizationStatus, DEFAULT_GRANT_TTL_HOURS, SessionGrantStore, StationAuthorizer,
    UnauthorizedReason,
};
pub use session::{
    ClockAction, ClockOutcome, ClockSession, DEFAULT_ACCESS_CODE_LENGTH, PendingClock,
    SessionState, validate_access_code,
};

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::config::TerminalSettings;
use crate::error::{ClockError, ClockResult};
use crate::models::StationAuthorization;
use crate::store::TimeClockStore;

/// One terminal: its authorization, its clock session and its collaborators.
pub struct Terminal {
    store: Arc<dyn TimeClockStore>,
    clock: Arc<dyn Clock>,
    authorizer: StationAuthorizer,
    session: ClockSession,
    status: AuthorizationStatus,
    // Station of the last authorization lost, for refusal messages.
    last_station_id: Option<String>,
}

impl Terminal {
    /// Creates an unauthorized terminal.
    pub fn new(
        store: Arc<dyn TimeClockStore>,
        clock: Arc<dyn Clock>,
        settings: &TerminalSettings,
    ) -> Self {
        Self {
            store,
            clock,
            authorizer: StationAuthorizer::new(settings.grant_ttl_hours),
            session: ClockSession::new(settings.access_code_length),
            status: AuthorizationStatus::unauthorized(UnauthorizedReason::NotGranted),
            last_station_id: None,
        }
    }

    /// Returns the last known authorization status.
    pub fn status(&self) -> &AuthorizationStatus {
        &self.status
    }

    /// Returns the clock session.
    pub fn session(&self) -> &ClockSession {
        &self.session
    }

    /// Returns the terminal-local time.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Returns the identified employee and pending action, if any.
    pub fn pending(&self) -> Option<PendingClock> {
        self.session.pending()
    }

    /// Authorizes this terminal on behalf of the administrator `admin_id`.
    ///
    /// On failure the previous status is kept.
    pub fn grant_authorization(&mut self, admin_id: &str) -> ClockResult<StationAuthorization> {
        let admin = self
            .store
            .find_user(admin_id)?
            .ok_or_else(|| ClockError::NotAdministrator {
                user_id: admin_id.to_string(),
            })?;

        let authorization = self
            .authorizer
            .grant(self.store.as_ref(), &admin, self.clock.now())?;
        self.status = AuthorizationStatus::Authorized {
            authorization: authorization.clone(),
        };
        Ok(authorization)
    }

    /// Revokes this terminal's authorization and resets the session.
    pub fn revoke_authorization(&mut self) {
        self.authorizer.revoke();
        self.become_unauthorized(UnauthorizedReason::Revoked);
    }

    /// Re-checks the grant against the clock and the store.
    ///
    /// Can only keep or drop the current authorization. A station that
    /// cannot be looked up drops it.
    pub fn revalidate(&mut self) -> &AuthorizationStatus {
        let status = self
            .authorizer
            .revalidate(self.store.as_ref(), self.clock.now());

        match status {
            // Nothing granted: keep whatever reason the terminal already has.
            AuthorizationStatus::Unauthorized {
                reason: UnauthorizedReason::NotGranted,
            } if !self.status.is_authorized() => {}
            AuthorizationStatus::Unauthorized { reason } => self.become_unauthorized(reason),
            authorized => self.status = authorized,
        }
        &self.status
    }

    /// Identifies the employee owning `code`.
    pub fn identify(&mut self, code: &str) -> ClockResult<PendingClock> {
        self.require_authorization()?;
        self.session.identify(self.store.as_ref(), code)
    }

    /// Performs the pending clock action for the identified employee.
    pub fn act(&mut self) -> ClockResult<ClockOutcome> {
        let authorization = self.require_authorization()?;
        self.session
            .act(self.store.as_ref(), &authorization, self.clock.now())
    }

    /// Identifies the employee owning `code` and performs their clock action.
    pub fn identify_and_act(&mut self, code: &str) -> ClockResult<ClockOutcome> {
        let authorization = self.require_authorization()?;
        self.session
            .identify_and_act(self.store.as_ref(), code, &authorization, self.clock.now())
    }

    /// Returns the session to unidentified ("switch user").
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Returns the current authorization, clearing it first if its grant
    /// has outlived its expiry.
    fn require_authorization(&mut self) -> ClockResult<StationAuthorization> {
        let authorization = match &self.status {
            AuthorizationStatus::Authorized { authorization } => authorization.clone(),
            AuthorizationStatus::Unauthorized { reason } => return Err(self.refusal(*reason)),
        };

        if authorization.grant.is_expired(self.clock.now()) {
            warn!(station_id = %authorization.station_id(), "Clock request on expired grant");
            self.authorizer.revoke();
            self.become_unauthorized(UnauthorizedReason::Expired);
            return Err(ClockError::StationExpired);
        }
        Ok(authorization)
    }

    /// The error a clock request gets while the terminal is unauthorized.
    fn refusal(&self, reason: UnauthorizedReason) -> ClockError {
        match (reason, &self.last_station_id) {
            (UnauthorizedReason::Expired, _) => ClockError::StationExpired,
            (UnauthorizedReason::StationDeactivated, Some(station_id)) => {
                ClockError::StationDeactivated {
                    station_id: station_id.clone(),
                }
            }
            _ => ClockError::StationNotAuthorized,
        }
    }

    fn become_unauthorized(&mut self, reason: UnauthorizedReason) {
        if let Some(authorization) = self.status.authorization() {
            info!(reason = ?reason, station_id = %authorization.station_id(), "Terminal is no longer authorized");
            self.last_station_id = Some(authorization.station_id().to_string());
        }
        self.status = AuthorizationStatus::unauthorized(reason);
        self.session.reset();
    }
}
