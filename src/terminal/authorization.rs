//! Station authorization lifecycle.
//!
//! ```text
//! Unauthorized --grant--> Authorized --revoke / expire / station deactivated--> Unauthorized
//! ```
//!
//! The grant is a property of this physical terminal, not of any account.
//! It lives in a [`SessionGrantStore`] owned by the terminal process and is
//! gone after a restart.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ClockError, ClockResult};
use crate::models::{StationAuthorization, StationGrant, User};
use crate::store::TimeClockStore;

/// Default grant lifetime.
pub const DEFAULT_GRANT_TTL_HOURS: u32 = 12;

/// Why a terminal is not authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnauthorizedReason {
    /// No grant has been made on this terminal.
    NotGranted,
    /// An administrator revoked the grant.
    Revoked,
    /// The grant outlived its time-to-live.
    Expired,
    /// The bound station was removed or deactivated.
    StationDeactivated,
    /// The bound station could not be looked up.
    StationUnverifiable,
}

/// Whether the terminal may record clock events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthorizationStatus {
    /// The terminal holds a valid grant.
    Authorized {
        /// The grant and its bound station.
        authorization: StationAuthorization,
    },
    /// The terminal must not record clock events.
    Unauthorized {
        /// Why the terminal is unauthorized.
        reason: UnauthorizedReason,
    },
}

impl AuthorizationStatus {
    /// Shorthand for an unauthorized status.
    pub fn unauthorized(reason: UnauthorizedReason) -> Self {
        AuthorizationStatus::Unauthorized { reason }
    }

    /// Returns true if the terminal is authorized.
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthorizationStatus::Authorized { .. })
    }

    /// Returns the authorization, if any.
    pub fn authorization(&self) -> Option<&StationAuthorization> {
        match self {
            AuthorizationStatus::Authorized { authorization } => Some(authorization),
            AuthorizationStatus::Unauthorized { .. } => None,
        }
    }
}

/// Terminal-local storage for the station grant.
#[derive(Debug, Default)]
pub struct SessionGrantStore {
    grant: Option<StationGrant>,
}

impl SessionGrantStore {
    /// Returns the stored grant.
    pub fn load(&self) -> Option<&StationGrant> {
        self.grant.as_ref()
    }

    /// Stores `grant`, replacing any previous one.
    pub fn save(&mut self, grant: StationGrant) {
        self.grant = Some(grant);
    }

    /// Removes the stored grant. Returns true if there was one.
    pub fn clear(&mut self) -> bool {
        self.grant.take().is_some()
    }
}

/// Grants, revokes and revalidates this terminal's station authorization.
#[derive(Debug)]
pub struct StationAuthorizer {
    grants: SessionGrantStore,
    ttl: TimeDelta,
}

impl StationAuthorizer {
    /// Creates an authorizer whose grants live for `ttl_hours`.
    pub fn new(ttl_hours: u32) -> Self {
        Self {
            grants: SessionGrantStore::default(),
            ttl: TimeDelta::hours(i64::from(ttl_hours)),
        }
    }

    /// Returns the current grant without validating it.
    pub fn current_grant(&self) -> Option<&StationGrant> {
        self.grants.load()
    }

    /// Authorizes this terminal for the single active station.
    ///
    /// `admin` must be an active administrator. The store must report
    /// exactly one active station, otherwise the grant fails with
    /// [`ClockError::NoActiveStation`] and nothing is stored.
    pub fn grant(
        &mut self,
        store: &dyn TimeClockStore,
        admin: &User,
        now: NaiveDateTime,
    ) -> ClockResult<StationAuthorization> {
        if !admin.is_admin() || !admin.active {
            warn!(user_id = %admin.id, "Station grant refused for non-administrator");
            return Err(ClockError::NotAdministrator {
                user_id: admin.id.clone(),
            });
        }

        let Some(station) = store.find_active_station()? else {
            warn!(admin_id = %admin.id, "Station grant failed: no single active station");
            return Err(ClockError::NoActiveStation);
        };

        let grant = StationGrant::new(&station.id, &admin.id, now, self.ttl);
        self.grants.save(grant.clone());

        info!(
            station_id = %station.id,
            admin_id = %admin.id,
            expires_at = %grant.expires_at,
            "Station authorized"
        );
        Ok(StationAuthorization { station, grant })
    }

    /// Clears the grant. Idempotent.
    pub fn revoke(&mut self) {
        if self.grants.clear() {
            info!("Station authorization revoked");
        }
    }

    /// Re-checks the stored grant against the clock and the store.
    ///
    /// An expired grant, or one whose station is gone, inactive or cannot
    /// be looked up, is cleared. Revalidation never fails and never moves
    /// the terminal toward authorized.
    ///
    /// # Examples
    ///
    /// ```
    /// use timeclock::models::{Role, Station, User};
    /// use timeclock::store::InMemoryStore;
    /// use timeclock::terminal::StationAuthorizer;
    /// use chrono::{NaiveDateTime, TimeDelta};
    ///
    /// let store = InMemoryStore::with_records(vec![], vec![Station {
    ///     id: "st_front".to_string(),
    ///     name: "Front desk".to_string(),
    ///     location: "Lobby".to_string(),
    ///     device_id: "tablet-01".to_string(),
    ///     active: true,
    /// }]);
    /// let admin = User {
    ///     id: "adm_001".to_string(),
    ///     email: "boss@example.com".to_string(),
    ///     first_name: "Lars".to_string(),
    ///     last_name: "Berg".to_string(),
    ///     access_code: None,
    ///     role: Role::Admin,
    ///     active: true,
    /// };
    ///
    /// let granted_at = NaiveDateTime::parse_from_str("2026-01-15 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
    /// let mut authorizer = StationAuthorizer::new(12);
    /// authorizer.grant(&store, &admin, granted_at)?;
    ///
    /// let later = granted_at + TimeDelta::hours(12) + TimeDelta::minutes(1);
    /// assert!(!authorizer.revalidate(&store, later).is_authorized());
    /// # Ok::<(), timeclock::error::ClockError>(())
    /// ```
    pub fn revalidate(
        &mut self,
        store: &dyn TimeClockStore,
        now: NaiveDateTime,
    ) -> AuthorizationStatus {
        let Some(grant) = self.grants.load().cloned() else {
            return AuthorizationStatus::unauthorized(UnauthorizedReason::NotGranted);
        };

        if grant.is_expired(now) {
            self.grants.clear();
            info!(station_id = %grant.station_id, "Station authorization expired");
            return AuthorizationStatus::unauthorized(UnauthorizedReason::Expired);
        }

        let station = match store.find_station(&grant.station_id) {
            Ok(station) => station,
            Err(err) => {
                self.grants.clear();
                warn!(
                    station_id = %grant.station_id,
                    error = %err,
                    "Could not verify authorized station"
                );
                return AuthorizationStatus::unauthorized(UnauthorizedReason::StationUnverifiable);
            }
        };

        match station {
            Some(station) if station.active => AuthorizationStatus::Authorized {
                authorization: StationAuthorization { station, grant },
            },
            _ => {
                self.grants.clear();
                warn!(station_id = %grant.station_id, "Authorized station is no longer active");
                AuthorizationStatus::unauthorized(UnauthorizedReason::StationDeactivated)
            }
        }
    }
}

impl Default for StationAuthorizer {
    fn default() -> Self {
        Self::new(DEFAULT_GRANT_TTL_HOURS)
    }
}
