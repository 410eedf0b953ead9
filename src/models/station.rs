//! Station model and authorization records.
//!
//! A station is a physical terminal. Before it records clock events an
//! administrator grants it authorization; the resulting [`StationGrant`]
//! lives only on the terminal and carries its own expiry.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// A physical terminal employees clock in at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Unique identifier for the station.
    pub id: String,
    /// Display name shown on the terminal.
    pub name: String,
    /// Where the terminal is located.
    pub location: String,
    /// Hardware identifier of the device.
    pub device_id: String,
    /// Inactive stations cannot be authorized.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// The terminal-local proof that an administrator authorized this station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationGrant {
    /// The authorized station.
    pub station_id: String,
    /// The administrator who granted authorization.
    pub admin_id: String,
    /// When the grant was made.
    pub granted_at: NaiveDateTime,
    /// After this instant the grant is no longer valid.
    pub expires_at: NaiveDateTime,
}

impl StationGrant {
    /// Creates a grant valid for `ttl` from `granted_at`.
    pub fn new(
        station_id: impl Into<String>,
        admin_id: impl Into<String>,
        granted_at: NaiveDateTime,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            admin_id: admin_id.into(),
            granted_at,
            expires_at: granted_at + ttl,
        }
    }

    /// Returns true once the grant is older than its time-to-live.
    ///
    /// A grant is still valid at exactly `expires_at`.
    ///
    /// # Examples
    ///
    /// ```
    /// use timeclock::models::StationGrant;
    /// use chrono::{NaiveDateTime, TimeDelta};
    ///
    /// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
    /// let grant = StationGrant::new("st_front", "adm_001", at("2026-01-15 10:00:00"), TimeDelta::hours(12));
    /// assert!(!grant.is_expired(at("2026-01-15 21:59:00")));
    /// assert!(grant.is_expired(at("2026-01-15 22:01:00")));
    /// ```
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now > self.expires_at
    }
}

/// A valid authorization: the grant together with the station it binds.
///
/// Clock actions take this value explicitly; holding one is the proof that
/// the terminal may record events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationAuthorization {
    /// The bound station.
    pub station: Station,
    /// The grant backing the authorization.
    pub grant: StationGrant,
}

impl StationAuthorization {
    /// Returns the id of the bound station.
    pub fn station_id(&self) -> &str {
        &self.station.id
    }
}
