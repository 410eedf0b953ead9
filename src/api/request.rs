//! Request types for the time clock API.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Body of `POST /station/authorize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizeRequest {
    /// The administrator granting authorization.
    pub admin_id: String,
}

/// Body of `POST /clock` and `POST /clock/identify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRequest {
    /// The access code entered at the terminal.
    pub code: String,
}

/// Query of `GET /reports` and `GET /reports/csv`.
///
/// A missing bound takes the value of the other; with neither the report
/// covers the terminal's current day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    /// First day of the report (inclusive).
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// Last day of the report (inclusive).
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// Body of `PUT /entries/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryCorrectionRequest {
    /// Corrected clock-in.
    pub clock_in: NaiveDateTime,
    /// Corrected clock-out; `null` re-opens the entry.
    #[serde(default)]
    pub clock_out: Option<NaiveDateTime>,
}
