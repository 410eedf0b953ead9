//! Response types for the time clock API.
//!
//! This module defines the response bodies and the mapping from
//! [`ClockError`] to HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ClockError;
use crate::models::{TimeReport, User};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed request error response.
    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_REQUEST", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response for a body or query that could not be parsed.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<ClockError> for ApiErrorResponse {
    fn from(error: ClockError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            ClockError::InvalidCode => (StatusCode::UNAUTHORIZED, "INVALID_CODE"),
            ClockError::NotIdentified => (StatusCode::CONFLICT, "NOT_IDENTIFIED"),
            ClockError::NotAdministrator { .. } => (StatusCode::FORBIDDEN, "NOT_ADMINISTRATOR"),
            ClockError::StationNotAuthorized => (StatusCode::FORBIDDEN, "STATION_NOT_AUTHORIZED"),
            ClockError::NoActiveStation => (StatusCode::CONFLICT, "NO_ACTIVE_STATION"),
            ClockError::StationExpired => (StatusCode::FORBIDDEN, "STATION_EXPIRED"),
            ClockError::StationDeactivated { .. } => {
                (StatusCode::FORBIDDEN, "STATION_DEACTIVATED")
            }
            ClockError::ConcurrentOpenEntry { .. } => {
                (StatusCode::CONFLICT, "CONCURRENT_OPEN_ENTRY")
            }
            ClockError::NoOpenEntry { .. } => (StatusCode::CONFLICT, "NO_OPEN_ENTRY"),
            ClockError::EntryNotFound { .. } => (StatusCode::NOT_FOUND, "ENTRY_NOT_FOUND"),
            ClockError::InvalidDateRange { .. } => (StatusCode::BAD_REQUEST, "INVALID_DATE_RANGE"),
            ClockError::ConfigNotFound { .. } | ClockError::ConfigParseError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            ClockError::Export { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_ERROR"),
            ClockError::SystemError { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "SYSTEM_ERROR"),
        };

        let error = if error.is_authorization_failure() {
            ApiError::with_details(
                code,
                message,
                "An administrator must authorize this station",
            )
        } else if matches!(error, ClockError::ConcurrentOpenEntry { .. }) {
            ApiError::with_details(code, message, "Identify again and retry")
        } else {
            ApiError::new(code, message)
        };

        ApiErrorResponse { status, error }
    }
}

/// One aggregated report with the display remainder of its minutes.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    /// The aggregated report.
    #[serde(flatten)]
    pub report: TimeReport,
    /// `total_minutes mod 60`.
    pub remaining_minutes: i64,
}

impl From<TimeReport> for ReportResponse {
    fn from(report: TimeReport) -> Self {
        Self {
            remaining_minutes: report.remaining_minutes(),
            report,
        }
    }
}

/// An employee currently on shift.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveEmployee {
    /// The employee.
    pub user: User,
    /// When the open entry started.
    pub clock_in: NaiveDateTime,
    /// The station of the open entry.
    pub station_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_invalid_code_is_unauthorized() {
        let response: ApiErrorResponse = ClockError::InvalidCode.into();
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.error.code, "INVALID_CODE");
    }

    #[test]
    fn test_authorization_failure_has_details() {
        let response: ApiErrorResponse = ClockError::StationExpired.into();
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert!(response.error.details.is_some());
    }

    #[test]
    fn test_concurrent_open_entry_is_conflict() {
        let response: ApiErrorResponse = ClockError::ConcurrentOpenEntry {
            employee_id: "emp_001".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.code, "CONCURRENT_OPEN_ENTRY");
    }

    #[test]
    fn test_system_error_is_internal() {
        let response: ApiErrorResponse = ClockError::system("disk full").into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.message, "System error: disk full");
    }

    #[test]
    fn test_report_response_flattens_report() {
        let response = ReportResponse::from(TimeReport {
            user_id: "emp_001".to_string(),
            user_name: "Mette Holm".to_string(),
            total_hours: 8,
            total_minutes: 510,
            entries: vec![],
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user_id"], "emp_001");
        assert_eq!(json["total_hours"], 8);
        assert_eq!(json["remaining_minutes"], 30);
    }
}
