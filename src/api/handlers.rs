//! HTTP request handlers for the time clock API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{StationAuthorization, TimeEntry};
use crate::reporting::{build_reports, export_file_name, to_csv, DateRange};
use crate::terminal::{AuthorizationStatus, ClockOutcome, PendingClock};

use super::request::{AuthorizeRequest, CodeRequest, EntryCorrectionRequest, ReportQuery};
use super::response::{ActiveEmployee, ApiError, ApiErrorResponse, ReportResponse};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/station/authorize", post(authorize_handler))
        .route("/station/deauthorize", post(deauthorize_handler))
        .route("/station/status", get(status_handler))
        .route("/clock", post(clock_handler))
        .route("/clock/identify", post(identify_handler))
        .route("/clock/act", post(act_handler))
        .route("/clock/reset", post(reset_handler))
        .route("/reports", get(reports_handler))
        .route("/reports/csv", get(reports_csv_handler))
        .route("/entries/open", get(open_entries_handler))
        .route("/entries/:id", put(correct_entry_handler))
        .with_state(state)
}

/// Handler for POST /station/authorize.
async fn authorize_handler(
    State(state): State<AppState>,
    payload: Result<Json<AuthorizeRequest>, JsonRejection>,
) -> ApiResult<Json<StationAuthorization>> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(payload, correlation_id)?;
    info!(
        correlation_id = %correlation_id,
        admin_id = %request.admin_id,
        "Processing station authorization"
    );

    let authorization = state
        .terminal()?
        .grant_authorization(&request.admin_id)
        .inspect_err(|err| {
            warn!(correlation_id = %correlation_id, error = %err, "Station authorization failed")
        })?;
    Ok(Json(authorization))
}

/// Handler for POST /station/deauthorize.
async fn deauthorize_handler(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.terminal()?.revoke_authorization();
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /station/status. Revalidates before answering.
async fn status_handler(State(state): State<AppState>) -> ApiResult<Json<AuthorizationStatus>> {
    let status = state.terminal()?.revalidate().clone();
    Ok(Json(status))
}

/// Handler for POST /clock: identify and act in one request.
async fn clock_handler(
    State(state): State<AppState>,
    payload: Result<Json<CodeRequest>, JsonRejection>,
) -> ApiResult<Json<ClockOutcome>> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(payload, correlation_id)?;

    let outcome = state
        .terminal()?
        .identify_and_act(&request.code)
        .inspect_err(|err| {
            warn!(correlation_id = %correlation_id, error = %err, "Clock request failed")
        })?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %outcome.employee.id,
        action = ?outcome.action,
        "Clock request completed"
    );
    Ok(Json(outcome))
}

/// Handler for POST /clock/identify.
async fn identify_handler(
    State(state): State<AppState>,
    payload: Result<Json<CodeRequest>, JsonRejection>,
) -> ApiResult<Json<PendingClock>> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(payload, correlation_id)?;

    let pending = state
        .terminal()?
        .identify(&request.code)
        .inspect_err(|err| {
            warn!(correlation_id = %correlation_id, error = %err, "Identification failed")
        })?;
    Ok(Json(pending))
}

/// Handler for POST /clock/act.
async fn act_handler(State(state): State<AppState>) -> ApiResult<Json<ClockOutcome>> {
    let correlation_id = Uuid::new_v4();

    let outcome = state.terminal()?.act().inspect_err(|err| {
        warn!(correlation_id = %correlation_id, error = %err, "Clock action failed")
    })?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %outcome.employee.id,
        action = ?outcome.action,
        "Clock action completed"
    );
    Ok(Json(outcome))
}

/// Handler for POST /clock/reset.
async fn reset_handler(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.terminal()?.reset();
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /reports.
async fn reports_handler(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ReportResponse>>> {
    let range = report_range(&state, query)?;
    let reports = build_reports(state.store(), &range)?;
    Ok(Json(reports.into_iter().map(ReportResponse::from).collect()))
}

/// Handler for GET /reports/csv.
async fn reports_csv_handler(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let range = report_range(&state, query)?;
    let reports = build_reports(state.store(), &range)?;
    let csv = to_csv(&reports)?;
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(&range));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

/// Handler for GET /entries/open: who is currently working.
async fn open_entries_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<ActiveEmployee>>> {
    let store = state.store();
    let mut active = Vec::new();

    for entry in store.list_open_entries()? {
        if let Some(user) = store.find_user(&entry.employee_id)? {
            active.push(ActiveEmployee {
                user,
                clock_in: entry.clock_in,
                station_id: entry.station_id,
            });
        }
    }
    Ok(Json(active))
}

/// Handler for PUT /entries/:id: administrator correction of timestamps.
async fn correct_entry_handler(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    payload: Result<Json<EntryCorrectionRequest>, JsonRejection>,
) -> ApiResult<Json<TimeEntry>> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(payload, correlation_id)?;

    let entry = state
        .store()
        .update_entry(&entry_id, request.clock_in, request.clock_out)
        .inspect_err(|err| {
            warn!(correlation_id = %correlation_id, entry_id = %entry_id, error = %err, "Entry correction failed")
        })?;

    info!(
        correlation_id = %correlation_id,
        entry_id = %entry.id,
        employee_id = %entry.employee_id,
        "Time entry corrected"
    );
    Ok(Json(entry))
}

/// Unwraps a JSON body, turning extractor rejections into API errors.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>, correlation_id: Uuid) -> ApiResult<T> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_request(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_request(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_request("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

/// Validates the report query into a [`DateRange`], defaulting to today.
fn report_range(
    state: &AppState,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<DateRange> {
    let Query(query) = query.map_err(|rejection| {
        ApiErrorResponse::bad_request(ApiError::malformed_request(rejection.body_text()))
    })?;

    let range = match (query.start, query.end) {
        (Some(start), Some(end)) => DateRange::new(start, end)?,
        (Some(day), None) | (None, Some(day)) => DateRange::single_day(day),
        (None, None) => DateRange::single_day(state.terminal()?.now().date()),
    };
    Ok(range)
}
