//! HTTP API module for the time clock.
//!
//! This module exposes the terminal (station authorization and clock
//! actions) and the administrator reporting endpoints over REST.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AuthorizeRequest, CodeRequest, EntryCorrectionRequest, ReportQuery};
pub use response::{ActiveEmployee, ApiError, ReportResponse};
pub use state::AppState;
