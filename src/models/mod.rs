//! Core data models for the time clock.
//!
//! This module contains the domain records shared by the terminal, the
//! store and the reporting engine.

mod station;
mod time_entry;
mod time_report;
mod user;

pub use station::{Station, StationAuthorization, StationGrant};
pub use time_entry::TimeEntry;
pub use time_report::TimeReport;
pub use user::{Role, User};
