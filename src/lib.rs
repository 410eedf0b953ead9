//! Shared-terminal employee time clock.
//!
//! Employees identify at an administrator-authorized terminal with a short
//! numeric access code to open or close a shift. Administrators review,
//! correct and export the aggregated hours.

#![warn(missing_docs)]

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod reporting;
pub mod store;
pub mod terminal;
