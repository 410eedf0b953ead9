//! Configuration loading and management for the time clock.
//!
//! This module loads server, terminal and seed-data settings from a YAML
//! file.
//!
//! # Example
//!
//! ```no_run
//! use timeclock::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/timeclock.yaml").unwrap();
//! println!("Grant TTL: {}h", config.config().terminal.grant_ttl_hours);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, SeedData, ServerSettings, TerminalSettings};
