//! Configuration types for the time clock.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section and
//! field has a default, so an empty file is a valid configuration.

use serde::Deserialize;

use crate::models::{Station, User};
use crate::terminal::{DEFAULT_ACCESS_CODE_LENGTH, DEFAULT_GRANT_TTL_HOURS};

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Socket address the API listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// Terminal behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TerminalSettings {
    /// How long a station grant stays valid.
    #[serde(default = "default_grant_ttl_hours")]
    pub grant_ttl_hours: u32,
    /// Seconds between background revalidations of the station grant.
    #[serde(default = "default_revalidation_interval_secs")]
    pub revalidation_interval_secs: u64,
    /// Maximum number of digits in an access code.
    #[serde(default = "default_access_code_length")]
    pub access_code_length: usize,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            grant_ttl_hours: default_grant_ttl_hours(),
            revalidation_interval_secs: default_revalidation_interval_secs(),
            access_code_length: default_access_code_length(),
        }
    }
}

fn default_grant_ttl_hours() -> u32 {
    DEFAULT_GRANT_TTL_HOURS
}

fn default_revalidation_interval_secs() -> u64 {
    60
}

fn default_access_code_length() -> usize {
    DEFAULT_ACCESS_CODE_LENGTH
}

/// Users and stations loaded into the store at startup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SeedData {
    /// Employees and administrators.
    #[serde(default)]
    pub users: Vec<User>,
    /// Terminals.
    #[serde(default)]
    pub stations: Vec<Station>,
}

/// The complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSettings,
    /// Terminal behaviour settings.
    #[serde(default)]
    pub terminal: TerminalSettings,
    /// Initial records for the in-memory store.
    #[serde(default)]
    pub seed: SeedData,
}
