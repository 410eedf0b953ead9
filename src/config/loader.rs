//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the time
//! clock configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{ClockError, ClockResult};
use crate::models::Role;
use crate::terminal::validate_access_code;

use super::types::AppConfig;

/// Loads and provides access to the time clock configuration.
///
/// # File Structure
///
/// ```yaml
/// server:
///   bind: "0.0.0.0:8080"
/// terminal:
///   grant_ttl_hours: 12
///   revalidation_interval_secs: 60
///   access_code_length: 4
/// seed:
///   users:
///     - id: emp_001
///       email: mette@example.com
///       first_name: Mette
///       last_name: Holm
///       access_code: "1234"
///       role: employee
///   stations:
///     - id: st_front
///       name: Front desk
///       location: Lobby
///       device_id: tablet-01
/// ```
///
/// # Example
///
/// ```no_run
/// use timeclock::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/timeclock.yaml").unwrap();
/// println!("Listening on {}", loader.config().server.bind);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from the file at `path`.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing or unreadable
    /// - The file contains invalid YAML
    /// - A terminal setting is out of range
    pub fn load<P: AsRef<Path>>(path: P) -> ClockResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ClockError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content, &path_str)
    }

    /// Parses configuration from YAML text. `origin` names the source in errors.
    ///
    /// # Example
    ///
    /// ```
    /// use timeclock::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::from_yaml_str("terminal:\n  grant_ttl_hours: 8\n", "inline")?;
    /// assert_eq!(loader.config().terminal.grant_ttl_hours, 8);
    /// assert_eq!(loader.config().terminal.access_code_length, 4);
    /// # Ok::<(), timeclock::error::ClockError>(())
    /// ```
    pub fn from_yaml_str(content: &str, origin: &str) -> ClockResult<Self> {
        // An empty document deserializes as null rather than an empty map.
        let config: AppConfig = if content.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ClockError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?
        };

        Self::validate(&config, origin)?;
        Ok(Self { config })
    }

    fn validate(config: &AppConfig, origin: &str) -> ClockResult<()> {
        let invalid = |message: &str| ClockError::ConfigParseError {
            path: origin.to_string(),
            message: message.to_string(),
        };

        let terminal = &config.terminal;
        if terminal.grant_ttl_hours == 0 {
            return Err(invalid("terminal.grant_ttl_hours must be at least 1"));
        }
        if terminal.revalidation_interval_secs == 0 {
            return Err(invalid("terminal.revalidation_interval_secs must be at least 1"));
        }
        if terminal.access_code_length == 0 {
            return Err(invalid("terminal.access_code_length must be at least 1"));
        }

        for user in config.seed.users.iter().filter(|u| u.role == Role::Employee) {
            let usable = user
                .access_code
                .as_deref()
                .is_some_and(|code| validate_access_code(code, terminal.access_code_length).is_ok());
            if !usable {
                warn!(user_id = %user.id, "Seeded employee has no usable access code");
            }
        }

        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL_CONFIG: &str = r#"
server:
  bind: "0.0.0.0:9000"
terminal:
  grant_ttl_hours: 10
  revalidation_interval_secs: 30
  access_code_length: 6
seed:
  users:
    - id: adm_001
      email: boss@example.com
      first_name: Lars
      last_name: Berg
      role: admin
    - id: emp_001
      email: mette@example.com
      first_name: Mette
      last_name: Holm
      access_code: "123456"
      role: employee
      active: false
  stations:
    - id: st_front
      name: Front desk
      location: Lobby
      device_id: tablet-01
"#;

    #[test]
    fn test_parse_full_config() {
        let loader = ConfigLoader::from_yaml_str(FULL_CONFIG, "test").unwrap();
        let config = loader.config();

        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.terminal.grant_ttl_hours, 10);
        assert_eq!(config.terminal.revalidation_interval_secs, 30);
        assert_eq!(config.terminal.access_code_length, 6);
        assert_eq!(config.seed.users.len(), 2);
        assert!(config.seed.users[0].is_admin());
        assert!(!config.seed.users[1].active);
        assert!(config.seed.stations[0].active);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ConfigLoader::from_yaml_str("", "empty").unwrap().into_config();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.terminal.grant_ttl_hours, 12);
        assert_eq!(config.terminal.access_code_length, 4);
        assert_eq!(config.server.bind, "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = ConfigLoader::from_yaml_str("terminal: [unclosed", "broken.yaml").unwrap_err();
        match err {
            ClockError::ConfigParseError { path, .. } => assert_eq!(path, "broken.yaml"),
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let err = ConfigLoader::from_yaml_str("terminal:\n  grant_ttl_hours: 0\n", "test").unwrap_err();
        assert!(err.to_string().contains("grant_ttl_hours"));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::load("/nonexistent/timeclock.yaml").unwrap_err();
        assert_eq!(
            err,
            ClockError::ConfigNotFound {
                path: "/nonexistent/timeclock.yaml".to_string()
            }
        );
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("timeclock-{}.yaml", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(FULL_CONFIG.as_bytes()).unwrap();

        let loader = ConfigLoader::load(&path).unwrap();
        assert_eq!(loader.config().seed.stations.len(), 1);

        fs::remove_file(&path).unwrap();
    }
}
