//! Application configuration file support.
//!
//! Reads `bookcore.toml` (serde + toml); the binary applies `HOST`/`PORT`
//! environment overrides on top.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::RepositoryError;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub scheduling: SchedulingSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Scheduling engine tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingSettings {
    /// Slot length used by the availability endpoint, in minutes.
    #[serde(default = "default_slot_duration")]
    pub slot_duration_minutes: u16,
    /// How long before session start a join token may be requested.
    #[serde(default = "default_join_window")]
    pub join_window_minutes: i64,
    /// How far ahead of session start reminders are dispatched.
    #[serde(default = "default_reminder_lead")]
    pub reminder_lead_minutes: i64,
    /// Background sweep interval in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_slot_duration() -> u16 {
    30
}

fn default_join_window() -> i64 {
    15
}

fn default_reminder_lead() -> i64 {
    60
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            slot_duration_minutes: default_slot_duration(),
            join_window_minutes: default_join_window(),
            reminder_lead_minutes: default_reminder_lead(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            scheduling: SchedulingSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from the default locations, falling back to
    /// defaults when no `bookcore.toml` exists.
    pub fn from_default_location() -> Self {
        let search_paths = [
            PathBuf::from("bookcore.toml"),
            PathBuf::from("../bookcore.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                if let Ok(config) = Self::from_file(&path) {
                    return config;
                }
            }
        }

        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.scheduling.slot_duration_minutes, 30);
        assert_eq!(config.scheduling.join_window_minutes, 15);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 9000

[scheduling]
join_window_minutes = 30
"#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.scheduling.join_window_minutes, 30);
        assert_eq!(config.scheduling.reminder_lead_minutes, 60);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.scheduling.sweep_interval_secs, 60);
    }
}
