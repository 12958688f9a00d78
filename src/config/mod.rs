//! Configuration module for the cage service and sync client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;
use crate::sync::SyncConfig;

/// Default refresh cadence for the cage grid.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 4000;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base URL the sync client talks to
    pub api_url: String,
    /// Grid polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Config {
    /// Load configuration from environment variables, after reading `.env` if present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from `lookup`, which maps a `CAGE_*` variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let db_path = lookup("CAGE_DB_PATH")
            .unwrap_or_else(|| "./data/cages.sqlite".to_string())
            .into();

        let bind_addr = lookup("CAGE_BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8000".to_string())
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid CAGE_BIND_ADDR format: {}", e)))?;

        let log_level = lookup("CAGE_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let api_url =
            lookup("CAGE_API_URL").unwrap_or_else(|| "http://localhost:8000".to_string());

        let poll_interval_ms = match lookup("CAGE_POLL_INTERVAL_MS") {
            Some(raw) => raw.parse().map_err(|e| {
                AppError::Internal(format!("Invalid CAGE_POLL_INTERVAL_MS value: {}", e))
            })?,
            None => DEFAULT_POLL_INTERVAL_MS,
        };

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            api_url,
            poll_interval_ms,
        })
    }

    /// Engine settings derived from this configuration. A zero interval disables polling.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            poll_interval: (self.poll_interval_ms > 0)
                .then(|| Duration::from_millis(self.poll_interval_ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/cages.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.poll_interval_ms, 4000);
        assert_eq!(
            config.sync_config().poll_interval,
            Some(Duration::from_millis(4000))
        );
    }

    #[test]
    fn test_config_overrides() {
        let config = load(&[
            ("CAGE_DB_PATH", "/tmp/cages.sqlite"),
            ("CAGE_BIND_ADDR", "0.0.0.0:9000"),
            ("CAGE_API_URL", "http://cages.local"),
            ("CAGE_POLL_INTERVAL_MS", "0"),
        ])
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/cages.sqlite"));
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.api_url, "http://cages.local");
        assert_eq!(config.sync_config().poll_interval, None);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(load(&[("CAGE_POLL_INTERVAL_MS", "not-a-number")]).is_err());
        assert!(load(&[("CAGE_BIND_ADDR", "nowhere")]).is_err());
    }
}
