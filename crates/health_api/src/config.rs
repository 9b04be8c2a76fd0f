//! Environment-driven server configuration.
//!
//! Every variable is optional; unset values fall back to defaults, while
//! values that are set but unparsable are rejected at startup.

use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const BIND_ADDR_VAR: &str = "HEALTH_BIND_ADDR";
pub const DB_PATH_VAR: &str = "HEALTH_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "HEALTH_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "HEALTH_LOG_DIR";
pub const MAX_BODY_BYTES_VAR: &str = "HEALTH_MAX_BODY_BYTES";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DB_PATH: &str = "health.sqlite3";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Database path selecting an ephemeral in-memory database.
pub const IN_MEMORY_DB_PATH: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.variable, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            db_path: DEFAULT_DB_PATH.to_string(),
            log_level: health_core::default_log_level().to_string(),
            log_dir: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its
    /// raw value. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(raw) = read(BIND_ADDR_VAR) {
            config.bind_addr = raw.parse().map_err(|err| ConfigError {
                variable: BIND_ADDR_VAR,
                message: format!("`{raw}` is not a socket address: {err}"),
            })?;
        }
        if let Some(raw) = read(DB_PATH_VAR) {
            config.db_path = raw;
        }
        if let Some(raw) = read(LOG_LEVEL_VAR) {
            config.log_level = raw;
        }
        config.log_dir = read(LOG_DIR_VAR);
        if let Some(raw) = read(MAX_BODY_BYTES_VAR) {
            config.max_body_bytes = match raw.parse::<usize>() {
                Ok(0) | Err(_) => {
                    return Err(ConfigError {
                        variable: MAX_BODY_BYTES_VAR,
                        message: format!("`{raw}` is not a positive byte count"),
                    })
                }
                Ok(bytes) => bytes,
            };
        }

        Ok(config)
    }

    pub fn uses_in_memory_db(&self) -> bool {
        self.db_path == IN_MEMORY_DB_PATH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).expect("defaults");
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert!(!config.uses_in_memory_db());
    }

    #[test]
    fn reads_every_variable() {
        let config = ServerConfig::from_lookup(lookup(&[
            (BIND_ADDR_VAR, "0.0.0.0:9000"),
            (DB_PATH_VAR, ":memory:"),
            (LOG_LEVEL_VAR, "warn"),
            (LOG_DIR_VAR, "/var/log/health"),
            (MAX_BODY_BYTES_VAR, "1024"),
        ]))
        .expect("valid config");

        assert_eq!(config.bind_addr.port(), 9000);
        assert!(config.uses_in_memory_db());
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/health"));
        assert_eq!(config.max_body_bytes, 1024);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = ServerConfig::from_lookup(lookup(&[(LOG_DIR_VAR, "  "), (DB_PATH_VAR, "")]))
            .expect("blank values");
        assert_eq!(config.log_dir, None);
        assert_eq!(config.db_path, DEFAULT_DB_PATH);
    }

    #[test]
    fn rejects_unparsable_values() {
        let err = ServerConfig::from_lookup(lookup(&[(BIND_ADDR_VAR, "localhost")]))
            .expect_err("bad address");
        assert_eq!(err.variable, BIND_ADDR_VAR);

        let err = ServerConfig::from_lookup(lookup(&[(MAX_BODY_BYTES_VAR, "0")]))
            .expect_err("zero body limit");
        assert_eq!(err.variable, MAX_BODY_BYTES_VAR);
        assert!(err.to_string().contains("positive byte count"));
    }
}
