//! Configuration module for the Ecclesia backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which submission store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-scoped maps, lost on restart.
    Memory,
    /// SQLite file at `Config::db_path`.
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "sqlite" | "sql" => Ok(Self::Sqlite),
            other => Err(ConfigError::Invalid {
                key: "ECCLESIA_STORE",
                value: other.to_string(),
            }),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Invalid {
                key: "ECCLESIA_LOG_FORMAT",
                value: other.to_string(),
            }),
        }
    }
}

/// A variable was set but could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store implementation selected at startup
    pub store: StoreBackend,
    /// Path to SQLite database file (only used by the sqlite store)
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Directory with the built website, served for non-API paths
    pub static_dir: Option<PathBuf>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("ECCLESIA_STORE") {
            Some(value) => value.parse()?,
            None => StoreBackend::Memory,
        };

        let db_path = lookup("ECCLESIA_DB_PATH")
            .unwrap_or_else(|| "./data/ecclesia.sqlite".to_string())
            .into();

        let bind_raw =
            lookup("ECCLESIA_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:5000".to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "ECCLESIA_BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let log_level = lookup("ECCLESIA_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match lookup("ECCLESIA_LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => LogFormat::Pretty,
        };

        let static_dir = lookup("ECCLESIA_STATIC_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let request_timeout = match lookup("ECCLESIA_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid {
                    key: "ECCLESIA_REQUEST_TIMEOUT_SECS",
                    value: raw,
                })?,
            None => Duration::from_secs(30),
        };

        Ok(Self {
            store,
            db_path,
            bind_addr,
            log_level,
            log_format,
            static_dir,
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.db_path, PathBuf::from("./data/ecclesia.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.static_dir.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_sqlite_backend_selected() {
        let config = config_from(&[
            ("ECCLESIA_STORE", "SQLite"),
            ("ECCLESIA_DB_PATH", "/tmp/site.sqlite"),
            ("ECCLESIA_LOG_FORMAT", "json"),
            ("ECCLESIA_STATIC_DIR", "dist/public"),
        ])
        .unwrap();

        assert_eq!(config.store, StoreBackend::Sqlite);
        assert_eq!(config.db_path, PathBuf::from("/tmp/site.sqlite"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.static_dir, Some(PathBuf::from("dist/public")));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = config_from(&[("ECCLESIA_STORE", "postgres")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "ECCLESIA_STORE",
                value: "postgres".to_string()
            }
        );
    }

    #[test]
    fn test_bad_bind_addr_is_error_not_panic() {
        assert!(config_from(&[("ECCLESIA_BIND_ADDR", "localhost")]).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(config_from(&[("ECCLESIA_REQUEST_TIMEOUT_SECS", "0")]).is_err());
        let config = config_from(&[("ECCLESIA_REQUEST_TIMEOUT_SECS", "5")]).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
