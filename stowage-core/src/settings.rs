//! Typed configuration sections.

use std::time::Duration;

use crate::config::{ConfigError, ConfigProperties, StowageConfig};

/// Connection settings, read from `database.*`.
///
/// ```yaml
/// database:
///   url: "postgres://localhost/app"
///   max_connections: 10
///   acquire_timeout_secs: 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseSettings {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(Self::DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

impl ConfigProperties for DatabaseSettings {
    fn prefix() -> &'static str {
        "database"
    }

    fn from_config(config: &StowageConfig) -> Result<Self, ConfigError> {
        let url: String = config.get("database.url")?;
        let max_connections =
            config.get_or("database.max_connections", Self::DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "database.max_connections".into(),
                message: "must be at least 1".into(),
            });
        }
        let timeout_secs = config.get_or(
            "database.acquire_timeout_secs",
            Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
        )?;
        Ok(Self {
            url,
            max_connections,
            acquire_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging settings, read from `logging.*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl ConfigProperties for LoggingSettings {
    fn prefix() -> &'static str {
        "logging"
    }

    fn from_config(config: &StowageConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let filter = config.get_or("logging.filter", defaults.filter)?;
        let format = match config
            .get_or("logging.format", "pretty".to_string())?
            .to_lowercase()
            .as_str()
        {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    key: "logging.format".into(),
                    message: format!("unknown format `{other}`, expected pretty|json"),
                })
            }
        };
        Ok(Self { filter, format })
    }
}
