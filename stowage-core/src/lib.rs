//! # stowage-core — configuration and tracing bootstrap
//!
//! | Item | Description |
//! |------|-------------|
//! | [`StowageConfig`] | Layered YAML / `.env` / environment configuration |
//! | [`DatabaseSettings`] | `database.*` section consumed by the pool bootstrap |
//! | [`LoggingSettings`] | `logging.*` section consumed by [`init_tracing`] |

pub mod config;
pub mod settings;
pub mod telemetry;

pub use config::{ConfigError, ConfigProperties, ConfigValue, FromConfigValue, StowageConfig};
pub use settings::{DatabaseSettings, LogFormat, LoggingSettings};
pub use telemetry::init_tracing;
