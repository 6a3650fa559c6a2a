use tracing_subscriber::EnvFilter;

use crate::settings::{LogFormat, LoggingSettings};

/// Initialise the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `settings.filter`. Calling this more than
/// once is harmless: later calls leave the first subscriber in place.
pub fn init_tracing(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    if installed.is_ok() {
        tracing::debug!(format = ?settings.format, "tracing initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        let settings = LoggingSettings {
            filter: "not a [valid filter".into(),
            format: LogFormat::Json,
        };
        init_tracing(&settings);
        init_tracing(&LoggingSettings::default());
    }
}
