//! Tracing setup for folio binaries.
//!
//! Library code only emits `tracing` events; whichever binary links it decides
//! where they go. Call [`init`] once at startup.
//!
//! ```ignore
//! use folio_common::telemetry::{self, TelemetryConfig};
//!
//! telemetry::init(TelemetryConfig::from_env("folio-cli"));
//! tracing::info!("ready");
//! ```

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event
    pub service_name: String,
    /// Console log level (default: INFO, DEBUG in debug builds)
    pub console_level: Level,
}

impl TelemetryConfig {
    /// Build a config with the build-profile default level.
    ///
    /// `RUST_LOG` still takes precedence at [`init`] time.
    pub fn from_env(service_name: impl Into<String>) -> Self {
        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        Self {
            service_name: service_name.into(),
            console_level,
        }
    }

    /// Override the console level from a config string such as `"warn"`.
    /// Unparseable values keep the current level.
    pub fn with_level_str(mut self, level: Option<&str>) -> Self {
        if let Some(parsed) = level.and_then(|l| l.parse::<Level>().ok()) {
            self.console_level = parsed;
        }
        self
    }
}

/// Initialize the global tracing subscriber. Logs go to stderr so command
/// output on stdout stays machine-readable.
pub fn init(config: TelemetryConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.console_level.as_str().to_lowercase()));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_filter(env_filter);

    // try_init: tests and embedding hosts may already have a subscriber
    if tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_ok()
    {
        tracing::debug!(service = %config.service_name, "telemetry initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_override() {
        let config = TelemetryConfig::from_env("test").with_level_str(Some("warn"));
        assert_eq!(config.console_level, Level::WARN);

        let config = config.with_level_str(Some("not-a-level"));
        assert_eq!(config.console_level, Level::WARN);
    }
}
