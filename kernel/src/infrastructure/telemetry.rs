//! Telemetry setup for the Mosaic host.
//!
//! Logs go to stderr so stdout carries only command output.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::TelemetrySettings;

/// Builder for setting up logging.
#[derive(Debug, Clone)]
pub struct TelemetryBuilder {
    log_level: String,
    json: bool,
}

impl Default for TelemetryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryBuilder {
    /// Creates a builder logging human-readable lines at `info`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }

    /// Creates a builder from configuration.
    #[must_use]
    pub fn from_settings(settings: &TelemetrySettings) -> Self {
        Self::new()
            .with_log_level(settings.log_level.clone())
            .with_json(settings.json)
    }

    /// Sets the default filter; `RUST_LOG` takes precedence.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Switches between JSON and human-readable output.
    #[must_use]
    pub const fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Returns the filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Installs the global subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if the log filter is invalid or a global subscriber
    /// is already installed.
    pub fn init(self) -> Result<()> {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.log_level)
                .with_context(|| format!("Invalid log level '{}'", self.log_level))?,
        };

        let fmt_layer = if self.json {
            fmt::layer().json().with_writer(std::io::stderr).boxed()
        } else {
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .boxed()
        };

        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .context("Failed to init subscriber")?;

        Ok(())
    }
}
