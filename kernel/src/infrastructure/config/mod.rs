//! Configuration management for the Mosaic host.
//!
//! Settings are layered: built-in defaults, then an optional configuration
//! file (`mosaic.toml` in the working directory, or an explicit path), then
//! environment variables prefixed with `MOSAIC` using `__` as the section
//! separator, e.g. `MOSAIC__API__BASE_URL`.
//!
//! # Example
//!
//! ```
//! use mosaic_kernel::infrastructure::config::Settings;
//!
//! let settings = Settings::new().expect("Failed to load configuration");
//! assert!(settings.diff.max_refine_tokens > 0);
//! ```

pub mod api;
pub mod diff;
pub mod telemetry;

pub use api::ApiSettings;
pub use diff::DiffSettings;
pub use telemetry::TelemetrySettings;

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use mosaic_diff::engine::DEFAULT_MAX_REFINE_TOKENS;
use mosaic_stream::client::DEFAULT_CHUNK_TIMEOUT_MS;
use mosaic_stream::retry::{DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_RETRIES};
use serde::Deserialize;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/";

/// Top-level configuration for the Mosaic host.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Streaming API settings.
    pub api: ApiSettings,
    /// Diff engine settings.
    pub diff: DiffSettings,
    /// Telemetry settings.
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Creates a new settings instance from `mosaic.toml` (if present),
    /// environment variables and defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be built or deserialized.
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Like [`Settings::new`], but reads `file` instead of `mosaic.toml`.
    /// An explicit file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if `file` is missing or the configuration cannot be
    /// built or deserialized.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_sources(file, Environment::with_prefix("MOSAIC").separator("__"))
    }

    fn from_sources(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let file = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("mosaic").required(false),
        };

        let max_refine_tokens = u64::try_from(DEFAULT_MAX_REFINE_TOKENS).unwrap_or(u64::MAX);
        let s = Config::builder()
            // Start with default values
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("api.max_retries", u64::from(DEFAULT_MAX_RETRIES))?
            .set_default("api.base_delay_ms", DEFAULT_BASE_DELAY_MS)?
            .set_default("api.chunk_timeout_ms", DEFAULT_CHUNK_TIMEOUT_MS)?
            .set_default("diff.granularity", "word")?
            .set_default("diff.algorithm", "myers")?
            .set_default("diff.max_refine_tokens", max_refine_tokens)?
            .set_default("diff.absorb_whitespace", true)?
            .set_default("telemetry.log_level", "info")?
            .set_default("telemetry.json", false)?
            .add_source(file)
            // Merge in Environment variables
            .add_source(env)
            .build()?;

        s.try_deserialize()
    }
}
