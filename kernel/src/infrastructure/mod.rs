/// Configuration management for the host.
pub mod config;
/// Logging setup.
pub mod telemetry;
