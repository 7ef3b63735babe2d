//! Mosaic Kernel - command-line host for the Mosaic diff and stream crates.
//!
//! This crate wires configuration, logging and the command-line interface
//! around [`mosaic_diff`] and [`mosaic_stream`]: `mosaic diff` compares two
//! files, `mosaic rewrite` streams a rewrite from the story service and
//! prints the diff against the original.

/// Command-line interface definitions.
pub mod cli;
/// Subcommand implementations.
pub mod commands;
/// Infrastructure components (config, telemetry).
pub mod infrastructure;
/// Output formats.
pub mod output;
