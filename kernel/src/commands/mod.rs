//! Subcommand implementations.
//!
//! Commands return their rendered output instead of printing it, so the
//! binary owns stdout and tests can inspect the text directly.

/// `mosaic diff`.
pub mod diff;
/// `mosaic rewrite`.
pub mod rewrite;

use std::path::Path;

use anyhow::{Context, Result};

/// Reads a text file for diffing.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not UTF-8.
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
