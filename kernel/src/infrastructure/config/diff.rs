//! Diff configuration for the Mosaic host.

use mosaic_diff::{Algorithm, DiffOptions, Granularity};
use serde::Deserialize;

/// Diff engine settings.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct DiffSettings {
    /// Granularity inside changed lines.
    pub granularity: Granularity,
    /// Alignment algorithm.
    pub algorithm: Algorithm,
    /// Token budget for refining one changed region.
    pub max_refine_tokens: usize,
    /// Fold whitespace-only equal runs between changes into the changes.
    pub absorb_whitespace: bool,
}

impl DiffSettings {
    /// Converts the settings into engine options.
    #[must_use]
    pub const fn options(&self) -> DiffOptions {
        DiffOptions {
            granularity: self.granularity,
            algorithm: self.algorithm,
            max_refine_tokens: self.max_refine_tokens,
            absorb_whitespace: self.absorb_whitespace,
        }
    }
}
