//! Line-first, refine-within diff of an original text and its rewrite.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cleanup;
use crate::ops::{Algorithm, DiffAlgorithm, DiffOp};
use crate::segment::{DiffSegment, SegmentBuilder, SegmentKind};
use crate::tokenize::Tokens;

/// Default token budget for refining a changed region.
pub const DEFAULT_MAX_REFINE_TOKENS: usize = 4096;

/// Granularity used inside changed line regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Words, whitespace runs and punctuation.
    #[default]
    Word,
    /// Extended grapheme clusters.
    Char,
}

/// Tuning knobs for [`DiffEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// Granularity used inside changed line regions.
    pub granularity: Granularity,
    /// Algorithm used for both the line pass and the refinement pass.
    pub algorithm: Algorithm,
    /// Changed regions with more tokens than this (both sides together) are
    /// emitted as a whole deletion plus insertion instead of being refined.
    pub max_refine_tokens: usize,
    /// Fold whitespace-only equal runs between changes into the changes.
    pub absorb_whitespace: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::Word,
            algorithm: Algorithm::Myers,
            max_refine_tokens: DEFAULT_MAX_REFINE_TOKENS,
            absorb_whitespace: true,
        }
    }
}

impl DiffOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the in-line granularity.
    #[must_use]
    pub const fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Sets the diff algorithm.
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the refinement token budget.
    #[must_use]
    pub const fn with_max_refine_tokens(mut self, max_refine_tokens: usize) -> Self {
        self.max_refine_tokens = max_refine_tokens;
        self
    }

    /// Enables or disables whitespace absorption.
    #[must_use]
    pub const fn with_absorb_whitespace(mut self, absorb_whitespace: bool) -> Self {
        self.absorb_whitespace = absorb_whitespace;
        self
    }
}

/// Computes inline diffs with a fixed set of options.
///
/// The engine holds no state between calls and can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    /// Creates an engine with the given options.
    #[must_use]
    pub const fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// The engine options.
    #[must_use]
    pub const fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Computes the segment diff of `original` against `rewrite`.
    ///
    /// Lines are aligned first; each changed run of lines is then diffed
    /// again at the configured granularity so small edits stay local.
    #[must_use]
    pub fn compute(&self, original: &str, rewrite: &str) -> Vec<DiffSegment> {
        if original == rewrite {
            return if original.is_empty() {
                Vec::new()
            } else {
                vec![DiffSegment::equal(original)]
            };
        }
        if original.is_empty() {
            return vec![DiffSegment::insert(rewrite)];
        }
        if rewrite.is_empty() {
            return vec![DiffSegment::delete(original)];
        }

        let (old, new) = (Tokens::lines(original), Tokens::lines(rewrite));
        let mut out = SegmentBuilder::default();
        for op in self.options.algorithm.diff(old.pieces(), new.pieces()) {
            match op {
                DiffOp::Equal { old: range, .. } => out.push(SegmentKind::Equal, old.span(range)),
                DiffOp::Delete { old: range } => out.push(SegmentKind::Delete, old.span(range)),
                DiffOp::Insert { new: range } => out.push(SegmentKind::Insert, new.span(range)),
                DiffOp::Replace {
                    old: old_range,
                    new: new_range,
                } => self.refine(old.span(old_range), new.span(new_range), &mut out),
            }
        }

        let segments = out.finish();
        if self.options.absorb_whitespace {
            cleanup::absorb_whitespace(segments)
        } else {
            segments
        }
    }

    fn refine(&self, old: &str, new: &str, out: &mut SegmentBuilder) {
        let granularity = self.options.granularity;
        let (old_tokens, new_tokens) = (
            Tokens::split(old, granularity),
            Tokens::split(new, granularity),
        );

        let total = old_tokens.len() + new_tokens.len();
        if total > self.options.max_refine_tokens {
            debug!(
                tokens = total,
                limit = self.options.max_refine_tokens,
                "changed region too large to refine"
            );
            out.push(SegmentKind::Delete, old);
            out.push(SegmentKind::Insert, new);
            return;
        }

        let ops = self
            .options
            .algorithm
            .diff(old_tokens.pieces(), new_tokens.pieces());
        if ops.iter().all(DiffOp::is_change) {
            out.push(SegmentKind::Delete, old);
            out.push(SegmentKind::Insert, new);
            return;
        }

        for op in ops {
            match op {
                DiffOp::Equal { old: range, .. } => {
                    out.push(SegmentKind::Equal, old_tokens.span(range));
                }
                DiffOp::Delete { old: range } => {
                    out.push(SegmentKind::Delete, old_tokens.span(range));
                }
                DiffOp::Insert { new: range } => {
                    out.push(SegmentKind::Insert, new_tokens.span(range));
                }
                DiffOp::Replace {
                    old: old_range,
                    new: new_range,
                } => {
                    out.push(SegmentKind::Delete, old_tokens.span(old_range));
                    out.push(SegmentKind::Insert, new_tokens.span(new_range));
                }
            }
        }
    }
}

/// Computes the inline diff of `original` against `rewrite` with default
/// options.
///
/// Concatenating the `equal` and `delete` segments gives back `original`;
/// concatenating the `equal` and `insert` segments gives back `rewrite`.
///
/// # Examples
///
/// ```
/// use mosaic_diff::{DiffSegment, compute_diff};
///
/// let segments = compute_diff("hello world", "hello beautiful world");
/// assert_eq!(
///     segments,
///     vec![
///         DiffSegment::equal("hello "),
///         DiffSegment::insert("beautiful "),
///         DiffSegment::equal("world"),
///     ]
/// );
/// ```
#[must_use]
pub fn compute_diff(original: &str, rewrite: &str) -> Vec<DiffSegment> {
    DiffEngine::default().compute(original, rewrite)
}
