//! Mosaic Diff - inline diffs for reviewing story rewrites.
//!
//! [`compute_diff`] compares an original text with a rewritten one and
//! returns tagged segments (`equal`, `insert`, `delete`) ready to render as
//! an inline diff. Lines are aligned first and each changed run of lines is
//! refined at word (or grapheme) granularity, so a one-word edit in a long
//! story shows up as a one-word change.
//!
//! The computation is pure and total: every pair of strings has a diff, and
//! the same inputs always give the same segments.
//!
//! ```
//! use mosaic_diff::{SegmentKind, compute_diff};
//!
//! let segments = compute_diff("line one\nline two\n", "line one\nline 2\n");
//! assert!(segments.iter().any(|s| s.kind == SegmentKind::Insert && s.text == "2"));
//! ```

mod cleanup;
/// Line-first, refine-within diff engine.
pub mod engine;
/// Tabular LCS algorithm.
pub mod lcs;
/// Myers O(ND) algorithm.
pub mod myers;
/// Token-level operations and the algorithm trait.
pub mod ops;
/// Inline and unified renderings.
pub mod render;
/// Output segments.
pub mod segment;
/// Change summaries.
pub mod stats;
/// Tokenizers.
pub mod tokenize;

pub use engine::{DiffEngine, DiffOptions, Granularity, compute_diff};
pub use lcs::LcsDiff;
pub use myers::MyersDiff;
pub use ops::{Algorithm, DiffAlgorithm, DiffOp, Edit};
pub use render::{InlineStyle, UnifiedFormat, render_inline};
pub use segment::{DiffSegment, SegmentKind, original_text, rewrite_text};
pub use stats::DiffStats;
pub use tokenize::Tokens;
