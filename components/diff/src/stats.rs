//! Change summaries.

use serde::Serialize;

use crate::segment::{DiffSegment, SegmentKind};

/// Size summary of a segment sequence.
///
/// Character counts are Unicode scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DiffStats {
    /// Characters only present in the rewrite.
    pub inserted_chars: usize,
    /// Characters only present in the original.
    pub deleted_chars: usize,
    /// Characters present in both.
    pub unchanged_chars: usize,
    /// Number of `insert` segments.
    pub insertions: usize,
    /// Number of `delete` segments.
    pub deletions: usize,
    /// Unchanged characters over the length of the longer text, in `0.0..=1.0`.
    pub similarity: f64,
}

impl DiffStats {
    /// Summarizes a segment sequence.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_segments(segments: &[DiffSegment]) -> Self {
        let mut stats = Self::default();
        for segment in segments {
            let chars = segment.text.chars().count();
            match segment.kind {
                SegmentKind::Equal => stats.unchanged_chars += chars,
                SegmentKind::Insert => {
                    stats.inserted_chars += chars;
                    stats.insertions += 1;
                }
                SegmentKind::Delete => {
                    stats.deleted_chars += chars;
                    stats.deletions += 1;
                }
            }
        }

        let longest = (stats.unchanged_chars + stats.deleted_chars)
            .max(stats.unchanged_chars + stats.inserted_chars);
        stats.similarity = if longest == 0 {
            1.0
        } else {
            stats.unchanged_chars as f64 / longest as f64
        };
        stats
    }

    /// Returns true if the sequence contains no changes.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        self.insertions == 0 && self.deletions == 0
    }
}
