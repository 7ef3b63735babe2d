//! Shared test utilities for integration tests.
//!
//! Provides the option matrix every diff property is checked against and a
//! checker for the invariants every segment sequence must satisfy.

#![allow(dead_code)]

use mosaic_diff::{
    Algorithm, DiffOptions, DiffSegment, Granularity, SegmentKind, original_text, rewrite_text,
};

/// Every combination of algorithm, granularity and whitespace absorption.
pub fn option_matrix() -> Vec<DiffOptions> {
    let mut all = Vec::new();
    for algorithm in [Algorithm::Myers, Algorithm::Lcs] {
        for granularity in [Granularity::Word, Granularity::Char] {
            for absorb in [true, false] {
                all.push(
                    DiffOptions::new()
                        .with_algorithm(algorithm)
                        .with_granularity(granularity)
                        .with_absorb_whitespace(absorb),
                );
            }
        }
    }
    all
}

/// Returns a description of the first broken invariant, if any.
pub fn invariant_violation(original: &str, rewrite: &str, segments: &[DiffSegment]) -> Option<String> {
    let rebuilt = original_text(segments);
    if rebuilt != original {
        return Some(format!("original rebuilt as {rebuilt:?}"));
    }
    let rebuilt = rewrite_text(segments);
    if rebuilt != rewrite {
        return Some(format!("rewrite rebuilt as {rebuilt:?}"));
    }
    if let Some(at) = segments.iter().position(|s| s.text.is_empty()) {
        return Some(format!("empty segment at {at}"));
    }
    if let Some(at) = segments.windows(2).position(|w| w[0].kind == w[1].kind) {
        return Some(format!("adjacent {:?} segments at {at}", segments[at].kind));
    }
    None
}

/// Concatenated text of all segments of `kind`.
pub fn text_of(segments: &[DiffSegment], kind: SegmentKind) -> String {
    segments
        .iter()
        .filter(|s| s.kind == kind)
        .map(|s| s.text.as_str())
        .collect()
}

/// A multi-paragraph story used by end-to-end tests.
pub const STORY: &str = "\
Grandma Rose kept a garden behind the old house.
Every spring she planted tomatoes, beans and marigolds.

The neighbours said her roses were the best in town.
She never told anyone her secret.
";

/// A rewrite of [`STORY`] touching a few words and adding a line.
pub const STORY_REWRITE: &str = "\
Grandma Rose kept a garden behind the old farmhouse.
Every spring she planted tomatoes, beans and marigolds.

The neighbours swore her roses were the finest in the county.
She never told anyone her secret.
It was patience.
";
