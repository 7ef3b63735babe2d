//! Property-based tests for the diff engine.
//!
//! Uses proptest to generate text pairs and verify that every option
//! combination produces segments that rebuild both inputs.

mod common;

use common::{invariant_violation, option_matrix, text_of};
use mosaic_diff::{DiffEngine, DiffSegment, Granularity, SegmentKind, compute_diff};
use proptest::prelude::*;

/// Strategy to generate short texts over a small alphabet, so generated
/// pairs share plenty of words and lines
fn text_strategy() -> impl Strategy<Value = String> {
    "[ab cé\n\t.,’\u{301}]{0,40}"
}

/// Strategy to generate a text together with an edited copy of it
fn edited_pair_strategy() -> impl Strategy<Value = (String, String)> {
    (text_strategy(), text_strategy(), any::<prop::sample::Index>(), 0usize..8).prop_map(
        |(original, insertion, at, removed)| {
            let boundaries: Vec<usize> = original
                .char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(original.len()))
                .collect();
            let start_slot = at.index(boundaries.len());
            let end_slot = (start_slot + removed).min(boundaries.len() - 1);
            let (start, end) = (boundaries[start_slot], boundaries[end_slot]);
            let rewrite = format!("{}{insertion}{}", &original[..start], &original[end..]);
            (original, rewrite)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: Segments rebuild both inputs and are never empty or
    /// repeated, for unrelated inputs.
    #[test]
    fn unrelated_pairs_round_trip(original in text_strategy(), rewrite in text_strategy()) {
        for options in option_matrix() {
            let segments = DiffEngine::new(options).compute(&original, &rewrite);
            let violation = invariant_violation(&original, &rewrite, &segments);
            prop_assert!(violation.is_none(), "{:?} with {:?}", violation, options);
        }
    }

    /// Property: Same invariants for a text and a locally edited copy.
    #[test]
    fn edited_pairs_round_trip((original, rewrite) in edited_pair_strategy()) {
        for options in option_matrix() {
            let segments = DiffEngine::new(options).compute(&original, &rewrite);
            let violation = invariant_violation(&original, &rewrite, &segments);
            prop_assert!(violation.is_none(), "{:?} with {:?}", violation, options);
        }
    }

    /// Property: A text diffed against itself is one equal segment.
    #[test]
    fn identity_is_one_equal_segment(text in text_strategy()) {
        for options in option_matrix() {
            let segments = DiffEngine::new(options).compute(&text, &text);
            if text.is_empty() {
                prop_assert!(segments.is_empty());
            } else {
                prop_assert_eq!(segments, vec![DiffSegment::equal(text.clone())]);
            }
        }
    }

    /// Property: Against an empty side the whole text is one change.
    #[test]
    fn empty_side_is_one_change(text in text_strategy()) {
        prop_assume!(!text.is_empty());
        for options in option_matrix() {
            let engine = DiffEngine::new(options);
            prop_assert_eq!(engine.compute("", &text), vec![DiffSegment::insert(text.clone())]);
            prop_assert_eq!(engine.compute(&text, ""), vec![DiffSegment::delete(text.clone())]);
        }
    }

    /// Property: A longer rewrite always shows an insertion and a shorter one
    /// always shows a deletion.
    #[test]
    fn length_changes_are_visible((original, rewrite) in edited_pair_strategy()) {
        let segments = compute_diff(&original, &rewrite);
        if rewrite.len() > original.len() {
            prop_assert!(segments.iter().any(|s| s.kind == SegmentKind::Insert));
        }
        if rewrite.len() < original.len() {
            prop_assert!(segments.iter().any(|s| s.kind == SegmentKind::Delete));
        }
    }

    /// Property: Both algorithms keep the same number of lines unchanged
    /// when changed regions are not refined.
    #[test]
    fn algorithms_agree_on_unchanged_lines(
        original in prop::collection::vec("[ab]{0,2}\n", 0..12),
        rewrite in prop::collection::vec("[ab]{0,2}\n", 0..12),
    ) {
        let (original, rewrite) = (original.concat(), rewrite.concat());
        let unchanged: Vec<usize> = option_matrix()
            .into_iter()
            .filter(|o| o.granularity == Granularity::Word && !o.absorb_whitespace)
            .map(|o| DiffEngine::new(o.with_max_refine_tokens(0)).compute(&original, &rewrite))
            .map(|segments| text_of(&segments, SegmentKind::Equal).matches('\n').count())
            .collect();
        prop_assert_eq!(unchanged.len(), 2);
        prop_assert_eq!(unchanged[0], unchanged[1]);
    }
}

// =============================================================================
// Fixed Examples
// =============================================================================

#[test]
fn test_empty_inputs() {
    assert!(compute_diff("", "").is_empty());
    assert_eq!(
        compute_diff("", "new content"),
        vec![DiffSegment::insert("new content")]
    );
    assert_eq!(
        compute_diff("old content", ""),
        vec![DiffSegment::delete("old content")]
    );
}

#[test]
fn test_insertion_and_deletion_detection() {
    for options in option_matrix() {
        let engine = DiffEngine::new(options);

        let inserted = engine.compute("hello world", "hello beautiful world");
        assert!(
            inserted
                .iter()
                .any(|s| s.kind == SegmentKind::Insert && s.text.contains("beautiful")),
            "{options:?}: {inserted:?}"
        );

        let deleted = engine.compute("hello beautiful world", "hello world");
        assert!(
            deleted
                .iter()
                .any(|s| s.kind == SegmentKind::Delete && s.text.contains("beautiful")),
            "{options:?}: {deleted:?}"
        );
    }
}

#[test]
fn test_multi_line_sensitivity() {
    let original = "line one\nline two\nline three";
    let rewrite = "line one\nline TWO\nline three";
    for options in option_matrix() {
        let segments = DiffEngine::new(options).compute(original, rewrite);
        assert!(segments.len() > 1, "{options:?}: {segments:?}");
        assert!(text_of(&segments, SegmentKind::Equal).contains("line one\n"));
        assert!(text_of(&segments, SegmentKind::Equal).contains("\nline three"));
        assert_eq!(invariant_violation(original, rewrite, &segments), None);
    }
}

#[test]
fn test_whitespace_changes_are_real() {
    for options in option_matrix() {
        let engine = DiffEngine::new(options);
        for (original, rewrite) in [("a b", "a  b"), ("a\tb", "a b"), ("end", "end\n"), ("x\r\n", "x\n")] {
            let segments = engine.compute(original, rewrite);
            assert!(
                segments.iter().any(DiffSegment::is_change),
                "{options:?}: {original:?} -> {rewrite:?}"
            );
            assert_eq!(invariant_violation(original, rewrite, &segments), None);
        }
    }
}
