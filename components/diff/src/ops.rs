//! Token-level diff operations and the algorithm seam.
//!
//! Algorithms only produce an edit script over two token slices. Trimming of
//! the common head and tail and grouping of the script into [`DiffOp`] ranges
//! is shared by every implementation through [`DiffAlgorithm::diff`].

use std::iter::repeat_n;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::lcs::LcsDiff;
use crate::myers::MyersDiff;

/// A single aligned region between two token sequences.
///
/// Ranges are token indices, half-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOp {
    /// Tokens unchanged between both sequences.
    Equal {
        /// Range in the old sequence.
        old: Range<usize>,
        /// Range in the new sequence.
        new: Range<usize>,
    },
    /// Tokens only present in the new sequence.
    Insert {
        /// Range in the new sequence.
        new: Range<usize>,
    },
    /// Tokens only present in the old sequence.
    Delete {
        /// Range in the old sequence.
        old: Range<usize>,
    },
    /// A changed run: old tokens removed and new tokens added in their place.
    Replace {
        /// Range in the old sequence.
        old: Range<usize>,
        /// Range in the new sequence.
        new: Range<usize>,
    },
}

impl DiffOp {
    /// Returns the range covered in the old sequence, if any.
    #[must_use]
    pub fn old_range(&self) -> Option<Range<usize>> {
        match self {
            Self::Equal { old, .. } | Self::Delete { old } | Self::Replace { old, .. } => {
                Some(old.clone())
            }
            Self::Insert { .. } => None,
        }
    }

    /// Returns the range covered in the new sequence, if any.
    #[must_use]
    pub fn new_range(&self) -> Option<Range<usize>> {
        match self {
            Self::Equal { new, .. } | Self::Insert { new } | Self::Replace { new, .. } => {
                Some(new.clone())
            }
            Self::Delete { .. } => None,
        }
    }

    /// Returns true if this operation represents a change (not equal).
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Equal { .. })
    }

    /// Number of old tokens covered.
    #[must_use]
    pub fn old_len(&self) -> usize {
        self.old_range().map_or(0, |r| r.len())
    }

    /// Number of new tokens covered.
    #[must_use]
    pub fn new_len(&self) -> usize {
        self.new_range().map_or(0, |r| r.len())
    }
}

/// One step of an edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Advance past a token present in both sequences.
    Keep,
    /// Drop the next old token.
    Delete,
    /// Emit the next new token.
    Insert,
}

/// Trait for diff algorithms.
///
/// Implementations compute an edit script between two token slices; the
/// provided [`diff`](Self::diff) trims the common prefix and suffix first and
/// groups the script into [`DiffOp`] ranges.
///
/// The trait uses `Send + Sync` bounds to allow safe sharing across threads.
pub trait DiffAlgorithm: Send + Sync {
    /// Computes an edit script turning `base` into `target`.
    ///
    /// The returned script must contain exactly `base.len()` steps that
    /// consume an old token and `target.len()` steps that consume a new one.
    fn edit_script(&self, base: &[&str], target: &[&str]) -> Vec<Edit>;

    /// Computes the grouped diff between two token slices.
    fn diff(&self, base: &[&str], target: &[&str]) -> Vec<DiffOp> {
        let (prefix, suffix) = common_affixes(base, target);
        let middle = self.edit_script(
            &base[prefix..base.len() - suffix],
            &target[prefix..target.len() - suffix],
        );

        let mut script = Vec::with_capacity(prefix + middle.len() + suffix);
        script.extend(repeat_n(Edit::Keep, prefix));
        script.extend(middle);
        script.extend(repeat_n(Edit::Keep, suffix));
        group_edits(&script)
    }
}

/// Selectable built-in algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Myers' greedy O((N+M)·D) search. See [`MyersDiff`].
    #[default]
    Myers,
    /// Tabular longest common subsequence. See [`LcsDiff`].
    Lcs,
}

impl DiffAlgorithm for Algorithm {
    fn edit_script(&self, base: &[&str], target: &[&str]) -> Vec<Edit> {
        match self {
            Self::Myers => MyersDiff::new().edit_script(base, target),
            Self::Lcs => LcsDiff::default().edit_script(base, target),
        }
    }
}

/// Lengths of the common prefix and of the common suffix of what remains.
pub(crate) fn common_affixes(base: &[&str], target: &[&str]) -> (usize, usize) {
    let prefix = base
        .iter()
        .zip(target)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = base[prefix..]
        .iter()
        .rev()
        .zip(target[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    (prefix, suffix)
}

/// Groups an edit script into ranges.
///
/// Every maximal run of non-keep steps becomes a single `Delete`, `Insert` or
/// `Replace`, whatever the order of its steps.
pub(crate) fn group_edits(script: &[Edit]) -> Vec<DiffOp> {
    let (mut ops, mut old_at, mut new_at) = (Vec::new(), 0, 0);
    let mut steps = script.iter().peekable();

    while let Some(&step) = steps.peek() {
        let (old_start, new_start) = (old_at, new_at);
        if *step == Edit::Keep {
            while steps.next_if_eq(&&Edit::Keep).is_some() {
                old_at += 1;
                new_at += 1;
            }
            ops.push(DiffOp::Equal {
                old: old_start..old_at,
                new: new_start..new_at,
            });
            continue;
        }

        while let Some(step) = steps.next_if(|s| **s != Edit::Keep) {
            if *step == Edit::Delete {
                old_at += 1;
            } else {
                new_at += 1;
            }
        }
        ops.push(match (old_start == old_at, new_start == new_at) {
            (false, true) => DiffOp::Delete {
                old: old_start..old_at,
            },
            (true, false) => DiffOp::Insert {
                new: new_start..new_at,
            },
            _ => DiffOp::Replace {
                old: old_start..old_at,
                new: new_start..new_at,
            },
        });
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_op_is_change() {
        assert!(!DiffOp::Equal { old: 0..1, new: 0..1 }.is_change());
        assert!(DiffOp::Insert { new: 0..1 }.is_change());
        assert!(DiffOp::Delete { old: 0..1 }.is_change());
        assert!(DiffOp::Replace { old: 0..1, new: 0..1 }.is_change());
    }

    #[test]
    fn test_diff_op_ranges_and_lengths() {
        let delete = DiffOp::Delete { old: 2..4 };
        assert_eq!(delete.old_range(), Some(2..4));
        assert_eq!(delete.new_range(), None);
        assert_eq!(delete.old_len(), 2);
        assert_eq!(delete.new_len(), 0);

        let replace = DiffOp::Replace { old: 0..2, new: 0..3 };
        assert_eq!(replace.old_len(), 2);
        assert_eq!(replace.new_len(), 3);
    }

    #[test]
    fn test_common_affixes_do_not_overlap() {
        assert_eq!(common_affixes(&["a", "a"], &["a"]), (1, 0));
        assert_eq!(common_affixes(&["a", "b", "c"], &["a", "x", "c"]), (1, 1));
        assert_eq!(common_affixes(&[], &["a"]), (0, 0));
    }

    #[test]
    fn test_group_edits_merges_interleaved_changes() {
        let script = [
            Edit::Keep,
            Edit::Insert,
            Edit::Delete,
            Edit::Insert,
            Edit::Keep,
            Edit::Delete,
        ];
        assert_eq!(
            group_edits(&script),
            vec![
                DiffOp::Equal { old: 0..1, new: 0..1 },
                DiffOp::Replace { old: 1..2, new: 1..3 },
                DiffOp::Equal { old: 2..3, new: 3..4 },
                DiffOp::Delete { old: 3..4 },
            ]
        );
    }

    #[test]
    fn test_algorithm_deserializes_lowercase() {
        let parsed: Algorithm = serde_json::from_str("\"lcs\"").unwrap();
        assert_eq!(parsed, Algorithm::Lcs);
        assert_eq!(Algorithm::default(), Algorithm::Myers);
    }
}
