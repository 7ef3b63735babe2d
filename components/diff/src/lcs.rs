//! Tabular longest-common-subsequence diff.
//!
//! Fills a suffix table bottom-up (no recursion) and then walks it forward
//! from the start, taking a match whenever the two heads are equal. Taking
//! the earliest match is always optimal for LCS, and walking forward keeps
//! changed runs contiguous.

use tracing::debug;

use crate::myers::MyersDiff;
use crate::ops::{DiffAlgorithm, Edit};

/// Default upper bound on table cells before deferring to [`MyersDiff`].
pub const DEFAULT_MAX_CELLS: usize = 16 * 1024 * 1024;

/// Classic dynamic-programming LCS diff.
///
/// Time and memory are O(N·M). Inputs whose table would exceed `max_cells`
/// are handed to [`MyersDiff`] instead.
#[derive(Debug, Clone, Copy)]
pub struct LcsDiff {
    max_cells: usize,
}

impl Default for LcsDiff {
    fn default() -> Self {
        Self {
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl LcsDiff {
    /// Creates an LCS diff with a custom table size limit.
    #[must_use]
    pub const fn with_max_cells(max_cells: usize) -> Self {
        Self { max_cells }
    }

    /// The table size limit.
    #[must_use]
    pub const fn max_cells(&self) -> usize {
        self.max_cells
    }
}

impl DiffAlgorithm for LcsDiff {
    fn edit_script(&self, base: &[&str], target: &[&str]) -> Vec<Edit> {
        let (n, m) = (base.len(), target.len());
        if n == 0 {
            return vec![Edit::Insert; m];
        }
        if m == 0 {
            return vec![Edit::Delete; n];
        }

        let cells = (n + 1).saturating_mul(m + 1);
        if cells > self.max_cells {
            debug!(
                cells,
                max_cells = self.max_cells,
                "LCS table too large, using Myers"
            );
            return MyersDiff::new().edit_script(base, target);
        }

        // table[i * width + j] = LCS length of base[i..] and target[j..]
        let width = m + 1;
        let mut table = vec![0_u32; cells];
        for i in (0..n).rev() {
            for j in (0..m).rev() {
                table[i * width + j] = if base[i] == target[j] {
                    table[(i + 1) * width + j + 1] + 1
                } else {
                    table[(i + 1) * width + j].max(table[i * width + j + 1])
                };
            }
        }

        let mut edits = Vec::with_capacity(n + m);
        let (mut i, mut j) = (0, 0);
        while i < n && j < m {
            if base[i] == target[j] {
                edits.push(Edit::Keep);
                i += 1;
                j += 1;
            } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
                edits.push(Edit::Delete);
                i += 1;
            } else {
                edits.push(Edit::Insert);
                j += 1;
            }
        }
        edits.extend(std::iter::repeat_n(Edit::Delete, n - i));
        edits.extend(std::iter::repeat_n(Edit::Insert, m - j));
        edits
    }
}
