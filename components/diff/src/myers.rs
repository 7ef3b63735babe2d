//! Myers diff algorithm implementation.
//!
//! Myers' algorithm finds the shortest edit script in O((N+M)·D) time, where
//! D is the number of differences, so it is fast on the near-identical texts
//! a rewrite usually produces. Each round extends the furthest-reaching path
//! on every diagonal greedily, which matches common tokens as early as
//! possible.
//!
//! The search is iterative. Only the diagonals a round actually reaches are
//! kept for backtracking, so the trace holds about D²/2 entries. The search
//! stops after `max_cost` rounds and the inputs are then reported as
//! replaced wholesale, which bounds both time and memory.

#![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]

use tracing::debug;

use crate::ops::{DiffAlgorithm, Edit};

/// Default limit on the edit distance searched by [`MyersDiff`].
///
/// The trace then stays below roughly 17 MB.
pub const DEFAULT_MAX_COST: usize = 2048;

/// Myers diff algorithm.
///
/// Described by Eugene Myers in "An O(ND) Difference Algorithm and Its
/// Variations" (1986).
#[derive(Debug, Clone, Copy)]
pub struct MyersDiff {
    max_cost: usize,
}

impl Default for MyersDiff {
    fn default() -> Self {
        Self::new()
    }
}

impl MyersDiff {
    /// Creates a Myers diff with the default cost limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_cost: DEFAULT_MAX_COST,
        }
    }

    /// Creates a Myers diff that gives up once more than `max_cost` edits
    /// would be needed.
    #[must_use]
    pub const fn with_max_cost(max_cost: usize) -> Self {
        Self { max_cost }
    }

    /// The cost limit.
    #[must_use]
    pub const fn max_cost(&self) -> usize {
        self.max_cost
    }
}

impl DiffAlgorithm for MyersDiff {
    fn edit_script(&self, base: &[&str], target: &[&str]) -> Vec<Edit> {
        if base.is_empty() {
            return vec![Edit::Insert; target.len()];
        }
        if target.is_empty() {
            return vec![Edit::Delete; base.len()];
        }
        if let Some(trace) = search(base, target, self.max_cost) {
            return backtrack(&trace, base.len(), target.len());
        }

        debug!(
            old_tokens = base.len(),
            new_tokens = target.len(),
            max_cost = self.max_cost,
            "edit distance over limit, replacing wholesale"
        );
        let mut edits = vec![Edit::Delete; base.len()];
        edits.resize(base.len() + target.len(), Edit::Insert);
        edits
    }
}

/// Runs the forward search, or returns `None` when the edit distance
/// exceeds `max_cost`.
///
/// Entry `d` of the result holds the furthest x reached on diagonals
/// `-d, -d + 2, ..., d` after round `d`, stored at index `(k + d) / 2`.
fn search(base: &[&str], target: &[&str], max_cost: usize) -> Option<Vec<Vec<isize>>> {
    let (n, m) = (base.len() as isize, target.len() as isize);
    let max_d = (n + m).min(isize::try_from(max_cost).unwrap_or(isize::MAX));
    let offset = max_d + 1;
    let mut v = vec![0_isize; (2 * max_d + 3) as usize];
    let mut trace = Vec::new();

    for d in 0..=max_d {
        for k in (-d..=d).step_by(2) {
            let at = (k + offset) as usize;
            let mut x = if k == -d || (k != d && v[at - 1] < v[at + 1]) {
                v[at + 1]
            } else {
                v[at - 1] + 1
            };
            let mut y = x - k;
            while x < n && y < m && base[x as usize] == target[y as usize] {
                x += 1;
                y += 1;
            }
            v[at] = x;

            if x >= n && y >= m {
                trace.push(reached(&v, offset, d));
                return Some(trace);
            }
        }
        trace.push(reached(&v, offset, d));
    }

    None
}

/// The entries of `v` on the diagonals of round `d`.
fn reached(v: &[isize], offset: isize, d: isize) -> Vec<isize> {
    (-d..=d)
        .step_by(2)
        .map(|k| v[(k + offset) as usize])
        .collect()
}

/// Walks the trace from the end point back to the origin.
fn backtrack(trace: &[Vec<isize>], n: usize, m: usize) -> Vec<Edit> {
    let (mut x, mut y) = (n as isize, m as isize);
    let mut edits = Vec::with_capacity(n + m);

    for d in (1..trace.len()).rev() {
        let previous = &trace[d - 1];
        let d = d as isize;
        let reach = |k: isize| previous[((k + d - 1) / 2) as usize];

        let k = x - y;
        let prev_k = if k == -d || (k != d && reach(k - 1) < reach(k + 1)) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = reach(prev_k);
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            edits.push(Edit::Keep);
            x -= 1;
            y -= 1;
        }
        edits.push(if x == prev_x {
            Edit::Insert
        } else {
            Edit::Delete
        });
        x = prev_x;
        y = prev_y;
    }

    while x > 0 && y > 0 {
        edits.push(Edit::Keep);
        x -= 1;
        y -= 1;
    }

    edits.reverse();
    edits
}
