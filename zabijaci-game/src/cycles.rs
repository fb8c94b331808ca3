//! Cycle decomposition of a target assignment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::state::Player;

/// Number of cycles of each length found in one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleHistogram(BTreeMap<usize, usize>);

impl CycleHistogram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more cycle of `length`.
    pub fn record(&mut self, length: usize) {
        *self.0.entry(length).or_insert(0) += 1;
    }

    /// Cycles of exactly `length`; zero when none were seen.
    #[must_use]
    pub fn get(&self, length: usize) -> usize {
        self.0.get(&length).copied().unwrap_or(0)
    }

    /// `(length, count)` pairs in ascending length order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|(&length, &count)| (length, count))
    }

    /// Number of distinct lengths observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn total_cycles(&self) -> usize {
        self.0.values().sum()
    }

    /// Players covered by the recorded cycles.
    #[must_use]
    pub fn total_players(&self) -> usize {
        self.iter().map(|(length, count)| length * count).sum()
    }
}

impl FromIterator<(usize, usize)> for CycleHistogram {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|&(_, count)| count > 0).collect())
    }
}

/// Outcome of decomposing one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub cycle_count: usize,
    pub histogram: CycleHistogram,
}

/// Decompose `targets` into disjoint cycles, scanning from player 0.
///
/// `targets` must be a permutation of `0..targets.len()`.
#[must_use]
pub fn analyze(targets: &[Player]) -> CycleSummary {
    analyze_from(targets, 0)
}

/// Like [`analyze`], but the scan for unvisited players begins at `start`
/// and wraps around. Cycles are discovered in a different order; the summary
/// is the same.
#[must_use]
pub fn analyze_from(targets: &[Player], start: usize) -> CycleSummary {
    debug_assert!(crate::shuffle::is_permutation(targets));

    let n = targets.len();
    let mut visited = vec![false; n];
    let mut summary = CycleSummary::default();
    if n == 0 {
        return summary;
    }

    let start = start % n;
    for offset in 0..n {
        let first = (start + offset) % n;
        if visited[first] {
            continue;
        }

        visited[first] = true;
        let mut length = 1;
        let mut current = targets[first];
        while !visited[current] {
            visited[current] = true;
            current = targets[current];
            length += 1;
        }

        summary.cycle_count += 1;
        summary.histogram.record(length);
    }

    summary
}
