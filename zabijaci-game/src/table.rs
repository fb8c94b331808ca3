//! Dense per-game cycle table.
//!
//! Trials produce sparse rows (only the cycle lengths actually seen). The
//! table densifies them once, after all trials are in, into a fixed column
//! set: `cycles_count` followed by `cycle_1 ..= cycle_n` in numeric order.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::constants::{CYCLE_COLUMN_PREFIX, CYCLES_COUNT_COLUMN};
use crate::cycles::CycleSummary;

/// Column name for cycles of `length`.
#[must_use]
pub fn cycle_column_name(length: usize) -> String {
    format!("{CYCLE_COLUMN_PREFIX}{length}")
}

/// One game's cycle counts, keyed by cycle length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseRow {
    pub cycles_count: u64,
    pub counts: BTreeMap<usize, u64>,
}

impl From<&CycleSummary> for SparseRow {
    fn from(summary: &CycleSummary) -> Self {
        Self {
            cycles_count: summary.cycle_count as u64,
            counts: summary
                .histogram
                .iter()
                .map(|(length, count)| (length, count as u64))
                .collect(),
        }
    }
}

/// Immutable table with one row per game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleTable {
    players: usize,
    columns: Vec<String>,
    #[serde(skip)]
    lengths: Vec<usize>,
    rows: Vec<Vec<u64>>,
}

impl CycleTable {
    /// Densify `rows` for a game of `players` participants.
    ///
    /// Every length in `1..=players` gets a column even if no game produced
    /// it. Missing cells are zero.
    pub fn from_sparse_rows<I>(players: usize, rows: I) -> Self
    where
        I: IntoIterator<Item = SparseRow>,
    {
        let sparse: Vec<SparseRow> = rows.into_iter().collect();

        let mut length_set: BTreeSet<usize> = (1..=players).collect();
        for row in &sparse {
            length_set.extend(row.counts.keys().copied());
        }
        let lengths: Vec<usize> = length_set.into_iter().collect();

        let mut columns = Vec::with_capacity(lengths.len() + 1);
        columns.push(CYCLES_COUNT_COLUMN.to_string());
        columns.extend(lengths.iter().map(|&length| cycle_column_name(length)));

        let rows = sparse
            .iter()
            .map(|row| {
                let mut dense = Vec::with_capacity(columns.len());
                dense.push(row.cycles_count);
                dense.extend(
                    lengths
                        .iter()
                        .map(|length| row.counts.get(length).copied().unwrap_or(0)),
                );
                dense
            })
            .collect();

        Self {
            players,
            columns,
            lengths,
            rows,
        }
    }

    #[must_use]
    pub fn players(&self) -> usize {
        self.players
    }

    /// `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cycle length of each `cycle_*` column, ascending.
    #[must_use]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    /// First `count` rows (fewer if the table is shorter).
    #[must_use]
    pub fn head(&self, count: usize) -> &[Vec<u64>] {
        &self.rows[..count.min(self.rows.len())]
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Values of column `name`, top to bottom.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<u64>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[index]).collect())
    }

    /// Sum of every column, in column order.
    #[must_use]
    pub fn column_sums(&self) -> Vec<u64> {
        let mut sums = vec![0u64; self.columns.len()];
        for row in &self.rows {
            for (sum, value) in sums.iter_mut().zip(row) {
                *sum += value;
            }
        }
        sums
    }

    /// Mean of every column, in column order. Empty tables yield zeros.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn column_means(&self) -> Vec<f64> {
        if self.rows.is_empty() {
            return vec![0.0; self.columns.len()];
        }
        let count = self.rows.len() as f64;
        self.column_sums()
            .into_iter()
            .map(|sum| sum as f64 / count)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycles::analyze;

    fn sparse(cycles_count: u64, counts: &[(usize, u64)]) -> SparseRow {
        SparseRow {
            cycles_count,
            counts: counts.iter().copied().collect(),
        }
    }

    #[test]
    fn densify_fills_every_length_with_zero() {
        let table = CycleTable::from_sparse_rows(4, [sparse(2, &[(2, 2)]), sparse(1, &[(4, 1)])]);
        assert_eq!(
            table.columns(),
            &["cycles_count", "cycle_1", "cycle_2", "cycle_3", "cycle_4"]
        );
        assert_eq!(table.rows(), &[vec![2, 0, 2, 0, 0], vec![1, 0, 0, 0, 1]]);
        assert_eq!(table.shape(), (2, 5));
        assert_eq!(table.lengths(), &[1, 2, 3, 4]);
    }

    #[test]
    fn columns_sort_numerically_not_lexically() {
        let table = CycleTable::from_sparse_rows(12, [sparse(1, &[(12, 1)])]);
        let names = table.columns();
        assert_eq!(names[0], "cycles_count");
        assert_eq!(names[2], "cycle_2");
        assert_eq!(names[10], "cycle_10");
        assert_eq!(names[12], "cycle_12");
    }

    #[test]
    fn unexpected_lengths_still_get_columns() {
        let table = CycleTable::from_sparse_rows(2, [sparse(1, &[(3, 1)])]);
        assert_eq!(
            table.columns(),
            &["cycles_count", "cycle_1", "cycle_2", "cycle_3"]
        );
        assert_eq!(table.rows(), &[vec![1, 0, 0, 1]]);
    }

    #[test]
    fn empty_table_keeps_column_set() {
        let table = CycleTable::from_sparse_rows(3, Vec::new());
        assert_eq!(table.shape(), (0, 4));
        assert!(table.is_empty());
        assert_eq!(table.column_sums(), vec![0, 0, 0, 0]);
        assert_eq!(table.column_means(), vec![0.0; 4]);
    }

    #[test]
    fn column_lookup_and_reductions() {
        let rows = [analyze(&[1, 0, 3, 2]), analyze(&[1, 2, 3, 0])];
        let table = CycleTable::from_sparse_rows(4, rows.iter().map(SparseRow::from));
        assert_eq!(table.column("cycles_count"), Some(vec![2, 1]));
        assert_eq!(table.column("cycle_2"), Some(vec![2, 0]));
        assert_eq!(table.column("cycle_9"), None);
        assert_eq!(table.column_sums(), vec![3, 0, 2, 0, 1]);
        assert_eq!(table.column_means(), vec![1.5, 0.0, 1.0, 0.0, 0.5]);
    }

    #[test]
    fn head_clamps_to_table_length() {
        let table = CycleTable::from_sparse_rows(2, [sparse(1, &[(2, 1)]), sparse(1, &[(2, 1)])]);
        assert_eq!(table.head(1).len(), 1);
        assert_eq!(table.head(10).len(), 2);
        assert_eq!(table.head(0).len(), 0);
    }

    #[test]
    fn serializes_columns_and_rows() {
        let table = CycleTable::from_sparse_rows(2, [sparse(1, &[(2, 1)])]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["players"], 2);
        assert_eq!(json["columns"][0], "cycles_count");
        assert_eq!(json["rows"][0], serde_json::json!([1, 0, 1]));
        assert!(json.get("lengths").is_none());
    }
}
