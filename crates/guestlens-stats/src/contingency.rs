//! Two-way contingency tables.
//!
//! Category sets are derived from the observed pairs (sorted
//! lexicographically), never predeclared, so every row and column of a
//! [`ContingencyTable`] has at least one observation.
//!
//! # Examples
//!
//! ```
//! use guestlens_stats::contingency::ContingencyTable;
//!
//! let pairs = [("a", "x"), ("a", "y"), ("b", "x"), ("b", "x")];
//! let table = ContingencyTable::from_pairs(pairs);
//!
//! assert_eq!(table.row_labels(), &["a", "b"]);
//! assert_eq!(table.count(1, 0), 2);
//! assert_eq!(table.grand_total(), 4);
//! assert_eq!(table.degrees_of_freedom(), 1);
//! ```

use std::collections::BTreeMap;

/// Observed co-occurrence counts of two categorical variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContingencyTable {
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    counts: Vec<Vec<usize>>,
    row_totals: Vec<usize>,
    col_totals: Vec<usize>,
    grand_total: usize,
}

impl ContingencyTable {
    /// Builds a table from `(row, column)` observations.
    #[must_use]
    pub fn from_pairs<I, R, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, C)>,
        R: Into<String>,
        C: Into<String>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(r, c)| (r.into(), c.into()))
            .collect::<Vec<(String, String)>>();

        let row_index = index_labels(pairs.iter().map(|(r, _)| r));
        let col_index = index_labels(pairs.iter().map(|(_, c)| c));

        let mut counts = vec![vec![0; col_index.len()]; row_index.len()];
        for (r, c) in &pairs {
            counts[row_index[r]][col_index[c]] += 1;
        }

        let row_totals = counts
            .iter()
            .map(|row| row.iter().sum::<usize>())
            .collect::<Vec<_>>();
        let col_totals = (0..col_index.len())
            .map(|c| counts.iter().map(|row| row[c]).sum::<usize>())
            .collect::<Vec<_>>();

        Self {
            row_labels: row_index.into_keys().collect(),
            col_labels: col_index.into_keys().collect(),
            counts,
            row_totals,
            col_totals,
            grand_total: pairs.len(),
        }
    }

    #[must_use]
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    #[must_use]
    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    /// Observed count at (`row`, `col`).
    #[must_use]
    pub fn count(&self, row: usize, col: usize) -> usize {
        self.counts[row][col]
    }

    #[must_use]
    pub fn row_totals(&self) -> &[usize] {
        &self.row_totals
    }

    #[must_use]
    pub fn col_totals(&self) -> &[usize] {
        &self.col_totals
    }

    #[must_use]
    pub fn grand_total(&self) -> usize {
        self.grand_total
    }

    /// Expected count at (`row`, `col`) under independence:
    /// `row_total * col_total / grand_total` (0 for an empty table).
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn expected(&self, row: usize, col: usize) -> f64 {
        if self.grand_total == 0 {
            return 0.0;
        }
        (self.row_totals[row] * self.col_totals[col]) as f64 / self.grand_total as f64
    }

    /// Pearson's chi-square statistic, `Σ (observed - expected)² / expected`.
    ///
    /// Cells whose expected count is zero are skipped.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn chi_square(&self) -> f64 {
        let mut chi_square = 0.0;
        for (r, row) in self.counts.iter().enumerate() {
            for (c, &observed) in row.iter().enumerate() {
                let expected = self.expected(r, c);
                if expected > 0.0 {
                    chi_square += (observed as f64 - expected).powi(2) / expected;
                }
            }
        }
        chi_square
    }

    /// `(rows - 1) * (cols - 1)`, saturating at zero.
    #[must_use]
    pub fn degrees_of_freedom(&self) -> usize {
        self.row_labels.len().saturating_sub(1) * self.col_labels.len().saturating_sub(1)
    }

    /// Each cell as a percentage of its row total; rows with a zero total are all 0.
    ///
    /// ```
    /// # use guestlens_stats::contingency::ContingencyTable;
    /// let table = ContingencyTable::from_pairs([("a", "x"), ("a", "y"), ("a", "y"), ("a", "y")]);
    /// assert_eq!(table.row_percentages(), vec![vec![25.0, 75.0]]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn row_percentages(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .zip(&self.row_totals)
            .map(|(row, &total)| {
                row.iter()
                    .map(|&count| {
                        if total == 0 {
                            0.0
                        } else {
                            count as f64 / total as f64 * 100.0
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

fn index_labels<'a, I>(labels: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut index = labels
        .into_iter()
        .map(|label| (label.clone(), 0))
        .collect::<BTreeMap<_, _>>();
    for (i, slot) in index.values_mut().enumerate() {
        *slot = i;
    }
    index
}
