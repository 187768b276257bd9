//! Categorical frequency distributions.
//!
//! A [`FrequencyTable`] counts occurrences of string labels. Labels are kept
//! in lexicographic order, which makes every derived value (including the
//! mode under ties) independent of input order.
//!
//! # Examples
//!
//! ```
//! use guestlens_stats::frequency::FrequencyTable;
//!
//! let table = FrequencyTable::new(["lunch", "dinner", "lunch", "breakfast"]);
//! assert_eq!(table.total(), 4);
//! assert_eq!(table.count("lunch"), 2);
//! assert_eq!(table.mode(), Some("lunch"));
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

/// Count and share of a single category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryShare {
    /// Number of occurrences.
    pub count: usize,
    /// Occurrences as a percentage (0-100) of the table total.
    pub percentage: f64,
}

/// Occurrence counts for categorical labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl FrequencyTable {
    /// Builds a table by counting every label yielded by `labels`.
    #[must_use]
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for label in labels {
            table.insert(label);
        }
        table
    }

    /// Records one occurrence of `label`.
    pub fn insert<S>(&mut self, label: S)
    where
        S: Into<String>,
    {
        *self.counts.entry(label.into()).or_default() += 1;
        self.total += 1;
    }

    /// Total number of recorded occurrences.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Occurrences of `label` (0 if never seen).
    #[must_use]
    pub fn count(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Iterates `(label, count)` pairs in lexicographic label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
    }

    /// The most frequent label.
    ///
    /// When several labels share the highest count, the lexicographically
    /// smallest one is returned. Returns `None` for an empty table.
    ///
    /// ```
    /// # use guestlens_stats::frequency::FrequencyTable;
    /// let table = FrequencyTable::new(["mobile", "drive_thru", "mobile", "drive_thru"]);
    /// assert_eq!(table.mode(), Some("drive_thru"));
    /// ```
    #[must_use]
    pub fn mode(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (label, count) in self.iter() {
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((label, count)),
            }
        }
        best.map(|(label, _)| label)
    }

    /// Count and percentage of every label.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn shares(&self) -> BTreeMap<String, CategoryShare> {
        self.counts
            .iter()
            .map(|(label, &count)| {
                let percentage = if self.total == 0 {
                    0.0
                } else {
                    count as f64 / self.total as f64 * 100.0
                };
                (label.clone(), CategoryShare { count, percentage })
            })
            .collect()
    }
}
