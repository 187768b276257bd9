/// Boundaries splitting a dataset into equally sized quantile groups.
///
/// For `parts` groups over `n` sorted values, the `k`-th cut point
/// (`k = 1..parts`) is the value at index `floor(n * k / parts)`. The index is
/// computed with integer arithmetic and no interpolation is performed, so the
/// cut points are always observed values and repeated values collapse onto the
/// same boundary.
///
/// # Examples
///
/// ```
/// use guestlens_stats::percentiles::QuantileBoundaries;
///
/// let values = vec![10.0, 20.0, 30.0, 40.0, 50.0];
/// let quintiles = QuantileBoundaries::new(values, 5).unwrap();
///
/// assert_eq!(quintiles.cut_points(), &[20.0, 30.0, 40.0, 50.0]);
/// assert_eq!(quintiles.bucket(10.0), 0);
/// assert_eq!(quintiles.bucket(20.0), 0); // upper bounds are inclusive
/// assert_eq!(quintiles.bucket(25.0), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileBoundaries {
    cut_points: Vec<f64>,
}

impl QuantileBoundaries {
    /// Computes quantile boundaries from unsorted values.
    ///
    /// Returns `None` if `values` is empty or `parts` is zero.
    #[must_use]
    pub fn new<I>(values: I, parts: usize) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, parts)
    }

    /// Computes quantile boundaries from values sorted in ascending order.
    ///
    /// Returns `None` if `sorted_values` is empty or `parts` is zero.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], parts: usize) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );
        if sorted_values.is_empty() || parts == 0 {
            return None;
        }

        let n = sorted_values.len();
        let cut_points = (1..parts)
            .map(|k| sorted_values[quantile_index(n, k, parts)])
            .collect();
        Some(Self { cut_points })
    }

    /// The cut points in ascending order (`parts - 1` values).
    #[must_use]
    pub fn cut_points(&self) -> &[f64] {
        &self.cut_points
    }

    /// Number of groups these boundaries split the data into.
    #[must_use]
    pub fn parts(&self) -> usize {
        self.cut_points.len() + 1
    }

    /// Returns the zero-based group of `value`.
    ///
    /// A value belongs to the first group whose cut point it does not exceed;
    /// values above every cut point fall into the last group (`parts - 1`).
    #[must_use]
    pub fn bucket(&self, value: f64) -> usize {
        self.cut_points
            .iter()
            .position(|&cut| value <= cut)
            .unwrap_or(self.cut_points.len())
    }
}

/// Index of the `k`-th of `parts` quantile cut points in a sorted sequence of
/// length `len`: `floor(len * k / parts)`, clamped to the last element.
///
/// ```
/// # use guestlens_stats::percentiles::quantile_index;
/// assert_eq!(quantile_index(10, 1, 5), 2);
/// assert_eq!(quantile_index(7, 3, 5), 4);
/// ```
#[must_use]
pub fn quantile_index(len: usize, k: usize, parts: usize) -> usize {
    (len * k / parts).min(len.saturating_sub(1))
}

/// Computes a single percentile value from sorted data.
///
/// This function uses the nearest-rank method: for a dataset with n values,
/// the p-th percentile is the value at position `floor(n * p / 100)`.
///
/// # Returns
///
/// The value at the specified percentile. Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use guestlens_stats::percentiles::compute_percentile;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
///
/// assert_eq!(compute_percentile(&values, 50.0), 3.0);
/// assert_eq!(compute_percentile(&values, 25.0), 2.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let idx = ((sorted_values.len() as f64 * percentile) / 100.0) as usize;
    let idx = idx.min(sorted_values.len() - 1);
    sorted_values[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(QuantileBoundaries::new(Vec::new(), 5).is_none());
        assert!(compute_percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn test_zero_parts() {
        assert!(QuantileBoundaries::new([1.0, 2.0], 0).is_none());
    }

    #[test]
    fn test_single_value() {
        let quintiles = QuantileBoundaries::new([42.0], 5).unwrap();
        assert_eq!(quintiles.cut_points(), &[42.0; 4]);
        assert_eq!(quintiles.parts(), 5);
        assert_eq!(quintiles.bucket(42.0), 0);
        assert_eq!(quintiles.bucket(43.0), 4);
    }

    #[test]
    fn test_all_same_value_collapses_boundaries() {
        let quintiles = QuantileBoundaries::new(vec![7.0; 100], 5).unwrap();
        assert!(quintiles.cut_points().iter().all(|&cut| cut == 7.0));
        assert_eq!(quintiles.bucket(7.0), 0);
    }

    #[test]
    fn test_ties_cluster_on_boundary() {
        // Half of the population shares the lowest value.
        let mut values = vec![1.0; 50];
        values.extend((51..=100).map(f64::from));
        let quintiles = QuantileBoundaries::new(values, 5).unwrap();
        // Indices 20 and 40 land inside the tie cluster.
        assert_eq!(quintiles.cut_points()[0], 1.0);
        assert_eq!(quintiles.cut_points()[1], 1.0);
        assert_eq!(quintiles.cut_points()[2], 61.0);
        assert_eq!(quintiles.cut_points()[3], 81.0);
        assert_eq!(quintiles.bucket(1.0), 0);
        assert_eq!(quintiles.bucket(55.0), 2);
    }

    #[test]
    fn test_index_uses_integer_floor() {
        for len in 1..200 {
            for k in 1..5 {
                let idx = quantile_index(len, k, 5);
                assert!(idx < len);
                assert_eq!(idx, len * k / 5);
            }
        }
    }

    #[test]
    fn test_bucket_is_monotonic() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0, 5.0];
        let quintiles = QuantileBoundaries::new(values, 5).unwrap();
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        for pair in sorted.windows(2) {
            assert!(quintiles.bucket(pair[0]) <= quintiles.bucket(pair[1]));
        }
    }
}
