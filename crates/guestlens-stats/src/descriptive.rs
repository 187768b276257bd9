use serde::Serialize;

use crate::percentiles::compute_percentile;

/// Critical z-value for a two-sided 95% confidence interval.
const CI95_Z: f64 = 1.96;

/// Descriptive statistics summarizing a dataset.
///
/// This structure contains common measures of central tendency, dispersion,
/// and spread for a dataset of `f64` values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    /// Number of values in the dataset.
    pub n: usize,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The median value of the dataset (mean of the two middle values for even sizes).
    pub median: f64,
    /// The sample standard deviation (`n - 1` denominator), 0 for a single value.
    pub std_dev: f64,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// `max - min`.
    pub range: f64,
    /// First quartile (floor-indexed P25), or the minimum for fewer than 4 values.
    pub q1: f64,
    /// Third quartile (floor-indexed P75), or the maximum for fewer than 4 values.
    pub q3: f64,
    /// Standard error of the mean, present when the dataset has more than one value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sem: Option<f64>,
    /// Lower bound of the 95% confidence interval of the mean.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci_lower: Option<f64>,
    /// Upper bound of the 95% confidence interval of the mean.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci_upper: Option<f64>,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// This method will sort the values internally before computing statistics.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use guestlens_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use guestlens_stats::descriptive::DescriptiveStats;
    /// let values = [1.0, 2.0, 3.0, 4.0];
    /// let stats = DescriptiveStats::from_sorted(&values).unwrap();
    /// assert_eq!(stats.median, 2.5);
    /// assert_eq!(stats.q1, 2.0);
    /// assert_eq!(stats.q3, 4.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let n = sorted_values.len();
        let mean = sorted_values.iter().sum::<f64>() / n as f64;
        let median = median_of_sorted(sorted_values)?;
        let std_dev = if n > 1 {
            let sum_sq = sorted_values
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>();
            (sum_sq / (n - 1) as f64).sqrt()
        } else {
            0.0
        };
        let (q1, q3) = if n >= 4 {
            (
                compute_percentile(sorted_values, 25.0),
                compute_percentile(sorted_values, 75.0),
            )
        } else {
            (min, max)
        };
        let sem = (n > 1).then(|| std_dev / (n as f64).sqrt());

        Some(Self {
            n,
            mean,
            median,
            std_dev,
            min,
            max,
            range: max - min,
            q1,
            q3,
            sem,
            ci_lower: sem.map(|sem| mean - CI95_Z * sem),
            ci_upper: sem.map(|sem| mean + CI95_Z * sem),
        })
    }
}

/// Arithmetic mean of `values`, or `None` when empty.
///
/// ```
/// # use guestlens_stats::descriptive::mean;
/// assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
/// assert_eq!(mean(&[]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of unsorted `values`, or `None` when empty.
///
/// Even-sized datasets use the mean of the two middle values.
///
/// ```
/// # use guestlens_stats::descriptive::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_of_sorted(&sorted)
}

fn median_of_sorted(sorted_values: &[f64]) -> Option<f64> {
    let n = sorted_values.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted_values[mid])
    } else {
        Some(f64::midpoint(sorted_values[mid - 1], sorted_values[mid]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(DescriptiveStats::new(Vec::new()).is_none());
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_single_value_has_no_standard_error() {
        let stats = DescriptiveStats::new([7.0]).unwrap();
        assert_eq!(stats.n, 1);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.q1, 7.0);
        assert_eq!(stats.q3, 7.0);
        assert!(stats.sem.is_none());
        assert!(stats.ci_lower.is_none());
    }

    #[test]
    fn test_sample_standard_deviation() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        // Sum of squared deviations is 32 over 7 degrees of freedom.
        assert!((stats.std_dev - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(stats.range, 7.0);
        let sem = stats.sem.unwrap();
        assert!((stats.ci_upper.unwrap() - (5.0 + 1.96 * sem)).abs() < 1e-12);
    }

    #[test]
    fn test_quartiles_use_floor_index() {
        let values = (1..=10).map(f64::from).collect::<Vec<_>>();
        let stats = DescriptiveStats::from_sorted(&values).unwrap();
        // floor(10 * 0.25) = 2, floor(10 * 0.75) = 7
        assert_eq!(stats.q1, 3.0);
        assert_eq!(stats.q3, 8.0);
    }

    #[test]
    fn test_small_dataset_quartiles_fall_back_to_extremes() {
        let stats = DescriptiveStats::new([3.0, 1.0, 2.0]).unwrap();
        assert_eq!(stats.q1, 1.0);
        assert_eq!(stats.q3, 3.0);
    }

    #[test]
    #[should_panic(expected = "values must be sorted in ascending order")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = DescriptiveStats::from_sorted(&[2.0, 1.0]);
    }
}
