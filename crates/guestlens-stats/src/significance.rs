//! Significance tiers and hypothesis tests.
//!
//! # Approximate p-values
//!
//! The chi-square p-value produced here is a **step function** over a small
//! table of critical values, not a tail-probability computation. The p-value
//! starts at 0.5 and drops to 0.05, 0.01 and 0.001 as the statistic crosses
//! each critical value for its degrees of freedom. df = 1 and df = 2 use the
//! textbook constants; df ≥ 3 uses the linear approximation `1.5·df`, `2·df`,
//! `3·df`. Results are coarse and deterministic: replacing this with an exact
//! chi-square survival function changes test outcomes.
//!
//! Mapping a step p-value to a [`SignificanceLevel`] uses strict `<`
//! comparisons, so a statistic that only crosses the first critical value
//! (p = 0.05) is reported as [`SignificanceLevel::Marginal`].
//!
//! # Examples
//!
//! ```
//! use guestlens_stats::significance::{SignificanceLevel, approximate_chi_square_p_value};
//!
//! assert_eq!(approximate_chi_square_p_value(2.0, 1), 0.5);
//! assert_eq!(approximate_chi_square_p_value(7.0, 1), 0.01);
//! assert_eq!(SignificanceLevel::from_p_value(0.01), SignificanceLevel::Significant);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// p-value reported when no critical value has been crossed.
pub const BASELINE_P_VALUE: f64 = 0.5;

/// Critical z-values (two-sided) for the marginal, significant and highly
/// significant tiers.
pub const Z_CRITICAL_MARGINAL: f64 = 1.645;
pub const Z_CRITICAL_SIGNIFICANT: f64 = 1.96;
pub const Z_CRITICAL_HIGHLY_SIGNIFICANT: f64 = 2.58;

const CHI_SQUARE_DF1: [(f64, f64); 3] = [(3.84, 0.05), (6.63, 0.01), (10.83, 0.001)];
const CHI_SQUARE_DF2: [(f64, f64); 3] = [(5.99, 0.05), (9.21, 0.01), (13.82, 0.001)];

/// Four-tier classification of a test outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignificanceLevel {
    /// p < 0.01
    HighlySignificant,
    /// p < 0.05
    Significant,
    /// p < 0.10
    Marginal,
    NotSignificant,
}

impl fmt::Display for SignificanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl SignificanceLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SignificanceLevel::HighlySignificant => "highly_significant",
            SignificanceLevel::Significant => "significant",
            SignificanceLevel::Marginal => "marginal",
            SignificanceLevel::NotSignificant => "not_significant",
        }
    }

    /// Tier for a p-value using strict thresholds 0.01, 0.05 and 0.10.
    #[must_use]
    pub fn from_p_value(p_value: f64) -> Self {
        if p_value < 0.01 {
            SignificanceLevel::HighlySignificant
        } else if p_value < 0.05 {
            SignificanceLevel::Significant
        } else if p_value < 0.10 {
            SignificanceLevel::Marginal
        } else {
            SignificanceLevel::NotSignificant
        }
    }

    #[must_use]
    pub fn is_significant(self) -> bool {
        matches!(
            self,
            SignificanceLevel::HighlySignificant | SignificanceLevel::Significant
        )
    }
}

/// `(critical value, p-value)` pairs for `df`, in ascending critical value order.
///
/// Returns an empty list for df = 0, where no association can be measured.
///
/// ```
/// # use guestlens_stats::significance::chi_square_critical_values;
/// assert_eq!(chi_square_critical_values(4), vec![(6.0, 0.05), (8.0, 0.01), (12.0, 0.001)]);
/// assert!(chi_square_critical_values(0).is_empty());
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn chi_square_critical_values(df: usize) -> Vec<(f64, f64)> {
    match df {
        0 => vec![],
        1 => CHI_SQUARE_DF1.to_vec(),
        2 => CHI_SQUARE_DF2.to_vec(),
        _ => {
            let df = df as f64;
            vec![(df * 1.5, 0.05), (df * 2.0, 0.01), (df * 3.0, 0.001)]
        }
    }
}

/// Approximate p-value of a chi-square statistic via the critical-value step function.
#[must_use]
pub fn approximate_chi_square_p_value(chi_square: f64, df: usize) -> f64 {
    chi_square_critical_values(df)
        .into_iter()
        .filter(|&(critical, _)| chi_square >= critical)
        .map(|(_, p_value)| p_value)
        .last()
        .unwrap_or(BASELINE_P_VALUE)
}

/// Maps `|z|` to a step p-value and tier using the fixed critical z-values.
///
/// ```
/// # use guestlens_stats::significance::{SignificanceLevel, z_tier};
/// assert_eq!(z_tier(-2.0), (0.05, SignificanceLevel::Significant));
/// assert_eq!(z_tier(1.0), (0.5, SignificanceLevel::NotSignificant));
/// ```
#[must_use]
pub fn z_tier(z: f64) -> (f64, SignificanceLevel) {
    let abs_z = z.abs();
    if abs_z >= Z_CRITICAL_HIGHLY_SIGNIFICANT {
        (0.01, SignificanceLevel::HighlySignificant)
    } else if abs_z >= Z_CRITICAL_SIGNIFICANT {
        (0.05, SignificanceLevel::Significant)
    } else if abs_z >= Z_CRITICAL_MARGINAL {
        (0.10, SignificanceLevel::Marginal)
    } else {
        (BASELINE_P_VALUE, SignificanceLevel::NotSignificant)
    }
}

/// Outcome of a pooled two-sample z-test for proportions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TwoProportionZTest {
    pub pooled_proportion: f64,
    pub standard_error: f64,
    pub z: f64,
    pub p_value: f64,
    pub significance: SignificanceLevel,
}

/// Pooled two-sample z-test comparing proportion `p1` of `n1` trials with `p2` of `n2`.
///
/// A zero standard error (for example both proportions at 0 or 1) yields
/// `z = 0`, `p = 1` and [`SignificanceLevel::NotSignificant`].
///
/// Sample-size preconditions are the caller's responsibility.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn two_proportion_z_test(n1: usize, p1: f64, n2: usize, p2: f64) -> TwoProportionZTest {
    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let pooled_proportion = (n1f * p1 + n2f * p2) / (n1f + n2f);
    let standard_error =
        (pooled_proportion * (1.0 - pooled_proportion) * (1.0 / n1f + 1.0 / n2f)).sqrt();

    if standard_error == 0.0 {
        return TwoProportionZTest {
            pooled_proportion,
            standard_error,
            z: 0.0,
            p_value: 1.0,
            significance: SignificanceLevel::NotSignificant,
        };
    }

    let z = (p1 - p2) / standard_error;
    let (p_value, significance) = z_tier(z);
    TwoProportionZTest {
        pooled_proportion,
        standard_error,
        z,
        p_value,
        significance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds_are_strict() {
        assert_eq!(
            SignificanceLevel::from_p_value(0.001),
            SignificanceLevel::HighlySignificant
        );
        assert_eq!(
            SignificanceLevel::from_p_value(0.01),
            SignificanceLevel::Significant
        );
        assert_eq!(
            SignificanceLevel::from_p_value(0.05),
            SignificanceLevel::Marginal
        );
        assert_eq!(
            SignificanceLevel::from_p_value(0.10),
            SignificanceLevel::NotSignificant
        );
        assert_eq!(
            SignificanceLevel::from_p_value(0.5),
            SignificanceLevel::NotSignificant
        );
    }

    #[test]
    fn test_df1_step_function() {
        assert_eq!(approximate_chi_square_p_value(3.83, 1), 0.5);
        assert_eq!(approximate_chi_square_p_value(3.84, 1), 0.05);
        assert_eq!(approximate_chi_square_p_value(6.63, 1), 0.01);
        assert_eq!(approximate_chi_square_p_value(10.83, 1), 0.001);
        assert_eq!(approximate_chi_square_p_value(500.0, 1), 0.001);
    }

    #[test]
    fn test_df2_step_function() {
        assert_eq!(approximate_chi_square_p_value(5.98, 2), 0.5);
        assert_eq!(approximate_chi_square_p_value(5.99, 2), 0.05);
        assert_eq!(approximate_chi_square_p_value(9.21, 2), 0.01);
        assert_eq!(approximate_chi_square_p_value(13.82, 2), 0.001);
    }

    #[test]
    fn test_linear_approximation_for_higher_df() {
        // df = 6: critical values 9, 12, 18
        assert_eq!(approximate_chi_square_p_value(8.99, 6), 0.5);
        assert_eq!(approximate_chi_square_p_value(9.0, 6), 0.05);
        assert_eq!(approximate_chi_square_p_value(12.0, 6), 0.01);
        assert_eq!(approximate_chi_square_p_value(18.0, 6), 0.001);
    }

    #[test]
    fn test_zero_df_stays_at_baseline() {
        assert_eq!(approximate_chi_square_p_value(0.0, 0), BASELINE_P_VALUE);
    }

    #[test]
    fn test_z_test_equal_proportions() {
        let test = two_proportion_z_test(100, 0.5, 100, 0.5);
        assert_eq!(test.z, 0.0);
        assert_eq!(test.p_value, 0.5);
        assert_eq!(test.significance, SignificanceLevel::NotSignificant);
    }

    #[test]
    fn test_z_test_zero_standard_error() {
        let test = two_proportion_z_test(50, 1.0, 80, 1.0);
        assert_eq!(test.standard_error, 0.0);
        assert_eq!(test.z, 0.0);
        assert_eq!(test.p_value, 1.0);
        assert_eq!(test.significance, SignificanceLevel::NotSignificant);
    }

    #[test]
    fn test_z_test_large_difference() {
        let test = two_proportion_z_test(200, 0.6, 200, 0.4);
        // pooled 0.5, se = sqrt(0.25 * 0.01) = 0.05, z = 4
        assert!((test.z - 4.0).abs() < 1e-9);
        assert_eq!(test.p_value, 0.01);
        assert_eq!(test.significance, SignificanceLevel::HighlySignificant);
    }

    #[test]
    fn test_z_tier_is_symmetric() {
        assert_eq!(z_tier(1.7), z_tier(-1.7));
        assert_eq!(z_tier(1.7).1, SignificanceLevel::Marginal);
    }

    #[test]
    fn test_display_matches_serde() {
        let json = serde_json::to_string(&SignificanceLevel::HighlySignificant).unwrap();
        assert_eq!(json, format!("\"{}\"", SignificanceLevel::HighlySignificant));
    }
}
