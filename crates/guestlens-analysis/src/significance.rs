//! Significance tests over survey responses.
//!
//! [`crosstab`] cross-tabulates two categorical fields and runs a chi-square
//! test of independence; [`test_proportions`] compares two proportions with a
//! pooled z-test. Both refuse samples below
//! [`MIN_STATISTICAL_SAMPLE`](crate::config::MIN_STATISTICAL_SAMPLE).
//!
//! p-values are approximations; see
//! [`guestlens_stats::significance`] for the step-function semantics.

use std::collections::BTreeMap;

use guestlens_stats::{
    contingency::ContingencyTable,
    significance::{self as stats, SignificanceLevel},
};
use serde::Serialize;

pub use guestlens_stats::significance::TwoProportionZTest as ProportionTest;

use crate::{
    config::MIN_STATISTICAL_SAMPLE,
    error::AnalysisError,
    record::{RawRecord, label},
};

/// Cross-tabulation of two categorical fields with a chi-square test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrosstabResult {
    pub row_variable: String,
    pub col_variable: String,
    pub row_categories: Vec<String>,
    pub col_categories: Vec<String>,
    /// Row-normalized percentages: `table[row][col]`. Every non-empty row
    /// sums to 100.
    pub table: BTreeMap<String, BTreeMap<String, f64>>,
    pub row_totals: BTreeMap<String, usize>,
    pub col_totals: BTreeMap<String, usize>,
    pub grand_total: usize,
    pub chi_square: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
    pub significance: SignificanceLevel,
}

/// Cross-tabulates `row_field` against `col_field`.
///
/// Only responses carrying a non-null value for both fields contribute, and
/// only those count toward the 30-pair floor: a response whose field is
/// present but `null` is dropped rather than tabulated as a category.
/// Values are compared as labels, so `5` and `"5"` fall into the same
/// category.
///
/// ```
/// use guestlens_analysis::significance::crosstab;
/// use serde_json::json;
///
/// let responses = (0..40)
///     .map(|i| {
///         let visit = if i % 2 == 0 { "weekday" } else { "weekend" };
///         json!({ "visit": visit, "channel": "mobile" }).as_object().unwrap().clone()
///     })
///     .collect::<Vec<_>>();
///
/// let result = crosstab(&responses, "visit", "channel").unwrap();
/// assert_eq!(result.grand_total, 40);
/// assert_eq!(result.degrees_of_freedom, 0);
/// assert_eq!(result.table["weekday"]["mobile"], 100.0);
/// ```
pub fn crosstab(
    responses: &[RawRecord],
    row_field: &str,
    col_field: &str,
) -> Result<CrosstabResult, AnalysisError> {
    let pairs = responses
        .iter()
        .filter_map(|response| {
            let row = response.get(row_field).filter(|v| !v.is_null())?;
            let col = response.get(col_field).filter(|v| !v.is_null())?;
            Some((label(row), label(col)))
        })
        .collect::<Vec<_>>();

    if pairs.len() < MIN_STATISTICAL_SAMPLE {
        return Err(AnalysisError::insufficient(
            "crosstab analysis",
            MIN_STATISTICAL_SAMPLE,
            pairs.len(),
        ));
    }

    let contingency = ContingencyTable::from_pairs(pairs);
    let chi_square = contingency.chi_square();
    let degrees_of_freedom = contingency.degrees_of_freedom();
    let p_value = stats::approximate_chi_square_p_value(chi_square, degrees_of_freedom);
    let significance = SignificanceLevel::from_p_value(p_value);
    tracing::debug!(
        row_field,
        col_field,
        chi_square,
        degrees_of_freedom,
        %significance,
        "crosstab computed"
    );

    let rows = contingency.row_labels();
    let cols = contingency.col_labels();
    let table = rows
        .iter()
        .zip(contingency.row_percentages())
        .map(|(row, percentages)| {
            let cells = cols.iter().cloned().zip(percentages).collect::<BTreeMap<_, _>>();
            (row.clone(), cells)
        })
        .collect();
    let row_totals = rows
        .iter()
        .cloned()
        .zip(contingency.row_totals().iter().copied())
        .collect();
    let col_totals = cols
        .iter()
        .cloned()
        .zip(contingency.col_totals().iter().copied())
        .collect();

    Ok(CrosstabResult {
        row_variable: row_field.to_owned(),
        col_variable: col_field.to_owned(),
        row_categories: rows.to_vec(),
        col_categories: cols.to_vec(),
        table,
        row_totals,
        col_totals,
        grand_total: contingency.grand_total(),
        chi_square,
        degrees_of_freedom,
        p_value,
        significance,
    })
}

/// Pooled two-sample z-test comparing proportion `p1` of `n1` with `p2` of `n2`.
///
/// ```
/// use guestlens_analysis::significance::test_proportions;
///
/// let test = test_proportions(200, 0.6, 200, 0.4).unwrap();
/// assert!(test.significance.is_significant());
/// assert!(test_proportions(29, 0.5, 100, 0.5).is_err());
/// ```
pub fn test_proportions(
    n1: usize,
    p1: f64,
    n2: usize,
    p2: f64,
) -> Result<ProportionTest, AnalysisError> {
    let smallest = n1.min(n2);
    if smallest < MIN_STATISTICAL_SAMPLE {
        return Err(AnalysisError::insufficient(
            "proportion test",
            MIN_STATISTICAL_SAMPLE,
            smallest,
        ));
    }
    for value in [p1, p2] {
        if !(0.0..=1.0).contains(&value) {
            return Err(AnalysisError::InvalidProportion { value });
        }
    }
    Ok(stats::two_proportion_z_test(n1, p1, n2, p2))
}
