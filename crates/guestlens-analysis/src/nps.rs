//! Net Promoter Score.
//!
//! Scores on the 0-10 scale are classified as promoters (9-10), passives
//! (7-8) and detractors (0-6). NPS is the promoter percentage minus the
//! detractor percentage, so it ranges from -100 to 100. It is computed from
//! the raw counts so that exact band boundaries are not lost to rounding.
//!
//! ```
//! use guestlens_analysis::nps::{NpsBand, analyze_nps};
//! use serde_json::json;
//!
//! let responses = [9, 9, 9, 9, 9, 2, 2, 2, 2, 2]
//!     .map(|score| json!({ "nps": score }).as_object().unwrap().clone());
//! let result = analyze_nps(&responses, "nps").unwrap();
//! assert_eq!(result.nps_score, 0.0);
//! assert_eq!(result.interpretation, NpsBand::NeedsImprovement);
//! ```

use std::fmt;

use serde::{Serialize, Serializer};

use crate::{
    error::AnalysisError,
    record::{RawRecord, parse_integer},
};

pub const PROMOTER_MIN: i64 = 9;
pub const PASSIVE_MIN: i64 = 7;
const SCALE_MAX: i64 = 10;

/// Qualitative reading of an NPS value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NpsBand {
    /// NPS >= 70
    Excellent,
    /// NPS >= 50
    Great,
    /// NPS >= 30
    Good,
    /// NPS >= 0
    NeedsImprovement,
    Critical,
}

impl NpsBand {
    #[must_use]
    pub fn from_score(nps: f64) -> Self {
        if nps >= 70.0 {
            NpsBand::Excellent
        } else if nps >= 50.0 {
            NpsBand::Great
        } else if nps >= 30.0 {
            NpsBand::Good
        } else if nps >= 0.0 {
            NpsBand::NeedsImprovement
        } else {
            NpsBand::Critical
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            NpsBand::Excellent => "Excellent - World-class customer loyalty",
            NpsBand::Great => "Great - Strong customer loyalty",
            NpsBand::Good => "Good - More promoters than detractors",
            NpsBand::NeedsImprovement => "Needs improvement - Balanced but room to grow",
            NpsBand::Critical => "Critical - More detractors than promoters",
        }
    }
}

impl fmt::Display for NpsBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.description(), f)
    }
}

impl Serialize for NpsBand {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.description())
    }
}

/// Size of one NPS category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NpsGroup {
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NpsResult {
    pub nps_score: f64,
    pub promoters: NpsGroup,
    pub passives: NpsGroup,
    pub detractors: NpsGroup,
    pub total_responses: usize,
    pub average_score: f64,
    pub interpretation: NpsBand,
}

/// Computes the NPS of `field` across `responses`.
///
/// Values are read as integers (fractional numbers truncate, integer strings
/// are accepted). Missing, non-numeric and out-of-range values are skipped.
#[expect(clippy::cast_precision_loss)]
pub fn analyze_nps(responses: &[RawRecord], field: &str) -> Result<NpsResult, AnalysisError> {
    let scores = responses
        .iter()
        .filter_map(|response| response.get(field).and_then(parse_integer))
        .filter(|score| (0..=SCALE_MAX).contains(score))
        .collect::<Vec<_>>();

    if scores.is_empty() {
        return Err(AnalysisError::NoValidScores {
            field: field.to_owned(),
        });
    }
    let skipped = responses.len() - scores.len();
    if skipped > 0 {
        tracing::debug!(field, skipped, "skipped responses without a valid NPS score");
    }

    let total = scores.len();
    let promoters = scores.iter().filter(|&&s| s >= PROMOTER_MIN).count();
    let detractors = scores.iter().filter(|&&s| s < PASSIVE_MIN).count();
    let passives = total - promoters - detractors;

    let nps_score = (promoters as f64 - detractors as f64) / total as f64 * 100.0;
    let group = |count: usize| NpsGroup {
        count,
        percentage: count as f64 / total as f64 * 100.0,
    };
    let promoters = group(promoters);
    let passives = group(passives);
    let detractors = group(detractors);

    Ok(NpsResult {
        nps_score,
        promoters,
        passives,
        detractors,
        total_responses: total,
        average_score: scores.iter().sum::<i64>() as f64 / total as f64,
        interpretation: NpsBand::from_score(nps_score),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn responses(values: impl IntoIterator<Item = Value>) -> Vec<RawRecord> {
        values
            .into_iter()
            .map(|v| json!({ "nps": v }).as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_classification_boundaries() {
        let result = analyze_nps(&responses([6, 7, 8, 9].map(Value::from)), "nps").unwrap();
        assert_eq!(result.detractors.count, 1);
        assert_eq!(result.passives.count, 2);
        assert_eq!(result.promoters.count, 1);
        assert_eq!(result.nps_score, 0.0);
        assert_eq!(result.average_score, 7.5);
    }

    #[test]
    fn test_invalid_values_are_skipped() {
        let values = [
            json!(10),
            json!("9"),
            json!(8.9),
            json!(11),
            json!(-1),
            json!("great"),
            Value::Null,
        ];
        let result = analyze_nps(&responses(values), "nps").unwrap();
        assert_eq!(result.total_responses, 3);
        assert_eq!(result.promoters.count, 2);
        // 8.9 truncates to 8.
        assert_eq!(result.passives.count, 1);
    }

    #[test]
    fn test_no_valid_scores() {
        let err = analyze_nps(&responses([json!("n/a")]), "nps").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::NoValidScores {
                field: "nps".to_owned()
            }
        );
        assert!(analyze_nps(&[], "nps").is_err());
    }

    #[test]
    fn test_all_promoters() {
        let result = analyze_nps(&responses(vec![json!(10); 12]), "nps").unwrap();
        assert_eq!(result.nps_score, 100.0);
        assert_eq!(result.interpretation, NpsBand::Excellent);
    }

    #[test]
    fn test_even_split_of_promoters_and_detractors() {
        let result = analyze_nps(
            &responses([9, 9, 9, 9, 9, 2, 2, 2, 2, 2].map(Value::from)),
            "nps",
        )
        .unwrap();
        assert_eq!(result.promoters.count, 5);
        assert_eq!(result.promoters.percentage, 50.0);
        assert_eq!(result.detractors.count, 5);
        assert_eq!(result.passives.count, 0);
        assert_eq!(result.nps_score, 0.0);
        assert_eq!(result.interpretation, NpsBand::NeedsImprovement);
    }

    #[test]
    fn test_exact_band_boundary_from_counts() {
        // 4 promoters, 1 passive, 1 detractor: (4 - 1) / 6 = 50% exactly.
        let result =
            analyze_nps(&responses([10, 9, 9, 9, 7, 3].map(Value::from)), "nps").unwrap();
        assert_eq!(result.nps_score, 50.0);
        assert_eq!(result.interpretation, NpsBand::Great);

        for (promoters, detractors, passives, band) in [
            (8, 2, 2, NpsBand::Great),
            (13, 4, 1, NpsBand::Great),
            (17, 8, 5, NpsBand::Good),
        ] {
            let values = std::iter::repeat_n(10, promoters)
                .chain(std::iter::repeat_n(0, detractors))
                .chain(std::iter::repeat_n(8, passives))
                .map(Value::from);
            let result = analyze_nps(&responses(values), "nps").unwrap();
            assert_eq!(result.interpretation, band, "{promoters}/{detractors}/{passives}");
        }
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(NpsBand::from_score(70.0), NpsBand::Excellent);
        assert_eq!(NpsBand::from_score(69.9), NpsBand::Great);
        assert_eq!(NpsBand::from_score(50.0), NpsBand::Great);
        assert_eq!(NpsBand::from_score(30.0), NpsBand::Good);
        assert_eq!(NpsBand::from_score(0.0), NpsBand::NeedsImprovement);
        assert_eq!(NpsBand::from_score(-0.1), NpsBand::Critical);
        assert_eq!(
            NpsBand::Critical.to_string(),
            "Critical - More detractors than promoters"
        );
    }
}
