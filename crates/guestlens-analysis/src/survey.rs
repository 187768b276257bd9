//! Survey-level validation and summaries.
//!
//! Responses are free-form JSON objects. Every field other than the
//! respondent identifier and timestamp is summarized: fields whose non-null
//! values are all numeric get descriptive statistics, anything else gets a
//! categorical distribution. An NPS question is detected by field name.

use std::collections::{BTreeMap, BTreeSet};

use guestlens_stats::{
    descriptive::DescriptiveStats,
    frequency::{CategoryShare, FrequencyTable},
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::MIN_STATISTICAL_SAMPLE,
    nps::{NpsResult, analyze_nps},
    outcome::AnalysisOutcome,
    record::{RawRecord, label, parse_real},
};

pub const RESPONDENT_ID: &str = "respondent_id";
pub const TIMESTAMP: &str = "timestamp";

/// Field names recognized as an NPS question, in priority order.
pub const NPS_FIELDS: [&str; 3] = ["nps", "nps_score", "recommend_score"];

/// Surveys smaller than this get a sample-size recommendation.
pub const RECOMMENDED_RESPONSES: usize = 100;

const METADATA_VALID_RESPONSES: &str = "valid_responses";

/// Result of [`validate_survey_data`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyValidation {
    pub success: bool,
    /// Accepted responses, each guaranteed to carry a `respondent_id`.
    pub responses: Vec<RawRecord>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub valid_responses: usize,
}

/// Summary of a single survey field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldSummary {
    Numeric { stats: DescriptiveStats },
    Categorical {
        distribution: BTreeMap<String, CategoryShare>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyAnalysis {
    pub total_responses: usize,
    /// Percentage of accepted responses; every accepted response counts as
    /// complete.
    pub completion_rate: f64,
    pub field_summaries: BTreeMap<String, FieldSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nps_analysis: Option<NpsResult>,
    pub recommendations: Vec<String>,
}

/// Checks that a survey has responses and assigns missing respondent ids.
///
/// Responses without a `respondent_id` receive `R<n>`, where `n` is the
/// 1-based position of the response.
#[must_use]
pub fn validate_survey_data(responses: &[RawRecord]) -> SurveyValidation {
    if responses.is_empty() {
        tracing::warn!("no survey responses provided");
        return SurveyValidation {
            success: false,
            responses: vec![],
            warnings: vec![],
            errors: vec!["No survey responses provided".to_owned()],
            valid_responses: 0,
        };
    }

    let mut warnings = vec![];
    if responses.len() < MIN_STATISTICAL_SAMPLE {
        warnings.push(format!(
            "Sample size ({}) is small for statistical analysis",
            responses.len()
        ));
    }

    let responses = responses
        .iter()
        .enumerate()
        .map(|(i, response)| {
            let mut response = response.clone();
            response
                .entry(RESPONDENT_ID)
                .or_insert_with(|| Value::String(format!("R{}", i + 1)));
            response
        })
        .collect::<Vec<_>>();

    SurveyValidation {
        success: true,
        valid_responses: responses.len(),
        responses,
        warnings,
        errors: vec![],
    }
}

/// Validates and summarizes a survey.
///
/// # Examples
///
/// ```
/// use guestlens_analysis::survey::{FieldSummary, analyze_survey};
/// use serde_json::json;
///
/// let responses = (0..40)
///     .map(|i| {
///         json!({ "visit": if i % 4 == 0 { "dinner" } else { "lunch" }, "rating": i % 5 + 1 })
///             .as_object()
///             .cloned()
///             .unwrap()
///     })
///     .collect::<Vec<_>>();
///
/// let outcome = analyze_survey(&responses);
/// let analysis = outcome.data.unwrap();
/// assert_eq!(analysis.total_responses, 40);
/// assert!(matches!(analysis.field_summaries["rating"], FieldSummary::Numeric { .. }));
/// assert!(matches!(analysis.field_summaries["visit"], FieldSummary::Categorical { .. }));
/// assert!(analysis.nps_analysis.is_none());
/// ```
#[must_use]
pub fn analyze_survey(responses: &[RawRecord]) -> AnalysisOutcome<SurveyAnalysis> {
    tracing::info!(responses = responses.len(), "starting survey analysis");

    let validation = validate_survey_data(responses);
    let metadata = BTreeMap::from([(
        METADATA_VALID_RESPONSES.to_owned(),
        validation.valid_responses,
    )]);
    if !validation.success {
        return AnalysisOutcome::failed(validation.errors, validation.warnings, metadata);
    }
    let responses = &validation.responses;

    let fields = responses
        .iter()
        .flat_map(|response| response.keys().map(String::as_str))
        .collect::<BTreeSet<_>>();

    let field_summaries = fields
        .iter()
        .filter(|&&field| field != RESPONDENT_ID && field != TIMESTAMP)
        .filter_map(|&field| {
            let values = responses
                .iter()
                .filter_map(|response| response.get(field))
                .filter(|value| !value.is_null())
                .collect::<Vec<_>>();
            summarize_field(&values).map(|summary| (field.to_owned(), summary))
        })
        .collect();

    let nps_analysis = NPS_FIELDS
        .into_iter()
        .find(|field| fields.contains(field))
        .and_then(|field| match analyze_nps(responses, field) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(field, error = %e, "skipping NPS analysis");
                None
            }
        });

    let total_responses = responses.len();
    let recommendations = survey_recommendations(total_responses, nps_analysis.as_ref());

    AnalysisOutcome::succeeded(
        SurveyAnalysis {
            total_responses,
            completion_rate: 100.0,
            field_summaries,
            nps_analysis,
            recommendations,
        },
        validation.warnings,
        metadata,
    )
}

/// Numeric summary when every value parses as a number, else a distribution.
/// Returns `None` for a field with no values.
fn summarize_field(values: &[&Value]) -> Option<FieldSummary> {
    if values.is_empty() {
        return None;
    }
    let numeric = values
        .iter()
        .map(|value| parse_real(value))
        .collect::<Option<Vec<_>>>();
    let summary = match numeric {
        Some(numbers) => FieldSummary::Numeric {
            stats: DescriptiveStats::new(numbers)?,
        },
        None => FieldSummary::Categorical {
            distribution: FrequencyTable::new(values.iter().map(|value| label(value))).shares(),
        },
    };
    Some(summary)
}

fn survey_recommendations(total_responses: usize, nps: Option<&NpsResult>) -> Vec<String> {
    let mut recommendations = vec![];
    if total_responses < RECOMMENDED_RESPONSES {
        recommendations.push("Consider increasing sample size for more reliable results".to_owned());
    }
    if let Some(nps) = nps {
        let score = nps.nps_score;
        if score < 30.0 {
            recommendations.push(format!(
                "NPS of {score:.0} indicates opportunity to improve customer experience"
            ));
        } else if score >= 50.0 {
            recommendations.push(format!(
                "Strong NPS of {score:.0} - leverage promoters for referral programs"
            ));
        }
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_survey_fails() {
        let validation = validate_survey_data(&[]);
        assert!(!validation.success);
        assert_eq!(validation.errors, ["No survey responses provided"]);

        let outcome = analyze_survey(&[]);
        assert!(!outcome.success);
        assert!(outcome.data.is_none());
        assert_eq!(outcome.errors, ["No survey responses provided"]);
    }

    #[test]
    fn test_missing_respondent_ids_are_assigned() {
        let responses = vec![
            response(json!({ "respondent_id": "A7", "q": 1 })),
            response(json!({ "q": 2 })),
        ];
        let validation = validate_survey_data(&responses);
        assert!(validation.success);
        assert_eq!(validation.responses[0][RESPONDENT_ID], "A7");
        assert_eq!(validation.responses[1][RESPONDENT_ID], "R2");
        assert_eq!(
            validation.warnings,
            ["Sample size (2) is small for statistical analysis"]
        );
    }

    #[test]
    fn test_no_small_sample_warning_at_threshold() {
        let responses = (0..30)
            .map(|i| response(json!({ "q": i })))
            .collect::<Vec<_>>();
        assert!(validate_survey_data(&responses).warnings.is_empty());
    }

    #[test]
    fn test_field_summaries() {
        let responses = (0..10)
            .map(|i| {
                response(json!({
                    "respondent_id": format!("X{i}"),
                    "timestamp": "2024-05-01T12:00:00Z",
                    "wait_minutes": if i % 2 == 0 { json!(i) } else { json!(format!("{i}")) },
                    "channel": if i < 7 { "mobile" } else { "kiosk" },
                    "comment": if i == 0 { json!("slow") } else { Value::Null },
                    "mixed": if i == 3 { json!("n/a") } else { json!(i) },
                }))
            })
            .collect::<Vec<_>>();
        let analysis = analyze_survey(&responses).data.unwrap();

        assert!(!analysis.field_summaries.contains_key(RESPONDENT_ID));
        assert!(!analysis.field_summaries.contains_key(TIMESTAMP));

        let FieldSummary::Numeric { stats } = &analysis.field_summaries["wait_minutes"] else {
            panic!("wait_minutes should be numeric");
        };
        assert_eq!(stats.n, 10);
        assert_eq!(stats.mean, 4.5);

        let FieldSummary::Categorical { distribution } = &analysis.field_summaries["channel"]
        else {
            panic!("channel should be categorical");
        };
        assert_eq!(distribution["mobile"].count, 7);
        assert!((distribution["kiosk"].percentage - 30.0).abs() < 1e-9);

        let FieldSummary::Categorical { distribution } = &analysis.field_summaries["comment"]
        else {
            panic!("comment should be categorical");
        };
        assert_eq!(distribution.len(), 1);

        assert!(matches!(
            analysis.field_summaries["mixed"],
            FieldSummary::Categorical { .. }
        ));
    }

    #[test]
    fn test_nps_detection_and_recommendations() {
        let responses = (0..120)
            .map(|i| response(json!({ "nps_score": if i < 80 { 10 } else { 8 } })))
            .collect::<Vec<_>>();
        let outcome = analyze_survey(&responses);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.metadata["valid_responses"], 120);

        let analysis = outcome.data.unwrap();
        let nps = analysis.nps_analysis.unwrap();
        assert!((nps.nps_score - 66.666).abs() < 0.01);
        assert_eq!(
            analysis.recommendations,
            ["Strong NPS of 67 - leverage promoters for referral programs"]
        );
    }

    #[test]
    fn test_strong_nps_at_exact_threshold() {
        // 4 promoters, 1 passive, 1 detractor per block of six.
        let responses = (0..120)
            .map(|i| response(json!({ "nps": ([10, 9, 9, 9, 7, 3][i % 6]) })))
            .collect::<Vec<_>>();
        let analysis = analyze_survey(&responses).data.unwrap();
        assert_eq!(analysis.nps_analysis.unwrap().nps_score, 50.0);
        assert_eq!(
            analysis.recommendations,
            ["Strong NPS of 50 - leverage promoters for referral programs"]
        );
    }

    #[test]
    fn test_low_nps_and_small_sample() {
        let responses = (0..40)
            .map(|i| response(json!({ "recommend_score": if i < 20 { 3 } else { 9 } })))
            .collect::<Vec<_>>();
        let analysis = analyze_survey(&responses).data.unwrap();
        assert_eq!(
            analysis.recommendations,
            [
                "Consider increasing sample size for more reliable results",
                "NPS of 0 indicates opportunity to improve customer experience",
            ]
        );
    }

    #[test]
    fn test_nps_field_without_valid_scores_is_omitted() {
        let responses = (0..30)
            .map(|_| response(json!({ "nps": "unsure" })))
            .collect::<Vec<_>>();
        let analysis = analyze_survey(&responses).data.unwrap();
        assert!(analysis.nps_analysis.is_none());
    }
}
