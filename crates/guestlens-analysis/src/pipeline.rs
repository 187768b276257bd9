//! End-to-end RFM segmentation.
//!
//! The pipeline runs validate → score → profile. Scoring and profiling only
//! ever see the validated population, and quintile boundaries are fitted to
//! that same population before any guest is scored.

use serde::Serialize;

use crate::{
    config::{AnalysisConfig, MIN_STATISTICAL_SAMPLE},
    error::AnalysisError,
    outcome::AnalysisOutcome,
    profile::{SegmentProfile, profile_segments},
    record::{GuestRecord, RawRecord},
    scoring::{RfmScore, score_population},
    validation::validate_guest_data,
};

const METADATA_SEGMENTS_CREATED: &str = "segments_created";

/// Scores and profiles of a validated population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSegmentation {
    /// One score per guest, in input order.
    pub rfm_scores: Vec<RfmScore>,
    /// Non-empty segments by revenue share, descending.
    pub segment_profiles: Vec<SegmentProfile>,
}

/// Size and value of one segment relative to the population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentShare {
    pub segment: &'static str,
    pub size: usize,
    pub percentage: f64,
    pub revenue_share: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatisticalValidation {
    /// Whether the population reaches the recommended sample size.
    pub minimum_sample_met: bool,
    pub sample_size: usize,
    pub segments_with_adequate_size: usize,
    /// Largest revenue share of any segment, 0 without segments.
    pub revenue_concentration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentationAnalysis {
    pub segmentation_type: &'static str,
    pub total_guests: usize,
    pub segments_identified: usize,
    pub segment_distribution: Vec<SegmentShare>,
    pub segment_profiles: Vec<SegmentProfile>,
    pub guest_segment_assignments: Vec<RfmScore>,
    pub statistical_validation: StatisticalValidation,
}

impl SegmentationAnalysis {
    fn new(segmentation: ScoredSegmentation, config: &AnalysisConfig) -> Self {
        let ScoredSegmentation {
            rfm_scores,
            segment_profiles,
        } = segmentation;
        let total_guests = rfm_scores.len();

        let segment_distribution = segment_profiles
            .iter()
            .map(|profile| SegmentShare {
                segment: profile.segment_name,
                size: profile.size,
                percentage: profile.size_percentage,
                revenue_share: profile.revenue_share,
            })
            .collect();
        let statistical_validation = StatisticalValidation {
            minimum_sample_met: total_guests >= config.validation.thresholds.recommended_sample_size,
            sample_size: total_guests,
            segments_with_adequate_size: segment_profiles
                .iter()
                .filter(|p| p.size >= config.segmentation.adequate_segment_size)
                .count(),
            revenue_concentration: segment_profiles
                .iter()
                .map(|p| p.revenue_share)
                .max_by(f64::total_cmp)
                .unwrap_or(0.0),
        };

        Self {
            segmentation_type: "rfm",
            total_guests,
            segments_identified: segment_profiles.len(),
            segment_distribution,
            segment_profiles,
            guest_segment_assignments: rfm_scores,
            statistical_validation,
        }
    }
}

/// Scores and profiles an already validated population.
///
/// Refuses populations below [`MIN_STATISTICAL_SAMPLE`], independently of
/// the configured validation thresholds.
pub fn score_and_segment(records: &[GuestRecord]) -> Result<ScoredSegmentation, AnalysisError> {
    if records.len() < MIN_STATISTICAL_SAMPLE {
        return Err(AnalysisError::insufficient(
            "RFM segmentation",
            MIN_STATISTICAL_SAMPLE,
            records.len(),
        ));
    }

    let rfm_scores = score_population(records)?;
    let segment_profiles = profile_segments(records, &rfm_scores)?;
    tracing::debug!(
        guests = rfm_scores.len(),
        segments = segment_profiles.len(),
        "segmented population"
    );
    Ok(ScoredSegmentation {
        rfm_scores,
        segment_profiles,
    })
}

/// Validates raw guest rows and segments the surviving population.
///
/// All validation warnings and row errors are carried into the outcome,
/// whether or not the analysis succeeds.
///
/// # Examples
///
/// ```
/// use guestlens_analysis::{config::AnalysisConfig, pipeline::run_segmentation};
/// use serde_json::json;
///
/// let rows = (0..100)
///     .map(|i| {
///         json!({ "guest_id": format!("G{i}"), "recency_days": 14, "frequency": 3, "monetary": 45.0 })
///             .as_object()
///             .cloned()
///             .unwrap()
///     })
///     .collect::<Vec<_>>();
///
/// let outcome = run_segmentation(&rows, &AnalysisConfig::default());
/// let analysis = outcome.data.unwrap();
/// assert_eq!(analysis.segments_identified, 1);
/// assert_eq!(analysis.segment_profiles[0].segment_name, "Potential Loyalists");
/// assert_eq!(outcome.metadata["segments_created"], 1);
/// ```
#[must_use]
pub fn run_segmentation(
    records: &[RawRecord],
    config: &AnalysisConfig,
) -> AnalysisOutcome<SegmentationAnalysis> {
    tracing::info!(rows = records.len(), "starting RFM segmentation");

    let validation = validate_guest_data(records, &config.validation);
    let mut metadata = validation.metadata.to_map();
    let mut errors = validation.errors;
    if !validation.success {
        return AnalysisOutcome::failed(errors, validation.warnings, metadata);
    }

    match score_and_segment(&validation.valid_records) {
        Ok(segmentation) => {
            let analysis = SegmentationAnalysis::new(segmentation, config);
            tracing::info!(
                guests = analysis.total_guests,
                segments = analysis.segments_identified,
                "segmentation complete"
            );
            metadata.insert(
                METADATA_SEGMENTS_CREATED.to_owned(),
                analysis.segments_identified,
            );
            let mut outcome = AnalysisOutcome::succeeded(analysis, validation.warnings, metadata);
            outcome.errors = errors;
            outcome
        }
        Err(e) => {
            tracing::warn!(error = %e, "segmentation failed");
            errors.push(format!("Analysis error: {e}"));
            AnalysisOutcome::failed(errors, validation.warnings, metadata)
        }
    }
}
