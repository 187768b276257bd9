//! Tunable thresholds for validation and segmentation.
//!
//! Every field has a default matching the documented behavior, so an empty
//! JSON object (`{}`) deserializes to [`AnalysisConfig::default`].
//!
//! ```
//! use guestlens_analysis::config::AnalysisConfig;
//!
//! let config: AnalysisConfig =
//!     serde_json::from_str(r#"{ "validation": { "thresholds": { "max_monetary": 5000.0 } } }"#)
//!         .unwrap();
//! assert_eq!(config.validation.thresholds.max_monetary, 5000.0);
//! assert_eq!(config.validation.thresholds.minimum_sample_size, 30);
//! ```

use serde::{Deserialize, Serialize};

use crate::record::CORE_FIELDS;

/// Minimum number of observations for any test statistic.
pub const MIN_STATISTICAL_SAMPLE: usize = 30;

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub validation: ValidationConfig,
    pub segmentation: SegmentationConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Fields every guest record must carry. The core RFM fields are always
    /// required in addition to these.
    pub required_fields: Vec<String>,
    pub thresholds: ValidationThresholds,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            required_fields: CORE_FIELDS.iter().map(|&f| f.to_owned()).collect(),
            thresholds: ValidationThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationThresholds {
    /// Populations smaller than this get a sample-size warning.
    pub recommended_sample_size: usize,
    /// Populations smaller than this fail validation.
    pub minimum_sample_size: usize,
    pub max_recency_days: u64,
    pub max_frequency: f64,
    pub max_monetary: f64,
    /// `mean > skew_ratio * median` flags a skewed distribution.
    pub skew_ratio: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            recommended_sample_size: 100,
            minimum_sample_size: MIN_STATISTICAL_SAMPLE,
            max_recency_days: 730,
            max_frequency: 100.0,
            max_monetary: 10_000.0,
            skew_ratio: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Segments at least this large count as statistically adequate.
    pub adequate_segment_size: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            adequate_segment_size: MIN_STATISTICAL_SAMPLE,
        }
    }
}
