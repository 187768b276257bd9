//! Guest segmentation and survey significance engine
//!
//! This crate turns per-guest transaction summaries and survey responses into
//! behavioral segments and significance assessments.
//!
//! # Overview
//!
//! The engine supports two workflows.
//!
//! ## Segmentation Workflow
//!
//! Bucket guests into named cohorts by recency, frequency and monetary value:
//!
//! 1. **Validate** ([`validation::validate_guest_data`]): Parse raw rows into
//!    [`record::GuestRecord`]s, itemizing every warning and error
//! 2. **Score** ([`scoring::score_population`]): Fit quintile boundaries per
//!    dimension and assign 1-5 ordinal scores (recency is inverse)
//! 3. **Classify** ([`segment::classify`]): Map each `(R, F, M)` triple to a
//!    [`segment::Segment`] via the exact-match table or the total-score bands
//! 4. **Profile** ([`profile::profile_segments`]): Aggregate size, revenue
//!    share, means, modes and narrative per segment
//!
//! [`pipeline::run_segmentation`] runs all four steps.
//!
//! ## Survey Workflow
//!
//! - **Crosstabs** ([`significance::crosstab`]): Chi-square test of
//!   independence between two categorical fields
//! - **Proportions** ([`significance::test_proportions`]): Pooled two-sample
//!   z-test
//! - **NPS** ([`nps::analyze_nps`]): Promoter, passive and detractor shares
//! - **Survey summary** ([`survey::analyze_survey`]): Per-field statistics,
//!   NPS detection and recommendations
//!
//! # Error Handling
//!
//! Data-quality problems are reported, not raised: validation and the
//! end-to-end analyses return outcome values carrying `success`, `warnings`
//! and `errors`. Preconditions of the statistical operations (sample-size
//! floors, proportion ranges) fail with [`AnalysisError`].
//!
//! # Examples
//!
//! ```
//! use guestlens_analysis::{config::AnalysisConfig, pipeline::run_segmentation};
//! use serde_json::json;
//!
//! let rows = (0..120)
//!     .map(|i| {
//!         json!({
//!             "guest_id": format!("G{i:03}"),
//!             "recency_days": i % 60,
//!             "frequency": i % 12,
//!             "monetary": f64::from(i) * 7.5,
//!         })
//!         .as_object()
//!         .cloned()
//!         .unwrap()
//!     })
//!     .collect::<Vec<_>>();
//!
//! let outcome = run_segmentation(&rows, &AnalysisConfig::default());
//! assert!(outcome.success);
//! let analysis = outcome.data.unwrap();
//! for profile in &analysis.segment_profiles {
//!     println!("{}: {} guests, {:.1}% of revenue", profile.segment_name, profile.size, profile.revenue_share);
//! }
//! ```

pub use self::{error::AnalysisError, outcome::AnalysisOutcome};

pub mod config;
pub mod error;
pub mod nps;
pub mod outcome;
pub mod pipeline;
pub mod profile;
pub mod record;
pub mod scoring;
pub mod segment;
pub mod significance;
pub mod survey;
pub mod validation;
