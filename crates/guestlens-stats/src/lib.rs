//! Statistical primitives for the guestlens analysis engine.
//!
//! This crate provides the numeric building blocks that the segmentation and
//! survey engines are assembled from:
//!
//! - **Descriptive statistics**: mean, median, sample standard deviation, quartiles
//! - **Percentiles**: floor-indexed percentile lookup and quantile boundaries
//! - **Frequency tables**: categorical counts with a deterministic mode
//! - **Contingency tables**: two-way counts, expected frequencies and chi-square
//! - **Significance**: tiering, the critical-value p-value step function and
//!   the two-proportion z-test
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation and quantile boundaries
//! - [`frequency`]: Categorical frequency distributions
//! - [`contingency`]: Contingency tables and the chi-square statistic
//! - [`significance`]: Significance tiers and hypothesis tests
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use guestlens_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.median, 3.0);
//! ```
//!
//! ## Computing quintile boundaries
//!
//! ```
//! use guestlens_stats::percentiles::QuantileBoundaries;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
//! let quintiles = QuantileBoundaries::new(values, 5).unwrap();
//! assert_eq!(quintiles.cut_points(), &[3.0, 5.0, 7.0, 9.0]);
//! assert_eq!(quintiles.bucket(4.0), 1);
//! ```
//!
//! ## Testing two proportions
//!
//! ```
//! use guestlens_stats::significance::{SignificanceLevel, two_proportion_z_test};
//!
//! let test = two_proportion_z_test(100, 0.5, 100, 0.5);
//! assert_eq!(test.z, 0.0);
//! assert_eq!(test.significance, SignificanceLevel::NotSignificant);
//! ```

pub mod contingency;
pub mod descriptive;
pub mod frequency;
pub mod percentiles;
pub mod significance;
