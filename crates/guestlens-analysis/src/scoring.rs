//! Quintile-based RFM scoring.
//!
//! Each dimension is scored independently. Quintile boundaries are derived
//! once from the whole validated population, and every guest is then placed
//! into one of five ordinal buckets. Recency is an inverse dimension: fewer
//! days since the last visit is better, so its scale is mirrored.
//!
//! Heavily tied data collapses boundaries. When every value of a dimension is
//! identical, all guests land in the lowest bucket, scoring 1 on ascending
//! dimensions and 5 on recency.
//!
//! ```
//! use guestlens_analysis::scoring::{QuantileScorer, ScoreDirection};
//!
//! let values = (1..=10).map(f64::from);
//! let scorer = QuantileScorer::fit(values, ScoreDirection::HigherIsBetter).unwrap();
//! assert_eq!(scorer.boundaries(), &[3.0, 5.0, 7.0, 9.0]);
//! assert_eq!(scorer.score(1.0), 1);
//! assert_eq!(scorer.score(10.0), 5);
//! ```

use guestlens_stats::percentiles::QuantileBoundaries;
use serde::Serialize;

use crate::{
    error::AnalysisError,
    record::GuestRecord,
    segment::{Segment, classify},
};

/// Number of ordinal buckets per dimension.
pub const SCORE_LEVELS: usize = 5;
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// Whether larger raw values map to higher scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDirection {
    HigherIsBetter,
    LowerIsBetter,
}

/// A scored RFM dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Recency,
    Frequency,
    Monetary,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Recency, Dimension::Frequency, Dimension::Monetary];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Dimension::Recency => "recency",
            Dimension::Frequency => "frequency",
            Dimension::Monetary => "monetary",
        }
    }

    #[must_use]
    pub fn direction(self) -> ScoreDirection {
        match self {
            Dimension::Recency => ScoreDirection::LowerIsBetter,
            Dimension::Frequency | Dimension::Monetary => ScoreDirection::HigherIsBetter,
        }
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn value(self, record: &GuestRecord) -> f64 {
        match self {
            Dimension::Recency => record.recency_days as f64,
            Dimension::Frequency => record.frequency,
            Dimension::Monetary => record.monetary,
        }
    }
}

/// Quintile boundaries for one dimension together with its direction.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileScorer {
    boundaries: QuantileBoundaries,
    direction: ScoreDirection,
}

impl QuantileScorer {
    /// Fits quintile boundaries to `values`.
    pub fn fit<I>(values: I, direction: ScoreDirection) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = f64>,
    {
        let boundaries = QuantileBoundaries::new(values, SCORE_LEVELS)
            .ok_or_else(|| AnalysisError::insufficient("quintile scoring", 1, 0))?;
        Ok(Self {
            boundaries,
            direction,
        })
    }

    /// Fits the scorer of `dimension` over a guest population.
    pub fn for_dimension(
        records: &[GuestRecord],
        dimension: Dimension,
    ) -> Result<Self, AnalysisError> {
        let scorer = Self::fit(
            records.iter().map(|r| dimension.value(r)),
            dimension.direction(),
        )?;
        tracing::debug!(
            dimension = dimension.name(),
            boundaries = ?scorer.boundaries(),
            "computed quintile boundaries"
        );
        Ok(scorer)
    }

    #[must_use]
    pub fn boundaries(&self) -> &[f64] {
        self.boundaries.cut_points()
    }

    /// Ordinal score in `1..=5` for a raw value.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn score(&self, value: f64) -> u8 {
        let bucket = self.boundaries.bucket(value) as u8;
        match self.direction {
            ScoreDirection::HigherIsBetter => MIN_SCORE + bucket,
            ScoreDirection::LowerIsBetter => MAX_SCORE - bucket,
        }
    }
}

/// Scores and segment of a single guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RfmScore {
    pub guest_id: String,
    pub recency_score: u8,
    pub frequency_score: u8,
    pub monetary_score: u8,
    pub total_score: u16,
    pub segment: Segment,
}

impl RfmScore {
    #[must_use]
    pub fn new(guest_id: String, recency_score: u8, frequency_score: u8, monetary_score: u8) -> Self {
        Self {
            guest_id,
            recency_score,
            frequency_score,
            monetary_score,
            total_score: u16::from(recency_score)
                + u16::from(frequency_score)
                + u16::from(monetary_score),
            segment: classify(recency_score, frequency_score, monetary_score).segment(),
        }
    }
}

/// Scores every guest of a validated population.
///
/// Boundaries are fitted over `records` before any score is assigned, so the
/// result is independent of record order. The output is aligned with
/// `records` by position.
pub fn score_population(records: &[GuestRecord]) -> Result<Vec<RfmScore>, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::insufficient("RFM scoring", 1, 0));
    }

    let [recency, frequency, monetary] =
        Dimension::ALL.map(|dimension| QuantileScorer::for_dimension(records, dimension));
    let scorers = [recency?, frequency?, monetary?];

    let scores = records
        .iter()
        .map(|record| {
            let [r, f, m] = Dimension::ALL.map(|dimension| {
                scorers[dimension as usize].score(dimension.value(record))
            });
            RfmScore::new(record.guest_id.clone(), r, f, m)
        })
        .collect::<Vec<_>>();
    tracing::debug!(guests = scores.len(), "scored guest population");
    Ok(scores)
}
