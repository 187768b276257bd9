//! RFM segment classification.
//!
//! Classification is two-tier. A sparse table of known `(R, F, M)` triples is
//! consulted first; any triple it does not list is classified by banding the
//! total score. Most of the 125 possible triples are intentionally absent from
//! the table, so the banded rule is the everyday path rather than an error
//! path.
//!
//! ```
//! use guestlens_analysis::segment::{Classification, Segment, classify};
//!
//! assert_eq!(classify(5, 5, 5).segment(), Segment::Champions);
//! assert!(matches!(classify(5, 5, 5), Classification::Exact { .. }));
//!
//! // (5, 1, 1) is not in the table; its total of 7 bands to Potential Loyalists.
//! assert_eq!(
//!     classify(5, 1, 1),
//!     Classification::Banded { segment: Segment::PotentialLoyalists, total: 7 }
//! );
//! ```

use std::fmt;

use serde::{Serialize, Serializer};

/// Named guest cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    Champions,
    LoyalCustomers,
    PotentialLoyalists,
    AtRisk,
    Hibernating,
    Lost,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name(), f)
    }
}

impl Serialize for Segment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl Segment {
    pub const ALL: [Segment; 6] = [
        Segment::Champions,
        Segment::LoyalCustomers,
        Segment::PotentialLoyalists,
        Segment::AtRisk,
        Segment::Hibernating,
        Segment::Lost,
    ];

    /// Human-readable segment name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Segment::Champions => "Champions",
            Segment::LoyalCustomers => "Loyal Customers",
            Segment::PotentialLoyalists => "Potential Loyalists",
            Segment::AtRisk => "At Risk",
            Segment::Hibernating => "Hibernating",
            Segment::Lost => "Lost",
        }
    }

    /// Stable snake_case identifier.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Segment::Champions => "champions",
            Segment::LoyalCustomers => "loyal_customers",
            Segment::PotentialLoyalists => "potential_loyalists",
            Segment::AtRisk => "at_risk",
            Segment::Hibernating => "hibernating",
            Segment::Lost => "lost",
        }
    }

    /// Segment for an RFM total outside the exact-match table.
    #[must_use]
    pub fn from_total(total: u16) -> Self {
        match total {
            13.. => Segment::Champions,
            10..=12 => Segment::LoyalCustomers,
            7..=9 => Segment::PotentialLoyalists,
            5..=6 => Segment::AtRisk,
            3..=4 => Segment::Hibernating,
            _ => Segment::Lost,
        }
    }
}

/// An entry of the exact-match table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRule {
    pub scores: (u8, u8, u8),
    pub segment: Segment,
    pub description: &'static str,
}

const fn rule(scores: (u8, u8, u8), segment: Segment, description: &'static str) -> SegmentRule {
    SegmentRule {
        scores,
        segment,
        description,
    }
}

/// Known `(R, F, M)` triples. Intentionally sparse.
pub static SEGMENT_RULES: [SegmentRule; 15] = [
    rule((5, 5, 5), Segment::Champions, "Best guests - recent, frequent, high spend"),
    rule((5, 5, 4), Segment::Champions, "Best guests - recent, frequent, good spend"),
    rule((5, 4, 5), Segment::LoyalCustomers, "Very loyal, recent with high spend"),
    rule((5, 4, 4), Segment::LoyalCustomers, "Regular loyal guests"),
    rule((4, 5, 5), Segment::LoyalCustomers, "Frequent, high spenders"),
    rule((5, 3, 3), Segment::PotentialLoyalists, "Recent guests with growth potential"),
    rule((4, 4, 4), Segment::PotentialLoyalists, "Good across all dimensions"),
    rule((4, 3, 4), Segment::PotentialLoyalists, "Moderate frequency, good value"),
    rule((3, 4, 4), Segment::AtRisk, "Were loyal, becoming less recent"),
    rule((3, 3, 4), Segment::AtRisk, "Declining engagement"),
    rule((2, 4, 4), Segment::AtRisk, "Previously loyal, now lapsing"),
    rule((2, 2, 3), Segment::Hibernating, "Low engagement across dimensions"),
    rule((2, 2, 2), Segment::Hibernating, "Very low engagement"),
    rule((1, 2, 2), Segment::Lost, "Churned or nearly churned"),
    rule((1, 1, 1), Segment::Lost, "Completely disengaged"),
];

/// How a triple was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The triple is listed in [`SEGMENT_RULES`].
    Exact {
        segment: Segment,
        description: &'static str,
    },
    /// The triple is unlisted; the segment comes from its total score.
    Banded { segment: Segment, total: u16 },
}

impl Classification {
    #[must_use]
    pub fn segment(self) -> Segment {
        match self {
            Classification::Exact { segment, .. } | Classification::Banded { segment, .. } => {
                segment
            }
        }
    }
}

/// Classifies an `(R, F, M)` triple of ordinal scores.
///
/// Scores are expected in `1..=5`. Triples outside that range never match the
/// table and are banded by their total, which is summed without overflow.
#[must_use]
pub fn classify(recency: u8, frequency: u8, monetary: u8) -> Classification {
    let scores = (recency, frequency, monetary);
    if let Some(rule) = SEGMENT_RULES.iter().find(|rule| rule.scores == scores) {
        return Classification::Exact {
            segment: rule.segment,
            description: rule.description,
        };
    }
    let total = u16::from(recency) + u16::from(frequency) + u16::from(monetary);
    Classification::Banded {
        segment: Segment::from_total(total),
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matches_take_precedence_over_bands() {
        // Total 12 would band to Loyal Customers.
        assert_eq!(classify(4, 4, 4).segment(), Segment::PotentialLoyalists);
        // Total 11 would band to Loyal Customers.
        assert_eq!(classify(3, 4, 4).segment(), Segment::AtRisk);
        // Total 4 would band to Hibernating.
        assert_eq!(classify(1, 1, 1).segment(), Segment::Lost);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(classify(5, 5, 3).segment(), Segment::Champions); // 13
        assert_eq!(classify(5, 4, 3).segment(), Segment::LoyalCustomers); // 12
        assert_eq!(classify(4, 3, 3).segment(), Segment::LoyalCustomers); // 10
        assert_eq!(classify(3, 3, 3).segment(), Segment::PotentialLoyalists); // 9
        assert_eq!(classify(1, 1, 5).segment(), Segment::PotentialLoyalists); // 7
        assert_eq!(classify(1, 1, 4).segment(), Segment::AtRisk); // 6
        assert_eq!(classify(1, 2, 2).segment(), Segment::Lost); // exact
        assert_eq!(classify(2, 1, 2).segment(), Segment::AtRisk); // 5
        assert_eq!(classify(1, 1, 2).segment(), Segment::Hibernating); // 4
    }

    #[test]
    fn test_out_of_range_scores_are_banded() {
        assert_eq!(
            classify(u8::MAX, u8::MAX, u8::MAX),
            Classification::Banded {
                segment: Segment::Champions,
                total: 765,
            }
        );
        assert_eq!(classify(0, 0, 0).segment(), Segment::Lost);
    }

    #[test]
    fn test_from_total_below_range_is_lost() {
        assert_eq!(Segment::from_total(3), Segment::Hibernating);
        assert_eq!(Segment::from_total(2), Segment::Lost);
        assert_eq!(Segment::from_total(0), Segment::Lost);
    }

    #[test]
    fn test_table_is_sparse_and_unique() {
        let mut triples = SEGMENT_RULES.iter().map(|r| r.scores).collect::<Vec<_>>();
        triples.sort_unstable();
        triples.dedup();
        assert_eq!(triples.len(), SEGMENT_RULES.len());

        let banded = (1..=5)
            .flat_map(|r| (1..=5).flat_map(move |f| (1..=5).map(move |m| (r, f, m))))
            .filter(|&(r, f, m)| matches!(classify(r, f, m), Classification::Banded { .. }))
            .count();
        assert_eq!(banded, 125 - SEGMENT_RULES.len());
    }

    #[test]
    fn test_every_triple_is_classified() {
        for r in 1..=5 {
            for f in 1..=5 {
                for m in 1..=5 {
                    assert!(Segment::ALL.contains(&classify(r, f, m).segment()));
                }
            }
        }
    }

    #[test]
    fn test_serializes_as_name() {
        let json = serde_json::to_string(&Segment::LoyalCustomers).unwrap();
        assert_eq!(json, "\"Loyal Customers\"");
    }
}
