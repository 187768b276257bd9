//! Per-segment aggregation.

use std::collections::BTreeMap;

use guestlens_stats::{descriptive, frequency::FrequencyTable};
use serde::Serialize;

use crate::{error::AnalysisError, record::GuestRecord, scoring::RfmScore, segment::Segment};

/// Aggregate view of one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentProfile {
    pub segment_id: &'static str,
    pub segment_name: &'static str,
    pub size: usize,
    /// Share of the whole population, 0-100.
    pub size_percentage: f64,
    /// Share of total monetary value, 0-100.
    pub revenue_share: f64,
    pub avg_recency: f64,
    pub avg_frequency: f64,
    pub avg_monetary: f64,
    pub avg_ticket: f64,
    pub primary_daypart: String,
    pub primary_channel: String,
    /// Mean over the members that reported a satisfaction score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_satisfaction: Option<f64>,
    pub characteristics: Vec<String>,
    pub recommendations: Vec<String>,
}

impl SegmentProfile {
    #[must_use]
    pub fn segment(&self) -> Option<Segment> {
        Segment::ALL
            .into_iter()
            .find(|s| s.id() == self.segment_id)
    }
}

/// Segment means used to fill the narrative templates.
#[derive(Debug, Clone, Copy)]
struct SegmentMeans {
    recency: f64,
    frequency: f64,
    monetary: f64,
    ticket: f64,
}

/// Builds one profile per non-empty segment, sorted by revenue share
/// (descending).
///
/// `scores` must be aligned with `records` by position, as produced by
/// [`score_population`](crate::scoring::score_population).
#[expect(clippy::cast_precision_loss)]
pub fn profile_segments(
    records: &[GuestRecord],
    scores: &[RfmScore],
) -> Result<Vec<SegmentProfile>, AnalysisError> {
    if records.len() != scores.len() {
        return Err(AnalysisError::ScoreMismatch {
            reason: format!(
                "{} guest records but {} scores",
                records.len(),
                scores.len()
            ),
        });
    }

    let mut groups = BTreeMap::<Segment, Vec<&GuestRecord>>::new();
    for (i, (record, score)) in records.iter().zip(scores).enumerate() {
        if record.guest_id != score.guest_id {
            return Err(AnalysisError::ScoreMismatch {
                reason: format!(
                    "position {i} holds record '{}' but score '{}'",
                    record.guest_id, score.guest_id
                ),
            });
        }
        groups.entry(score.segment).or_default().push(record);
    }

    let population = records.len() as f64;
    let total_monetary = records.iter().map(|r| r.monetary).sum::<f64>();

    let mut profiles = groups
        .into_iter()
        .map(|(segment, members)| build_profile(segment, &members, population, total_monetary))
        .collect::<Vec<_>>();
    profiles.sort_by(|a, b| b.revenue_share.total_cmp(&a.revenue_share));
    tracing::debug!(segments = profiles.len(), "profiled segments");
    Ok(profiles)
}

#[expect(clippy::cast_precision_loss)]
fn build_profile(
    segment: Segment,
    members: &[&GuestRecord],
    population: f64,
    total_monetary: f64,
) -> SegmentProfile {
    let size = members.len();
    let segment_monetary = members.iter().map(|r| r.monetary).sum::<f64>();
    let revenue_share = if total_monetary > 0.0 {
        segment_monetary / total_monetary * 100.0
    } else {
        0.0
    };

    let average = |value: fn(&GuestRecord) -> f64| {
        let values = members.iter().map(|r| value(r)).collect::<Vec<_>>();
        descriptive::mean(&values).unwrap_or_default()
    };
    let means = SegmentMeans {
        recency: average(|r| r.recency_days as f64),
        frequency: average(|r| r.frequency),
        monetary: average(|r| r.monetary),
        ticket: average(GuestRecord::ticket),
    };

    let satisfaction = members
        .iter()
        .filter_map(|r| r.satisfaction_score)
        .collect::<Vec<_>>();

    let dayparts = FrequencyTable::new(members.iter().map(|r| r.preferred_daypart.as_str()));
    let channels = FrequencyTable::new(members.iter().map(|r| r.preferred_channel.as_str()));

    SegmentProfile {
        segment_id: segment.id(),
        segment_name: segment.name(),
        size,
        size_percentage: size as f64 / population * 100.0,
        revenue_share,
        avg_recency: means.recency,
        avg_frequency: means.frequency,
        avg_monetary: means.monetary,
        avg_ticket: means.ticket,
        primary_daypart: dayparts.mode().unwrap_or_default().to_owned(),
        primary_channel: channels.mode().unwrap_or_default().to_owned(),
        avg_satisfaction: descriptive::mean(&satisfaction),
        characteristics: characteristics(segment, means),
        recommendations: recommendations(segment)
            .iter()
            .map(|&s| s.to_owned())
            .collect(),
    }
}

fn characteristics(segment: Segment, means: SegmentMeans) -> Vec<String> {
    let SegmentMeans {
        recency,
        frequency,
        monetary,
        ticket,
    } = means;
    let lines = match segment {
        Segment::Champions => [
            "Most valuable guests with highest engagement".to_owned(),
            format!("Visit every {recency:.0} days on average"),
            format!("High frequency ({frequency:.1} visits/month)"),
            format!("Premium ticket size (${ticket:.2})"),
            "Brand advocates and repeat purchasers".to_owned(),
        ],
        Segment::LoyalCustomers => [
            "Consistent, reliable guest base".to_owned(),
            format!("Regular visit pattern ({frequency:.1}/month)"),
            format!("Solid spend level (${monetary:.2} total)"),
            "Good candidates for loyalty program upgrades".to_owned(),
            "Respond well to recognition".to_owned(),
        ],
        Segment::PotentialLoyalists => [
            "Growing engagement with brand".to_owned(),
            format!("Recent visits ({recency:.0} days ago)"),
            format!("Developing frequency ({frequency:.1}/month)"),
            "High potential for increased visits".to_owned(),
            "Receptive to promotional offers".to_owned(),
        ],
        Segment::AtRisk => [
            "Previously engaged but declining".to_owned(),
            format!("Increasing time between visits ({recency:.0} days)"),
            "Decreasing frequency trend".to_owned(),
            "May be exploring competitors".to_owned(),
            "Requires immediate attention".to_owned(),
        ],
        Segment::Hibernating => [
            "Very low recent engagement".to_owned(),
            format!("Long time since last visit ({recency:.0} days)"),
            format!("Minimal frequency ({frequency:.1}/month)"),
            "May need strong incentive to return".to_owned(),
            "At risk of permanent churn".to_owned(),
        ],
        Segment::Lost => [
            "Essentially churned guests".to_owned(),
            format!("Extended absence ({recency:.0}+ days)"),
            "Minimal to no recent activity".to_owned(),
            "May require re-acquisition tactics".to_owned(),
            "Consider suppression for efficiency".to_owned(),
        ],
    };
    lines.into()
}

fn recommendations(segment: Segment) -> &'static [&'static str] {
    match segment {
        Segment::Champions => &[
            "Enroll in VIP/ambassador program",
            "Exclusive early access to new menu items",
            "Personalized thank you communications",
            "Referral program incentives",
            "Surprise and delight moments",
        ],
        Segment::LoyalCustomers => &[
            "Maintain regular engagement cadence",
            "Offer loyalty tier upgrades",
            "Cross-sell underutilized dayparts",
            "Personalized recommendations based on history",
            "Birthday and anniversary recognition",
        ],
        Segment::PotentialLoyalists => &[
            "Increase visit frequency with time-limited offers",
            "Encourage mobile app adoption",
            "Introduce to loyalty program benefits",
            "Expand category trial with combo deals",
            "Targeted offers for second visit this week",
        ],
        Segment::AtRisk => &[
            "Immediate win-back campaign required",
            "Strong value offers to re-engage",
            "Feedback survey to understand barriers",
            "Personalized 'we miss you' messaging",
            "Consider competitive intelligence",
        ],
        Segment::Hibernating => &[
            "Deep discount win-back offer",
            "Reminder of brand and favorite items",
            "Limited-time exclusive comeback offer",
            "Consider cost-effective reactivation channels",
            "Set timeline for suppression if no response",
        ],
        Segment::Lost => &[
            "Final win-back attempt with significant offer",
            "Low-cost reactivation (email/push only)",
            "Consider suppression after final attempt",
            "Focus budget on higher-potential segments",
            "Analyze for churn prediction insights",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_population;

    fn guest(id: &str, recency_days: u64, frequency: f64, monetary: f64) -> GuestRecord {
        GuestRecord {
            guest_id: id.to_owned(),
            recency_days,
            frequency,
            monetary,
            preferred_daypart: "lunch".to_owned(),
            preferred_channel: "drive_thru".to_owned(),
            avg_ticket: None,
            satisfaction_score: None,
        }
    }

    fn score(id: &str, r: u8, f: u8, m: u8) -> RfmScore {
        RfmScore::new(id.to_owned(), r, f, m)
    }

    #[test]
    fn test_identical_population_forms_one_profile() {
        let records = (0..100)
            .map(|i| guest(&format!("G{i}"), 14, 3.0, 45.0))
            .collect::<Vec<_>>();
        let scores = score_population(&records).unwrap();
        let profiles = profile_segments(&records, &scores).unwrap();

        assert_eq!(profiles.len(), 1);
        let profile = &profiles[0];
        assert_eq!(profile.segment_name, "Potential Loyalists");
        assert_eq!(profile.segment_id, "potential_loyalists");
        assert_eq!(profile.size, 100);
        assert!((profile.size_percentage - 100.0).abs() < 1e-9);
        assert!((profile.revenue_share - 100.0).abs() < 1e-9);
        assert!((profile.avg_ticket - 15.0).abs() < 1e-9);
        assert_eq!(profile.avg_satisfaction, None);
        assert_eq!(profile.characteristics[1], "Recent visits (14 days ago)");
        assert_eq!(profile.recommendations.len(), 5);
    }

    #[test]
    fn test_sorted_by_revenue_share_and_sums_to_100() {
        let records = vec![
            guest("A", 1, 10.0, 500.0),
            guest("B", 200, 1.0, 20.0),
            guest("C", 30, 4.0, 120.0),
            guest("D", 300, 0.0, 0.0),
        ];
        let scores = vec![
            score("A", 5, 5, 5),
            score("B", 1, 1, 1),
            score("C", 4, 4, 4),
            score("D", 1, 1, 1),
        ];
        let profiles = profile_segments(&records, &scores).unwrap();
        let names = profiles.iter().map(|p| p.segment_name).collect::<Vec<_>>();
        assert_eq!(names, ["Champions", "Potential Loyalists", "Lost"]);
        let total = profiles.iter().map(|p| p.revenue_share).sum::<f64>();
        assert!((total - 100.0).abs() < 0.1);
        assert_eq!(profiles[2].size, 2);
        assert!((profiles[2].avg_recency - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_revenue_keeps_declaration_order() {
        let records = vec![guest("A", 400, 0.0, 0.0), guest("B", 1, 0.0, 0.0)];
        let scores = vec![score("A", 1, 1, 1), score("B", 5, 5, 5)];
        let profiles = profile_segments(&records, &scores).unwrap();
        assert!(profiles.iter().all(|p| p.revenue_share == 0.0));
        assert_eq!(profiles[0].segment(), Some(Segment::Champions));
        assert_eq!(profiles[1].segment(), Some(Segment::Lost));
    }

    #[test]
    fn test_modes_and_satisfaction() {
        let mut records = vec![
            guest("A", 5, 2.0, 50.0),
            guest("B", 5, 2.0, 50.0),
            guest("C", 5, 2.0, 50.0),
        ];
        records[0].preferred_channel = "mobile".to_owned();
        records[1].preferred_channel = "dine_in".to_owned();
        records[0].satisfaction_score = Some(4.0);
        records[2].satisfaction_score = Some(0.0);
        records[2].avg_ticket = Some(40.0);
        let scores = records
            .iter()
            .map(|r| score(&r.guest_id, 5, 5, 5))
            .collect::<Vec<_>>();

        let profile = profile_segments(&records, &scores).unwrap().remove(0);
        // One each of dine_in, drive_thru and mobile: lexicographic tie-break.
        assert_eq!(profile.primary_channel, "dine_in");
        assert_eq!(profile.primary_daypart, "lunch");
        assert_eq!(profile.avg_satisfaction, Some(2.0));
        assert!((profile.avg_ticket - 30.0).abs() < 1e-9);
        assert_eq!(profile.characteristics[3], "Premium ticket size ($30.00)");
    }

    #[test]
    fn test_mismatched_scores_are_rejected() {
        let records = vec![guest("A", 1, 1.0, 1.0), guest("B", 1, 1.0, 1.0)];
        let err = profile_segments(&records, &[score("A", 5, 5, 5)]).unwrap_err();
        assert!(matches!(err, AnalysisError::ScoreMismatch { .. }));

        let swapped = vec![score("B", 5, 5, 5), score("A", 5, 5, 5)];
        let err = profile_segments(&records, &swapped).unwrap_err();
        assert!(err.to_string().contains("position 0"));
    }
}
