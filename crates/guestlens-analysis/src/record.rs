//! Input records and value coercion.
//!
//! Raw input arrives as heterogeneous JSON objects ([`RawRecord`]). Numeric
//! fields may be JSON numbers or numeric strings; the helpers here apply the
//! same coercion rules everywhere a raw value is read.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single untyped input row.
pub type RawRecord = serde_json::Map<String, Value>;

pub const GUEST_ID: &str = "guest_id";
pub const RECENCY_DAYS: &str = "recency_days";
pub const FREQUENCY: &str = "frequency";
pub const MONETARY: &str = "monetary";
pub const PREFERRED_DAYPART: &str = "preferred_daypart";
pub const PREFERRED_CHANNEL: &str = "preferred_channel";
pub const AVG_TICKET: &str = "avg_ticket";
pub const SATISFACTION_SCORE: &str = "satisfaction_score";

/// Fields needed to score a guest.
pub const CORE_FIELDS: [&str; 4] = [GUEST_ID, RECENCY_DAYS, FREQUENCY, MONETARY];

pub const DEFAULT_DAYPART: &str = "lunch";
pub const DEFAULT_CHANNEL: &str = "drive_thru";

/// A validated guest transaction summary.
///
/// Built once by the validator and never modified afterwards; scores are
/// derived into separate [`RfmScore`](crate::scoring::RfmScore) values.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GuestRecord {
    pub guest_id: String,
    /// Days since the last visit (lower is better).
    pub recency_days: u64,
    /// Visits per period.
    pub frequency: f64,
    /// Total spend.
    pub monetary: f64,
    pub preferred_daypart: String,
    pub preferred_channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_ticket: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfaction_score: Option<f64>,
}

impl GuestRecord {
    /// Average ticket, falling back to `monetary / max(frequency, 1)` when
    /// the record does not carry one.
    #[must_use]
    pub fn ticket(&self) -> f64 {
        self.avg_ticket
            .unwrap_or_else(|| self.monetary / self.frequency.max(1.0))
    }
}

/// Renders a raw value as a category label.
///
/// Strings are used verbatim; any other value uses its JSON text
/// (`5`, `4.5`, `true`, `null`).
pub(crate) fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reads an integer. Fractional numbers truncate toward zero; strings must
/// hold an integer literal.
#[expect(clippy::cast_possible_truncation)]
pub(crate) fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a finite real number from a JSON number or numeric string.
pub(crate) fn parse_real(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(label(&json!("dine_in")), "dine_in");
        assert_eq!(label(&json!(5)), "5");
        assert_eq!(label(&json!(true)), "true");
        assert_eq!(label(&Value::Null), "null");
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer(&json!(30)), Some(30));
        assert_eq!(parse_integer(&json!(-4)), Some(-4));
        assert_eq!(parse_integer(&json!(9.7)), Some(9));
        assert_eq!(parse_integer(&json!(" 12 ")), Some(12));
        assert_eq!(parse_integer(&json!("12.5")), None);
        assert_eq!(parse_integer(&json!("abc")), None);
        assert_eq!(parse_integer(&json!(true)), None);
        assert_eq!(parse_integer(&Value::Null), None);
    }

    #[test]
    fn test_parse_real() {
        assert_eq!(parse_real(&json!(2.5)), Some(2.5));
        assert_eq!(parse_real(&json!(3)), Some(3.0));
        assert_eq!(parse_real(&json!("19.99")), Some(19.99));
        assert_eq!(parse_real(&json!("NaN")), None);
        assert_eq!(parse_real(&json!("inf")), None);
        assert_eq!(parse_real(&json!([])), None);
    }

    #[test]
    fn test_ticket_fallback() {
        let mut record = GuestRecord {
            guest_id: "G1".to_owned(),
            recency_days: 10,
            frequency: 0.5,
            monetary: 40.0,
            preferred_daypart: DEFAULT_DAYPART.to_owned(),
            preferred_channel: DEFAULT_CHANNEL.to_owned(),
            avg_ticket: None,
            satisfaction_score: None,
        };
        // Frequencies below one are floored to one.
        assert_eq!(record.ticket(), 40.0);
        record.frequency = 4.0;
        assert_eq!(record.ticket(), 10.0);
        record.avg_ticket = Some(12.5);
        assert_eq!(record.ticket(), 12.5);
    }
}
