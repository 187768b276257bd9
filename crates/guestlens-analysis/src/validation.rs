//! Guest record validation.
//!
//! Validation turns raw rows into [`GuestRecord`]s and reports everything it
//! noticed along the way. It never fails with an error: malformed input is an
//! expected operating condition, so problems are itemized in a
//! [`ValidationOutcome`] and `success` tells the caller whether the surviving
//! population is large enough to analyze.
//!
//! # Checks
//!
//! Per row, in order:
//!
//! 1. Required fields are present. A row missing any is excluded and no other
//!    check runs for it.
//! 2. The `guest_id` has not been seen before (warning only).
//! 3. `recency_days`, `frequency` and `monetary` parse and are non-negative
//!    (errors exclude the row); implausibly large values are warnings.
//! 4. Optional attributes that fail to parse are dropped with a warning.
//!
//! Over the rows that passed:
//!
//! - fewer than the recommended sample size: warning
//! - fewer than the minimum sample size: `success = false`
//! - mean above `skew_ratio` times the median for frequency or monetary: warning

use std::collections::{BTreeMap, HashSet};

use guestlens_stats::descriptive;
use serde::Serialize;

use crate::{
    config::{ValidationConfig, ValidationThresholds},
    record::{
        self, AVG_TICKET, CORE_FIELDS, DEFAULT_CHANNEL, DEFAULT_DAYPART, FREQUENCY, GUEST_ID,
        GuestRecord, MONETARY, PREFERRED_CHANNEL, PREFERRED_DAYPART, RECENCY_DAYS, RawRecord,
        SATISFACTION_SCORE,
    },
};

/// Row counts reported by every validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationMetadata {
    pub rows_processed: usize,
    pub rows_valid: usize,
    pub rows_invalid: usize,
    /// Distinct `guest_id`s among rows that carried every required field.
    pub unique_guests: usize,
}

impl ValidationMetadata {
    /// The counts keyed by field name, for the analysis envelopes.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, usize> {
        BTreeMap::from([
            ("rows_processed".to_owned(), self.rows_processed),
            ("rows_valid".to_owned(), self.rows_valid),
            ("rows_invalid".to_owned(), self.rows_invalid),
            ("unique_guests".to_owned(), self.unique_guests),
        ])
    }
}

/// Result of validating a batch of raw guest rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub success: bool,
    pub valid_records: Vec<GuestRecord>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub metadata: ValidationMetadata,
}

/// A single finding produced during validation.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum ValidationIssue {
    #[display("No guest data provided")]
    NoData,
    #[display("Row {row}: Missing required fields: {}", fields.join(", "))]
    MissingFields { row: usize, fields: Vec<String> },
    #[display("Row {row}: Duplicate guest_id '{guest_id}'")]
    DuplicateGuest { row: usize, guest_id: String },
    #[display("Row {row}: Invalid {field} value")]
    InvalidValue { row: usize, field: &'static str },
    #[display("Row {row}: {field} cannot be negative")]
    NegativeValue { row: usize, field: &'static str },
    #[display("Row {row}: Very old recency ({days} days)")]
    StaleRecency { row: usize, days: u64 },
    #[display("Row {row}: Unusually high {field} ({value}), verify data")]
    Outlier {
        row: usize,
        field: &'static str,
        value: f64,
    },
    #[display("Row {row}: Ignoring invalid {field} value")]
    IgnoredOptional { row: usize, field: &'static str },
    #[display(
        "Sample size ({size}) is below recommended minimum of {recommended} for reliable segmentation"
    )]
    SmallSample { size: usize, recommended: usize },
    #[display("Only {size} valid records; at least {minimum} are required for analysis")]
    BelowMinimum { size: usize, minimum: usize },
    #[display("{dimension} distribution is highly skewed - consider log transformation")]
    Skewed { dimension: &'static str },
}

/// Findings for one row; `record` is present only when no error was raised.
#[derive(Debug, Default)]
struct RowCheck {
    record: Option<GuestRecord>,
    warnings: Vec<ValidationIssue>,
    errors: Vec<ValidationIssue>,
}

/// Validates raw guest rows against `config`.
///
/// # Examples
///
/// ```
/// use guestlens_analysis::{config::ValidationConfig, validation::validate_guest_data};
/// use serde_json::json;
///
/// let rows = (0..40)
///     .map(|i| {
///         json!({ "guest_id": format!("G{i}"), "recency_days": i, "frequency": 2, "monetary": 50 })
///             .as_object()
///             .cloned()
///             .unwrap()
///     })
///     .collect::<Vec<_>>();
/// let outcome = validate_guest_data(&rows, &ValidationConfig::default());
/// assert!(outcome.success);
/// assert_eq!(outcome.metadata.rows_valid, 40);
/// // 40 guests is below the recommended 100
/// assert_eq!(outcome.warnings.len(), 1);
/// ```
#[must_use]
pub fn validate_guest_data(records: &[RawRecord], config: &ValidationConfig) -> ValidationOutcome {
    if records.is_empty() {
        tracing::warn!("no guest data provided");
        return ValidationOutcome {
            success: false,
            valid_records: vec![],
            warnings: vec![],
            errors: vec![ValidationIssue::NoData.to_string()],
            metadata: ValidationMetadata::default(),
        };
    }

    let required = required_fields(config);
    let thresholds = &config.thresholds;
    let mut seen_ids = HashSet::new();
    let mut valid_records = Vec::new();
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    for (index, raw) in records.iter().enumerate() {
        let check = check_row(index + 1, raw, &required, thresholds, &mut seen_ids);
        warnings.extend(check.warnings.iter().map(ToString::to_string));
        errors.extend(check.errors.iter().map(ToString::to_string));
        valid_records.extend(check.record);
    }

    let population = check_population(&valid_records, thresholds);
    warnings.extend(population.warnings.iter().map(ToString::to_string));
    errors.extend(population.errors.iter().map(ToString::to_string));
    let success = population.errors.is_empty();

    let metadata = ValidationMetadata {
        rows_processed: records.len(),
        rows_valid: valid_records.len(),
        rows_invalid: records.len() - valid_records.len(),
        unique_guests: seen_ids.len(),
    };
    if success {
        tracing::debug!(
            rows_processed = metadata.rows_processed,
            rows_valid = metadata.rows_valid,
            warnings = warnings.len(),
            "guest data validated"
        );
    } else {
        tracing::warn!(
            rows_processed = metadata.rows_processed,
            rows_valid = metadata.rows_valid,
            "guest data failed validation"
        );
    }

    ValidationOutcome {
        success,
        valid_records,
        warnings,
        errors,
        metadata,
    }
}

/// The configured required fields followed by any core field they omit.
fn required_fields(config: &ValidationConfig) -> Vec<String> {
    let mut fields = config.required_fields.clone();
    for core in CORE_FIELDS {
        if !fields.iter().any(|f| f == core) {
            fields.push(core.to_owned());
        }
    }
    fields
}

fn check_row(
    row: usize,
    raw: &RawRecord,
    required: &[String],
    thresholds: &ValidationThresholds,
    seen_ids: &mut HashSet<String>,
) -> RowCheck {
    let mut check = RowCheck::default();

    let missing = required
        .iter()
        .filter(|field| !raw.contains_key(field.as_str()))
        .cloned()
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        check.errors.push(ValidationIssue::MissingFields {
            row,
            fields: missing,
        });
        return check;
    }

    let guest_id = record::label(&raw[GUEST_ID]);
    if !seen_ids.insert(guest_id.clone()) {
        check.warnings.push(ValidationIssue::DuplicateGuest {
            row,
            guest_id: guest_id.clone(),
        });
    }

    let recency_days = match record::parse_integer(&raw[RECENCY_DAYS]) {
        None => {
            check.errors.push(ValidationIssue::InvalidValue {
                row,
                field: RECENCY_DAYS,
            });
            None
        }
        Some(days) if days < 0 => {
            check.errors.push(ValidationIssue::NegativeValue {
                row,
                field: RECENCY_DAYS,
            });
            None
        }
        Some(days) => {
            let days = days.unsigned_abs();
            if days > thresholds.max_recency_days {
                check
                    .warnings
                    .push(ValidationIssue::StaleRecency { row, days });
            }
            Some(days)
        }
    };
    let frequency = check_amount(&mut check, row, raw, FREQUENCY, thresholds.max_frequency);
    let monetary = check_amount(&mut check, row, raw, MONETARY, thresholds.max_monetary);

    let avg_ticket = optional_amount(&mut check, row, raw, AVG_TICKET);
    let satisfaction_score = optional_amount(&mut check, row, raw, SATISFACTION_SCORE);

    if let (Some(recency_days), Some(frequency), Some(monetary)) =
        (recency_days, frequency, monetary)
    {
        check.record = Some(GuestRecord {
            guest_id,
            recency_days,
            frequency,
            monetary,
            preferred_daypart: optional_label(raw, PREFERRED_DAYPART, DEFAULT_DAYPART),
            preferred_channel: optional_label(raw, PREFERRED_CHANNEL, DEFAULT_CHANNEL),
            avg_ticket,
            satisfaction_score,
        });
    }
    check
}

/// Parses a required non-negative real, flagging values above `max`.
fn check_amount(
    check: &mut RowCheck,
    row: usize,
    raw: &RawRecord,
    field: &'static str,
    max: f64,
) -> Option<f64> {
    let Some(value) = record::parse_real(&raw[field]) else {
        check
            .errors
            .push(ValidationIssue::InvalidValue { row, field });
        return None;
    };
    if value < 0.0 {
        check
            .errors
            .push(ValidationIssue::NegativeValue { row, field });
        return None;
    }
    if value > max {
        check
            .warnings
            .push(ValidationIssue::Outlier { row, field, value });
    }
    Some(value)
}

/// Parses an optional non-negative real; absent and `null` are `None`.
fn optional_amount(
    check: &mut RowCheck,
    row: usize,
    raw: &RawRecord,
    field: &'static str,
) -> Option<f64> {
    let value = raw.get(field).filter(|v| !v.is_null())?;
    let parsed = record::parse_real(value).filter(|v| *v >= 0.0);
    if parsed.is_none() {
        check
            .warnings
            .push(ValidationIssue::IgnoredOptional { row, field });
    }
    parsed
}

fn optional_label(raw: &RawRecord, field: &str, default: &str) -> String {
    raw.get(field)
        .filter(|v| !v.is_null())
        .map_or_else(|| default.to_owned(), record::label)
}

/// Population-level checks over the rows that passed every row check.
fn check_population(records: &[GuestRecord], thresholds: &ValidationThresholds) -> RowCheck {
    let mut check = RowCheck::default();
    let size = records.len();

    if size < thresholds.recommended_sample_size {
        check.warnings.push(ValidationIssue::SmallSample {
            size,
            recommended: thresholds.recommended_sample_size,
        });
    }
    if size < thresholds.minimum_sample_size {
        check.errors.push(ValidationIssue::BelowMinimum {
            size,
            minimum: thresholds.minimum_sample_size,
        });
    }

    let frequencies = records.iter().map(|r| r.frequency).collect::<Vec<_>>();
    let monetaries = records.iter().map(|r| r.monetary).collect::<Vec<_>>();
    for (dimension, values) in [("Frequency", &frequencies), ("Monetary", &monetaries)] {
        if is_skewed(values, thresholds.skew_ratio) {
            check.warnings.push(ValidationIssue::Skewed { dimension });
        }
    }
    check
}

fn is_skewed(values: &[f64], ratio: f64) -> bool {
    match (descriptive::mean(values), descriptive::median(values)) {
        (Some(mean), Some(median)) => mean > median * ratio,
        _ => false,
    }
}
