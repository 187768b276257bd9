/// Errors raised by the statistical operations of the engine.
///
/// Validation problems are not errors: they are reported through
/// [`ValidationOutcome`](crate::validation::ValidationOutcome). These variants
/// cover preconditions that can fail even on fully valid data.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("Insufficient data for {context}: need at least {required}, got {actual}")]
    InsufficientData {
        context: &'static str,
        required: usize,
        actual: usize,
    },
    #[display("No valid NPS scores found in field '{field}'")]
    NoValidScores { field: String },
    #[display("RFM scores do not match guest records: {reason}")]
    ScoreMismatch { reason: String },
    #[display("Proportion must lie within [0, 1], got {value}")]
    InvalidProportion { value: f64 },
}

impl AnalysisError {
    pub(crate) fn insufficient(context: &'static str, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            context,
            required,
            actual,
        }
    }

    #[must_use]
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}
