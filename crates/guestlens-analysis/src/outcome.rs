use std::collections::BTreeMap;

use serde::Serialize;

/// Envelope returned by the end-to-end analyses.
///
/// Mirrors [`ValidationOutcome`](crate::validation::ValidationOutcome): data
/// problems are reported, not raised. `data` is present exactly when
/// `success` is true. Warnings collected by earlier stages are always carried
/// through, including on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub metadata: BTreeMap<String, usize>,
}

impl<T> AnalysisOutcome<T> {
    #[must_use]
    pub fn succeeded(data: T, warnings: Vec<String>, metadata: BTreeMap<String, usize>) -> Self {
        Self {
            success: true,
            data: Some(data),
            warnings,
            errors: vec![],
            metadata,
        }
    }

    #[must_use]
    pub fn failed(
        errors: Vec<String>,
        warnings: Vec<String>,
        metadata: BTreeMap<String, usize>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            warnings,
            errors,
            metadata,
        }
    }
}
