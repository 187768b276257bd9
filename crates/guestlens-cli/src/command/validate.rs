use std::path::PathBuf;

use clap::Args;
use guestlens_analysis::validation::validate_guest_data;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct ValidateArg {
    /// Path to the guest records JSON file (an array of objects)
    pub guests: PathBuf,
    /// Analysis configuration JSON file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ValidateArg) -> anyhow::Result<()> {
    let config = util::read_config_file(arg.config.as_deref())?;
    let records = util::read_records_file("guest data", &arg.guests)?;

    let outcome = validate_guest_data(&records, &config.validation);
    tracing::info!(
        rows_valid = outcome.metadata.rows_valid,
        rows_invalid = outcome.metadata.rows_invalid,
        warnings = outcome.warnings.len(),
        "validation finished"
    );

    Output::save_report("validate", &outcome, arg.output.as_deref())?;
    util::ensure_success(outcome.success, "validation", &outcome.errors)
}
