use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use guestlens_analysis::significance::crosstab;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct CrosstabArg {
    /// Path to the survey responses JSON file (an array of objects)
    pub responses: PathBuf,
    /// Field whose categories form the rows
    #[arg(long)]
    pub row: String,
    /// Field whose categories form the columns
    #[arg(long)]
    pub col: String,
    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CrosstabArg) -> anyhow::Result<()> {
    let responses = util::read_records_file("survey responses", &arg.responses)?;
    let result = crosstab(&responses, &arg.row, &arg.col)
        .with_context(|| format!("Failed to cross-tabulate {} by {}", arg.row, arg.col))?;
    tracing::info!(
        chi_square = result.chi_square,
        degrees_of_freedom = result.degrees_of_freedom,
        significance = %result.significance,
        "crosstab finished"
    );
    Output::save_report("crosstab", &result, arg.output.as_deref())
}
