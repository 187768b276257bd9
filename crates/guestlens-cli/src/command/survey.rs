use std::path::PathBuf;

use clap::Args;
use guestlens_analysis::survey::analyze_survey;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct SurveyArg {
    /// Path to the survey responses JSON file (an array of objects)
    pub responses: PathBuf,
    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SurveyArg) -> anyhow::Result<()> {
    let responses = util::read_records_file("survey responses", &arg.responses)?;
    let outcome = analyze_survey(&responses);
    Output::save_report("survey", &outcome, arg.output.as_deref())?;
    util::ensure_success(outcome.success, "survey analysis", &outcome.errors)
}
