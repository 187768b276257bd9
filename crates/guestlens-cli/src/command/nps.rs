use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use guestlens_analysis::nps::analyze_nps;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct NpsArg {
    /// Path to the survey responses JSON file (an array of objects)
    pub responses: PathBuf,
    /// Field holding the 0-10 recommendation score
    #[arg(long, default_value = "nps_score")]
    pub field: String,
    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &NpsArg) -> anyhow::Result<()> {
    let responses = util::read_records_file("survey responses", &arg.responses)?;
    let result = analyze_nps(&responses, &arg.field)
        .with_context(|| format!("Failed to compute NPS from field '{}'", arg.field))?;
    tracing::info!(
        nps = result.nps_score,
        responses = result.total_responses,
        "NPS computed"
    );
    Output::save_report("nps", &result, arg.output.as_deref())
}
