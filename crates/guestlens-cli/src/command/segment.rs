use std::path::PathBuf;

use clap::Args;
use guestlens_analysis::pipeline::run_segmentation;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct SegmentArg {
    /// Path to the guest records JSON file (an array of objects)
    pub guests: PathBuf,
    /// Analysis configuration JSON file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SegmentArg) -> anyhow::Result<()> {
    let config = util::read_config_file(arg.config.as_deref())?;
    let records = util::read_records_file("guest data", &arg.guests)?;

    let outcome = run_segmentation(&records, &config);
    if let Some(analysis) = &outcome.data {
        for share in &analysis.segment_distribution {
            tracing::info!(
                segment = share.segment,
                size = share.size,
                revenue_share = share.revenue_share,
                "segment"
            );
        }
    }

    Output::save_report("segment", &outcome, arg.output.as_deref())?;
    util::ensure_success(outcome.success, "segmentation", &outcome.errors)
}
