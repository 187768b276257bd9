use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use guestlens_analysis::significance::test_proportions;

use crate::util::Output;

#[derive(Debug, Clone, Args)]
pub(crate) struct ProportionsArg {
    /// Size of the first sample
    #[arg(long)]
    pub n1: usize,
    /// Proportion observed in the first sample (0-1)
    #[arg(long)]
    pub p1: f64,
    /// Size of the second sample
    #[arg(long)]
    pub n2: usize,
    /// Proportion observed in the second sample (0-1)
    #[arg(long)]
    pub p2: f64,
    /// Output file path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ProportionsArg) -> anyhow::Result<()> {
    let result = test_proportions(arg.n1, arg.p1, arg.n2, arg.p2)
        .context("Failed to compare proportions")?;
    tracing::info!(z = result.z, significance = %result.significance, "proportion test finished");
    Output::save_report("proportions", &result, arg.output.as_deref())
}
