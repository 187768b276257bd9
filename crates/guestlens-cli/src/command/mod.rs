use clap::{Parser, Subcommand};

use self::{
    crosstab::CrosstabArg, nps::NpsArg, proportions::ProportionsArg, segment::SegmentArg,
    survey::SurveyArg, validate::ValidateArg,
};
use crate::util;

mod crosstab;
mod nps;
mod proportions;
mod segment;
mod survey;
mod validate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug output to stderr (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Analysis to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Validate guest records without segmenting them
    Validate(#[clap(flatten)] ValidateArg),
    /// Validate, score and segment guest records by RFM value
    Segment(#[clap(flatten)] SegmentArg),
    /// Cross-tabulate two survey fields with a chi-square test
    Crosstab(#[clap(flatten)] CrosstabArg),
    /// Compare two proportions with a two-sample z-test
    Proportions(#[clap(flatten)] ProportionsArg),
    /// Compute the Net Promoter Score of a survey field
    Nps(#[clap(flatten)] NpsArg),
    /// Summarize every field of a survey
    Survey(#[clap(flatten)] SurveyArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    util::init_logging(args.verbose);
    match args.mode {
        Mode::Validate(arg) => validate::run(&arg)?,
        Mode::Segment(arg) => segment::run(&arg)?,
        Mode::Crosstab(arg) => crosstab::run(&arg)?,
        Mode::Proportions(arg) => proportions::run(&arg)?,
        Mode::Nps(arg) => nps::run(&arg)?,
        Mode::Survey(arg) => survey::run(&arg)?,
    }
    Ok(())
}
