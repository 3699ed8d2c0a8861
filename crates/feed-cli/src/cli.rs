use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Named run sizes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PlanPreset {
    Brief,
    Daily,
    Extended,
}

impl PlanPreset {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brief => "brief",
            Self::Daily => "daily",
            Self::Extended => "extended",
        }
    }
}

/// Top-level CLI parser for the `studyfeed` binary.
#[derive(Debug, Parser)]
#[command(
    name = "studyfeed",
    version,
    about = "Generate a daily feed of notable studies, link each one, and save it"
)]
pub struct Cli {
    /// Run plan preset (overrides `feed.plan` and any custom `feed.tracks`)
    #[arg(long, value_enum)]
    pub plan: Option<PlanPreset>,

    /// Output file for the JSON collection
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extra TOML config file, layered above studyfeed.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip the registry lookup; unlinked studies get a search link
    #[arg(long)]
    pub no_lookup: bool,

    /// Skip the database sink even when a store URL is configured
    #[arg(long)]
    pub no_store: bool,

    /// Print the generation prompt and exit without calling any service
    #[arg(long)]
    pub print_prompt: bool,

    /// Quiet mode (errors only, no progress)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}
