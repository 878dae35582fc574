use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use smellview_core::catalog::CountPolicy;

#[derive(Debug, Parser)]
#[command(
    name = "smellview",
    version,
    about = "Render code smell reports from the Python smell analysis service"
)]
pub struct Args {
    /// Path to a raw report JSON file, or `-` for stdin.
    /// With --upload, path to the zipped source tree to analyze.
    pub input: PathBuf,

    /// Output format
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// How occurrences contribute to category counts
    #[arg(long)]
    pub count_policy: Option<PolicyArg>,

    /// Print flagged source lines under each row (text format)
    #[arg(long)]
    pub source: bool,

    /// Config file (defaults to .smellviewrc.json in the working directory or a parent)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Upload the input archive to the analysis service and render its response
    #[cfg(feature = "upload")]
    #[arg(long)]
    pub upload: bool,

    /// Analysis service base URL (overrides config)
    #[cfg(feature = "upload")]
    #[arg(long)]
    pub server: Option<String>,

    /// Log diagnostics to stderr (-v debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    Lines,
    Occurrences,
}

impl From<PolicyArg> for CountPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Lines => CountPolicy::Lines,
            PolicyArg::Occurrences => CountPolicy::Occurrences,
        }
    }
}
