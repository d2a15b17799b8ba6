// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Configuration sources, overrides, and output mode flags.

use clap::Parser;
use registry_prune::output::OutputMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "registry-prune")]
#[command(about = "Delete untagged (dangling) images from a container registry repository")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: registry-prune.yml in the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read configuration from GitHub Actions inputs (INPUT_* variables)
    #[arg(long, conflicts_with = "config")]
    pub action_inputs: bool,

    /// Repository to prune
    #[arg(short, long)]
    pub repository: Option<String>,

    /// Registry region
    #[arg(long)]
    pub region: Option<String>,

    /// Append a markdown summary to this file
    #[arg(long, env = "GITHUB_STEP_SUMMARY")]
    pub summary_file: Option<PathBuf>,

    /// Only print counts, the summary, and errors
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}
