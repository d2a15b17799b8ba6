// ABOUTME: Entry point for the registry-prune CLI application.
// ABOUTME: Parses arguments, resolves configuration, and runs the prune command.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use registry_prune::config::{Config, Overrides};
use registry_prune::error::{Error, Result};
use registry_prune::output::Output;
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.output_mode());

    match run(cli, output).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, output: Output) -> Result<u8> {
    let overrides = Overrides {
        repository: cli.repository.clone(),
        region: cli.region.clone(),
        summary_file: cli.summary_file.clone(),
    };

    let config = load_config(&cli)?.with_overrides(overrides)?;
    commands::prune(config, output).await
}

/// Pick the configuration source: action inputs, an explicit file, a
/// discovered file, or just the `--repository` flag.
fn load_config(cli: &Cli) -> Result<Config> {
    if cli.action_inputs {
        return Config::from_action_inputs();
    }

    if let Some(ref path) = cli.config {
        return Config::load(path);
    }

    let cwd = env::current_dir()?;
    match Config::discover(&cwd) {
        Err(Error::ConfigNotFound(dir)) => match cli.repository {
            Some(ref repository) => registry_prune::types::RepositoryName::new(repository)
                .map(Config::new)
                .map_err(|e| Error::InvalidConfig(e.to_string())),
            None => Err(Error::ConfigNotFound(dir)),
        },
        other => other,
    }
}
