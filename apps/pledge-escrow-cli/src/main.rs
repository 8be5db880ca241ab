use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use error::CliResult;

#[derive(Parser)]
#[command(name = "pledge-escrow")]
#[command(about = "Pledge Escrow CLI - Simulate bonded, disputable crowdfunding campaigns")]
#[command(version)]
struct Cli {
    /// Log handler decisions (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default escrow parameters as YAML
    DefaultConfig {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute the commitment hash of verification criteria
    PromptHash {
        /// Criteria text
        criteria: String,

        /// Expected hash (hex); fails if it does not match
        #[arg(short, long)]
        expect: Option<String>,
    },

    /// Run a campaign scenario against in-memory token and yield pool
    Simulate {
        /// Scenario file (YAML)
        scenario: PathBuf,

        /// Escrow parameters file (YAML); overrides the scenario's own
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stop at the first rejected step
        #[arg(long)]
        strict: bool,

        /// Write the JSON report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::DefaultConfig { output } => commands::default_config::execute(output),

        Commands::PromptHash { criteria, expect } => {
            commands::prompt_hash::execute(criteria, expect)
        }

        Commands::Simulate {
            scenario,
            config,
            strict,
            output,
        } => commands::simulate::execute(scenario, config, strict, output).await,
    }
}
