//! Binomen CLI - evaluation of machine-generated Latin species names
//!
//! Evaluates datasets of generated names, checks single names and prints the
//! reference data and configuration the evaluators run on.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins unless --verbose asks for debug output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Evaluate(args) => {
            cli::evaluate_command(*args).await?;
        }
        Commands::Check(args) => {
            cli::check_command(args).await?;
        }
        Commands::Score(args) => {
            cli::score_command(args).await?;
        }
        Commands::Prompt(args) => {
            cli::prompt_command(args).await?;
        }
        Commands::ListFamilies(args) => {
            cli::list_families(args).await?;
        }
        Commands::PrintDefaultConfig => {
            cli::print_default_config().await?;
        }
        Commands::InitConfig(args) => {
            cli::init_config(args).await?;
        }
        Commands::ValidateConfig(args) => {
            cli::validate_config(args).await?;
        }
    }

    Ok(())
}
