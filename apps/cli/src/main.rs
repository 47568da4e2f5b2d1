use std::process::ExitCode;

use clap::Parser;
use verdict_cli::cli::{Cli, Command};
use verdict_cli::commands;
use verdict_cli::config::Config;
use verdict_cli::init_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let config = Config::from_env();
    init_tracing(&config.log_format);
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let outcome = commands::run(&config, args).await?;
            // Partial batches are saved, but the run still counts as failed.
            match outcome {
                Some(outcome) if !outcome.is_complete() => Ok(ExitCode::from(2)),
                _ => Ok(ExitCode::SUCCESS),
            }
        }
        Command::Report(args) => {
            commands::report(&config, args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
