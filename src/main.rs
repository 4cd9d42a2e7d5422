//! Betamax - live TV catalog client
//!
//! # Usage
//!
//! ```bash
//! betamax signin --email a@b.com --password secret
//! betamax genres --json
//! betamax channels --genre 3
//! betamax play 12 --quality fhd
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use betamax::cli::{Cli, Command, ExitCode, Output};
use betamax::commands::{self, Context};
use betamax::config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let exit_code = run_cli(cli).await;
    std::process::exit(exit_code.into());
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut ctx = Context::new(config, cli.api_url);

    match cli.command {
        Command::Signin(cmd) => commands::signin_cmd(cmd, &mut ctx, &output).await,
        Command::Channel(cmd) => commands::channel_cmd(cmd, &ctx, &output).await,
        Command::Genres(cmd) => commands::genres_cmd(cmd, &ctx, &output).await,
        Command::Channels(cmd) => commands::channels_cmd(cmd, &ctx, &output).await,
        Command::Play(cmd) => commands::play_cmd(cmd, &ctx, &output).await,
    }
}

/// Logs go to stderr so stdout stays parseable
fn init_logging(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init()?;

    Ok(())
}
