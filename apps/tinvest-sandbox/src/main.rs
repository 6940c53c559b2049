mod commands;
mod config;
mod logging;

use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tinvest_sandbox_sdk::RestSandboxClient;

use crate::commands::Command;
use crate::config::AppConfig;

/// Manage simulated brokerage accounts in the sandbox
#[derive(Debug, Parser)]
#[command(name = "tinvest-sandbox")]
#[command(about = "TInvest sandbox - manage simulated brokerage accounts")]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !path.is_file()
    {
        bail!("config file does not exist: {}", path.display());
    }

    // 1) defaults -> 2) YAML (if provided) -> 3) env (TINVEST__*)
    let config = AppConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging, cli.verbose)?;

    if cli.print_config {
        println!("{}", config.to_pretty_json()?);
        return Ok(());
    }

    let Some(command) = cli.command else {
        bail!("no command given; run with --help to list commands");
    };

    if config.api.token.is_none() {
        tracing::warn!("no API token configured; set api.token or TINVEST__API__TOKEN");
    }
    tracing::debug!(base_url = %config.api.base_url, "using sandbox API");

    let client = RestSandboxClient::from_config(config.api)?;
    let value = command.run(&client).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
