use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use ship_status::cli::commands::{config_command, routes_command, snapshot_command, tui_command};
use ship_status::cli::{Cli, Commands};
use ship_status::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // The console owns stdout, so logs go to a file (truncated each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("ship-status.log")
        .context("Failed to open ship-status.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    info!("Starting ship-status");

    match cli.command.unwrap_or(Commands::Tui(Default::default())) {
        Commands::Tui(args) => tui_command(args, &config).await,
        Commands::Routes => routes_command(&config),
        Commands::Snapshot(args) => snapshot_command(args, &config),
        Commands::Config(args) => config_command(args, &config),
    }
}
