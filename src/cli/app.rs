use super::commands::config::ConfigCommands;
use super::commands::snapshot::SnapshotArgs;
use super::commands::tui::TuiArgs;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ship-status")]
#[command(about = "Ship status console with routed telemetry screens")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the console (default)
    Tui(TuiArgs),
    /// List registered routes, hotkeys and surfaces
    Routes,
    /// Print one telemetry snapshot as JSON
    Snapshot(SnapshotArgs),
    /// Configuration file management
    Config(ConfigCommands),
}
