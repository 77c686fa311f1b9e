use anyhow::{Context, Result};
use clap::Args;

use crate::config::Config;
use crate::telemetry::{DataSource, SyntheticTelemetry};

#[derive(Args, Debug, Default)]
pub struct SnapshotArgs {
    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,
    /// Noise seed, overriding the config file
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn snapshot_command(args: SnapshotArgs, config: &Config) -> Result<()> {
    let json = render_snapshot(&args, config)?;
    println!("{}", json);
    Ok(())
}

fn render_snapshot(args: &SnapshotArgs, config: &Config) -> Result<String> {
    let telemetry = SyntheticTelemetry::new(args.seed.or(config.telemetry.seed));
    let status = telemetry.snapshot();
    let json = if args.pretty {
        serde_json::to_string_pretty(&status)
    } else {
        serde_json::to_string(&status)
    };
    json.context("Failed to serialize telemetry snapshot")
}
