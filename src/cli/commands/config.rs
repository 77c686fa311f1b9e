use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print where the config file lives
    Path,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

pub fn config_command(args: ConfigCommands, config: &Config) -> Result<()> {
    match args.command {
        ConfigSubcommands::Show => {
            let content = toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;
            print!("{}", content);
        }
        ConfigSubcommands::Path => {
            println!("{}", Config::get_config_path()?.display());
        }
        ConfigSubcommands::Init { force } => {
            let path = Config::get_config_path()?;
            if init_config(&path, force)? {
                println!("{} Config written to {}", "✓".bright_green().bold(), path.display().to_string().cyan());
            } else {
                println!(
                    "{} Config already exists at {} (use --force to overwrite)",
                    "⚠️".bright_yellow().bold(),
                    path.display().to_string().cyan()
                );
            }
        }
    }
    Ok(())
}

/// Returns false when the file exists and `force` is off
fn init_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    Config::default().save_to(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_init_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "theme = \"latte\"\n").unwrap();

        assert!(!init_config(&path, false).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "theme = \"latte\"\n");

        assert!(init_config(&path, true).unwrap());
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ship-status").join("config.toml");
        assert!(init_config(&path, false).unwrap());
        assert!(path.exists());
    }
}
