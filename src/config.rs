use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::router::DEFAULT_ROUTE;
use crate::tui::ThemeVariant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub theme: ThemeVariant,
    #[serde(default)]
    pub router: RouterSettings,
    #[serde(default)]
    pub boot: BootSettings,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterSettings {
    #[serde(default = "default_route")]
    pub default_route: String,
    /// Total duration of an animated screen swap
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default = "default_true")]
    pub animate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_line_interval_ms")]
    pub line_interval_ms: u64,
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AudioSettings {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    /// Samples kept per screen for sparklines
    #[serde(default = "default_history")]
    pub history: usize,
    /// Fixed noise seed, random per run when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_route() -> String {
    DEFAULT_ROUTE.to_string()
}

fn default_transition_ms() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_line_interval_ms() -> u64 {
    180
}

fn default_hold_ms() -> u64 {
    600
}

fn default_refresh_ms() -> u64 {
    500
}

fn default_history() -> usize {
    60
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            default_route: default_route(),
            transition_ms: default_transition_ms(),
            animate: default_true(),
        }
    }
}

impl Default for BootSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            line_interval_ms: default_line_interval_ms(),
            hold_ms: default_hold_ms(),
        }
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            refresh_ms: default_refresh_ms(),
            history: default_history(),
            seed: None,
        }
    }
}

impl RouterSettings {
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

impl TelemetrySettings {
    pub fn refresh_interval(&self) -> Duration {
        // A zero interval would make tokio's interval panic
        Duration::from_millis(self.refresh_ms.max(1))
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("ship-status")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".ship-status")
        };

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        debug!(
            "Loaded config: default route '{}', boot {}",
            config.router.default_route,
            if config.boot.enabled { "on" } else { "off" }
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir).with_context(|| {
                    format!("Failed to create config directory: {:?}", config_dir)
                })?;
                info!("Created config directory: {:?}", config_dir);
            }
        }

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }
}
