//! Configuration loader plus strongly typed settings structures.
//!
//! The default `config.toml` is embedded at compile time and extracted into the
//! data directory on first run; afterwards the user's copy is the source of
//! truth. Everything the UI shows (captions, colors, download targets) comes
//! from here.

use anyhow::{bail, Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

// Embed default configuration at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

/// Environment variable overriding the data directory (~/.loadapp)
pub const DATA_DIR_ENV: &str = "LOADAPP_DIR";

/// Top-level configuration object loaded from config.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ui: UiConfig,
    pub button: ButtonConfig,
    #[serde(default)]
    pub colors: StatusColors,
    pub strings: Strings,
    pub downloads: DownloadsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Toolbar title
    #[serde(default = "default_title")]
    pub title: String,
    /// Event poll timeout - lower = smoother animation, higher CPU
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
    /// How long a toast stays on screen
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
}

/// Visual configuration of the progress button.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonConfig {
    pub text_color: String,
    pub background: String,
    pub loading_color: String,
    pub arc_color: String,
    #[serde(default = "default_true")]
    pub show_arc: bool,
    #[serde(default = "default_animation_duration_ms")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub horizontal_padding: u16,
    #[serde(default)]
    pub vertical_padding: u16,
    #[serde(default = "default_min_height")]
    pub min_height: u16,
}

/// Colors used to render a download status on the detail screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusColors {
    pub success: String,
    pub failure: String,
}

impl Default for StatusColors {
    fn default() -> Self {
        Self {
            success: "#00c853".to_string(),
            failure: "#ef5350".to_string(),
        }
    }
}

/// User-visible strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strings {
    pub button_name: String,
    pub button_loading: String,
    pub success: String,
    pub failed: String,
    pub empty_option: String,
    pub notification_title: String,
    pub notification_button: String,
    pub channel_id: String,
    pub channel_name: String,
    pub channel_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadsConfig {
    /// Where downloaded files land (defaults to the platform download dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub targets: Vec<DownloadTarget>,
}

/// One selectable download option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTarget {
    pub key: String,
    pub label: String,
    pub url: String,
    pub title: String,
    pub description: String,
}

fn default_title() -> String {
    "LoadApp".to_string()
}

fn default_poll_timeout_ms() -> u64 {
    16
}

fn default_toast_duration_ms() -> u64 {
    3500
}

fn default_true() -> bool {
    true
}

fn default_animation_duration_ms() -> u64 {
    1000
}

fn default_min_height() -> u16 {
    3
}

impl Config {
    /// Load config.toml from the data directory, extracting defaults first.
    pub fn load() -> Result<Self> {
        Self::extract_defaults()?;
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load config from a custom file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .context(format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;

        tracing::info!(
            "Loaded config from {:?} ({} download targets)",
            path,
            config.downloads.targets.len()
        );
        Ok(config)
    }

    /// Write the embedded config.toml if the user doesn't have one yet.
    fn extract_defaults() -> Result<()> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            return Ok(());
        }
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create data directory: {:?}", parent))?;
        }
        fs::write(&config_path, DEFAULT_CONFIG).context("Failed to write default config.toml")?;
        tracing::info!("Extracted default config to {:?}", config_path);
        Ok(())
    }

    /// Reject configurations the UI cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.downloads.targets.is_empty() {
            bail!("At least one [[downloads.targets]] entry is required");
        }

        let mut seen = HashSet::new();
        for target in &self.downloads.targets {
            if !seen.insert(target.key.as_str()) {
                bail!("Duplicate download target key '{}'", target.key);
            }
            if target.url.trim().is_empty() {
                bail!("Download target '{}' has an empty url", target.key);
            }
        }

        if self.button.animation_duration_ms == 0 {
            bail!("button.animation_duration_ms must be greater than zero");
        }

        Ok(())
    }

    /// Resolve the directory downloads are written to.
    pub fn download_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.downloads.directory {
            return Ok(dir.clone());
        }
        if let Some(dir) = dirs::download_dir() {
            return Ok(dir);
        }
        Ok(Self::config_dir()?.join("downloads"))
    }

    /// Get the base loadapp directory (~/.loadapp/)
    /// Can be overridden with LOADAPP_DIR environment variable
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".loadapp"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

/// Parse a `#rrggbb` hex string into a terminal color.
pub fn parse_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
impl Config {
    /// Parse the configuration embedded in the binary.
    pub fn embedded() -> Result<Self> {
        toml::from_str(DEFAULT_CONFIG).context("Failed to parse embedded default config")
    }

    pub fn target(&self, key: &str) -> Option<&DownloadTarget> {
        self.downloads.targets.iter().find(|t| t.key == key)
    }
}
