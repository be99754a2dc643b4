//! # Configuration Module
//!
//! Runtime settings for the `leitunes` front end, stored as JSON in the
//! platform-standard configuration directory:
//! - Linux: `~/.config/leitunes/config.json`
//! - macOS: `~/Library/Application Support/leitunes/config.json`
//! - Windows: `%APPDATA%\leitunes\config.json`
//!
//! A missing file is not an error: every field has a default, and a partial
//! file only overrides the fields it names.

use crate::smart::DEFAULT_SMART_SIZE;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the platform-appropriate configuration file path.
///
/// The `leitunes` subdirectory is created if it does not exist yet, so the
/// returned path can be written straight away.
///
/// # Errors
///
/// This function will return an error if:
/// - The system configuration directory cannot be determined
/// - The leitunes subdirectory cannot be created due to permissions
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system configuration directory. Please pass --config explicitly."
        )
    })?;

    let leitunes_dir = config_dir.join("leitunes");
    fs::create_dir_all(&leitunes_dir).with_context(|| {
        format!(
            "Failed to create configuration directory at {}. Please check file permissions.",
            leitunes_dir.display()
        )
    })?;

    Ok(leitunes_dir.join("config.json"))
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Member count the smart playlists are kept at
    pub smart_playlist_size: usize,
    /// File extensions picked up when scanning a music directory
    pub extensions: Vec<String>,
    /// Separator between names in a multi-artist tag
    pub artist_separator: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            smart_playlist_size: DEFAULT_SMART_SIZE,
            extensions: ["mp3", "flac", "ogg", "m4a", "wav"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            artist_separator: ";".to_owned(),
        }
    }
}

impl RuntimeConfig {
    /// Loads the configuration at `path`, or at [`get_config_path`] when no
    /// path is given. Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// An unreadable or malformed file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => get_config_path()?,
        };
        if !path.exists() {
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        debug!("Loaded configuration from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Writes the configuration to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Failure to create the parent directory or write the file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write configuration {}", path.display()))?;
        Ok(())
    }

    /// Create configuration with an explicit smart playlist size
    #[must_use]
    pub fn with_smart_playlist_size(smart_playlist_size: usize) -> Self {
        Self {
            smart_playlist_size,
            ..Self::default()
        }
    }
}
