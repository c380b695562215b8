//! # Configuration Module
//!
//! Resolves where the compass reads its inputs and writes its outputs.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Built-in defaults, which match the layout of an unpacked export sitting
//!    next to `coords.csv` and `compass.jpg` in the working directory.
//! 2. A JSON config file: `--config <file>`, or
//!    `<config dir>/listening-compass/config.json` when it exists
//!    (`~/.config/listening-compass/config.json` on Linux).
//! 3. Command-line flags.
//!
//! Every key of the config file is optional:
//!
//! ```json
//! {
//!   "history_dir": "/data/Spotify Extended Streaming History",
//!   "reference_path": "/data/coords.csv",
//!   "font_path": "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
//!   "pixel_bounds": { "x_start": 147, "x_end": 1049, "y_start": 180, "y_end": 1084 }
//! }
//! ```

use crate::history::{HistoryPattern, DEFAULT_FILE_PREFIX, DEFAULT_FILE_SUFFIX};
use crate::render::PixelBounds;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default export folder name, as unpacked from the streaming service archive.
pub const DEFAULT_HISTORY_DIR: &str = "Spotify Extended Streaming History";

/// Returns the default config file location, if the platform has a config
/// directory.
///
/// - **Linux**: `~/.config/listening-compass/config.json`
/// - **macOS**: `~/Library/Application Support/listening-compass/config.json`
/// - **Windows**: `%APPDATA%\listening-compass\config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("listening-compass").join("config.json"))
}

/// Configuration for one compass run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Folder holding the streaming history export
    pub history_dir: PathBuf,
    /// File name prefix of history files
    pub file_prefix: String,
    /// File name suffix of history files
    pub file_suffix: String,
    /// Artist → coordinate table
    pub reference_path: PathBuf,
    /// Compass picture the marker is drawn on
    pub base_image: PathBuf,
    /// Where the marked picture is saved
    pub output_image: PathBuf,
    /// Where per-artist play counts are written
    pub frequencies_path: PathBuf,
    /// Label font; system fonts are searched when unset
    pub font_path: Option<PathBuf>,
    pub pixel_bounds: PixelBounds,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            history_dir: PathBuf::from(DEFAULT_HISTORY_DIR),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
            reference_path: PathBuf::from("coords.csv"),
            base_image: PathBuf::from("compass.jpg"),
            output_image: PathBuf::from("compass_with_dot.png"),
            frequencies_path: PathBuf::from("artist_frequencies.csv"),
            font_path: None,
            pixel_bounds: PixelBounds::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load a config file. Keys missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the explicit config file if given, else the default one when it
    /// exists, else the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Configuration reading history from `history_dir`, defaults elsewhere.
    pub fn with_history_dir(history_dir: PathBuf) -> Self {
        Self {
            history_dir,
            ..Self::default()
        }
    }

    pub fn history_pattern(&self) -> HistoryPattern {
        HistoryPattern {
            prefix: self.file_prefix.clone(),
            suffix: self.file_suffix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_export_layout() {
        let config = RuntimeConfig::default();
        assert_eq!(config.history_dir, PathBuf::from("Spotify Extended Streaming History"));
        assert_eq!(config.reference_path, PathBuf::from("coords.csv"));
        assert_eq!(config.base_image, PathBuf::from("compass.jpg"));
        assert_eq!(config.output_image, PathBuf::from("compass_with_dot.png"));
        assert_eq!(config.frequencies_path, PathBuf::from("artist_frequencies.csv"));
        assert_eq!(config.history_pattern(), HistoryPattern::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "reference_path": "/data/coords.csv", "pixel_bounds": { "x_start": 0, "x_end": 10, "y_start": 0, "y_end": 20 } }"#,
        )?;

        let config = RuntimeConfig::from_file(&path)?;
        assert_eq!(config.reference_path, PathBuf::from("/data/coords.csv"));
        assert_eq!(config.pixel_bounds.y_end, 20.0);
        assert_eq!(config.base_image, PathBuf::from("compass.jpg"));
        assert_eq!(config.font_path, None);
        Ok(())
    }

    #[test]
    fn test_invalid_file_is_an_error() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.json");
        fs::write(&path, "{ history_dir: ")?;

        let err = RuntimeConfig::load(Some(path.as_path())).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config file"));
        Ok(())
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        assert!(RuntimeConfig::load(Some(Path::new("/no/such/config.json"))).is_err());
    }

    #[test]
    fn test_round_trips_through_json() -> Result<()> {
        let config = RuntimeConfig {
            font_path: Some(PathBuf::from("/fonts/label.ttf")),
            ..RuntimeConfig::with_history_dir(PathBuf::from("/exports/me"))
        };
        let json = serde_json::to_string(&config)?;
        let parsed: RuntimeConfig = serde_json::from_str(&json)?;
        assert_eq!(parsed, config);
        Ok(())
    }
}
