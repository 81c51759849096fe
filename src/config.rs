/// Application configuration
///
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/four-split/config.json
/// - macOS: ~/Library/Application Support/four-split/config.json
/// - Windows: %APPDATA%\four-split\config.json
///
/// Every field has a default, so a partial file is fine and a missing file
/// means "all defaults".

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::state::settings::{FilterKind, FilterSettings, DEFAULT_INTENSITY};
use crate::state::slots::QuadEntryPolicy;

const APP_DIR: &str = "four-split";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Filter selected at startup
    pub default_filter: FilterKind,
    /// Slider position at startup (clamped into [0, 1] when used)
    pub default_intensity: f32,
    /// Where the active slot points when Quad mode is re-entered
    pub quad_entry_policy: QuadEntryPolicy,
    /// Folder a tethered camera writes into; None = platform default
    pub tether_dir: Option<PathBuf>,
    /// SQLite file for the timestamp records; None = platform default
    pub record_db_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_filter: FilterKind::None,
            default_intensity: DEFAULT_INTENSITY,
            quad_entry_policy: QuadEntryPolicy::Reset,
            tether_dir: None,
            record_db_path: None,
        }
    }
}

impl AppConfig {
    /// Where the config file lives by default
    pub fn default_path() -> PathBuf {
        base_dir(dirs::config_dir()).join("config.json")
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(json) => Ok(Self::from_json(&json)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Load from `path`, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            log::warn!("⚠️  Ignoring config {}: {err}", path.display());
            Self::default()
        })
    }

    /// Write the config, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Initial filter settings
    pub fn filter_settings(&self) -> FilterSettings {
        FilterSettings::new(self.default_filter, self.default_intensity)
    }

    /// Tether folder, defaulting to <Pictures>/four-split/tether
    pub fn tether_dir(&self) -> PathBuf {
        self.tether_dir
            .clone()
            .unwrap_or_else(|| base_dir(dirs::picture_dir()).join("tether"))
    }

    /// Record database, defaulting to <data dir>/four-split/four_split.db
    pub fn record_db_path(&self) -> PathBuf {
        self.record_db_path
            .clone()
            .unwrap_or_else(|| base_dir(dirs::data_dir()).join("four_split.db"))
    }
}

/// `<root>/four-split`, falling back to the home directory, then to the
/// working directory
fn base_dir(root: Option<PathBuf>) -> PathBuf {
    root.or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = AppConfig::from_json(r#"{ "default_filter": "sepia" }"#).unwrap();
        assert_eq!(config.default_filter, FilterKind::Sepia);
        assert_eq!(config.default_intensity, DEFAULT_INTENSITY);
        assert_eq!(config.quad_entry_policy, QuadEntryPolicy::Reset);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            default_filter: FilterKind::Mono,
            default_intensity: 0.25,
            quad_entry_policy: QuadEntryPolicy::Retain,
            tether_dir: Some(dir.path().join("tether")),
            record_db_path: None,
        };

        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Json(_))));
        assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
    }

    #[test]
    fn test_filter_settings_clamp_intensity() {
        let config = AppConfig {
            default_intensity: 4.0,
            ..AppConfig::default()
        };
        assert_eq!(config.filter_settings().intensity(), 1.0);
    }
}
