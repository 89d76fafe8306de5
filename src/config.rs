// Configuration helpers - shared between the library and CLI
//
// Reads and writes the user's cleanup preferences. A missing file
// means defaults; nothing here is needed to call the dedup functions.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::dedup::{DedupeMode, DedupeOptions, SimilarityMetric, DEFAULT_THRESHOLD};
use crate::time_window::TimeFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find home directory")]
    NoHomeDir,
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unknown config key: {0}")]
    UnknownKey(String),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupSettings {
    #[serde(default)]
    pub mode: DedupeMode,
    #[serde(default = "default_threshold")]
    pub threshold: f64, // Similarity threshold (0.0-1.0]
    #[serde(default)]
    pub metric: SimilarityMetric,
    #[serde(default)]
    pub time_format: TimeFormat,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            mode: DedupeMode::default(),
            threshold: default_threshold(),
            metric: SimilarityMetric::default(),
            time_format: TimeFormat::default(),
        }
    }
}

impl CleanupSettings {
    pub fn dedupe_options(&self) -> DedupeOptions {
        DedupeOptions {
            mode: self.mode,
            threshold: self.threshold,
            metric: self.metric,
        }
    }

    /// Update a single setting from its string form, as typed on the command line.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "mode" => {
                self.mode = match value.trim().to_lowercase().as_str() {
                    "safe" => DedupeMode::Safe,
                    "global" => DedupeMode::Global,
                    _ => return Err(invalid()),
                };
            }
            "threshold" => {
                let threshold: f64 = value.trim().parse().map_err(|_| invalid())?;
                if !(threshold > 0.0 && threshold <= 1.0) {
                    return Err(invalid());
                }
                self.threshold = threshold;
            }
            "metric" => self.metric = SimilarityMetric::from(value),
            "time_format" | "clock" => {
                self.time_format = match value.trim().to_lowercase().as_str() {
                    "24" | "24h" | "twenty_four_hour" => TimeFormat::TwentyFourHour,
                    "12" | "12h" | "twelve_hour" => TimeFormat::TwelveHour,
                    _ => return Err(invalid()),
                };
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        Ok(())
    }
}

pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".summary-dedup"))
}

pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = get_config_dir()?;
    std::fs::create_dir_all(&config_dir).map_err(|source| ConfigError::Io {
        path: config_dir.clone(),
        source,
    })?;
    Ok(config_dir)
}

pub fn get_preferences_path() -> Result<PathBuf, ConfigError> {
    Ok(get_config_dir()?.join("preferences.json"))
}

// ============================================================================
// Cleanup Settings
// ============================================================================

pub fn read_settings_from(path: &Path) -> Result<CleanupSettings, ConfigError> {
    if !path.exists() {
        return Ok(CleanupSettings::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

pub fn write_settings_to(path: &Path, settings: &CleanupSettings) -> Result<(), ConfigError> {
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_settings() -> Result<CleanupSettings, ConfigError> {
    read_settings_from(&get_preferences_path()?)
}

pub fn write_settings(settings: &CleanupSettings) -> Result<(), ConfigError> {
    ensure_config_dir()?;
    write_settings_to(&get_preferences_path()?, settings)
}

/// Read settings, falling back to defaults (logged) if the file is unusable.
pub fn read_settings_or_default() -> CleanupSettings {
    match read_settings() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Using default cleanup settings: {}", e);
            CleanupSettings::default()
        }
    }
}
