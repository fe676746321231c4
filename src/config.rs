//! TOML-based service configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::forecast::DEFAULT_BASE_URL;

/// Top-level service configuration parsed from TOML.
///
/// All fields have defaults matching the live preset. Load from TOML with
/// [`ServiceConfig::from_toml_file`] or use [`ServiceConfig::live`] for the
/// built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Where forecast data comes from.
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Defaults applied when a request omits its parameters.
    #[serde(default)]
    pub selection: SelectionConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Forecast source settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Source type: `"remote"`, `"file"` or `"synthetic"`.
    pub source: String,
    /// Base URL of the carbon-intensity service (remote source).
    pub base_url: String,
    /// Upstream request timeout in seconds (remote source).
    pub timeout_secs: u64,
    /// JSON forecast file (file source).
    pub path: Option<PathBuf>,
    /// Random seed (synthetic source).
    pub seed: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            source: "remote".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            path: None,
            seed: 42,
        }
    }
}

/// Defaults for `duration` and `contiguous` request parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Activity duration in minutes (must be > 0).
    pub duration_minutes: i64,
    /// Whether to request a single contiguous slot.
    pub contiguous: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            duration_minutes: 30,
            contiguous: false,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"selection.duration_minutes"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ServiceConfig {
    /// Live forecast from the public carbon-intensity service.
    pub fn live() -> Self {
        Self::default()
    }

    /// Seeded synthetic forecast, no network access.
    pub fn offline() -> Self {
        Self {
            forecast: ForecastConfig {
                source: "synthetic".to_string(),
                ..ForecastConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["live", "offline"];

    /// Valid values of `forecast.source`.
    pub const SOURCES: &[&str] = &["remote", "file", "synthetic"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "live" => Ok(Self::live()),
            "offline" => Ok(Self::offline()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.bind.trim().is_empty() {
            errors.push(ConfigError {
                field: "server.bind".into(),
                message: "must not be empty".into(),
            });
        }

        let f = &self.forecast;
        if !Self::SOURCES.contains(&f.source.as_str()) {
            errors.push(ConfigError {
                field: "forecast.source".into(),
                message: format!(
                    "must be one of {}, got \"{}\"",
                    Self::SOURCES.join(", "),
                    f.source
                ),
            });
        }
        if f.source == "file" && f.path.is_none() {
            errors.push(ConfigError {
                field: "forecast.path".into(),
                message: "required when forecast.source = \"file\"".into(),
            });
        }
        if f.source == "remote" && !f.base_url.starts_with("http") {
            errors.push(ConfigError {
                field: "forecast.base_url".into(),
                message: format!("must be an http(s) URL, got \"{}\"", f.base_url),
            });
        }
        if f.timeout_secs == 0 {
            errors.push(ConfigError {
                field: "forecast.timeout_secs".into(),
                message: "must be > 0".into(),
            });
        }

        if self.selection.duration_minutes <= 0 {
            errors.push(ConfigError {
                field: "selection.duration_minutes".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }
}
