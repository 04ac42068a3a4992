//! Configuration loading and validation.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::projector::{HistoryProjector, ViewerZone};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Upstream service endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Player profiles, addressed as `{players_url}/{name}/{tag}`
    #[serde(default = "default_players_url")]
    pub players_url: String,

    /// Aggregate stats, queried with `gameName` and `tagLine`
    #[serde(default = "default_stats_url")]
    pub stats_url: String,

    /// Match history, queried with `gameName` and `tagLine`
    #[serde(default = "default_history_url")]
    pub history_url: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_players_url() -> String {
    "http://localhost:5001/api/players".to_string()
}

fn default_stats_url() -> String {
    "http://localhost:5001/api/player/stat".to_string()
}

fn default_history_url() -> String {
    "http://localhost:5001/api/match-history".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            players_url: default_players_url(),
            stats_url: default_stats_url(),
            history_url: default_history_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// How history is laid out for the viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Team-member names longer than this are truncated
    #[serde(default = "default_name_width")]
    pub name_width: usize,

    /// strftime pattern for day headers
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Viewer offset from UTC in minutes; the local zone when unset
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

fn default_name_width() -> usize {
    crate::projector::DEFAULT_NAME_WIDTH
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            name_width: default_name_width(),
            date_format: default_date_format(),
            utc_offset_minutes: None,
        }
    }
}

impl DisplayConfig {
    pub fn zone(&self) -> Result<ViewerZone, ConfigError> {
        match self.utc_offset_minutes {
            None => Ok(ViewerZone::Local),
            Some(minutes) => ViewerZone::from_offset_minutes(minutes).ok_or_else(|| {
                ConfigError::ValidationError(format!("UTC offset out of range: {}", minutes))
            }),
        }
    }

    /// A projector configured for this display.
    pub fn projector(&self) -> Result<HistoryProjector, ConfigError> {
        Ok(HistoryProjector::new(self.zone()?).with_name_width(self.name_width))
    }
}

/// Static asset locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,

    /// Local copy of the asset tree; when set, missing files resolve to the placeholder
    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_url_prefix() -> String {
    "/assets".to_string()
}

fn default_placeholder() -> String {
    "/player.png".to_string()
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            url_prefix: default_url_prefix(),
            root: None,
            placeholder: default_placeholder(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub assets: AssetConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            source: SourceConfig::default(),
            server: ServerConfig::default(),
            display: DisplayConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Source timeout must be greater than 0".to_string(),
            ));
        }

        for (name, url) in [
            ("players_url", &self.source.players_url),
            ("stats_url", &self.source.stats_url),
            ("history_url", &self.source.history_url),
        ] {
            Url::parse(url).map_err(|e| {
                ConfigError::ValidationError(format!("Invalid {}: {} ({})", name, url, e))
            })?;
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.display.name_width == 0 {
            return Err(ConfigError::ValidationError(
                "Name width must be greater than 0".to_string(),
            ));
        }

        if StrftimeItems::new(&self.display.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid date format: {:?}",
                self.display.date_format
            )));
        }

        self.display.zone()?;

        Ok(())
    }
}
