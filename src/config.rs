//! Application configuration: tool path overrides plus logging settings.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::AppError;

/// Default record compiled into the binary.
const EMBEDDED_CONFIG: &str = include_str!("../config.json");

/// Tool path overrides.
///
/// A `null` or missing path means "locate the tool automatically".
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
    #[serde(default)]
    pub yt_dlp_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load the user's config file if one exists, otherwise the embedded default.
    pub fn load() -> Result<Self, AppError> {
        match user_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Self::from_json(EMBEDDED_CONFIG),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        tracing::info!(path = %path.display(), "using config file");
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AppError> {
        serde_json::from_str(content)
            .map_err(|e| AppError::Config(format!("Invalid config: {}", e)))
    }
}

/// `<config dir>/convertly/config.json`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("convertly").join("config.json"))
}

/// `tracing` filter from `CONVERTLY_LOG`, default `info`.
pub fn log_level() -> String {
    std::env::var("CONVERTLY_LOG").unwrap_or_else(|_| "info".to_owned())
}
