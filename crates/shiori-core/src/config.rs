use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::ShioriError;
use crate::models::LibraryEntry;

/// Everything shiori persists between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub kitsu: KitsuConfig,
    /// Library entry ID → lowercase on-disk title.
    pub bindings: BTreeMap<String, String>,
    /// Currently-watching entries.
    pub cache: Vec<LibraryEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitsuConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl KitsuConfig {
    /// The access token is past its expiry and can be refreshed.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.refresh_token.is_some() && self.expires_at.is_some_and(|at| at <= now)
    }
}

/// The persisted configuration file together with its location.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: AppConfig,
}

impl ConfigStore {
    /// Load the config at `path`; a missing file yields defaults.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ShioriError> {
        let path = path.into();
        let config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content).map_err(|e| ShioriError::Config(e.to_string()))?
        } else {
            tracing::debug!(path = %path.display(), "no config file yet, using defaults");
            AppConfig::default()
        };
        Ok(Self { path, config })
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "shiori")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("shiori.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn kitsu(&self) -> &KitsuConfig {
        &self.config.kitsu
    }

    pub fn kitsu_mut(&mut self) -> &mut KitsuConfig {
        &mut self.config.kitsu
    }

    pub fn cache(&self) -> &[LibraryEntry] {
        &self.config.cache
    }

    pub fn set_cache(&mut self, cache: Vec<LibraryEntry>) {
        self.config.cache = cache;
    }

    /// Write the config back to disk, creating its directory if needed.
    pub fn save(&self) -> Result<(), ShioriError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.config)
            .map_err(|e| ShioriError::Config(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    pub(crate) fn bindings(&self) -> &BTreeMap<String, String> {
        &self.config.bindings
    }

    pub(crate) fn bindings_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.config.bindings
    }
}
