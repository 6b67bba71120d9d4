//! Application configuration management.
//!
//! The cache root is explicit configuration passed into the store, never
//! process-wide mutable state. Resolution order:
//!
//! 1. CLI flag / environment (`--cache-dir`, `APODCACHE_DIR`)
//! 2. `cache_dir` from the config file
//! 3. Platform cache directory (XDG on Linux, AppData on Windows)

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preferred cache root directory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Falls back to defaults when the file is missing or unreadable.
    pub fn load() -> Self {
        match Self::load_internal() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn load_internal() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the cache root, giving a CLI override precedence over the
    /// config file, and the config file precedence over the platform
    /// default.
    pub fn resolve_cache_root(&self, cli_override: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = cli_override {
            return Ok(dir);
        }
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        let project_dirs = Self::project_dirs()?;
        Ok(project_dirs.cache_dir().join("image_cache"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "apodcache", "apodcache")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.json"))
    }
}
