//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Recency store and preferences locations
    #[serde(default)]
    pub storage: StorageSettings,

    /// Blob cache maintenance
    #[serde(default)]
    pub maintenance: MaintenanceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Private data directory for the database, preferences and cache
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// File name of the recently-viewed database inside the data directory
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// File name of the preferences document inside the data directory
    #[serde(default = "default_preferences_file")]
    pub preferences_file: String,

    /// Number of recently viewed items kept after each visit
    #[serde(default = "default_mru_capacity")]
    pub mru_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceSettings {
    /// File name of the blob cache inside the data directory
    #[serde(default = "default_blob_cache_file")]
    pub blob_cache_file: String,

    /// Hours between two compactions when running the scheduler
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
}

// Default value functions

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/indico-store"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_database_file() -> String {
    "indico.db".to_string()
}

fn default_preferences_file() -> String {
    "preferences.json".to_string()
}

fn default_mru_capacity() -> usize {
    50
}

fn default_blob_cache_file() -> String {
    "blobcache.db".to_string()
}

fn default_interval_hours() -> u64 {
    24
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "indico", "indico-store")
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            preferences_file: default_preferences_file(),
            mru_capacity: default_mru_capacity(),
        }
    }
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self {
            blob_cache_file: default_blob_cache_file(),
            interval_hours: default_interval_hours(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let mut settings = Self::load_from(&config_path)?;
        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Parse settings from a specific file, without environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("INDICO_STORE_DATA_DIR") {
            if !dir.trim().is_empty() {
                self.general.data_dir = PathBuf::from(dir);
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = project_dirs().context("Could not determine config directory")?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &Path) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the recently-viewed database path
    pub fn database_path(&self) -> PathBuf {
        self.general.data_dir.join(&self.storage.database_file)
    }

    /// Get the preferences document path
    pub fn preferences_path(&self) -> PathBuf {
        self.general.data_dir.join(&self.storage.preferences_file)
    }

    /// Get the blob cache path
    pub fn blob_cache_path(&self) -> PathBuf {
        self.general.data_dir.join(&self.maintenance.blob_cache_file)
    }

    /// Interval between two scheduled compactions, never shorter than an hour
    pub fn maintenance_interval(&self) -> Duration {
        Duration::from_secs(self.maintenance.interval_hours.max(1) * 3600)
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.general.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                self.general.data_dir.display()
            )
        })?;
        Ok(())
    }
}
