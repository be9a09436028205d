//! User settings.
//!
//! A small JSON document holding the database location, the log level and
//! the engine configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use syntrack_core::EngineConfig;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_database_path, default_settings_path, load_json, save_json};

/// Primary database path override.
pub const DB_PATH_ENV: &str = "SYNTRACK_DB_PATH";
/// Fallback database path override.
pub const DB_PATH_FALLBACK_ENV: &str = "DATABASE_PATH";

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Database file; the platform data directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Log level used when neither a CLI flag nor `RUST_LOG` sets one.
    pub log_level: LogLevel,

    /// Analytics and chart parameters.
    pub engine: EngineConfig,
}

impl Settings {
    /// Checks the engine configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` describing the first invalid value.
    pub fn validate(&self) -> Result<(), StoreError> {
        self.engine.validate()?;
        Ok(())
    }

    /// Resolves the database path from the process environment.
    ///
    /// Precedence: `flag`, `SYNTRACK_DB_PATH`, `DATABASE_PATH`, the settings
    /// file, the platform default.
    pub fn resolve_database_path(&self, flag: Option<&Path>) -> PathBuf {
        self.resolve_database_path_with(flag, |key| std::env::var_os(key).map(PathBuf::from))
    }

    /// [`Self::resolve_database_path`] with an injectable environment.
    pub fn resolve_database_path_with<F>(&self, flag: Option<&Path>, env: F) -> PathBuf
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        if let Some(path) = flag {
            return path.to_path_buf();
        }
        [DB_PATH_ENV, DB_PATH_FALLBACK_ENV]
            .into_iter()
            .filter_map(|key| env(key))
            .find(|p| !p.as_os_str().is_empty())
            .or_else(|| self.database_path.clone())
            .unwrap_or_else(default_database_path)
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Settings bound to a file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store with default settings at `path`, without reading it.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if the settings file exists but cannot be read.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing file yields defaults. A file that fails to parse or holds
    /// an invalid engine configuration is logged and replaced by defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if tokio::fs::try_exists(&path).await? {
            info!(path = %path.display(), "Loading settings");
            match load_json::<Settings>(&path).await {
                Ok(settings) => match settings.validate() {
                    Ok(()) => settings,
                    Err(e) => {
                        warn!(error = %e, "Invalid settings, using defaults");
                        Settings::default()
                    }
                },
                Err(StoreError::Io(e)) => return Err(StoreError::Io(e)),
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Settings::default()
                }
            }
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
        })
    }

    /// Settings file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Applies `f` to the in-memory settings.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
    }

    /// Restores defaults in memory.
    pub async fn reset(&self) {
        self.update(|s| *s = Settings::default()).await;
    }

    /// Validates and writes the settings to disk.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` for an invalid configuration, or an IO
    /// error if the file cannot be written.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        settings.validate()?;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
