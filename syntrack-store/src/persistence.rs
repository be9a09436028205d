//! File persistence helpers.
//!
//! Default locations, plus JSON load/save with owner-only permissions.

use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

/// File name of the snapshot database inside the data directory.
pub const DATABASE_FILE: &str = "usage.db";

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/Syntrack`
/// - Linux: `~/.config/syntrack`
/// - Windows: `%APPDATA%\syntrack`
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support").join("Syntrack"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .map(|c| c.join("syntrack"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Returns the default data directory, where the database lives.
///
/// - macOS: `~/Library/Application Support/Syntrack`
/// - Linux: `~/.local/share/syntrack`
/// - Windows: `%APPDATA%\syntrack`
pub fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        default_config_dir()
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::data_dir()
            .map(|d| d.join("syntrack"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Returns the default settings file path.
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join("settings.json")
}

/// Returns the default snapshot database path.
pub fn default_database_path() -> PathBuf {
    default_data_dir().join(DATABASE_FILE)
}

// ============================================================================
// Permissions
// ============================================================================

/// Owner read/write.
pub(crate) const PRIVATE_FILE_MODE: u32 = 0o600;

/// Owner read/write/search.
pub(crate) const PRIVATE_DIR_MODE: u32 = 0o700;

/// Sets the Unix mode of `path`. A no-op elsewhere.
#[cfg(unix)]
pub(crate) fn restrict(path: &Path, mode: u32) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    debug!(path = %path.display(), mode = %format!("{mode:o}"), "Restricted permissions");
    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn restrict(_path: &Path, _mode: u32) -> Result<(), StoreError> {
    Ok(())
}

/// Creates the parent directory of `path`, owner-only, if it is missing.
///
/// Only the innermost directory is tightened; existing ancestors keep their
/// permissions.
pub(crate) fn create_private_parent(path: &Path) -> Result<(), StoreError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if !parent.exists() {
        debug!(path = %parent.display(), "Creating private directory");
        std::fs::create_dir_all(parent)?;
        restrict(parent, PRIVATE_DIR_MODE)?;
    }
    Ok(())
}

// ============================================================================
// JSON Files
// ============================================================================

/// Saves data to a JSON file with owner-only permissions.
///
/// Writes to a sibling temp file and renames it over the target, so a
/// reader never sees a half-written file.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");

    create_private_parent(path)?;

    let json = serde_json::to_string_pretty(data)?;
    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &json).await?;
    restrict(&temp_path, PRIVATE_FILE_MODE)?;
    tokio::fs::rename(&temp_path, path).await?;

    Ok(())
}

/// Loads data from a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    debug!(path = %path.display(), "Loading JSON file");

    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        assert!(!default_config_dir().as_os_str().is_empty());
        assert!(default_settings_path().ends_with("settings.json"));
        assert!(default_database_path().ends_with(DATABASE_FILE));
    }

    #[test]
    fn test_parentless_path_is_accepted() {
        assert!(create_private_parent(Path::new("usage.db")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_restrict() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("usage.db");
        std::fs::write(&file, b"").unwrap();

        restrict(&file, PRIVATE_FILE_MODE).unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
