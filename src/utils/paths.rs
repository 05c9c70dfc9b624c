//! Cross-Platform Path Utilities
//!
//! Functions for resolving the recents data directory across platforms
//! (`$XDG_DATA_HOME/recents`, `~/Library/Application Support/recents`,
//! `%APPDATA%\recents`).

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// File name of the persisted MRU document
pub const DOCUMENT_FILE_NAME: &str = "recent_items.json";

/// File name of the optional configuration file
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Suffix appended to the document path to form the lock file path
pub const LOCK_SUFFIX: &str = ".lock";

/// Get the per-installation recents directory
pub fn recents_dir() -> AppResult<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("recents"))
        .ok_or_else(|| AppError::config("Could not determine data directory"))
}

/// Get the default document path (<data>/recents/recent_items.json)
pub fn document_path() -> AppResult<PathBuf> {
    Ok(recents_dir()?.join(DOCUMENT_FILE_NAME))
}

/// Get the config file path (<data>/recents/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(recents_dir()?.join(CONFIG_FILE_NAME))
}

/// Lock file path for a document: the document path plus `.lock`
pub fn lock_path_for(document: &Path) -> PathBuf {
    let mut name = document.as_os_str().to_os_string();
    name.push(LOCK_SUFFIX);
    PathBuf::from(name)
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists
pub fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}
