//! Settings Models
//!
//! Store configuration stored in config.json. Every constant the store uses
//! (capacity, lock timings, policy) is overridable here.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use recents_core::{ItemClassifier, PathOrText, PathsOnly, DEFAULT_MAX_ENTRIES};
use serde::{Deserialize, Serialize};

use crate::utils::error::AppResult;
use crate::utils::paths;

/// What to do when the lock cannot be acquired in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LockPolicy {
    /// Abort the mutation; `visit` reports failure
    #[default]
    Strict,
    /// Log and mutate without the lock, risking a lost update
    BestEffort,
}

/// Which kinds of items a store tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemMode {
    /// Paths and free text, told apart by the path-or-text heuristic
    #[default]
    Mixed,
    /// File history: every item is a path
    Paths,
}

impl ItemMode {
    pub fn classifier(self) -> Arc<dyn ItemClassifier> {
        match self {
            ItemMode::Mixed => Arc::new(PathOrText),
            ItemMode::Paths => Arc::new(PathsOnly),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Document location; `None` means the per-installation data directory
    pub document_path: Option<PathBuf>,
    /// Maximum tracked entries
    pub max_entries: usize,
    /// Total time to wait for the lock
    pub lock_timeout_ms: u64,
    /// Delay between lock attempts
    pub poll_interval_ms: u64,
    /// Age after which an existing lock may be reclaimed
    pub stale_after_ms: u64,
    pub lock_policy: LockPolicy,
    pub item_mode: ItemMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            document_path: None,
            max_entries: DEFAULT_MAX_ENTRIES,
            lock_timeout_ms: 1000,
            poll_interval_ms: 50,
            stale_after_ms: 5000,
            lock_policy: LockPolicy::Strict,
            item_mode: ItemMode::Mixed,
        }
    }
}

/// Partial configuration update
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub document_path: Option<PathBuf>,
    pub max_entries: Option<usize>,
    pub lock_timeout_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub stale_after_ms: Option<u64>,
    pub lock_policy: Option<LockPolicy>,
    pub item_mode: Option<ItemMode>,
}

impl StoreConfig {
    /// Config for a document at an explicit path, everything else default
    pub fn with_document_path(path: impl Into<PathBuf>) -> Self {
        Self {
            document_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(path) = update.document_path {
            self.document_path = Some(path);
        }
        if let Some(max) = update.max_entries {
            self.max_entries = max;
        }
        if let Some(timeout) = update.lock_timeout_ms {
            self.lock_timeout_ms = timeout;
        }
        if let Some(interval) = update.poll_interval_ms {
            self.poll_interval_ms = interval;
        }
        if let Some(stale) = update.stale_after_ms {
            self.stale_after_ms = stale;
        }
        if let Some(policy) = update.lock_policy {
            self.lock_policy = policy;
        }
        if let Some(mode) = update.item_mode {
            self.item_mode = mode;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_entries == 0 {
            return Err("max_entries must be at least 1".to_string());
        }

        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be at least 1".to_string());
        }

        if self.poll_interval_ms > self.lock_timeout_ms {
            return Err(format!(
                "poll_interval_ms ({}) cannot exceed lock_timeout_ms ({})",
                self.poll_interval_ms, self.lock_timeout_ms
            ));
        }

        if let Some(path) = &self.document_path {
            if path.as_os_str().is_empty() {
                return Err("document_path cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Resolve the document path, falling back to the data directory
    pub fn resolved_document_path(&self) -> AppResult<PathBuf> {
        match &self.document_path {
            Some(path) => Ok(path.clone()),
            None => paths::document_path(),
        }
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }
}
