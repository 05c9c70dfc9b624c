//! Entry Model
//!
//! A single tracked item as it is kept in memory and persisted on disk.

use serde::{Deserialize, Serialize};

use crate::classify::ItemKind;

fn default_is_path() -> bool {
    true
}

/// A tracked item.
///
/// `key` is always the normalized form. On disk it is written as `item`;
/// documents that still use `path` for the key are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "item", alias = "path")]
    pub key: String,
    /// Unix seconds of the last visit
    pub timestamp: i64,
    #[serde(default = "default_is_path")]
    pub is_path: bool,
}

impl Entry {
    pub fn new(key: impl Into<String>, timestamp: i64, kind: ItemKind) -> Self {
        Self {
            key: key.into(),
            timestamp,
            is_path: kind.is_path(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        if self.is_path {
            ItemKind::Path
        } else {
            ItemKind::Text
        }
    }
}
