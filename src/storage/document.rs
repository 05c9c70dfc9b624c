//! MRU Document Persistence
//!
//! The on-disk form of the store: `{ "version": 1, "entries": [...] }`.
//! Documents are always rewritten whole, through a temp file in the same
//! directory that is renamed over the target, so a crash mid-save leaves
//! either the old or the new document and never a torn one.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use recents_core::Entry;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::ensure_parent_dir;

/// Current document format version
pub const DOCUMENT_VERSION: u32 = 1;

/// Serialized MRU list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub version: u32,
    pub entries: Vec<Entry>,
}

impl Document {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            entries,
        }
    }

    /// Parse document text, rejecting unknown versions
    pub fn parse(path: &Path, content: &str) -> AppResult<Self> {
        let document: Document =
            serde_json::from_str(content).map_err(|e| AppError::corrupt(path, e.to_string()))?;
        if document.version != DOCUMENT_VERSION {
            return Err(AppError::corrupt(
                path,
                format!("unsupported version {}", document.version),
            ));
        }
        Ok(document)
    }

    /// Read the document at `path`.
    ///
    /// A missing or blank file is `Ok(None)`. Unreadable files and bad
    /// content are errors.
    pub fn read(path: &Path) -> AppResult<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Self::parse(path, &content).map(Some)
    }

    /// Atomically replace the document at `path`
    pub fn write(&self, path: &Path) -> AppResult<()> {
        ensure_parent_dir(path)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let json = serde_json::to_vec(self)?;
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&json)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| AppError::Io(e.error))?;
        Ok(())
    }
}

/// Load the entries stored at `path`, degrading every failure to an empty
/// list. Missing files are silent; anything else logs a warning.
pub fn load(path: &Path) -> Vec<Entry> {
    match Document::read(path) {
        Ok(Some(document)) => {
            debug!(path = %path.display(), entries = document.entries.len(), "Loaded document");
            document.entries
        }
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Discarding unreadable document");
            Vec::new()
        }
    }
}

/// Save `entries` as a fresh document at `path`
pub fn save(path: &Path, entries: &[Entry]) -> AppResult<()> {
    Document::new(entries.to_vec()).write(path)?;
    debug!(path = %path.display(), entries = entries.len(), "Saved document");
    Ok(())
}
