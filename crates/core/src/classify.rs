//! Item Classification
//!
//! Decides whether a raw item string is a filesystem path or opaque text.
//! The decision drives key normalization and the `is_path` flag stored with
//! each entry.

use serde::{Deserialize, Serialize};

/// What a raw item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Path,
    Text,
}

impl ItemKind {
    pub fn is_path(self) -> bool {
        matches!(self, ItemKind::Path)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Path => "path",
            ItemKind::Text => "text",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strategy that classifies raw item strings.
///
/// A store is parameterized by one classifier: file-history stores treat
/// everything as a path, mixed stores use the [`PathOrText`] heuristic.
pub trait ItemClassifier: Send + Sync + std::fmt::Debug {
    fn classify(&self, raw: &str) -> ItemKind;
}

/// Heuristic classifier for stores that hold both paths and free text.
///
/// Rules, first match wins:
/// 1. starts with `/` or `~` → path
/// 2. leading or trailing whitespace → text
/// 3. contains `/` or `\` → path
/// 4. otherwise → text
#[derive(Debug, Clone, Copy, Default)]
pub struct PathOrText;

impl ItemClassifier for PathOrText {
    fn classify(&self, raw: &str) -> ItemKind {
        classify(raw)
    }
}

/// Classifier for stores that only ever track filesystem paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathsOnly;

impl ItemClassifier for PathsOnly {
    fn classify(&self, _raw: &str) -> ItemKind {
        ItemKind::Path
    }
}

/// Classify a raw string with the path-or-text heuristic.
pub fn classify(raw: &str) -> ItemKind {
    if raw.starts_with('/') || raw.starts_with('~') {
        return ItemKind::Path;
    }
    if raw.starts_with(char::is_whitespace) || raw.ends_with(char::is_whitespace) {
        return ItemKind::Text;
    }
    if raw.contains(['/', '\\']) {
        ItemKind::Path
    } else {
        ItemKind::Text
    }
}
