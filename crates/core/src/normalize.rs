//! Key Normalization
//!
//! Turns raw item strings into the stable keys used for equality and lookup.
//! Paths are made absolute and lexically cleaned; text passes through
//! unchanged. Normalizing an already-normalized key is a no-op.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::classify::{ItemClassifier, ItemKind, PathOrText};
use crate::error::{CoreError, CoreResult};

/// Path canonicalizer with injectable home and base directories.
///
/// When a directory is not injected it is looked up from the environment on
/// each call (`dirs::home_dir` / `std::env::current_dir`).
#[derive(Debug, Clone, Default)]
pub struct KeyNormalizer {
    home_dir: Option<PathBuf>,
    base_dir: Option<PathBuf>,
}

impl KeyNormalizer {
    /// Normalizer that resolves `~` and relative paths from the environment
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Pin the directory `~` expands to
    pub fn with_home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(home.into());
        self
    }

    /// Pin the directory relative paths are resolved against
    pub fn with_base_dir(mut self, base: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base.into());
        self
    }

    /// Normalize `raw` according to its classification.
    pub fn normalize(&self, raw: &str, kind: ItemKind) -> CoreResult<String> {
        match kind {
            ItemKind::Text => Ok(raw.to_string()),
            ItemKind::Path => self.normalize_path(raw),
        }
    }

    fn normalize_path(&self, raw: &str) -> CoreResult<String> {
        let expanded = self.expand_home(raw)?;
        let absolute = if expanded.is_absolute() {
            expanded
        } else {
            self.base_dir()?.join(expanded)
        };
        Ok(lexical_clean(&absolute).to_string_lossy().into_owned())
    }

    fn expand_home(&self, raw: &str) -> CoreResult<PathBuf> {
        let rest = if raw == "~" {
            ""
        } else if let Some(rest) = raw.strip_prefix("~/") {
            rest
        } else if let Some(rest) = raw.strip_prefix("~\\").filter(|_| cfg!(windows)) {
            rest
        } else {
            return Ok(PathBuf::from(raw));
        };
        Ok(self.home_dir()?.join(rest))
    }

    fn home_dir(&self) -> CoreResult<PathBuf> {
        match &self.home_dir {
            Some(home) => Ok(home.clone()),
            None => dirs::home_dir()
                .ok_or_else(|| CoreError::config("Could not determine home directory")),
        }
    }

    fn base_dir(&self) -> CoreResult<PathBuf> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

/// Resolve `.` and `..` without touching the filesystem.
///
/// `..` at the root stays at the root. Repeated and trailing separators
/// disappear because only components are kept.
pub fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// A raw item after classification and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub key: String,
    pub kind: ItemKind,
}

/// Classifier + normalizer pair that maps raw input to lookup keys.
#[derive(Debug, Clone)]
pub struct KeyResolver {
    classifier: Arc<dyn ItemClassifier>,
    normalizer: KeyNormalizer,
}

impl KeyResolver {
    pub fn new(classifier: Arc<dyn ItemClassifier>, normalizer: KeyNormalizer) -> Self {
        Self {
            classifier,
            normalizer,
        }
    }

    pub fn resolve(&self, raw: &str) -> CoreResult<ResolvedKey> {
        if raw.is_empty() {
            return Err(CoreError::validation("item must not be empty"));
        }
        let kind = self.classifier.classify(raw);
        let key = self.normalizer.normalize(raw, kind)?;
        Ok(ResolvedKey { key, kind })
    }

    pub fn normalizer(&self) -> &KeyNormalizer {
        &self.normalizer
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(PathOrText), KeyNormalizer::from_env())
    }
}
