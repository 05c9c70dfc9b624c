//! Recents Core
//!
//! Foundational types and pure algorithms for the recents workspace. This
//! crate knows nothing about lock files, documents on disk or process-wide
//! state; those live in the main `recents` crate.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `classify` - Path vs. text classification (`ItemKind`, `ItemClassifier`)
//! - `normalize` - Key normalization (`KeyNormalizer`, `KeyResolver`)
//! - `entry` - The tracked `Entry` record
//! - `mru` - Ordered MRU list with rank index and scoring (`MruList`)

pub mod classify;
pub mod entry;
pub mod error;
pub mod mru;
pub mod normalize;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Classification & Keys ──────────────────────────────────────────────
pub use classify::{classify, ItemClassifier, ItemKind, PathOrText, PathsOnly};
pub use normalize::{KeyNormalizer, KeyResolver, ResolvedKey};

// ── Ranking ────────────────────────────────────────────────────────────
pub use entry::Entry;
pub use mru::{MruList, DEFAULT_MAX_ENTRIES};
