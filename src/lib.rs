//! Recents - Persistent MRU Store
//!
//! Tracks recently used items (file paths or free text) across editor
//! sessions so a fuzzy picker can rank candidates by recency.
//! It includes:
//! - A public API over one process-global state
//! - The MRU store and per-caller handles
//! - Storage layer (document, lock file, config)
//! - Configuration models and utilities
//!
//! Several processes can share one document. Every mutation takes the
//! sidecar lock file, reloads the document, applies the change and writes the
//! document back atomically.

pub mod api;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

// Re-export commonly used items
pub use models::settings::{ItemMode, LockPolicy, SettingsUpdate, StoreConfig};
pub use recents_core::{Entry, ItemKind, KeyNormalizer, KeyResolver, MruList};
pub use services::{FrecencyHandle, GetOptions, MruStore, NoSeed, SeedHook, SharedStore};
pub use state::RecentsState;
pub use utils::error::{AppError, AppResult};
