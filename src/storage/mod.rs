//! Storage Layer
//!
//! Handles all data persistence: the MRU document, its lock file, and the
//! JSON config.

pub mod config;
pub mod document;
pub mod lock;

pub use config::*;
pub use document::Document;
pub use lock::{LockFile, LockGuard};
