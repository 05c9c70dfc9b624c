//! Data Models
//!
//! Configuration structures for the store. Entry and list types live in
//! `recents-core`.

pub mod settings;

pub use settings::*;
