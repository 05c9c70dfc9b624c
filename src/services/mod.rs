//! Services
//!
//! Business logic over the storage layer.
//! The store owns mutation; handles serve reads from snapshots.

pub mod handle;
pub mod store;

pub use handle::{FrecencyHandle, GetOptions, NoSeed, SeedHook, SharedStore};
pub use store::MruStore;
