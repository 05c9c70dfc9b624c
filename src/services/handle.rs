//! Frecency Handle
//!
//! Lightweight per-caller view over a shared [`MruStore`]. A handle answers
//! `get` from its own snapshot without touching the document or the lock,
//! and refreshes that snapshot from the store's memory after each `visit`.

use std::path::Path;
use std::sync::Arc;

use recents_core::{Entry, KeyResolver, MruList, ResolvedKey};
use tokio::sync::Mutex;
use tracing::debug;

use crate::services::store::MruStore;

/// A store shared between the handles of one process
pub type SharedStore = Arc<Mutex<MruStore>>;

/// Fallback consulted by `get` for untracked items.
///
/// Implementations may estimate a score from elsewhere; they must not
/// register the item in the store.
pub trait SeedHook: Send + Sync + std::fmt::Debug {
    fn seed(&self, item: &ResolvedKey) -> u64;
}

/// Seed hook that scores every untracked item as 0
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSeed;

impl SeedHook for NoSeed {
    fn seed(&self, _item: &ResolvedKey) -> u64 {
        0
    }
}

/// Options for [`FrecencyHandle::get`]
#[derive(Debug, Clone, Copy)]
pub struct GetOptions {
    /// Consult the seed hook when the item is untracked
    pub seed: bool,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self { seed: true }
    }
}

/// Per-caller snapshot of a shared store
#[derive(Debug, Clone)]
pub struct FrecencyHandle {
    store: SharedStore,
    snapshot: Arc<MruList>,
    resolver: KeyResolver,
    seed: Arc<dyn SeedHook>,
}

impl FrecencyHandle {
    /// Snapshot `store` as it is now
    pub async fn new(store: SharedStore) -> Self {
        let (snapshot, resolver) = {
            let guard = store.lock().await;
            (guard.snapshot(), guard.resolver().clone())
        };
        Self {
            store,
            snapshot,
            resolver,
            seed: Arc::new(NoSeed),
        }
    }

    pub fn with_seed_hook(mut self, hook: Arc<dyn SeedHook>) -> Self {
        self.seed = hook;
        self
    }

    /// Score `item` from the snapshot.
    ///
    /// Existing directories score the sum of the entries beneath them. An
    /// untracked item goes to the seed hook when `options.seed` is set.
    pub fn get(&self, item: &str, options: GetOptions) -> u64 {
        let resolved = match self.resolver.resolve(item) {
            Ok(resolved) => resolved,
            Err(e) => {
                debug!(error = %e, "Unresolvable item scores 0");
                return 0;
            }
        };

        if resolved.kind.is_path() && Path::new(&resolved.key).is_dir() {
            return self.snapshot.directory_score(&resolved.key);
        }

        match self.snapshot.score(&resolved.key) {
            0 if options.seed => self.seed.seed(&resolved),
            score => score,
        }
    }

    /// Record a visit through the shared store, then pick up its new state
    pub async fn visit(&mut self, item: &str) -> bool {
        let mut store = self.store.lock().await;
        let recorded = store.visit(item).await;
        self.snapshot = store.snapshot();
        recorded
    }

    /// Re-snapshot the store's in-memory list
    pub async fn refresh(&mut self) {
        self.snapshot = self.store.lock().await.snapshot();
    }

    /// Path keys in MRU order, as of the snapshot
    pub fn recent_paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.snapshot.recent_paths()
    }

    /// Copy of the snapshot's entries in MRU order
    pub fn recent_items(&self) -> Vec<Entry> {
        self.snapshot.entries().to_vec()
    }

    pub fn snapshot(&self) -> &MruList {
        &self.snapshot
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }
}
