//! MRU Store
//!
//! Owns the in-memory MRU list for one document and every mutation of it.
//! Each mutation takes the lock file, reloads the document so updates made by
//! other processes are seen, applies the change, saves the whole document and
//! releases the lock. Two processes that both pass the reload step before
//! either saves still race; the last writer wins.
//!
//! A change whose save fails stays queued and is replayed on top of every
//! later reload until a save succeeds.
//!
//! Readers get an `Arc<MruList>` snapshot. The store mutates through
//! `Arc::make_mut`, so a snapshot handed out earlier never changes underneath
//! its holder.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use recents_core::{Entry, KeyNormalizer, KeyResolver, MruList};
use tracing::{debug, info, warn};

use crate::models::settings::{LockPolicy, StoreConfig};
use crate::storage::document::{self, Document};
use crate::storage::lock::{LockFile, LockGuard};
use crate::utils::error::{AppError, AppResult};

/// A mutation kept for replay until it reaches disk
#[derive(Debug, Clone)]
enum Change {
    Visit(Entry),
    Forget(String),
    PruneMissing,
    Clear,
}

impl Change {
    /// Apply to `list`, returning how many entries were removed
    fn apply(&self, list: &mut MruList) -> usize {
        match self {
            Change::Visit(entry) => {
                list.visit(entry.clone());
                0
            }
            Change::Forget(key) => usize::from(list.remove(key)),
            Change::PruneMissing => {
                list.retain(|entry| !entry.is_path || Path::new(&entry.key).exists())
            }
            Change::Clear => {
                let removed = list.len();
                list.clear();
                removed
            }
        }
    }
}

/// Persistent most-recently-used store
#[derive(Debug)]
pub struct MruStore {
    config: StoreConfig,
    document_path: PathBuf,
    lock: LockFile,
    resolver: KeyResolver,
    list: Arc<MruList>,
    /// Changes applied in memory whose save failed, oldest first.
    /// Replayed on top of every reload until a save succeeds.
    pending: Vec<Change>,
}

impl MruStore {
    /// Open the store described by `config`, loading its document once.
    ///
    /// A missing, unreadable or corrupt document yields an empty store.
    pub fn open(config: StoreConfig) -> AppResult<Self> {
        config.validate().map_err(AppError::validation)?;
        let document_path = config.resolved_document_path()?;
        let lock = LockFile::for_document(&document_path, config.stale_after());
        let resolver = KeyResolver::new(config.item_mode.classifier(), KeyNormalizer::from_env());
        let list = MruList::from_entries(document::load(&document_path), config.max_entries);

        info!(
            path = %document_path.display(),
            entries = list.len(),
            policy = ?config.lock_policy,
            "Opened MRU store"
        );

        Ok(Self {
            config,
            document_path,
            lock,
            resolver,
            list: Arc::new(list),
            pending: Vec::new(),
        })
    }

    /// Replace the classifier/normalizer pair used to build keys
    pub fn with_resolver(mut self, resolver: KeyResolver) -> Self {
        self.resolver = resolver;
        self
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Record a visit of `raw`, returning whether it was persisted.
    ///
    /// Failure never leaves the in-memory list half-updated: either the lock
    /// was refused and nothing changed, or the list changed and only the save
    /// failed. In the latter case the visit is retried by the next mutation
    /// or `flush()`.
    pub async fn visit(&mut self, raw: &str) -> bool {
        match self.try_visit(raw).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Visit not recorded");
                false
            }
        }
    }

    /// Record a visit of `raw`, surfacing why it failed
    pub async fn try_visit(&mut self, raw: &str) -> AppResult<()> {
        let resolved = self.resolver.resolve(raw)?;
        debug!(key = %resolved.key, kind = %resolved.kind, "Visiting");
        let entry = Entry::new(resolved.key, Utc::now().timestamp(), resolved.kind);
        self.mutate(Change::Visit(entry)).await.map(|_| ())
    }

    /// Stop tracking `raw`, returning whether it was tracked
    pub async fn forget(&mut self, raw: &str) -> AppResult<bool> {
        let resolved = self.resolver.resolve(raw)?;
        let removed = self.mutate(Change::Forget(resolved.key)).await?;
        Ok(removed > 0)
    }

    /// Drop path entries whose file no longer exists
    pub async fn prune_missing(&mut self) -> AppResult<usize> {
        let pruned = self.mutate(Change::PruneMissing).await?;
        if pruned > 0 {
            info!(pruned, "Pruned missing paths");
        }
        Ok(pruned)
    }

    /// Forget everything
    pub async fn clear(&mut self) -> AppResult<()> {
        self.mutate(Change::Clear).await.map(|_| ())
    }

    /// Save changes whose earlier save failed.
    ///
    /// Runs under the lock on top of a fresh reload, so entries other
    /// processes saved in the meantime are kept.
    pub async fn flush(&mut self) -> AppResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let guard = self.acquire_for_write().await?;
        self.reload_from_disk();
        let saved = self.persist();
        release(guard);
        saved
    }

    /// Re-read the document without taking the lock
    pub fn reload(&mut self) {
        self.reload_from_disk();
    }

    /// Lock, reload, apply `change`, save, unlock.
    ///
    /// A refused lock leaves everything untouched. A failed save keeps
    /// `change` pending.
    async fn mutate(&mut self, change: Change) -> AppResult<usize> {
        let guard = self.acquire_for_write().await?;
        self.reload_from_disk();
        let result = change.apply(Arc::make_mut(&mut self.list));
        if matches!(change, Change::Clear) {
            self.pending.clear();
        }
        self.pending.push(change);
        let saved = self.persist();
        release(guard);
        saved.map(|()| result)
    }

    /// Take the lock, applying the configured policy on failure.
    ///
    /// `Ok(None)` means best-effort mode is proceeding without the lock.
    async fn acquire_for_write(&self) -> AppResult<Option<LockGuard>> {
        match self
            .lock
            .acquire(self.config.lock_timeout(), self.config.poll_interval())
            .await
        {
            Ok(guard) => Ok(Some(guard)),
            Err(e) => match self.config.lock_policy {
                LockPolicy::Strict => Err(e),
                LockPolicy::BestEffort => {
                    warn!(
                        path = %self.lock.path().display(),
                        error = %e,
                        "Proceeding without lock"
                    );
                    Ok(None)
                }
            },
        }
    }

    /// Replace the in-memory list with the document on disk, then replay
    /// pending changes on top.
    ///
    /// Absent and corrupt documents reset the list. When the file cannot be
    /// read at all the in-memory list is kept, since disk state is unknown.
    fn reload_from_disk(&mut self) {
        let entries = match Document::read(&self.document_path) {
            Ok(Some(document)) => document.entries,
            Ok(None) => Vec::new(),
            Err(e @ AppError::CorruptDocument { .. }) => {
                warn!(error = %e, "Resetting store from corrupt document");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Document unreadable, keeping in-memory list");
                return;
            }
        };
        let mut list = MruList::from_entries(entries, self.config.max_entries);
        for change in &self.pending {
            change.apply(&mut list);
        }
        if !self.pending.is_empty() {
            debug!(pending = self.pending.len(), "Replayed unsaved changes");
        }
        self.list = Arc::new(list);
    }

    fn persist(&mut self) -> AppResult<()> {
        let saved = document::save(&self.document_path, self.list.entries());
        match &saved {
            Ok(()) => self.pending.clear(),
            Err(e) => warn!(
                path = %self.document_path.display(),
                pending = self.pending.len(),
                error = %e,
                "Failed to save document"
            ),
        }
        saved
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Recency score of a normalized key; 0 when untracked
    pub fn score(&self, key: &str) -> u64 {
        self.list.score(key)
    }

    /// Aggregate score of every key under `dir`
    pub fn directory_score(&self, dir: &str) -> u64 {
        self.list.directory_score(dir)
    }

    /// Path keys in MRU order
    pub fn recent_paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.list.recent_paths()
    }

    /// Copy of every entry in MRU order
    pub fn recent_items(&self) -> Vec<Entry> {
        self.list.entries().to_vec()
    }

    /// Copy of a page of entries in MRU order
    pub fn range(&self, offset: usize, limit: usize) -> Vec<Entry> {
        self.list.range(offset, limit).to_vec()
    }

    /// Immutable view of the current list
    pub fn snapshot(&self) -> Arc<MruList> {
        Arc::clone(&self.list)
    }

    pub fn resolver(&self) -> &KeyResolver {
        &self.resolver
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Whether every change has reached disk.
    ///
    /// The document path is resolved by `open`, so an open store always has
    /// one; health only turns on pending unsaved changes.
    pub fn is_healthy(&self) -> bool {
        self.pending.is_empty()
    }
}

fn release(guard: Option<LockGuard>) {
    if let Some(guard) = guard {
        let path = guard.path().to_path_buf();
        if let Err(e) = guard.release() {
            warn!(path = %path.display(), error = %e, "Failed to release lock");
        }
    }
}
