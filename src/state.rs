//! Recents State
//!
//! Process-wide lifecycle object owning at most one shared store. Callers
//! either construct a `RecentsState` and pass it around, or use the
//! process-global instance behind [`crate::api`].

use std::sync::Arc;

use recents_core::{Entry, KeyResolver};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::models::settings::StoreConfig;
use crate::services::handle::{FrecencyHandle, GetOptions, SharedStore};
use crate::services::store::MruStore;
use crate::storage::ConfigService;
use crate::utils::error::{AppError, AppResult};

/// Lifecycle owner for the shared store
#[derive(Debug)]
pub struct RecentsState {
    config: StoreConfig,
    /// Overrides the resolver derived from `config.item_mode`
    resolver: Option<KeyResolver>,
    store: RwLock<Option<SharedStore>>,
}

impl RecentsState {
    /// Create an uninitialized state for `config`
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            resolver: None,
            store: RwLock::new(None),
        }
    }

    /// Create an uninitialized state from the installation's config.json
    pub fn from_config_file() -> AppResult<Self> {
        let service = ConfigService::new()?;
        Ok(Self::new(service.get_config_clone()))
    }

    /// Use `resolver` for every store this state opens
    pub fn with_resolver(mut self, resolver: KeyResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Open the store if it is not open yet. Safe to call repeatedly.
    pub async fn setup(&self) -> AppResult<()> {
        self.ensure_store().await.map(|_| ())
    }

    /// Flush and drop the store. Safe to call repeatedly.
    ///
    /// When the flush fails the store stays open with its unsaved changes,
    /// so a later `close()` can retry.
    pub async fn close(&self) -> AppResult<()> {
        let mut slot = self.store.write().await;
        let Some(store) = slot.as_ref() else {
            return Ok(());
        };
        {
            let mut store = store.lock().await;
            store.flush().await?;
            info!(path = %store.document_path().display(), "Closed MRU store");
        }
        *slot = None;
        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        self.store.read().await.is_some()
    }

    /// The open store.
    ///
    /// Errors with `NotInitialized` before `setup()` or after `close()`.
    pub async fn store(&self) -> AppResult<SharedStore> {
        match &*self.store.read().await {
            Some(store) => Ok(Arc::clone(store)),
            None => Err(AppError::not_initialized("MRU store not set up")),
        }
    }

    /// A fresh handle, opening the store on first use
    pub async fn handle(&self) -> AppResult<FrecencyHandle> {
        let store = self.ensure_store().await?;
        Ok(FrecencyHandle::new(store).await)
    }

    /// Record a visit; `false` when it could not be persisted
    pub async fn visit(&self, raw: &str) -> bool {
        let store = match self.ensure_store().await {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "MRU store unavailable");
                return false;
            }
        };
        let mut store = store.lock().await;
        let recorded = store.visit(raw).await;
        recorded
    }

    /// Score `item` against the store's current list
    pub async fn get(&self, item: &str, options: GetOptions) -> u64 {
        match self.handle().await {
            Ok(handle) => handle.get(item, options),
            Err(_) => 0,
        }
    }

    /// Path keys in MRU order
    pub async fn recent_paths(&self) -> Vec<String> {
        let Ok(store) = self.ensure_store().await else {
            return Vec::new();
        };
        let store = store.lock().await;
        let paths: Vec<String> = store.recent_paths().map(str::to_string).collect();
        paths
    }

    /// Every entry in MRU order
    pub async fn recent_items(&self) -> Vec<Entry> {
        let Ok(store) = self.ensure_store().await else {
            return Vec::new();
        };
        let items = store.lock().await.recent_items();
        items
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    async fn ensure_store(&self) -> AppResult<SharedStore> {
        if let Some(store) = &*self.store.read().await {
            return Ok(Arc::clone(store));
        }

        let mut slot = self.store.write().await;
        if let Some(store) = &*slot {
            return Ok(Arc::clone(store));
        }

        let mut store = MruStore::open(self.config.clone())?;
        if let Some(resolver) = &self.resolver {
            store = store.with_resolver(resolver.clone());
        }
        let store = Arc::new(Mutex::new(store));
        *slot = Some(Arc::clone(&store));
        Ok(store)
    }
}
