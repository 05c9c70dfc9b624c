//! Public API
//!
//! Free functions over one process-global [`RecentsState`], for collaborators
//! (editor event wiring, picker UIs) that do not carry a state around. The
//! global is created on first use from the installation's config.json, or
//! from whatever was passed to [`install`] before that.

use std::sync::OnceLock;

use recents_core::Entry;
use tracing::warn;

use crate::models::settings::StoreConfig;
use crate::services::handle::GetOptions;
use crate::state::RecentsState;
use crate::utils::error::AppResult;

static STATE: OnceLock<RecentsState> = OnceLock::new();

/// Use `state` as the process-global state.
///
/// Must happen before any other function here runs; afterwards the global is
/// fixed and `state` is handed back.
pub fn install(state: RecentsState) -> Result<(), RecentsState> {
    STATE.set(state)
}

/// The process-global state
pub fn global() -> &'static RecentsState {
    STATE.get_or_init(|| match RecentsState::from_config_file() {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, "Falling back to default store config");
            RecentsState::new(StoreConfig::default())
        }
    })
}

/// Open the global store. Idempotent.
pub async fn setup() -> AppResult<()> {
    global().setup().await
}

/// Flush and release the global store. Idempotent.
pub async fn close() -> AppResult<()> {
    global().close().await
}

/// Record a visit of `raw`
pub async fn visit(raw: &str) -> bool {
    global().visit(raw).await
}

/// Recency score of `item`
pub async fn get(item: &str, options: GetOptions) -> u64 {
    global().get(item, options).await
}

/// Tracked paths, most recent first
pub async fn recent_paths() -> Vec<String> {
    global().recent_paths().await
}

/// Tracked entries, most recent first
pub async fn recent_items() -> Vec<Entry> {
    global().recent_items().await
}
