//! Public API Integration Tests
//!
//! Drives the process-global API end to end. The global can only be
//! installed once per test binary, so every API check lives in this one test.

use recents::{api, GetOptions, RecentsState, StoreConfig};

#[tokio::test]
async fn test_global_api_lifecycle() {
    let temp_dir = tempfile::tempdir().unwrap();
    let document = temp_dir.path().join("recent_items.json");
    let state = RecentsState::new(StoreConfig::with_document_path(&document));
    assert!(api::install(state).is_ok());

    // A second install is refused
    let again = RecentsState::new(StoreConfig::default());
    assert!(api::install(again).is_err());

    api::setup().await.unwrap();
    api::setup().await.unwrap();

    assert!(api::visit("/tmp/one.txt").await);
    assert!(api::visit("search term").await);
    assert!(api::visit("/tmp/two.txt").await);

    assert_eq!(api::recent_paths().await, vec!["/tmp/two.txt", "/tmp/one.txt"]);
    let items = api::recent_items().await;
    assert_eq!(items.len(), 3);
    assert!(!items[1].is_path);

    assert_eq!(api::get("/tmp/two.txt", GetOptions::default()).await, 3000);
    assert_eq!(api::get("search term", GetOptions::default()).await, 2999);
    assert_eq!(api::get("/tmp/unknown", GetOptions { seed: true }).await, 0);

    api::close().await.unwrap();
    api::close().await.unwrap();
    assert!(!api::global().is_initialized().await);
    assert!(document.exists());

    // Using the API again reopens the store from disk
    assert_eq!(api::recent_items().await.len(), 3);
    api::close().await.unwrap();
}
