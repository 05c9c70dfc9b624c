//! MRU Store Integration Tests
//!
//! Exercises the store against real files in a temp directory:
//! - Ordering, re-visits and eviction
//! - Save/load round trips through a fresh store
//! - Recovery from corrupt documents
//! - Two store instances sharing one document (reload-before-write)
//! - Lock contention under both policies and stale lock recovery

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use recents::storage::document::{self, Document};
use recents::storage::lock::{read_owner_pid, LockFile};
use recents::{LockPolicy, MruStore, StoreConfig};

// ============================================================================
// Helpers
// ============================================================================

fn doc_path(dir: &Path) -> PathBuf {
    dir.join("recent_items.json")
}

fn test_config(dir: &Path) -> StoreConfig {
    StoreConfig {
        lock_timeout_ms: 150,
        poll_interval_ms: 10,
        ..StoreConfig::with_document_path(doc_path(dir))
    }
}

fn keys(store: &MruStore) -> Vec<String> {
    store.recent_items().into_iter().map(|e| e.key).collect()
}

/// Hold the document lock as if another live process owned it
fn hold_lock(dir: &Path) -> PathBuf {
    let lock = LockFile::for_document(&doc_path(dir), Duration::from_secs(60));
    fs::write(lock.path(), std::process::id().to_string()).unwrap();
    lock.path().to_path_buf()
}

// ============================================================================
// Ordering & eviction
// ============================================================================

#[tokio::test]
async fn test_unique_visits_are_reversed() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut store = MruStore::open(test_config(temp_dir.path())).unwrap();

    let visited: Vec<String> = (0..20).map(|i| format!("/files/{i}.txt")).collect();
    for item in &visited {
        assert!(store.visit(item).await);
    }

    let expected: Vec<String> = visited.into_iter().rev().collect();
    assert_eq!(keys(&store), expected);
}

#[tokio::test]
async fn test_revisit_moves_to_front_without_duplicates() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut store = MruStore::open(test_config(temp_dir.path())).unwrap();

    for item in ["/a", "/b", "/c"] {
        store.visit(item).await;
    }
    assert_eq!(store.score("/c"), 3000);
    assert_eq!(store.score("/b"), 2999);
    assert_eq!(store.score("/a"), 2998);

    store.visit("/a").await;
    assert_eq!(keys(&store), vec!["/a", "/c", "/b"]);
    assert_eq!(store.len(), 3);
    assert_eq!(store.score("/a"), 3000);
    assert_eq!(store.score("/c"), 2999);
    assert_eq!(store.score("/b"), 2998);
}

#[tokio::test]
async fn test_eviction_drops_oldest() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        max_entries: 5,
        ..test_config(temp_dir.path())
    };
    let mut store = MruStore::open(config).unwrap();

    for i in 0..8 {
        store.visit(&format!("/f{i}")).await;
    }

    assert_eq!(keys(&store), vec!["/f7", "/f6", "/f5", "/f4", "/f3"]);
    assert_eq!(store.score("/f7"), 5);
    assert_eq!(store.score("/f3"), 1);
    assert_eq!(store.score("/f2"), 0);
    assert_eq!(document::load(&doc_path(temp_dir.path())).len(), 5);
}

#[tokio::test]
async fn test_directory_score_matches_sum() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut store = MruStore::open(test_config(temp_dir.path())).unwrap();
    for item in ["/p/a.rs", "/p/sub/b.rs", "/q/c.rs", "/p/sub/d.rs"] {
        store.visit(item).await;
    }

    let expected: u64 = store
        .recent_items()
        .iter()
        .filter(|e| e.key.starts_with("/p/"))
        .map(|e| store.score(&e.key))
        .sum();
    assert_eq!(store.directory_score("/p"), expected);
    assert_eq!(store.directory_score("/p/sub"), 3000 + 2998);
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_round_trip_through_fresh_store() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut store = MruStore::open(test_config(temp_dir.path())).unwrap();
    for item in ["/a", "free text", "/b/c"] {
        store.visit(item).await;
    }
    let written = store.recent_items();

    let reopened = MruStore::open(test_config(temp_dir.path())).unwrap();
    assert_eq!(reopened.recent_items(), written);
}

#[tokio::test]
async fn test_corrupt_document_resets_and_recovers() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = doc_path(temp_dir.path());
    fs::write(&path, r#"{"version": 1, "entries": [{"item": "/a", "#).unwrap();

    let mut store = MruStore::open(test_config(temp_dir.path())).unwrap();
    assert!(store.is_empty());

    assert!(store.visit("/fresh").await);
    let document = Document::read(&path).unwrap().expect("document saved");
    assert_eq!(document.version, 1);
    assert_eq!(document.entries.len(), 1);
    assert_eq!(document.entries[0].key, "/fresh");
}

#[tokio::test]
async fn test_legacy_documents_load() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        doc_path(temp_dir.path()),
        r#"{"version": 1, "entries": [{"path": "/x", "timestamp": 10}, {"path": "/x", "timestamp": 5}]}"#,
    )
    .unwrap();

    let store = MruStore::open(test_config(temp_dir.path())).unwrap();
    assert_eq!(keys(&store), vec!["/x"]);
    assert_eq!(store.recent_items()[0].timestamp, 10);
}

#[tokio::test]
async fn test_two_stores_do_not_lose_updates() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut first = MruStore::open(test_config(temp_dir.path())).unwrap();
    let mut second = MruStore::open(test_config(temp_dir.path())).unwrap();

    assert!(first.visit("/from-first").await);
    assert!(second.visit("/from-second").await);
    assert!(first.visit("/again-first").await);

    let on_disk: Vec<String> = document::load(&doc_path(temp_dir.path()))
        .into_iter()
        .map(|e| e.key)
        .collect();
    assert_eq!(on_disk, vec!["/again-first", "/from-second", "/from-first"]);
    assert_eq!(keys(&first), on_disk);
}

#[tokio::test]
async fn test_reload_picks_up_other_writers() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut reader = MruStore::open(test_config(temp_dir.path())).unwrap();
    let mut writer = MruStore::open(test_config(temp_dir.path())).unwrap();

    writer.visit("/written").await;
    assert!(reader.is_empty());
    reader.reload();
    assert_eq!(keys(&reader), vec!["/written"]);
}

// ============================================================================
// Save failures
// ============================================================================

#[tokio::test]
async fn test_flush_after_failed_save_keeps_other_writers() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = doc_path(temp_dir.path());
    let mut first = MruStore::open(test_config(temp_dir.path())).unwrap();
    let mut second = MruStore::open(test_config(temp_dir.path())).unwrap();

    // A directory at the document path makes the save fail
    fs::create_dir(&path).unwrap();
    assert!(!first.visit("/a").await);
    assert_eq!(keys(&first), vec!["/a"]);
    assert!(!first.is_healthy());

    fs::remove_dir(&path).unwrap();
    assert!(second.visit("/b").await);

    first.flush().await.unwrap();
    assert!(first.is_healthy());

    let on_disk: Vec<String> = document::load(&path).into_iter().map(|e| e.key).collect();
    assert_eq!(on_disk, vec!["/a", "/b"]);
    assert_eq!(keys(&first), on_disk);
}

#[tokio::test]
async fn test_reload_keeps_unsaved_visits() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = doc_path(temp_dir.path());
    let mut first = MruStore::open(test_config(temp_dir.path())).unwrap();
    let mut second = MruStore::open(test_config(temp_dir.path())).unwrap();

    fs::create_dir(&path).unwrap();
    assert!(!first.visit("/a").await);
    fs::remove_dir(&path).unwrap();
    assert!(second.visit("/b").await);

    first.reload();
    assert_eq!(keys(&first), vec!["/a", "/b"]);
    assert!(!first.is_healthy());
}

// ============================================================================
// Locking
// ============================================================================

#[tokio::test]
async fn test_strict_timeout_leaves_list_untouched() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut store = MruStore::open(test_config(temp_dir.path())).unwrap();
    store.visit("/before").await;

    let lock_path = hold_lock(temp_dir.path());
    let start = Instant::now();
    assert!(!store.visit("/blocked").await);
    assert!(start.elapsed() >= Duration::from_millis(150));

    assert_eq!(keys(&store), vec!["/before"]);
    assert!(store.is_healthy());
    // A foreign lock is never removed by a timed-out writer
    assert!(lock_path.exists());
}

#[tokio::test]
async fn test_best_effort_proceeds_without_lock() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        lock_policy: LockPolicy::BestEffort,
        ..test_config(temp_dir.path())
    };
    let mut store = MruStore::open(config).unwrap();

    let lock_path = hold_lock(temp_dir.path());
    assert!(store.visit("/unsynchronized").await);
    assert_eq!(keys(&store), vec!["/unsynchronized"]);
    assert!(lock_path.exists());
}

#[tokio::test]
async fn test_lock_released_after_visit() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut store = MruStore::open(test_config(temp_dir.path())).unwrap();
    store.visit("/a").await;

    let lock = LockFile::for_document(&doc_path(temp_dir.path()), Duration::from_secs(5));
    assert!(!lock.path().exists());
}

#[tokio::test]
async fn test_stale_lock_is_recovered_by_visit() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        stale_after_ms: 0,
        ..test_config(temp_dir.path())
    };
    let mut store = MruStore::open(config).unwrap();

    let lock = LockFile::for_document(&doc_path(temp_dir.path()), Duration::ZERO);
    fs::write(lock.path(), "not-a-pid").unwrap();

    assert!(store.visit("/after-crash").await);
    assert!(!lock.path().exists());
    assert_eq!(read_owner_pid(lock.path()), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_tasks_on_one_document() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        lock_timeout_ms: 5000,
        poll_interval_ms: 5,
        ..StoreConfig::with_document_path(doc_path(temp_dir.path()))
    };

    let mut tasks = Vec::new();
    for worker in 0..4 {
        let config = config.clone();
        tasks.push(tokio::spawn(async move {
            let mut store = MruStore::open(config).unwrap();
            for i in 0..5 {
                assert!(store.visit(&format!("/w{worker}/{i}")).await);
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    // Every visit ran under the lock after a reload, so none were lost
    assert_eq!(document::load(&doc_path(temp_dir.path())).len(), 20);
}
