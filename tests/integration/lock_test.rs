//! Lock Liveness Integration Tests
//!
//! Uses a real child process as the lock owner so the liveness probe is
//! exercised against a pid that is first alive and then gone.

use std::fs;
use std::time::Duration;

use recents::storage::lock::{read_owner_pid, LockFile};

#[cfg(unix)]
#[tokio::test]
async fn test_lock_owned_by_live_child_is_kept_until_it_exits() {
    use std::process::Command;

    let temp_dir = tempfile::tempdir().unwrap();
    let lock = LockFile::for_document(&temp_dir.path().join("recent.json"), Duration::ZERO);

    let mut child = Command::new("sleep").arg("30").spawn().unwrap();
    fs::write(lock.path(), child.id().to_string()).unwrap();

    // Old enough to be stale, but the owner is running
    let err = lock
        .acquire(Duration::from_millis(100), Duration::from_millis(10))
        .await
        .unwrap_err();
    assert!(err.is_lock_timeout());
    assert_eq!(read_owner_pid(lock.path()), Some(child.id()));

    child.kill().unwrap();
    child.wait().unwrap();

    let guard = lock
        .acquire(Duration::from_millis(500), Duration::from_millis(10))
        .await
        .unwrap();
    assert_eq!(read_owner_pid(guard.path()), Some(std::process::id()));
    guard.release().unwrap();
    assert!(!lock.path().exists());
}

#[tokio::test]
async fn test_lock_file_contains_decimal_pid() {
    let temp_dir = tempfile::tempdir().unwrap();
    let lock = LockFile::for_document(&temp_dir.path().join("recent.json"), Duration::from_secs(5));

    let guard = lock
        .acquire(Duration::from_millis(100), Duration::from_millis(10))
        .await
        .unwrap();
    let content = fs::read_to_string(guard.path()).unwrap();
    assert_eq!(content, std::process::id().to_string());
}
