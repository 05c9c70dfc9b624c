//! Advisory Lock File
//!
//! Cross-process mutual exclusion for the MRU document. The lock is a sidecar
//! file (`<document>.lock`) created with create-new semantics: its existence
//! means "held", its content is the owner's pid and is only used to decide
//! whether an old lock can be reclaimed.
//!
//! A lock older than the staleness threshold whose owner is not running is
//! removed and the acquisition retried immediately. Waiting between attempts
//! is a `tokio` sleep so other tasks keep running.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use tracing::{debug, info, warn};

use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{ensure_parent_dir, lock_path_for};

/// Lock file for one document.
#[derive(Debug, Clone)]
pub struct LockFile {
    path: PathBuf,
    stale_after: Duration,
}

impl LockFile {
    /// Lock guarding `document`, reclaimable once older than `stale_after`
    pub fn for_document(document: &Path, stale_after: Duration) -> Self {
        Self {
            path: lock_path_for(document),
            stale_after,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait up to `timeout` for the lock, polling every `poll_interval`.
    ///
    /// Returns `AppError::LockTimeout` when the budget runs out; I/O errors
    /// other than "already exists" are returned as they happen.
    pub async fn acquire(&self, timeout: Duration, poll_interval: Duration) -> AppResult<LockGuard> {
        ensure_parent_dir(&self.path)?;
        let start = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            if let Some(guard) = self.try_acquire()? {
                if attempts > 1 {
                    debug!(
                        path = %self.path.display(),
                        attempts,
                        waited_ms = start.elapsed().as_millis() as u64,
                        "Lock acquired after contention"
                    );
                }
                return Ok(guard);
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                let waited_ms = elapsed.as_millis() as u64;
                warn!(path = %self.path.display(), waited_ms, attempts, "Lock acquisition timed out");
                return Err(AppError::LockTimeout {
                    path: self.path.clone(),
                    waited_ms,
                });
            }

            tokio::time::sleep(poll_interval.min(timeout - elapsed)).await;
        }
    }

    /// Make a single attempt, reclaiming a stale lock if there is one.
    ///
    /// `Ok(None)` means another live owner holds the lock.
    pub fn try_acquire(&self) -> AppResult<Option<LockGuard>> {
        match self.create() {
            Ok(guard) => return Ok(Some(guard)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }

        if !self.reclaim_if_stale()? {
            return Ok(None);
        }

        match self.create() {
            Ok(guard) => Ok(Some(guard)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn create(&self) -> std::io::Result<LockGuard> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)?;
        let guard = LockGuard {
            path: self.path.clone(),
            held: true,
        };
        // On a failed write the guard drops and removes the file again.
        file.write_all(std::process::id().to_string().as_bytes())?;
        Ok(guard)
    }

    /// Remove the existing lock if it is old and its owner is gone.
    ///
    /// Returns `true` when the caller should retry immediately, which also
    /// covers the lock vanishing between the failed create and this check.
    fn reclaim_if_stale(&self) -> AppResult<bool> {
        let modified = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        };

        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default();
        if age < self.stale_after {
            return Ok(false);
        }

        let owner = read_owner_pid(&self.path);
        if let Some(pid) = owner {
            if is_pid_alive(pid) {
                debug!(
                    path = %self.path.display(),
                    pid,
                    age_ms = age.as_millis() as u64,
                    "Old lock still owned by a live process"
                );
                return Ok(false);
            }
        }

        // Another process may have reclaimed and re-created the lock since
        // it was inspected; only remove the lock we judged stale.
        if !self.is_unchanged(modified, owner) {
            debug!(path = %self.path.display(), "Lock changed hands during stale check");
            return Ok(false);
        }

        remove_lock_file(&self.path)?;
        info!(
            path = %self.path.display(),
            pid = ?owner,
            age_ms = age.as_millis() as u64,
            "Recovered stale lock"
        );
        Ok(true)
    }

    /// Whether the lock file still has the given mtime and owner
    fn is_unchanged(&self, modified: SystemTime, owner: Option<u32>) -> bool {
        match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(current) => current == modified && read_owner_pid(&self.path) == owner,
            Err(_) => false,
        }
    }
}

/// A held lock. Dropping the guard releases it.
#[derive(Debug)]
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard {
    path: PathBuf,
    held: bool,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release explicitly, surfacing any removal error
    pub fn release(mut self) -> AppResult<()> {
        self.release_inner()?;
        Ok(())
    }

    fn release_inner(&mut self) -> std::io::Result<()> {
        if !self.held {
            return Ok(());
        }
        self.held = false;
        remove_lock_file(&self.path)
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = self.release_inner() {
            warn!(path = %self.path.display(), error = %e, "Failed to release lock");
        }
    }
}

/// Remove a lock file; a lock that is already gone counts as released.
pub fn remove_lock_file(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Pid recorded in a lock file, if it can be read and parsed
pub fn read_owner_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Whether `pid` names a running process.
///
/// Unix sends signal 0, which checks existence without delivering anything;
/// `EPERM` means the process exists under another user. Elsewhere only our
/// own pid is known to be alive and any other owner is assumed dead.
#[cfg(unix)]
fn is_pid_alive(pid: u32) -> bool {
    if pid == std::process::id() {
        return true;
    }
    // 0 and negative values address process groups, not a single owner
    let pid = match libc::pid_t::try_from(pid) {
        Ok(pid) if pid > 0 => pid,
        _ => return false,
    };
    if unsafe { libc::kill(pid, 0) } == 0 {
        return true;
    }
    std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
fn is_pid_alive(pid: u32) -> bool {
    pid == std::process::id()
}
