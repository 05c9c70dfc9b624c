//! Integration Tests Module
//!
//! Integration tests for the recents store. Tests cover the store against
//! real documents, lock file contention and recovery, and the process-global
//! public API.

// Store ordering, persistence and cross-instance tests
mod store_test;

// Lock file liveness tests against real child processes
mod lock_test;

// Process-global API lifecycle tests
mod api_test;
