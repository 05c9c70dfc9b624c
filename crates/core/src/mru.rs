//! MRU Ranking
//!
//! The ordered most-recently-used list and its key → rank index. This is the
//! pure half of the store: no I/O, no locking. The index is rebuilt wholesale
//! after every mutation so it can never drift from the list.

use std::collections::HashMap;
use std::path::MAIN_SEPARATOR;

use crate::entry::Entry;

/// Default upper bound on tracked entries
pub const DEFAULT_MAX_ENTRIES: usize = 3000;

/// Ordered list of entries, most recent first, with O(1) rank lookup.
#[derive(Debug, Clone)]
pub struct MruList {
    entries: Vec<Entry>,
    /// key → 1-based rank
    index: HashMap<String, usize>,
    max_entries: usize,
}

impl MruList {
    /// Create an empty list bounded to `max_entries`
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            max_entries,
        }
    }

    /// Build a list from entries in MRU order.
    ///
    /// Duplicate keys keep their first (most recent) occurrence and the
    /// result is trimmed to `max_entries`.
    pub fn from_entries(entries: Vec<Entry>, max_entries: usize) -> Self {
        let mut seen = std::collections::HashSet::with_capacity(entries.len());
        let entries = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.key.clone()))
            .collect();
        let mut list = Self {
            entries,
            index: HashMap::new(),
            max_entries,
        };
        list.entries.truncate(max_entries);
        list.rebuild_index();
        list
    }

    /// Move `entry.key` to the front, replacing any previous occurrence.
    pub fn visit(&mut self, entry: Entry) {
        if let Some(rank) = self.rank(&entry.key) {
            self.entries.remove(rank - 1);
        }
        self.entries.insert(0, entry);
        self.entries.truncate(self.max_entries);
        self.rebuild_index();
    }

    /// Remove `key`, returning whether it was tracked
    pub fn remove(&mut self, key: &str) -> bool {
        match self.rank(key) {
            Some(rank) => {
                self.entries.remove(rank - 1);
                self.rebuild_index();
                true
            }
            None => false,
        }
    }

    /// Keep only entries matching `keep`, returning how many were dropped
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&Entry) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(keep);
        self.rebuild_index();
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// 1-based rank of `key`, 1 being the most recent
    pub fn rank(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Recency score: `max_entries` for rank 1 down to 1 for the last slot,
    /// 0 when the key is not tracked.
    pub fn score(&self, key: &str) -> u64 {
        match self.rank(key) {
            Some(rank) => (self.max_entries + 1).saturating_sub(rank) as u64,
            None => 0,
        }
    }

    /// Sum of scores of every entry whose key lies under `dir`.
    ///
    /// Matching is a literal prefix test against `dir` plus one separator.
    /// Nested directories are not deduplicated: a file contributes to every
    /// ancestor it is queried under.
    pub fn directory_score(&self, dir: &str) -> u64 {
        let trimmed = dir.strip_suffix(MAIN_SEPARATOR).unwrap_or(dir);
        let prefix = format!("{trimmed}{MAIN_SEPARATOR}");
        self.entries
            .iter()
            .filter(|entry| entry.key.starts_with(&prefix))
            .map(|entry| self.score(&entry.key))
            .sum()
    }

    /// Keys of path entries in MRU order
    pub fn recent_paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.is_path)
            .map(|entry| entry.key.as_str())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// A page of entries in MRU order; out-of-range pages are empty
    pub fn range(&self, offset: usize, limit: usize) -> &[Entry] {
        let start = offset.min(self.entries.len());
        let end = start.saturating_add(limit).min(self.entries.len());
        &self.entries[start..end]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.key.clone(), i + 1))
            .collect();
    }
}

impl Default for MruList {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}
