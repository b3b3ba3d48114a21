//! Run-scoped crawl state: dedup set and saved-record counter
//!
//! The seen-set and the saved counter are the only shared mutable resource in
//! the crawler. Both live behind a single mutex so that capacity and dedup
//! checks are one atomic decision; concurrent pages racing near the quota
//! boundary cannot jointly overshoot it. State lives for one run only and is
//! never persisted.

use std::collections::HashSet;
use std::sync::Mutex;

/// Shared dedup/quota state for one crawl run.
pub struct CrawlState {
    quota: usize,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    saved: usize,
    seen: HashSet<String>,
}

impl CrawlState {
    /// Creates state for a run with the given result quota.
    pub fn new(quota: usize) -> Self {
        Self {
            quota,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Accepts a record key if capacity remains and the key is new this run.
    ///
    /// On acceptance the key is recorded and the saved counter incremented,
    /// all under one lock, so the quota is a hard cap.
    pub fn try_accept(&self, key: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.saved >= self.quota {
            return false;
        }
        if inner.seen.contains(key) {
            return false;
        }
        inner.seen.insert(key.to_string());
        inner.saved += 1;
        true
    }

    /// Number of records accepted so far.
    pub fn saved(&self) -> usize {
        self.inner.lock().unwrap().saved
    }

    /// Remaining capacity before the quota is reached.
    pub fn remaining_capacity(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        self.quota.saturating_sub(inner.saved)
    }

    /// Whether the quota has been reached.
    pub fn is_full(&self) -> bool {
        self.remaining_capacity() == 0
    }
}
