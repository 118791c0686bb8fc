//! crates/app_review_core/src/cache.rs
//!
//! Per-platform memo of table snapshots for the lifetime of a session.

use std::collections::HashMap;

use crate::domain::{Platform, TableSnapshot};

/// Holds at most one snapshot per platform. Entries are never evicted;
/// only a full session reset clears them.
#[derive(Debug, Clone, Default)]
pub struct PlatformTableCache {
    entries: HashMap<Platform, TableSnapshot>,
}

impl PlatformTableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, platform: Platform) -> Option<&TableSnapshot> {
        self.entries.get(&platform)
    }

    /// Stores or overwrites the entry for `platform`.
    pub fn put(&mut self, platform: Platform, snapshot: TableSnapshot) {
        self.entries.insert(platform, snapshot);
    }

    pub fn contains(&self, platform: Platform) -> bool {
        self.entries.contains_key(&platform)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
