//! Dependency-set cache shared across invocations.
//!
//! A walk touches every file in the import graph, so hosts that invoke the
//! pipeline repeatedly keep the resolved sets here. Entries are replaced
//! wholesale; readers never observe a partially updated set.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::config::CacheScope;
use crate::dependency::DependencySet;

/// Slot a dependency set is cached under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The set reachable from one entry file.
    Entry(PathBuf),
    /// The single set shared by every entry file.
    Session,
}

impl CacheKey {
    /// The key an invocation for `entry` uses under `scope`.
    pub fn for_entry(scope: CacheScope, entry: impl Into<PathBuf>) -> Self {
        match scope {
            CacheScope::Entry => CacheKey::Entry(entry.into()),
            CacheScope::Session => CacheKey::Session,
        }
    }
}

/// Lookup counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

#[derive(Default)]
struct Inner {
    sets: FxHashMap<CacheKey, Arc<DependencySet>>,
    stats: CacheStats,
}

/// Thread-safe store of resolved dependency sets.
#[derive(Default)]
pub struct DependencyCache {
    inner: Mutex<Inner>,
}

impl DependencyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The set cached under `key`. Counts a hit or a miss.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<DependencySet>> {
        let mut inner = self.inner.lock();
        let found = inner.sets.get(key).cloned();
        if found.is_some() {
            inner.stats.hits += 1;
        } else {
            inner.stats.misses += 1;
        }
        found
    }

    /// Replace whatever is cached under `key`.
    pub fn store(&self, key: CacheKey, set: Arc<DependencySet>) {
        self.inner.lock().sets.insert(key, set);
    }

    /// Drop the set under `key`. Returns `true` if there was one.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.inner.lock().sets.remove(key).is_some()
    }

    /// Drop every cached set. Counters are kept.
    pub fn clear(&self) {
        self.inner.lock().sets.clear();
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.inner.lock().sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().sets.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats
    }
}

impl std::fmt::Debug for DependencyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("DependencyCache")
            .field("slots", &inner.sets.len())
            .field("stats", &inner.stats)
            .finish()
    }
}
