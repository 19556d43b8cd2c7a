//! Bounded memoization of parsed type annotations.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;
use tracing::debug;

use super::php_type::PhpType;

/// Cache key: the annotation text plus the import context it was resolved in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub input: String,
    /// [`ImportContext::fingerprint`](super::ImportContext::fingerprint), or
    /// `None` when resolution needed no context.
    pub context: Option<String>,
}

impl CacheKey {
    pub fn new(input: &str, context: Option<String>) -> Self {
        Self {
            input: input.to_string(),
            context,
        }
    }
}

type Entries = IndexMap<CacheKey, Option<Arc<PhpType>>, FxBuildHasher>;

/// Least-recently-used cache of parse results, failures included.
///
/// Entries are kept in recency order: index 0 is the next to be evicted.
/// A lookup and the insertion of its result happen under one lock, so a
/// key is never parsed twice concurrently and eviction order stays exact.
#[derive(Debug)]
pub struct TypeCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl TypeCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(IndexMap::with_capacity_and_hasher(
                capacity.min(256),
                FxBuildHasher,
            )),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Return the cached result for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with(
        &self,
        key: CacheKey,
        compute: impl FnOnce() -> Option<PhpType>,
    ) -> Option<Arc<PhpType>> {
        if self.capacity == 0 {
            return compute().map(Arc::new);
        }

        let mut entries = self.entries.lock();
        if let Some((_, key, value)) = entries.shift_remove_full(&key) {
            // Re-insert at the back: most recently used.
            entries.insert(key, value.clone());
            return value;
        }

        debug!(input = %key.input, "type cache miss");
        let value = compute().map(Arc::new);
        entries.insert(key, value.clone());
        while entries.len() > self.capacity {
            if let Some((evicted, _)) = entries.shift_remove_index(0) {
                debug!(input = %evicted.input, "type cache eviction");
            }
        }
        value
    }
}

impl Default for TypeCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TYPE_CACHE_CAPACITY)
    }
}
