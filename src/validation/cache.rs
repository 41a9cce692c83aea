//! Bounded least-recently-used cache for assembled schemas.
//!
//! Capacity is tiny (two model types exist), so a vector under a mutex is
//! enough. Values are shared as `Arc` and must be treated as immutable:
//! every concurrent validation reads the same schema object.

use std::sync::{Arc, Mutex, PoisonError};

/// LRU cache keyed by string, holding immutable shared values.
#[derive(Debug)]
pub struct BoundedCache<V> {
    capacity: usize,
    entries: Mutex<Vec<(String, Arc<V>)>>,
}

impl<V> BoundedCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Fetch the value for `key`, building it outside the lock on a miss.
    ///
    /// Concurrent misses may build duplicates; builds are pure functions of
    /// the key, so results are interchangeable and the last insert wins.
    pub fn get_or_insert_with(&self, key: &str, build: impl FnOnce() -> V) -> Arc<V> {
        if let Some(found) = self.touch(key) {
            return found;
        }
        let built = Arc::new(build());
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(position) = entries.iter().position(|(k, _)| k == key) {
            entries.remove(position);
        } else if entries.len() >= self.capacity {
            entries.remove(0);
        }
        entries.push((key.to_string(), Arc::clone(&built)));
        built
    }

    /// Mark `key` as most recently used and return its value.
    fn touch(&self, key: &str) -> Option<Arc<V>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let position = entries.iter().position(|(k, _)| k == key)?;
        let entry = entries.remove(position);
        let value = Arc::clone(&entry.1);
        entries.push(entry);
        Some(value)
    }

    /// Whether `key` is currently cached.
    pub fn contains(&self, key: &str) -> bool {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().any(|(k, _)| k == key)
    }

    /// Cached keys, least recently used first.
    pub fn keys(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().map(|(k, _)| k.clone()).collect()
    }
}
