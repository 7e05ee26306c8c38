// In-memory cache store.
// Keyed entries with an insertion timestamp and a shared expiry window.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Default expiry window: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// A cached value with the instant it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub key: String,
    pub data: T,
    pub timestamp: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(key: impl Into<String>, data: T) -> Self {
        Self {
            key: key.into(),
            data,
            timestamp: Instant::now(),
        }
    }

    /// An entry is stale once strictly more than `ttl` has elapsed.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.timestamp.elapsed() > ttl
    }
}

/// Process-local cache shared between concurrent fetches.
///
/// Values are handed out by clone, so callers normally store `Arc`s and a
/// cache hit returns the very same allocation.
#[derive(Debug)]
pub struct MemoryCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> MemoryCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the value for `key` if present and not stale.
    /// Stale entries are evicted on read.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if !entry.is_stale(self.ttl) => Some(entry.data.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value stamped with the current instant.
    pub fn insert(&self, key: impl Into<String>, data: T) {
        let entry = CacheEntry::new(key, data);
        self.lock().insert(entry.key.clone(), entry);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl<T: Clone> Default for MemoryCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_insert_and_get() {
        let cache = MemoryCache::default();
        cache.insert("post-a", Arc::new("hello".to_string()));

        let first = cache.get("post-a").unwrap();
        let second = cache.get("post-a").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.ttl, DEFAULT_TTL);
    }

    #[test]
    fn test_missing_key() {
        let cache: MemoryCache<u32> = MemoryCache::default();
        assert!(cache.get("nothing").is_none());
    }

    #[test]
    fn test_entry_expires() {
        let cache = MemoryCache::new(Duration::from_millis(1));
        cache.insert("post-a", 1u32);
        thread::sleep(Duration::from_millis(10));

        assert!(cache.get("post-a").is_none());
        assert!(cache.lock().is_empty(), "stale entry should be evicted on read");
    }

    #[test]
    fn test_entry_staleness_boundary() {
        let mut entry = CacheEntry::new("k", ());
        assert!(!entry.is_stale(Duration::from_secs(300)));

        entry.timestamp = Instant::now()
            .checked_sub(Duration::from_secs(600))
            .unwrap_or_else(Instant::now);
        assert!(entry.is_stale(Duration::from_secs(300)));
    }

    #[test]
    fn test_clear() {
        let cache = MemoryCache::default();
        cache.insert("a", 1u32);
        cache.insert("b", 2u32);
        assert_eq!(cache.lock().len(), 2);

        cache.clear();
        assert!(cache.lock().is_empty());
        assert!(cache.get("a").is_none());
    }
}
