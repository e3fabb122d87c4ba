//! In-memory TTL cache for remote lookups
//!
//! Entries are keyed by string and considered absent once older than the
//! configured maximum age. Stale entries are never evicted; the next
//! successful refresh overwrites them.
//!
//! # Example
//!
//! ```rust
//! use facilitymap_core::cache::TtlCache;
//! use std::time::Duration;
//!
//! let cache: TtlCache<Vec<String>> = TtlCache::new(Duration::from_secs(3600));
//! cache.insert("taipei", vec!["Taipei City".to_string()]);
//! assert!(cache.get("taipei").is_some());
//! ```

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    stored_at: Instant,
    value: T,
}

/// Thread-safe in-memory cache with a freshness window
#[derive(Debug)]
pub struct TtlCache<T> {
    max_age: Duration,
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    /// Create a cache whose entries expire after `max_age`
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get a fresh value
    pub fn get(&self, key: &str) -> Option<T> {
        // Handle poisoned lock by recovering the data (still valid even after panic)
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.max_age)
            .map(|entry| entry.value.clone())
    }

    /// Store or overwrite a value
    pub fn insert(&self, key: impl Into<String>, value: T) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.into(),
            CacheEntry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    /// Number of stored entries, stale ones included
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let cache = TtlCache::new(Duration::from_secs(60));

        cache.insert("test_key", "test_value".to_string());
        assert_eq!(cache.get("test_key"), Some("test_value".to_string()));
    }

    #[test]
    fn test_get_missing() {
        let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(60));
        assert!(cache.get("nonexistent").is_none());
    }

    #[test]
    fn test_overwrite() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("k", 1);
        cache.insert("k", 2);
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry() {
        let cache = TtlCache::new(Duration::from_secs(3600));
        cache.insert("expires", "value".to_string());

        tokio::time::advance(Duration::from_secs(3599)).await;
        assert!(cache.get("expires").is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("expires").is_none());

        // Stale entries stay stored until refreshed
        assert_eq!(cache.len(), 1);
        cache.insert("expires", "fresh".to_string());
        assert_eq!(cache.get("expires").as_deref(), Some("fresh"));
    }
}
