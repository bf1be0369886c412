use dashmap::DashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

/// A thread-safe, unbounded cache with per-entry TTL.
///
/// Entries are never invalidated early. Expired entries are dropped lazily on
/// read and in bulk by [`Cache::cleanup`].
pub struct Cache<V> {
    data: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V: Clone> Cache<V> {
    /// Create a new cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a live value from the cache.
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entry = self.data.get(key)?;
            if entry.expires_at > Instant::now() {
                return Some(entry.value.clone());
            }
        }

        // A writer may have stored a fresh entry since the read above.
        self.data
            .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        None
    }

    /// Store a value, replacing any previous entry and restarting its TTL.
    pub fn set(&self, key: String, value: V) {
        self.data.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Return the live value for `key`, or run `compute` and store its output.
    ///
    /// No lock is held while `compute` runs, so two concurrent misses for the
    /// same key both compute and the later write wins.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        if let Some(value) = self.get(key) {
            debug!("Cache hit for {}", key);
            return value;
        }

        debug!("Cache miss for {}", key);
        let value = compute().await;
        self.set(key.to_string(), value.clone());
        value
    }

    /// Remove all expired entries. Returns how many were dropped.
    pub fn cleanup(&self) -> usize {
        let before = self.data.len();
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.data.len())
    }

    /// Number of entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_cache_basic() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.set("AAPL".to_string(), 1);
        assert_eq!(cache.get("AAPL"), Some(1));
        assert_eq!(cache.get("MSFT"), None);
    }

    #[test]
    fn test_cache_expiration() {
        let cache = Cache::new(Duration::from_millis(10));
        cache.set("AAPL".to_string(), 1);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("AAPL"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_read_keeps_fresh_entries() {
        let cache = Cache::new(Duration::from_millis(10));
        cache.set("AAPL".to_string(), 1);
        cache.set("MSFT".to_string(), 2);
        std::thread::sleep(Duration::from_millis(20));

        cache.set("MSFT".to_string(), 3);
        assert_eq!(cache.get("AAPL"), None);
        assert_eq!(cache.get("MSFT"), Some(3));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_overwrite_restarts_entry() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.set("AAPL".to_string(), 1);
        cache.set("AAPL".to_string(), 2);
        assert_eq!(cache.get("AAPL"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_cleanup() {
        let cache = Cache::new(Duration::from_millis(10));
        cache.set("AAPL".to_string(), 1);
        cache.set("MSFT".to_string(), 2);
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.cleanup(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_get_or_compute_memoizes() {
        let cache = Cache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_compute("AAPL", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Arc::new(vec![1.0, 2.0])
                })
                .await;
            assert_eq!(*value, vec![1.0, 2.0]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_compute_shares_allocation() {
        let cache = Cache::new(Duration::from_secs(60));
        let first = cache.get_or_compute("AAPL", || async { Arc::new(42) }).await;
        let second = cache.get_or_compute("AAPL", || async { Arc::new(7) }).await;
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_get_or_compute_recomputes_after_ttl() {
        let cache = Cache::new(Duration::from_millis(10));
        let first = cache.get_or_compute("AAPL", || async { 1 }).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = cache.get_or_compute("AAPL", || async { 2 }).await;
        assert_eq!((first, second), (1, 2));
    }

    #[test]
    fn test_get_or_compute_blocking_caller() {
        let cache: Cache<&'static str> = Cache::new(Duration::from_secs(60));
        let value = tokio_test::block_on(cache.get_or_compute("KO", || async { "cached" }));
        assert_eq!(value, "cached");
        assert_eq!(cache.get("KO"), Some("cached"));
    }
}
