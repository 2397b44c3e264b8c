//! Bounded TTL cache for AI completions.
//!
//! Entries are evicted first-in, first-out once the cache is full: the
//! entry inserted earliest goes, regardless of how recently it was read or
//! when it expires. Expired entries are dropped lazily on `get` and in bulk
//! by [`AiCache::cleanup`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indexmap::IndexMap;
use serde_json::json;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::CacheConfig;

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// Process-wide completion cache, safe to share behind an `Arc`.
pub struct AiCache {
    enabled: AtomicBool,
    default_ttl: Duration,
    max_size: usize,
    /// Insertion order is the eviction order.
    entries: Mutex<IndexMap<String, CacheEntry>>,
}

/// Build the cache key for a prompt and its resolved model parameters.
///
/// Callers must pass resolved values (their own or the configured
/// defaults), so requests that differ only in an unspecified option share a
/// key.
pub fn cache_key(prompt: &str, model: &str, temperature: f64, max_tokens: u32) -> String {
    let params = json!({
        "model": model,
        "temperature": temperature,
        "maxTokens": max_tokens,
    });
    format!("{prompt}__{params}")
}

impl AiCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            enabled: AtomicBool::new(config.enabled),
            default_ttl: config.ttl,
            max_size: config.max_size,
            entries: Mutex::new(IndexMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Turn caching on or off. Existing entries are kept either way.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// TTL applied when a caller does not supply one.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Look up a live entry. An expired entry counts as a miss and is
    /// removed.
    pub async fn get(&self, key: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }

        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let expired = match entries.get(key) {
            Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.shift_remove(key);
        }
        None
    }

    /// Store `value` under `key` for `ttl`.
    ///
    /// Overwriting an existing key keeps its place in the eviction order.
    /// Inserting a new key into a full cache first evicts the oldest
    /// inserted entry.
    pub async fn set(&self, key: String, value: String, ttl: Duration) {
        if !self.is_enabled() || self.max_size == 0 {
            return;
        }

        let mut entries = self.entries.lock().await;
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };

        if let Some(existing) = entries.get_mut(&key) {
            *existing = entry;
            return;
        }

        if entries.len() >= self.max_size {
            if let Some((evicted, _)) = entries.shift_remove_index(0) {
                tracing::debug!(key = %evicted, "AI cache full, evicted oldest entry");
            }
        }
        entries.insert(key, entry);
    }

    /// Remove a single entry. Returns whether it existed.
    pub async fn delete(&self, key: &str) -> bool {
        self.entries.lock().await.shift_remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Drop every expired entry. Returns how many were removed.
    pub async fn cleanup(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        before - entries.len()
    }

    /// Number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    fn cache(max_size: usize) -> AiCache {
        AiCache::new(&CacheConfig {
            enabled: true,
            ttl: TTL,
            max_size,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn set_then_get_returns_value() {
        let c = cache(10);
        c.set("k".into(), "v".into(), TTL).await;
        assert_eq!(c.get("k").await.as_deref(), Some("v"));
    }

    #[tokio::test(start_paused = true)]
    async fn get_after_ttl_misses_and_evicts() {
        let c = cache(10);
        c.set("k".into(), "v".into(), TTL).await;

        tokio::time::advance(TTL).await;

        assert_eq!(c.get("k").await, None);
        assert_eq!(c.len().await, 0, "stale entry should be removed on get");
    }

    #[tokio::test(start_paused = true)]
    async fn entry_is_live_until_exactly_its_expiry() {
        let c = cache(10);
        c.set("k".into(), "v".into(), TTL).await;

        tokio::time::advance(TTL - Duration::from_millis(1)).await;
        assert!(c.get("k").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn full_cache_evicts_first_inserted_entry() {
        let c = cache(3);
        for k in ["a", "b", "c"] {
            c.set(k.into(), k.to_uppercase(), TTL).await;
        }
        // Reading "a" must not protect it: eviction is FIFO, not LRU.
        assert!(c.get("a").await.is_some());

        c.set("d".into(), "D".into(), TTL).await;

        assert_eq!(c.len().await, 3);
        assert_eq!(c.get("a").await, None);
        for k in ["b", "c", "d"] {
            assert!(c.get(k).await.is_some(), "{k} should survive eviction");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn eviction_ignores_ttl() {
        let c = cache(2);
        c.set("long".into(), "1".into(), Duration::from_secs(3600)).await;
        c.set("short".into(), "2".into(), Duration::from_secs(1)).await;
        c.set("new".into(), "3".into(), TTL).await;

        assert_eq!(c.get("long").await, None);
        assert!(c.get("short").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn overwriting_a_key_does_not_evict() {
        let c = cache(2);
        c.set("a".into(), "1".into(), TTL).await;
        c.set("b".into(), "2".into(), TTL).await;
        c.set("a".into(), "updated".into(), TTL).await;

        assert_eq!(c.len().await, 2);
        assert_eq!(c.get("a").await.as_deref(), Some("updated"));
        assert!(c.get("b").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn cleanup_removes_only_expired_entries() {
        let c = cache(10);
        c.set("short".into(), "1".into(), Duration::from_secs(5)).await;
        c.set("long".into(), "2".into(), Duration::from_secs(500)).await;

        tokio::time::advance(Duration::from_secs(10)).await;

        assert_eq!(c.cleanup().await, 1);
        assert_eq!(c.len().await, 1);
        assert!(c.get("long").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_cache_misses_without_clearing() {
        let c = cache(10);
        c.set("k".into(), "v".into(), TTL).await;

        c.set_enabled(false);
        assert_eq!(c.get("k").await, None);
        c.set("other".into(), "x".into(), TTL).await;
        assert_eq!(c.len().await, 1, "disabled set must be a no-op");

        c.set_enabled(true);
        assert_eq!(c.get("k").await.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn delete_and_clear() {
        let c = cache(10);
        c.set("a".into(), "1".into(), TTL).await;
        c.set("b".into(), "2".into(), TTL).await;

        assert!(c.delete("a").await);
        assert!(!c.delete("a").await);
        c.clear().await;
        assert!(c.is_empty().await);
    }

    #[test]
    fn cache_key_includes_resolved_parameters() {
        let a = cache_key("hello", "gpt-3.5-turbo", 0.7, 800);
        let b = cache_key("hello", "gpt-3.5-turbo", 0.7, 800);
        let c = cache_key("hello", "gpt-3.5-turbo", 0.8, 800);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("hello__"));
        assert!(a.contains("\"maxTokens\":800"));
    }
}
