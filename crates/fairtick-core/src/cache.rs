//! Time-boxed freshness cache for provider-derived results.
//!
//! Entries carry their own insertion instant and TTL. Expiry is checked on
//! read; nothing evicts in the background.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Staleness budgets applied by the valuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Equity and ETF records.
    #[serde(with = "seconds", rename = "quote_ttl_secs")]
    pub quote_ttl: Duration,
    /// Historical multiples.
    #[serde(with = "seconds", rename = "history_ttl_secs")]
    pub history_ttl: Duration,
    /// Crypto records.
    #[serde(with = "seconds", rename = "crypto_ttl_secs")]
    pub crypto_ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            quote_ttl: Duration::from_secs(15 * 60),
            history_ttl: Duration::from_secs(60 * 60),
            crypto_ttl: Duration::from_secs(5 * 60),
        }
    }
}

impl CacheSettings {
    /// Every budget zero, so nothing is ever served from cache.
    pub const fn disabled() -> Self {
        Self {
            quote_ttl: Duration::ZERO,
            history_ttl: Duration::ZERO,
            crypto_ttl: Duration::ZERO,
        }
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) < self.ttl
    }
}

#[derive(Debug)]
struct CacheInner<K, V> {
    map: HashMap<K, CacheEntry<V>>,
    default_ttl: Duration,
}

/// Shared TTL cache keyed by symbol (or any hashable key).
#[derive(Debug)]
pub struct FreshnessCache<K, V> {
    inner: Arc<tokio::sync::RwLock<CacheInner<K, V>>>,
}

impl<K, V> Clone for FreshnessCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> FreshnessCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner {
                map: HashMap::new(),
                default_ttl,
            })),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Cached value for `key` if it is still within its TTL.
    pub async fn get(&self, key: &K) -> Option<V> {
        let store = self.inner.read().await;
        let now = Instant::now();
        store
            .map
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.value.clone())
    }

    /// Insert or replace `key`. No-op when the cache is disabled.
    pub async fn put(&self, key: K, value: V, ttl_override: Option<Duration>) {
        let mut store = self.inner.write().await;
        if store.default_ttl.is_zero() {
            return;
        }

        let ttl = ttl_override.unwrap_or(store.default_ttl);
        store.map.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
                ttl,
            },
        );
    }

    pub async fn clear_expired(&self) {
        let mut store = self.inner.write().await;
        let now = Instant::now();
        store.map.retain(|_, entry| entry.is_fresh(now));
    }

    pub async fn clear(&self) {
        self.inner.write().await.map.clear();
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn is_disabled(&self) -> bool {
        self.inner.read().await.default_ttl.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn serves_fresh_entries_and_overwrites() {
        let cache = FreshnessCache::new(Duration::from_secs(60));

        assert!(cache.get(&"AAPL").await.is_none());

        cache.put("AAPL", 1.0_f64, None).await;
        assert_eq!(cache.get(&"AAPL").await, Some(1.0));

        cache.put("AAPL", 2.0, None).await;
        assert_eq!(cache.get(&"AAPL").await, Some(2.0));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expires_on_read_without_evicting() {
        let cache = FreshnessCache::new(Duration::from_secs(900));
        cache.put("MSFT", "record", None).await;

        tokio::time::advance(Duration::from_secs(899)).await;
        assert!(cache.get(&"MSFT").await.is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get(&"MSFT").await.is_none());
        assert_eq!(cache.len().await, 1);

        cache.clear_expired().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn ttl_override_applies_per_entry() {
        let cache = FreshnessCache::new(Duration::from_secs(900));
        cache.put("BTC-USD", 1_u8, Some(Duration::from_secs(300))).await;
        cache.put("VOO", 2_u8, None).await;

        tokio::time::advance(Duration::from_secs(301)).await;
        assert!(cache.get(&"BTC-USD").await.is_none());
        assert_eq!(cache.get(&"VOO").await, Some(2));
    }

    #[tokio::test]
    async fn disabled_cache_stores_nothing() {
        let cache: FreshnessCache<&str, u8> = FreshnessCache::disabled();
        assert!(cache.is_disabled().await);

        cache.put("AAPL", 1, None).await;
        assert!(cache.get(&"AAPL").await.is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let cache = FreshnessCache::new(Duration::from_secs(60));
        cache.put("A", 1_u8, None).await;
        cache.put("B", 2_u8, None).await;
        cache.clear().await;
        assert_eq!(cache.len().await, 0);
    }

    #[test]
    fn settings_default_and_deserialize_in_seconds() {
        let defaults = CacheSettings::default();
        assert_eq!(defaults.quote_ttl, Duration::from_secs(900));
        assert_eq!(defaults.history_ttl, Duration::from_secs(3600));
        assert_eq!(defaults.crypto_ttl, Duration::from_secs(300));

        let parsed: CacheSettings =
            serde_json::from_str(r#"{"crypto_ttl_secs": 60}"#).expect("partial settings");
        assert_eq!(parsed.crypto_ttl, Duration::from_secs(60));
        assert_eq!(parsed.quote_ttl, Duration::from_secs(900));
    }
}
