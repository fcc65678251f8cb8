use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::quote::{canonical_symbol, MoverCategory};

pub mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

pub fn quote_key(symbol: &str) -> String {
    format!("quote_{}", canonical_symbol(symbol))
}

pub fn movers_key(category: MoverCategory) -> String {
    format!("movers_{}", category.id().to_lowercase())
}

pub const TRENDING_KEY: &str = "trending";

/// Persistent-tier record: the value plus its insertion timestamp.
/// Validity is decided on read against the TTL of the key's data class.
#[derive(Serialize, Deserialize)]
struct Envelope {
    stored_at: i64,
    value: serde_json::Value,
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Two-tier cache: an in-process map consulted first, then a persistent
/// key-value store with TTL enforced on read. Writes go to both tiers so a
/// process restart still benefits from the persistent tier.
///
/// Values cross the boundary through typed serde decoding; a blob that no
/// longer decodes is evicted and reported as a miss, never passed through.
pub struct TieredCache {
    memory: MemoryStore,
    persistent: Arc<dyn KeyValueStore>,
}

impl TieredCache {
    pub fn new(persistent: Arc<dyn KeyValueStore>) -> Self {
        Self {
            memory: MemoryStore::new(),
            persistent,
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        self.get_at(key, ttl, now_millis())
    }

    fn get_at<T: DeserializeOwned>(&self, key: &str, ttl: Duration, now: i64) -> Option<T> {
        if let Some(raw) = self.memory.get(key) {
            match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!("cache hit (memory) for {}", key);
                    return Some(value);
                }
                Err(err) => {
                    warn!("evicting undecodable memory entry {}: {}", key, err);
                    self.memory.remove(key);
                }
            }
        }

        let raw = self.persistent.get(key)?;
        let envelope: Envelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!("evicting undecodable persistent entry {}: {}", key, err);
                self.persistent.remove(key);
                return None;
            }
        };

        let age = now.saturating_sub(envelope.stored_at);
        if age >= ttl.as_millis() as i64 {
            debug!("cache entry {} expired ({}ms old)", key, age);
            self.persistent.remove(key);
            return None;
        }

        match serde_json::from_value(envelope.value) {
            Ok(value) => {
                debug!("cache hit (persistent) for {}", key);
                Some(value)
            }
            Err(err) => {
                warn!("evicting undecodable persistent entry {}: {}", key, err);
                self.persistent.remove(key);
                None
            }
        }
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) {
        self.put_at(key, value, now_millis());
    }

    fn put_at<T: Serialize>(&self, key: &str, value: &T, stored_at: i64) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                warn!("failed to serialize cache value for {}: {}", key, err);
                return;
            }
        };

        self.memory.put(key, &value.to_string());

        let envelope = Envelope { stored_at, value };
        match serde_json::to_string(&envelope) {
            Ok(raw) => self.persistent.put(key, &raw),
            Err(err) => warn!("failed to serialize cache envelope for {}: {}", key, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::quote::Quote;

    fn sample_quote(symbol: &str, price: f64) -> Quote {
        Quote {
            symbol: canonical_symbol(symbol),
            name: format!("{} Inc.", symbol),
            price,
            price_change: 1.0,
            percent_change: 0.5,
        }
    }

    /// Persistent backend that counts reads, for verifying tier precedence.
    struct CountingStore {
        inner: MemoryStore,
        reads: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                reads: AtomicUsize::new(0),
            }
        }
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Option<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: &str) {
            self.inner.put(key, value);
        }

        fn remove(&self, key: &str) {
            self.inner.remove(key);
        }
    }

    #[test]
    fn memory_tier_answers_without_touching_persistent_tier() {
        let spy = Arc::new(CountingStore::new());
        let cache = TieredCache::new(spy.clone());

        let quote = sample_quote("AAPL", 187.3);
        cache.put(&quote_key("AAPL"), &quote);

        let hit: Option<Quote> = cache.get(&quote_key("AAPL"), Duration::from_secs(300));
        assert_eq!(hit, Some(quote));
        assert_eq!(spy.reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn persistent_entry_expires_exactly_at_ttl() {
        let cache = TieredCache::new(Arc::new(MemoryStore::new()));
        let quote = sample_quote("MSFT", 410.0);
        let ttl = Duration::from_secs(300);
        let written_at = 1_700_000_000_000;

        // Write straight into the persistent tier so the memory tier
        // cannot mask the TTL check.
        let envelope = Envelope {
            stored_at: written_at,
            value: serde_json::to_value(&quote).unwrap(),
        };
        cache
            .persistent
            .put(&quote_key("MSFT"), &serde_json::to_string(&envelope).unwrap());

        let fresh: Option<Quote> =
            cache.get_at(&quote_key("MSFT"), ttl, written_at + ttl.as_millis() as i64 - 1);
        assert_eq!(fresh, Some(quote));

        let stale: Option<Quote> =
            cache.get_at(&quote_key("MSFT"), ttl, written_at + ttl.as_millis() as i64 + 1);
        assert_eq!(stale, None);

        // Expired entry was evicted on read.
        assert_eq!(cache.persistent.get(&quote_key("MSFT")), None);
    }

    #[test]
    fn put_reaches_both_tiers() {
        let persistent = Arc::new(MemoryStore::new());
        let cache = TieredCache::new(persistent.clone());

        let quote = sample_quote("NVDA", 880.1);
        cache.put(&quote_key("nvda"), &quote);

        assert!(cache.memory.get(&quote_key("nvda")).is_some());
        assert!(persistent.get(&quote_key("nvda")).is_some());

        // A second cache over the same persistent backend (fresh memory
        // tier, as after a restart) still sees the entry.
        let restarted = TieredCache::new(persistent);
        let hit: Option<Quote> = restarted.get(&quote_key("NVDA"), Duration::from_secs(300));
        assert_eq!(hit, Some(quote));
    }

    #[test]
    fn undecodable_entries_are_evicted_not_propagated() {
        let persistent = Arc::new(MemoryStore::new());
        let cache = TieredCache::new(persistent.clone());

        persistent.put(&quote_key("aapl"), "{\"stored_at\": 0, \"value\": [1,2]}");
        let miss: Option<Quote> = cache.get_at(&quote_key("aapl"), Duration::from_secs(300), 1);
        assert_eq!(miss, None);
        assert_eq!(persistent.get(&quote_key("aapl")), None);
    }
}
