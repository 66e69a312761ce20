//! Key-Value Store Access
//!
//! The shared key-value store backs both the rate-limit counters and the
//! per-session OTP state. Every operation takes a caller-supplied
//! deadline; exceeding it cancels the in-flight call and surfaces
//! [`StoreError::Timeout`], distinct from "key not found" and from any
//! other backend failure.

use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Store access error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store did not respond within the caller's deadline
    #[error("store did not respond within {0:?}")]
    Timeout(Duration),

    /// The store responded with an error
    #[error("store error: {0}")]
    Backend(#[from] redis::RedisError),
}

/// Key-value store trait
///
/// `get` distinguishes "not found" (`Ok(None)`) from store failure
/// (`Err`); callers must never treat an error as an absent value.
#[trait_variant::make(KeyValueStore: Send)]
pub trait LocalKeyValueStore {
    /// Get a value by key under the given deadline
    async fn get(&self, key: &str, deadline: Duration) -> Result<Option<String>, StoreError>;

    /// Set a value, optionally with a TTL, under the given deadline
    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
        deadline: Duration,
    ) -> Result<(), StoreError>;
}

// ============================================================================
// Redis implementation
// ============================================================================

/// Redis-backed key-value store
///
/// Clones share one multiplexed connection; reconnects are handled by
/// the connection manager.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    conn: ConnectionManager,
}

impl RedisKeyValueStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Connect to Redis at the given URL
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        tracing::info!(url = %url, "Connected to key-value store");
        Ok(Self { conn })
    }
}

impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str, deadline: Duration) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let op = async move { conn.get::<_, Option<String>>(key).await };

        tokio::time::timeout(deadline, op)
            .await
            .map_err(|_| StoreError::Timeout(deadline))?
            .map_err(StoreError::Backend)
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
        deadline: Duration,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let key = key.to_string();
        let value = value.to_string();
        let op = async move {
            match ttl {
                Some(ttl) => {
                    conn.pset_ex::<_, _, ()>(key, value, ttl.as_millis() as u64)
                        .await
                }
                None => conn.set::<_, _, ()>(key, value).await,
            }
        };

        tokio::time::timeout(deadline, op)
            .await
            .map_err(|_| StoreError::Timeout(deadline))?
            .map_err(StoreError::Backend)
    }
}

// ============================================================================
// In-memory implementation (tests, local development)
// ============================================================================

/// In-memory key-value store
///
/// Single-process stand-in for Redis. `with_latency` injects an
/// artificial delay before each operation so deadline handling can be
/// exercised in tests.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    inner: Arc<Mutex<HashMap<String, (String, Option<Instant>)>>>,
    latency: Option<Duration>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            inner: Arc::default(),
            latency: Some(latency),
        }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str, deadline: Duration) -> Result<Option<String>, StoreError> {
        let op = async {
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            let mut map = self.inner.lock().expect("store mutex poisoned");
            match map.get(key) {
                Some((_, Some(expires_at))) if *expires_at <= Instant::now() => {
                    map.remove(key);
                    None
                }
                Some((value, _)) => Some(value.clone()),
                None => None,
            }
        };

        tokio::time::timeout(deadline, op)
            .await
            .map_err(|_| StoreError::Timeout(deadline))
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
        deadline: Duration,
    ) -> Result<(), StoreError> {
        let op = async {
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            let expires_at = ttl.map(|ttl| Instant::now() + ttl);
            self.inner
                .lock()
                .expect("store mutex poisoned")
                .insert(key.to_string(), (value.to_string(), expires_at));
        };

        tokio::time::timeout(deadline, op)
            .await
            .map_err(|_| StoreError::Timeout(deadline))
    }
}

#[cfg(test)]
mod tests {
    use super::{Duration, KeyValueStore, MemoryKeyValueStore, StoreError};

    const DEADLINE: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryKeyValueStore::new();

        assert_eq!(store.get("name", DEADLINE).await.unwrap(), None);

        store.set("name", "alice", None, DEADLINE).await.unwrap();
        assert_eq!(
            store.get("name", DEADLINE).await.unwrap(),
            Some("alice".to_string())
        );
    }

    #[tokio::test]
    async fn test_memory_store_ttl_expiry() {
        let store = MemoryKeyValueStore::new();
        store
            .set("k", "v", Some(Duration::from_millis(10)), DEADLINE)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.get("k", DEADLINE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_deadline_exceeded() {
        let store = MemoryKeyValueStore::with_latency(Duration::from_millis(200));

        let result = store.get("k", Duration::from_millis(20)).await;
        assert!(matches!(result, Err(StoreError::Timeout(_))));

        let result = store.set("k", "v", None, Duration::from_millis(20)).await;
        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }
}
