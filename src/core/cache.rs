//! Cache abstraction shared by rate providers

use async_trait::async_trait;
use std::hash::Hash;
use std::time::Duration;

/// Rate responses are kept for an hour, whatever the query kind.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Best-effort key/value cache. Expired entries read as absent.
#[async_trait]
pub trait Cache<K, V>: Send + Sync
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Option<V>;

    /// Inserts or overwrites `key`. A `None` ttl never expires.
    async fn put(&self, key: K, value: V, ttl: Option<Duration>);

    /// Drops every expired entry and returns how many went.
    async fn purge_expired(&self) -> usize;
}
