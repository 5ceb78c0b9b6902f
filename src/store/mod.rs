pub mod memory;

use crate::core::cache::{Cache, DEFAULT_TTL};
use crate::core::error::RateError;
use crate::core::rates::{ExchangeRateSnapshot, HistoricalSeries};
use memory::MemoryCache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// The caches a provider reads through, one per response kind.
#[derive(Clone)]
pub struct RateCaches {
    pub latest: Arc<dyn Cache<String, ExchangeRateSnapshot>>,
    pub historical: Arc<dyn Cache<String, HistoricalSeries>>,
    pub ttl: Duration,
}

impl RateCaches {
    pub fn in_memory(ttl: Duration) -> Self {
        Self {
            latest: Arc::new(MemoryCache::new()),
            historical: Arc::new(MemoryCache::new()),
            ttl,
        }
    }
}

impl Default for RateCaches {
    fn default() -> Self {
        Self::in_memory(DEFAULT_TTL)
    }
}

/// Cache-aside read: returns the cached value for `key`, or runs `fetch`
/// and stores a successful result. `None` keys bypass the cache entirely.
/// Every store first drops the cache's expired entries, so keys that are
/// never read again do not pile up.
///
/// Concurrent misses on the same key may both fetch; the last write wins.
pub async fn get_or_fetch<T, F, Fut>(
    cache: &dyn Cache<String, T>,
    key: Option<String>,
    ttl: Duration,
    fetch: F,
) -> Result<T, RateError>
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, RateError>>,
{
    let Some(key) = key else {
        return fetch().await;
    };
    if let Some(cached) = cache.get(&key).await {
        return Ok(cached);
    }
    let value = fetch().await?;
    cache.purge_expired().await;
    cache.put(key, value.clone(), Some(ttl)).await;
    Ok(value)
}
