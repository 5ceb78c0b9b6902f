pub mod frankfurter;

use crate::core::config::{AppConfig, ProviderKind};
use crate::core::rates::RateProvider;
use crate::core::resilience::ResiliencePolicy;
use crate::store::RateCaches;
use anyhow::{Context, Result};
use frankfurter::FrankfurterProvider;
use std::sync::Arc;
use std::time::Duration;

/// Resolves the provider that serves a request. Callers only see the
/// trait object, so adding an upstream never touches them.
pub trait ProviderFactory: Send + Sync {
    fn create_provider(&self) -> Arc<dyn RateProvider>;
}

/// Builds providers from configuration.
///
/// State that must outlive a single request (breaker, caches, HTTP pool)
/// lives here and is shared by every provider handed out.
pub struct DefaultProviderFactory {
    kind: ProviderKind,
    base_url: String,
    client: reqwest::Client,
    policy: Arc<ResiliencePolicy>,
    caches: RateCaches,
}

impl DefaultProviderFactory {
    pub fn new(
        kind: ProviderKind,
        base_url: &str,
        client: reqwest::Client,
        policy: Arc<ResiliencePolicy>,
        caches: RateCaches,
    ) -> Self {
        Self {
            kind,
            base_url: base_url.to_string(),
            client,
            policy,
            caches,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fxr/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.provider.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let policy = ResiliencePolicy::new(
            config.resilience.retry(),
            config.resilience.circuit_breaker(),
        );

        Ok(Self::new(
            config.provider.kind,
            &config.provider.base_url,
            client,
            Arc::new(policy),
            RateCaches::in_memory(config.cache.ttl()),
        ))
    }

    pub fn policy(&self) -> &Arc<ResiliencePolicy> {
        &self.policy
    }
}

impl ProviderFactory for DefaultProviderFactory {
    fn create_provider(&self) -> Arc<dyn RateProvider> {
        match self.kind {
            ProviderKind::Frankfurter => Arc::new(FrankfurterProvider::new(
                &self.base_url,
                self.client.clone(),
                Arc::clone(&self.policy),
                self.caches.clone(),
            )),
        }
    }
}
