//! Core business logic abstractions

pub mod cache;
pub mod circuit_breaker;
pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod pagination;
pub mod rates;
pub mod resilience;

// Re-export main types for cleaner imports
pub use cache::Cache;
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use currency::CurrencyCode;
pub use error::{RateError, UnavailableCause};
pub use pagination::{Page, PageRequest, paginate};
pub use rates::{DateRange, ExchangeRateSnapshot, HistoricalSeries, RateMap, RateProvider, RateQuery};
pub use resilience::{ResiliencePolicy, RetryConfig};
