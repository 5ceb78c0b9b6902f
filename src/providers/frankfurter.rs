use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

use crate::core::currency::{self, strip_denied};
use crate::core::error::{RateError, Result, UnavailableCause};
use crate::core::rates::{
    DateRange, ExchangeRateSnapshot, HistoricalSeries, RateMap, RateProvider, RateQuery,
};
use crate::core::resilience::ResiliencePolicy;
use crate::store::{RateCaches, get_or_fetch};

/// Body of `/latest`, with or without `amount` and `to`.
#[derive(Debug, Deserialize)]
struct LatestResponse {
    amount: Decimal,
    date: NaiveDate,
    rates: BTreeMap<String, Decimal>,
}

/// Body of `/{start}..{end}`.
#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    amount: Decimal,
    start_date: NaiveDate,
    end_date: NaiveDate,
    rates: BTreeMap<NaiveDate, BTreeMap<String, Decimal>>,
}

/// Rate provider backed by the Frankfurter API.
pub struct FrankfurterProvider {
    base_url: String,
    client: reqwest::Client,
    policy: Arc<ResiliencePolicy>,
    caches: RateCaches,
}

impl FrankfurterProvider {
    pub fn new(
        base_url: &str,
        client: reqwest::Client,
        policy: Arc<ResiliencePolicy>,
        caches: RateCaches,
    ) -> Self {
        FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            policy,
            caches,
        }
    }

    /// One GET through the resilience policy.
    async fn fetch<T>(&self, query: &RateQuery) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let url = format!("{}{}", self.base_url, query.upstream_path());
        let url = url.as_str();
        self.policy.execute(move || self.get_json::<T>(url)).await
    }

    async fn get_json<T>(&self, url: &str) -> std::result::Result<T, UnavailableCause>
    where
        T: DeserializeOwned,
    {
        debug!("Requesting rates from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UnavailableCause::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url, "Upstream returned an error status");
            return Err(UnavailableCause::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| UnavailableCause::Transport(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| {
            error!(
                error = ?e,
                response = %text,
                "Failed to parse rates response"
            );
            UnavailableCause::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    #[instrument(name = "FrankfurterLatest", skip(self), fields(base = %base))]
    async fn latest(&self, base: &str) -> Result<ExchangeRateSnapshot> {
        let query = RateQuery::Latest {
            base: currency::validate_code(base)?,
        };

        get_or_fetch(
            self.caches.latest.as_ref(),
            query.cache_key(),
            self.caches.ttl,
            || async {
                let response: LatestResponse = self.fetch(&query).await?;
                Ok(ExchangeRateSnapshot {
                    amount: response.amount,
                    base: query.base().clone(),
                    as_of: response.date,
                    rates: strip_denied(response.rates),
                })
            },
        )
        .await
    }

    #[instrument(name = "FrankfurterConvert", skip(self), fields(from = %from, to = %to, amount = %amount))]
    async fn convert(&self, from: &str, to: &str, amount: Decimal) -> Result<ExchangeRateSnapshot> {
        let from = currency::validate_code(from)?;
        let to = currency::validate_code(to)?;
        if amount < Decimal::new(1, 2) {
            return Err(RateError::InvalidAmount { amount });
        }

        let query = RateQuery::Conversion {
            from: from.clone(),
            to: to.clone(),
            amount,
        };
        let response: LatestResponse = self.fetch(&query).await?;

        let converted = response.rates.get(to.as_str()).copied().ok_or_else(|| {
            RateError::unavailable(UnavailableCause::Decode(format!(
                "no rate for {to} in conversion response"
            )))
        })?;

        Ok(ExchangeRateSnapshot {
            amount: response.amount,
            base: from,
            as_of: response.date,
            rates: RateMap::from([(to.to_string(), converted)]),
        })
    }

    #[instrument(name = "FrankfurterHistorical", skip(self), fields(base = %base))]
    async fn historical(
        &self,
        base: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<HistoricalSeries> {
        let query = RateQuery::Historical {
            base: currency::validate_code(base)?,
            range: DateRange::new(start_date, end_date)?,
        };

        get_or_fetch(
            self.caches.historical.as_ref(),
            query.cache_key(),
            self.caches.ttl,
            || async {
                let response: HistoricalResponse = self.fetch(&query).await?;
                let rates = response
                    .rates
                    .into_iter()
                    .map(|(date, rates)| (date, strip_denied(rates)))
                    .collect();
                Ok(HistoricalSeries {
                    amount: response.amount,
                    base: query.base().clone(),
                    start_date: response.start_date,
                    end_date: response.end_date,
                    rates,
                })
            },
        )
        .await
    }
}
