//! Entry point for the request-handling layer.
//!
//! Every operation resolves a provider through the factory, so the
//! service never names a concrete upstream. Failures come back as
//! [`RateError`], which the caller maps to its own responses.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::core::currency::CurrencyCode;
use crate::core::error::Result;
use crate::core::pagination::{Page, PageRequest, paginate};
use crate::core::rates::{ExchangeRateSnapshot, RateMap};
use crate::providers::ProviderFactory;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionRequest {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalRequest {
    pub base: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub page: PageRequest,
}

/// One page of a historical series. Paging counts dates, not currencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPage {
    pub amount: Decimal,
    pub base: CurrencyCode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rates: Page<(NaiveDate, RateMap)>,
}

pub struct RateService {
    factory: Arc<dyn ProviderFactory>,
}

impl RateService {
    pub fn new(factory: Arc<dyn ProviderFactory>) -> Self {
        Self { factory }
    }

    #[instrument(skip(self))]
    pub async fn get_latest(&self, base: &str) -> Result<ExchangeRateSnapshot> {
        let provider = self.factory.create_provider();
        provider.latest(base).await
    }

    #[instrument(skip(self))]
    pub async fn convert(&self, request: &ConversionRequest) -> Result<ExchangeRateSnapshot> {
        let provider = self.factory.create_provider();
        provider
            .convert(&request.from, &request.to, request.amount)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_historical(&self, request: &HistoricalRequest) -> Result<HistoricalPage> {
        let provider = self.factory.create_provider();
        let series = provider
            .historical(&request.base, request.start_date, request.end_date)
            .await?;

        let rates = paginate(series.entries(), request.page);
        debug!(
            total_count = rates.total_count,
            total_pages = rates.total_pages,
            "Paginated historical series"
        );

        Ok(HistoricalPage {
            amount: series.amount,
            base: series.base,
            start_date: series.start_date,
            end_date: series.end_date,
            rates,
        })
    }
}
