//! Exchange rate abstractions and core types

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

use super::currency::CurrencyCode;
use super::error::{RateError, Result};

pub type RateMap = BTreeMap<String, Decimal>;

/// Rates against `base` for a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateSnapshot {
    pub amount: Decimal,
    pub base: CurrencyCode,
    pub as_of: NaiveDate,
    pub rates: RateMap,
}

/// Rates against `base` for every published day in a range, ordered by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub amount: Decimal,
    pub base: CurrencyCode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rates: BTreeMap<NaiveDate, RateMap>,
}

impl HistoricalSeries {
    /// The series as an ordered sequence of dated entries.
    pub fn entries(&self) -> Vec<(NaiveDate, RateMap)> {
        self.rates
            .iter()
            .map(|(date, rates)| (*date, rates.clone()))
            .collect()
    }
}

/// A start date with an optional end; no end means "up to today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self> {
        if let Some(end) = end {
            if start > end {
                return Err(RateError::InvalidRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }
}

impl Display for DateRange {
    /// Upstream path form: `YYYY-MM-DD..YYYY-MM-DD` or `YYYY-MM-DD..`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}..{}", self.start.format("%Y-%m-%d"), end.format("%Y-%m-%d")),
            None => write!(f, "{}..", self.start.format("%Y-%m-%d")),
        }
    }
}

/// One inbound query, built from already-validated parts.
#[derive(Debug, Clone, PartialEq)]
pub enum RateQuery {
    Latest {
        base: CurrencyCode,
    },
    Conversion {
        from: CurrencyCode,
        to: CurrencyCode,
        amount: Decimal,
    },
    Historical {
        base: CurrencyCode,
        range: DateRange,
    },
}

impl RateQuery {
    pub fn base(&self) -> &CurrencyCode {
        match self {
            RateQuery::Latest { base } | RateQuery::Historical { base, .. } => base,
            RateQuery::Conversion { from, .. } => from,
        }
    }

    /// Deterministic cache key, or `None` for queries that are never cached.
    pub fn cache_key(&self) -> Option<String> {
        match self {
            RateQuery::Latest { base } => Some(format!("latest:{base}")),
            RateQuery::Conversion { .. } => None,
            RateQuery::Historical { base, range } => {
                let end = range
                    .end()
                    .map_or_else(|| "open".to_string(), |d| d.format("%Y-%m-%d").to_string());
                Some(format!(
                    "historical:{base}:{}:{end}",
                    range.start().format("%Y-%m-%d")
                ))
            }
        }
    }

    /// Path and query string relative to the upstream base address.
    pub fn upstream_path(&self) -> String {
        match self {
            RateQuery::Latest { base } => format!("/latest?from={base}"),
            RateQuery::Conversion { from, to, amount } => {
                format!("/latest?amount={amount}&from={from}&to={to}")
            }
            RateQuery::Historical { base, range } => format!("/{range}?from={base}"),
        }
    }
}

/// Source of exchange rates. Implementations validate codes before any
/// I/O and strip denylisted currencies from what they return.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn latest(&self, base: &str) -> Result<ExchangeRateSnapshot>;

    async fn convert(&self, from: &str, to: &str, amount: Decimal) -> Result<ExchangeRateSnapshot>;

    async fn historical(
        &self,
        base: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<HistoricalSeries>;
}
