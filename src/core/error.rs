//! Domain failures surfaced by the rate-access layer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt::Display;
use thiserror::Error;

/// Why the upstream could not serve a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableCause {
    /// The circuit breaker rejected the call without contacting upstream.
    CircuitOpen,
    /// Upstream answered with a non-2xx status on the final attempt.
    Status(u16),
    /// Connection, timeout or body read failure.
    Transport(String),
    /// A 2xx body that did not match the expected shape.
    Decode(String),
}

impl Display for UnavailableCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableCause::CircuitOpen => write!(f, "circuit open"),
            UnavailableCause::Status(status) => write!(f, "HTTP status {status}"),
            UnavailableCause::Transport(msg) => write!(f, "transport error: {msg}"),
            UnavailableCause::Decode(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    #[error("Currency {code} is not supported")]
    InvalidCurrency { code: String },

    #[error("Start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Amount {amount} must be at least 0.01")]
    InvalidAmount { amount: Decimal },

    #[error("Invalid page request: page size {page_size} (1-100), page number {page_number} (>= 1)")]
    InvalidPage { page_size: usize, page_number: usize },

    #[error("Upstream rate provider unavailable: {cause}")]
    UpstreamUnavailable { cause: UnavailableCause },
}

impl RateError {
    pub fn unavailable(cause: UnavailableCause) -> Self {
        RateError::UpstreamUnavailable { cause }
    }

    /// Client errors are caused by the request itself and are never retried.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, RateError::UpstreamUnavailable { .. })
    }

    /// Status a transport layer should answer with for this failure.
    pub fn http_status(&self) -> u16 {
        if self.is_client_error() { 400 } else { 503 }
    }
}

pub type Result<T, E = RateError> = std::result::Result<T, E>;
