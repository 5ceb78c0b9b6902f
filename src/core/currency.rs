//! Currency codes and the denylist validator

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

use super::error::RateError;

/// Currencies the upstream publishes unreliable data for. Never accepted
/// as input and never returned in a rate map.
pub const DENYLIST: [&str; 4] = ["TRY", "PLN", "THB", "MXN"];

/// Currencies the upstream quotes (its `/currencies` list). Anything else
/// would only come back as a 404.
pub const SUPPORTED: [&str; 31] = [
    "AUD", "BGN", "BRL", "CAD", "CHF", "CNY", "CZK", "DKK", "EUR", "GBP", "HKD", "HUF", "IDR",
    "ILS", "INR", "ISK", "JPY", "KRW", "MXN", "MYR", "NOK", "NZD", "PHP", "PLN", "RON", "SEK",
    "SGD", "THB", "TRY", "USD", "ZAR",
];

/// An upper-cased, three-letter currency code that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns true when `code` is on the denylist, ignoring case.
pub fn is_denied(code: &str) -> bool {
    DENYLIST
        .iter()
        .any(|denied| denied.eq_ignore_ascii_case(code.trim()))
}

/// Returns true when the upstream quotes `code`. Expects upper case.
pub fn is_supported(code: &str) -> bool {
    SUPPORTED.contains(&code)
}

/// Normalises and checks a single code. Denied, unknown and malformed
/// codes are all rejected without any I/O.
pub fn validate_code(code: &str) -> Result<CurrencyCode, RateError> {
    let normalized = code.trim().to_ascii_uppercase();
    if is_denied(&normalized) || !is_supported(&normalized) {
        return Err(RateError::InvalidCurrency {
            code: code.to_string(),
        });
    }
    Ok(CurrencyCode(normalized))
}

/// Checks every code, failing on the first rejected one.
pub fn validate<'a, I>(codes: I) -> Result<Vec<CurrencyCode>, RateError>
where
    I: IntoIterator<Item = &'a str>,
{
    codes.into_iter().map(validate_code).collect()
}

/// Drops denylisted currencies from an upstream rate map.
pub fn strip_denied<V>(rates: BTreeMap<String, V>) -> BTreeMap<String, V> {
    rates
        .into_iter()
        .filter(|(code, _)| !is_denied(code))
        .collect()
}
