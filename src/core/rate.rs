//! Query and result types for a single date/currency lookup

use crate::core::error::LookupError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A normalized three letter currency code, e.g. `SEK`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
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

impl FromStr for CurrencyCode {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(CurrencyCode(code))
        } else {
            Err(LookupError::CurrencyNotAvailable(s.to_string()))
        }
    }
}

/// Parses a date written exactly as `YYYY-MM-DD`.
///
/// chrono accepts unpadded fields such as `2023-1-5`; those are rejected so
/// the date echoed in a response always matches the request.
pub fn parse_date(s: &str) -> Result<NaiveDate, LookupError> {
    let invalid = || LookupError::InvalidDate(s.to_string());
    let date = NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| invalid())?;
    if date.format(DATE_FORMAT).to_string() != s {
        return Err(invalid());
    }
    Ok(date)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateQuery {
    pub date: NaiveDate,
    pub currency: CurrencyCode,
}

impl RateQuery {
    /// Validates raw path segments. The date is checked first.
    pub fn parse(date: &str, currency: &str) -> Result<Self, LookupError> {
        let date = parse_date(date)?;
        let currency = currency.parse()?;
        Ok(Self { date, currency })
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// The JSON body returned for a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateResult {
    pub currency: String,
    pub date: String,
    pub value: f64,
}

impl RateResult {
    pub fn new(query: &RateQuery, value: f64) -> Self {
        Self {
            currency: query.currency.to_string(),
            date: query.date_string(),
            value,
        }
    }
}
