//! In-memory reference rate table parsed from the published CSV.
//!
//! The CSV has one `Date` column followed by one column per currency:
//!
//! ```text
//! Date,USD,JPY,SEK,
//! 2023-11-10,1.0683,161.82,11.629,
//! 2023-11-09,1.0691,161.77,N/A,
//! ```
//!
//! Empty cells and `N/A` mark days without a quote. Columns that never carry
//! a value (such as the trailing empty column above) are dropped on load.

use crate::core::error::LookupError;
use crate::core::rate::{DATE_FORMAT, RateQuery};
use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use tracing::debug;

const DATE_COLUMN: &str = "Date";

#[derive(Debug, Clone)]
pub struct RateTable {
    currencies: Vec<String>,
    index: HashMap<String, usize>,
    rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

fn parse_value(raw: &str) -> Result<Option<f64>> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("N/A") {
        return Ok(None);
    }
    let value: f64 = raw
        .parse()
        .with_context(|| format!("Not a number: '{raw}'"))?;
    if !value.is_finite() || value < 0.0 {
        bail!("Rate must be a non-negative number: '{raw}'");
    }
    Ok(Some(value))
}

impl RateTable {
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .context("Failed to read CSV header")?
            .clone();
        let date_col = headers
            .iter()
            .position(|h| h == DATE_COLUMN)
            .ok_or_else(|| anyhow!("CSV header has no '{DATE_COLUMN}' column"))?;

        let columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, name)| *i != date_col && !name.is_empty())
            .map(|(i, name)| (i, name.to_uppercase()))
            .collect();

        let mut rows = BTreeMap::new();
        for (n, record) in csv_reader.records().enumerate() {
            // Header is line 1
            let line = n + 2;
            let record = record.with_context(|| format!("Failed to read CSV line {line}"))?;
            let raw_date = record.get(date_col).unwrap_or_default();
            let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT)
                .with_context(|| format!("Invalid date '{raw_date}' on CSV line {line}"))?;

            let values = columns
                .iter()
                .map(|(i, code)| {
                    parse_value(record.get(*i).unwrap_or_default())
                        .with_context(|| format!("Invalid {code} rate on CSV line {line}"))
                })
                .collect::<Result<Vec<_>>>()?;
            rows.insert(date, values);
        }

        Ok(Self::without_empty_columns(columns, rows))
    }

    fn without_empty_columns(
        columns: Vec<(usize, String)>,
        rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
    ) -> Self {
        let keep: Vec<bool> = (0..columns.len())
            .map(|c| rows.values().any(|row| row[c].is_some()))
            .collect();

        let mut currencies = Vec::new();
        for ((_, code), kept) in columns.into_iter().zip(&keep) {
            if *kept {
                currencies.push(code);
            } else {
                debug!("Dropping column without data: '{}'", code);
            }
        }

        let rows: BTreeMap<NaiveDate, Vec<Option<f64>>> = rows
            .into_iter()
            .map(|(date, row)| {
                let row: Vec<Option<f64>> = row
                    .into_iter()
                    .zip(&keep)
                    .filter_map(|(value, kept)| kept.then_some(value))
                    .collect();
                (date, row)
            })
            .collect();

        let mut index = HashMap::new();
        for (i, code) in currencies.iter().enumerate() {
            index.entry(code.clone()).or_insert(i);
        }

        Self {
            currencies,
            index,
            rows,
        }
    }

    /// Looks up the rate for the exact date requested. There is no
    /// fallback to a neighbouring day.
    pub fn value(&self, query: &RateQuery) -> Result<f64, LookupError> {
        let column = self
            .index
            .get(query.currency.as_str())
            .ok_or_else(|| LookupError::CurrencyNotAvailable(query.currency.to_string()))?;
        let row = self
            .rows
            .get(&query.date)
            .ok_or_else(|| LookupError::DateNotAvailable(query.date_string()))?;
        row[*column].ok_or_else(|| LookupError::ValueNotAvailable {
            currency: query.currency.to_string(),
            date: query.date_string(),
        })
    }

    pub fn currencies(&self) -> &[String] {
        &self.currencies
    }

    /// Number of dates in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.keys().next_back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
Date,USD,SEK,CYP,
2023-11-22,2.7182,N/A,,
2023-11-21,1.4142,9.1093,,
2023-11-20,3.1415,6.6260,,
";

    fn sample_table() -> RateTable {
        RateTable::from_csv(SAMPLE_CSV.as_bytes()).unwrap()
    }

    fn query(date: &str, currency: &str) -> RateQuery {
        RateQuery::parse(date, currency).unwrap()
    }

    #[test]
    fn test_correct_result() {
        let table = sample_table();
        assert_eq!(table.value(&query("2023-11-20", "USD")), Ok(3.1415));
        assert_eq!(table.value(&query("2023-11-21", "sek")), Ok(9.1093));
    }

    #[test]
    fn test_wrong_date() {
        let table = sample_table();
        let err = table.value(&query("2023-11-19", "USD")).unwrap_err();
        assert_eq!(err.to_string(), "Date not available: 2023-11-19");
    }

    #[test]
    fn test_wrong_currency() {
        let table = sample_table();
        let err = table.value(&query("2023-11-20", "ASD")).unwrap_err();
        assert_eq!(err.to_string(), "Currency not available: ASD");
    }

    #[test]
    fn test_missing_value() {
        let table = sample_table();
        let err = table.value(&query("2023-11-22", "SEK")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Currency data not available: SEK, 2023-11-22"
        );
    }

    #[test]
    fn test_empty_columns_are_dropped() {
        let table = sample_table();
        assert_eq!(table.currencies(), &["USD".to_string(), "SEK".to_string()]);

        let err = table.value(&query("2023-11-20", "CYP")).unwrap_err();
        assert_eq!(err, LookupError::CurrencyNotAvailable("CYP".to_string()));
    }

    #[test]
    fn test_date_range() {
        let table = sample_table();
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
        assert_eq!(table.first_date(), NaiveDate::from_ymd_opt(2023, 11, 20));
        assert_eq!(table.last_date(), NaiveDate::from_ymd_opt(2023, 11, 22));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let csv = "Date, USD, SEK\n2023-11-10, 1.0683 , 11.629\n";
        let table = RateTable::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.value(&query("2023-11-10", "SEK")), Ok(11.629));
    }

    #[test]
    fn test_missing_date_column() {
        let csv = "Day,USD\n2023-11-10,1.0683\n";
        let err = RateTable::from_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "CSV header has no 'Date' column");
    }

    #[test]
    fn test_invalid_value_reports_line() {
        let csv = "Date,USD\n2023-11-10,1.0683\n2023-11-09,abc\n";
        let err = RateTable::from_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid USD rate on CSV line 3");
    }

    #[test]
    fn test_negative_value_is_rejected() {
        let csv = "Date,USD\n2023-11-10,-1.0\n";
        assert!(RateTable::from_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let csv = "Date,USD\n10/11/2023,1.0683\n";
        let err = RateTable::from_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid date '10/11/2023' on CSV line 2");
    }
}
