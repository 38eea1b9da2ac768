//! Error taxonomy for rate lookups

use thiserror::Error;

/// Everything that can go wrong while answering a single rate query.
///
/// Variants other than [`LookupError::SourceUnavailable`] are validation
/// failures caused by the caller's input. They are never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("Invalid date: {0}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Currency not available: {0}")]
    CurrencyNotAvailable(String),

    #[error("Date not available: {0}")]
    DateNotAvailable(String),

    #[error("Currency data not available: {currency}, {date}")]
    ValueNotAvailable { currency: String, date: String },

    #[error("Rate data source unavailable: {0}")]
    SourceUnavailable(String),
}

impl LookupError {
    pub fn is_validation(&self) -> bool {
        !matches!(self, LookupError::SourceUnavailable(_))
    }
}

impl From<anyhow::Error> for LookupError {
    fn from(err: anyhow::Error) -> Self {
        // Alternate formatting keeps the whole context chain in one line
        LookupError::SourceUnavailable(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LookupError::CurrencyNotAvailable("ASD".to_string()).to_string(),
            "Currency not available: ASD"
        );
        assert_eq!(
            LookupError::DateNotAvailable("2023-11-19".to_string()).to_string(),
            "Date not available: 2023-11-19"
        );
        assert_eq!(
            LookupError::ValueNotAvailable {
                currency: "SEK".to_string(),
                date: "2023-11-22".to_string(),
            }
            .to_string(),
            "Currency data not available: SEK, 2023-11-22"
        );
    }

    #[test]
    fn test_only_source_errors_are_not_validation() {
        assert!(LookupError::InvalidDate("x".to_string()).is_validation());
        assert!(LookupError::CurrencyNotAvailable("x".to_string()).is_validation());
        assert!(!LookupError::SourceUnavailable("down".to_string()).is_validation());
    }

    #[test]
    fn test_anyhow_chain_is_preserved() {
        let err: anyhow::Result<()> = Err(anyhow!("HTTP error 503")).context("Failed to download");
        let lookup_err = LookupError::from(err.unwrap_err());
        assert_eq!(
            lookup_err.to_string(),
            "Rate data source unavailable: Failed to download: HTTP error 503"
        );
    }
}
