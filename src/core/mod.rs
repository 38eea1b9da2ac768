//! Core lookup types, configuration and logging

pub mod config;
pub mod error;
pub mod log;
pub mod rate;
pub mod table;

// Re-export main types for cleaner imports
pub use error::LookupError;
pub use rate::{CurrencyCode, RateQuery, RateResult};
pub use table::RateTable;
