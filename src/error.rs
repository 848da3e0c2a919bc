//! Error handling for the performance engine
//!
//! Defines the engine's typed failures and establishes a unified Result type
//! using anyhow for context chaining in the loader and CLI layers.

use chrono::NaiveDate;
use thiserror::Error;

/// Typed failures surfaced by the performance engine
#[derive(Error, Debug)]
pub enum PerformanceError {
    #[error("insufficient history: no observation within {lookback_days} days before {date}")]
    InsufficientHistory {
        date: NaiveDate,
        lookback_days: u32,
    },

    #[error("currency {0} has no exchange rate column")]
    MissingColumn(String),

    #[error("invalid table: {0}")]
    InvalidTable(String),
}

/// Result type alias for loader and CLI operations
pub type Result<T> = anyhow::Result<T>;
