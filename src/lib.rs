//! Compound - multi-currency portfolio performance indices
//!
//! This library computes cumulative asset, currency and total performance
//! indices for a multi-currency investment portfolio from daily price,
//! exchange-rate and weight time series.

pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod tables;
