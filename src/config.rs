//! Engine configuration
//!
//! The lookback window steers which prior observation a period return is
//! compared against. Deployments run with different window lengths (5 and
//! 15 calendar days are both in use), so the value carries no default:
//! callers choose it explicitly, via this file format or a CLI flag.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Calendar-day span searched backward for a comparison observation.
    pub lookback_days: u32,
}

impl Config {
    /// Load from a TOML file containing `lookback_days = <n>`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse config file {:?}", path))
    }
}
