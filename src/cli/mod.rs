use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "compound")]
#[command(
    version,
    about = "Multi-currency portfolio performance index calculator"
)]
#[command(
    long_about = "Compute cumulative asset, currency and total performance indices for a multi-currency portfolio from daily price, exchange-rate and weight series."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Directory holding prices.csv, exchanges.csv, weights.csv and currencies.csv
    #[arg(long = "data-dir", global = true, default_value = "data")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute a performance index over a date range
    Performance {
        /// Which index to compute
        #[arg(value_enum)]
        kind: Kind,

        /// Start date (YYYY-MM-DD), inclusive
        #[arg(long)]
        from: String,

        /// End date (YYYY-MM-DD), inclusive
        #[arg(long)]
        to: String,

        /// Lookback window in calendar days (overrides the config file)
        #[arg(long)]
        lookback_days: Option<u32>,

        /// TOML config file providing lookback_days
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show table coverage and load-time imputation counts
    Inspect,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    /// Local-currency asset performance
    Asset,
    /// Exchange-rate performance per settlement currency
    Currency,
    /// Combined performance in base terms
    Total,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Asset => "asset",
            Kind::Currency => "currency",
            Kind::Total => "total",
        }
    }
}

/// Parse a CLI date argument (YYYY-MM-DD).
pub fn parse_date_arg(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date: {}. Use YYYY-MM-DD format.", text))
}
