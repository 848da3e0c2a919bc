//! CSV loading and normalization
//!
//! Reads the four input files of a data directory into a read-only
//! `MarketData` store: `prices.csv`, `exchanges.csv` and `weights.csv` are
//! date-indexed value tables; `currencies.csv` pairs each price/weight
//! column with the currency it trades in and fixes the canonical column
//! order. Price and weight columns are reordered and relabelled per the
//! mapping, then missing cells are imputed with their column mean, with the
//! number of synthesized cells reported per table.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::tables::mapping::{CurrencyMapping, MappingEntry};
use crate::tables::store::MarketData;
use crate::tables::TimeTable;

/// Cells synthesized by load-time mean imputation, per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub prices_imputed: usize,
    pub exchanges_imputed: usize,
    pub weights_imputed: usize,
}

/// Load and normalize a data directory.
pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<(MarketData, LoadReport)> {
    let dir = dir.as_ref();
    info!("Loading market data from {:?}", dir);

    let mapping = parse_currencies(&dir.join("currencies.csv"))?;
    let raw_prices = parse_table(&dir.join("prices.csv"))?;
    let raw_exchanges = parse_table(&dir.join("exchanges.csv"))?;
    let raw_weights = parse_table(&dir.join("weights.csv"))?;

    let mut prices = reorder_by_mapping(raw_prices, &mapping, "prices.csv")?;
    let mut weights = reorder_by_mapping(raw_weights, &mapping, "weights.csv")?;
    let mut exchanges = raw_exchanges.into_table("exchanges.csv")?;

    let report = LoadReport {
        prices_imputed: prices.impute_missing(),
        exchanges_imputed: exchanges.impute_missing(),
        weights_imputed: weights.impute_missing(),
    };
    debug!(
        prices = report.prices_imputed,
        exchanges = report.exchanges_imputed,
        weights = report.weights_imputed,
        "load-time imputation complete"
    );

    let data = MarketData::new(prices, exchanges, weights, mapping)
        .context("Loaded tables failed store validation")?;
    info!(
        price_rows = data.prices().n_rows(),
        exchange_rows = data.exchanges().n_rows(),
        weight_rows = data.weights().n_rows(),
        assets = data.mapping().len(),
        "Market data ready"
    );
    Ok((data, report))
}

/// A parsed value table before sorting and validation.
struct RawTable {
    labels: Vec<String>,
    rows: Vec<(NaiveDate, Vec<f64>)>,
}

impl RawTable {
    /// Sort by date and freeze. Duplicate dates are rejected.
    fn into_table(self, name: &str) -> Result<TimeTable> {
        let RawTable { labels, mut rows } = self;
        rows.sort_by_key(|(date, _)| *date);
        for pair in rows.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(anyhow!("{}: duplicate date {}", name, pair[0].0));
            }
        }
        let (dates, values): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        TimeTable::new(labels, dates, values)
            .with_context(|| format!("{} is not a valid table", name))
    }
}

/// Select and relabel columns following the currency mapping's canonical
/// order: entry order decides column order, entry currency becomes the
/// column label.
fn reorder_by_mapping(raw: RawTable, mapping: &CurrencyMapping, name: &str) -> Result<TimeTable> {
    let positions = mapping
        .entries()
        .iter()
        .map(|entry| {
            raw.labels
                .iter()
                .position(|label| label == &entry.column)
                .ok_or_else(|| {
                    anyhow!(
                        "{}: column {:?} from currencies.csv not found",
                        name,
                        entry.column
                    )
                })
        })
        .collect::<Result<Vec<_>>>()?;
    let rows = raw
        .rows
        .into_iter()
        .map(|(date, row)| (date, positions.iter().map(|p| row[*p]).collect()))
        .collect();
    RawTable {
        labels: mapping.currencies(),
        rows,
    }
    .into_table(name)
}

/// Parse a date-indexed value table: date in the first column, one labelled
/// float column per asset or currency. Empty cells are missing values.
fn parse_table(path: &Path) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to open {:?}", path))?;

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    if headers.len() < 2 {
        return Err(anyhow!(
            "{:?}: expected a date column and at least one value column",
            path
        ));
    }
    let labels: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {} of {:?}", idx + 2, path))?;
        let date_str = record
            .get(0)
            .ok_or_else(|| anyhow!("Missing date at row {} of {:?}", idx + 2, path))?;
        let date =
            parse_date(date_str).with_context(|| format!("Row {} of {:?}", idx + 2, path))?;
        let values = record
            .iter()
            .skip(1)
            .map(|cell| {
                parse_cell(cell).with_context(|| format!("Row {} of {:?}", idx + 2, path))
            })
            .collect::<Result<Vec<_>>>()?;
        if values.len() != labels.len() {
            return Err(anyhow!(
                "Row {} of {:?} has {} values, expected {}",
                idx + 2,
                path,
                values.len(),
                labels.len()
            ));
        }
        rows.push((date, values));
    }
    debug!("Parsed {} rows from {:?}", rows.len(), path);
    Ok(RawTable { labels, rows })
}

/// Parse `currencies.csv`: the first column holds the source column id, the
/// `currency` column the currency label.
fn parse_currencies(path: &Path) -> Result<CurrencyMapping> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to open {:?}", path))?;

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    let currency_idx = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("currency"))
        .ok_or_else(|| anyhow!("{:?}: no 'currency' column", path))?;

    let mut entries = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {} of {:?}", idx + 2, path))?;
        let column = record
            .get(0)
            .ok_or_else(|| anyhow!("Missing column id at row {} of {:?}", idx + 2, path))?
            .trim()
            .to_string();
        let currency = record
            .get(currency_idx)
            .ok_or_else(|| anyhow!("Missing currency at row {} of {:?}", idx + 2, path))?
            .trim()
            .to_string();
        if column.is_empty() || currency.is_empty() {
            return Err(anyhow!("Empty mapping entry at row {} of {:?}", idx + 2, path));
        }
        entries.push(MappingEntry { column, currency });
    }
    if entries.is_empty() {
        return Err(anyhow!("{:?}: no mapping entries", path));
    }
    debug!("Currency mapping covers {} columns", entries.len());
    Ok(CurrencyMapping::new(entries))
}

fn parse_cell(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| anyhow!("Could not parse value: {}", text))
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    let trimmed = date_str.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Ok(date);
    }
    Err(anyhow!("Could not parse date: {}", date_str))
}
