//! The performance computation engine
//!
//! Queries are pure, stateless functions of `(store, lookback, range)`. The
//! store is immutable after construction, so identical calls return
//! identical sequences and concurrent queries need no coordination.
//!
//! All three queries treat `end` as inclusive and emit one index value per
//! source-table date in the range, compounded from a 1.0 seed that is never
//! itself emitted. Numeric degeneracies (a zero comparison value, a weight
//! column with no observations) flow through as non-finite values and poison
//! every later index value; callers must treat non-finite output as fatal
//! for the range.

pub mod compound;
pub mod lookback;
pub mod weights;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::PerformanceError;
use crate::tables::mapping::SettlementGrouping;
use crate::tables::store::MarketData;
use crate::tables::TimeTable;

/// Cumulative per-asset performance index over `[start, end]` inclusive.
///
/// Each asset's local price is compared against its nearest prior
/// observation within the lookback window; per-asset returns are blended
/// with the asset-level weights and compounded. Output length equals the
/// number of price-table dates in the range.
pub fn asset_performance(
    data: &MarketData,
    lookback_days: u32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<f64>, PerformanceError> {
    let block = lookback::resolve(data.prices(), start, end, lookback_days)?;
    let aligned = weights::align(data.weights(), &block.dates);
    debug!(
        rows = block.len(),
        imputed_weights = aligned.imputed,
        "asset performance blocks resolved"
    );
    Ok(compound_blocks(&block, &aligned))
}

/// Cumulative per-currency performance index over `[start, end]` inclusive.
///
/// Exchange rates are compared against their nearest prior observations;
/// asset weights are summed per settlement currency before blending. Output
/// length equals the number of exchange-table dates in the range.
pub fn currency_performance(
    data: &MarketData,
    lookback_days: u32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<f64>, PerformanceError> {
    let grouping =
        SettlementGrouping::derive(&data.mapping().currencies(), data.exchanges().labels())?;
    let block = lookback::resolve(data.exchanges(), start, end, lookback_days)?;
    let aligned = weights::align_grouped(data.weights(), &grouping, &block.dates);
    debug!(
        rows = block.len(),
        imputed_weights = aligned.imputed,
        "currency performance blocks resolved"
    );
    Ok(compound_blocks(&block, &aligned))
}

/// Cumulative total performance index over `[start, end]` inclusive.
///
/// Every asset price is first converted into base terms through its
/// settlement currency's exchange rate (joined by exact date; a price date
/// with no exchange row yields non-finite values for that row), then
/// compared, blended with the asset-level weights and compounded. Output
/// length equals the number of price-table dates in the range.
pub fn total_performance(
    data: &MarketData,
    lookback_days: u32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<f64>, PerformanceError> {
    let grouping =
        SettlementGrouping::derive(&data.mapping().currencies(), data.exchanges().labels())?;
    let combined = combined_value_table(data.prices(), data.exchanges(), &grouping)?;
    let block = lookback::resolve(&combined, start, end, lookback_days)?;
    let aligned = weights::align(data.weights(), &block.dates);
    debug!(
        rows = block.len(),
        imputed_weights = aligned.imputed,
        "total performance blocks resolved"
    );
    Ok(compound_blocks(&block, &aligned))
}

fn compound_blocks(
    block: &lookback::LookbackBlock,
    aligned: &weights::AlignedWeights,
) -> Vec<f64> {
    let returns = compound::simple_returns(&block.current, &block.previous);
    let blended = compound::blended_returns(&returns, &aligned.matrix);
    compound::compound_index(&blended)
}

/// The price table expressed in base terms: each asset column multiplied by
/// the exchange rate of its settlement currency, matched by exact date.
fn combined_value_table(
    prices: &TimeTable,
    exchanges: &TimeTable,
    grouping: &SettlementGrouping,
) -> Result<TimeTable, PerformanceError> {
    let rows = prices
        .dates()
        .iter()
        .enumerate()
        .map(|(idx, date)| {
            let rates = exchanges.row_at(*date).map(|i| exchanges.row(i));
            prices
                .row(idx)
                .iter()
                .enumerate()
                .map(|(col, price)| match rates {
                    Some(rates) => price * rates[grouping.settlement_column(col)],
                    None => f64::NAN,
                })
                .collect()
        })
        .collect();
    TimeTable::new(prices.labels().to_vec(), prices.dates().to_vec(), rows)
}
