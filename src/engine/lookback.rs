//! Lookback resolution
//!
//! Pairs every requested row with the comparison row its period return is
//! computed against: the nearest prior observation inside the lookback
//! window. Resolution happens eagerly, before any compounding, so a range
//! with a hole in its history fails as a whole instead of producing a
//! silently shortened series.

use chrono::NaiveDate;

use crate::error::PerformanceError;
use crate::tables::TimeTable;

/// Column-aligned row blocks of equal length: `current` holds the values for
/// the query dates, `previous` the nearest prior observation of each.
#[derive(Debug, Default)]
pub struct LookbackBlock {
    pub dates: Vec<NaiveDate>,
    pub current: Vec<Vec<f64>>,
    pub previous: Vec<Vec<f64>>,
}

impl LookbackBlock {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Materialize the comparison blocks for `[start, end]` inclusive.
///
/// A date whose prior observation is absent, or older than the lookback
/// window allows, is insufficient history. An empty range yields an empty
/// block, not an error.
pub fn resolve(
    table: &TimeTable,
    start: NaiveDate,
    end: NaiveDate,
    lookback_days: u32,
) -> Result<LookbackBlock, PerformanceError> {
    let mut block = LookbackBlock::default();
    for idx in table.slice_range(start, end) {
        let date = table.dates()[idx];
        let prior = table
            .prior_observation(date, lookback_days)
            .ok_or(PerformanceError::InsufficientHistory {
                date,
                lookback_days,
            })?;
        block.dates.push(date);
        block.current.push(table.row(idx).to_vec());
        block.previous.push(table.row(prior).to_vec());
    }
    Ok(block)
}
