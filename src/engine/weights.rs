//! Weight alignment onto return rows
//!
//! The weight table rarely shares the exact date set of the table returns
//! are computed from, so weights are left-outer aligned onto the return
//! dates: every return date keeps a row, and dates with no weight
//! observation get a missing row that is afterwards filled from column
//! means computed over the aligned subset (not the full table).

use chrono::NaiveDate;

use crate::tables::mapping::SettlementGrouping;
use crate::tables::{fill_missing_with_means, TimeTable};

/// Weight matrix row-aligned to the return dates, plus the number of cells
/// synthesized from post-alignment column means.
#[derive(Debug)]
pub struct AlignedWeights {
    pub matrix: Vec<Vec<f64>>,
    pub imputed: usize,
}

/// Align asset-level weights onto `dates`, one column per asset currency.
pub fn align(weights: &TimeTable, dates: &[NaiveDate]) -> AlignedWeights {
    let rows = dates
        .iter()
        .map(|date| match weights.row_at(*date) {
            Some(idx) => weights.row(idx).to_vec(),
            None => vec![f64::NAN; weights.n_cols()],
        })
        .collect();
    impute(rows, weights.n_cols())
}

/// Align weights onto `dates` with one combined column per settlement
/// currency: asset columns that settle in the same exchange column are
/// summed before alignment.
pub fn align_grouped(
    weights: &TimeTable,
    grouping: &SettlementGrouping,
    dates: &[NaiveDate],
) -> AlignedWeights {
    let n_settlements = grouping.n_settlements();
    let rows = dates
        .iter()
        .map(|date| match weights.row_at(*date) {
            Some(idx) => {
                let mut grouped = vec![0.0; n_settlements];
                for (col, value) in weights.row(idx).iter().enumerate() {
                    grouped[grouping.settlement_column(col)] += value;
                }
                grouped
            }
            None => vec![f64::NAN; n_settlements],
        })
        .collect();
    impute(rows, n_settlements)
}

fn impute(mut rows: Vec<Vec<f64>>, n_cols: usize) -> AlignedWeights {
    let imputed = fill_missing_with_means(&mut rows, n_cols);
    AlignedWeights {
        matrix: rows,
        imputed,
    }
}
