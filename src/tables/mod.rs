//! Date-indexed tables
//!
//! `TimeTable` is the shared representation for the price, exchange-rate and
//! weight series: a row-major f64 matrix indexed by strictly increasing
//! dates, with one label per column. Missing cells are NaN until imputation
//! fills them.

pub mod mapping;
pub mod store;

use std::ops::Range;

use chrono::{Days, NaiveDate};

use crate::error::PerformanceError;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeTable {
    labels: Vec<String>,
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<f64>>,
}

impl TimeTable {
    /// Build a table, validating shape and date ordering.
    pub fn new(
        labels: Vec<String>,
        dates: Vec<NaiveDate>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, PerformanceError> {
        if dates.len() != rows.len() {
            return Err(PerformanceError::InvalidTable(format!(
                "{} dates but {} rows",
                dates.len(),
                rows.len()
            )));
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(PerformanceError::InvalidTable(format!(
                    "dates not strictly increasing at {}",
                    pair[1]
                )));
            }
        }
        for row in &rows {
            if row.len() != labels.len() {
                return Err(PerformanceError::InvalidTable(format!(
                    "row width {} does not match {} columns",
                    row.len(),
                    labels.len()
                )));
            }
        }
        Ok(Self { labels, dates, rows })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, idx: usize) -> &[f64] {
        &self.rows[idx]
    }

    /// Index of the row holding exactly `date`, if the table has one.
    pub fn row_at(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Row indices with dates in `[from, to]` inclusive, ascending.
    /// Empty when `to < from`.
    pub fn slice_range(&self, from: NaiveDate, to: NaiveDate) -> Range<usize> {
        if to < from {
            return 0..0;
        }
        let lo = self.dates.partition_point(|d| *d < from);
        let hi = self.dates.partition_point(|d| *d <= to);
        lo..hi
    }

    /// Nearest available row strictly before `date`, provided it is no older
    /// than `date - lookback_days`. `None` when no observation exists inside
    /// the lookback window.
    pub fn prior_observation(&self, date: NaiveDate, lookback_days: u32) -> Option<usize> {
        let idx = self.dates.partition_point(|d| *d < date);
        if idx == 0 {
            return None;
        }
        let earliest = date.checked_sub_days(Days::new(u64::from(lookback_days)))?;
        (self.dates[idx - 1] >= earliest).then_some(idx - 1)
    }

    /// Per-column mean over the cells that are present. A column with no
    /// observed cells gets NaN.
    pub fn column_means(&self) -> Vec<f64> {
        column_means_of(&self.rows, self.labels.len())
    }

    /// Replace every missing cell with its column mean, returning how many
    /// cells were synthesized. Columns with no observed cells keep their
    /// NaNs.
    pub fn impute_missing(&mut self) -> usize {
        fill_missing_with_means(&mut self.rows, self.labels.len())
    }
}

/// Column means over the non-missing cells of a row-major matrix.
pub(crate) fn column_means_of(rows: &[Vec<f64>], n_cols: usize) -> Vec<f64> {
    let mut sums = vec![0.0; n_cols];
    let mut counts = vec![0usize; n_cols];
    for row in rows {
        for (col, value) in row.iter().enumerate() {
            if !value.is_nan() {
                sums[col] += value;
                counts[col] += 1;
            }
        }
    }
    sums.into_iter()
        .zip(counts)
        .map(|(sum, count)| if count > 0 { sum / count as f64 } else { f64::NAN })
        .collect()
}

/// Fill NaN cells from their column means, counting the synthesized cells.
/// A NaN mean (empty column) leaves the cells untouched.
pub(crate) fn fill_missing_with_means(rows: &mut [Vec<f64>], n_cols: usize) -> usize {
    let means = column_means_of(rows, n_cols);
    let mut filled = 0;
    for row in rows.iter_mut() {
        for (cell, mean) in row.iter_mut().zip(&means) {
            if cell.is_nan() && !mean.is_nan() {
                *cell = *mean;
                filled += 1;
            }
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table() -> TimeTable {
        TimeTable::new(
            vec!["USD".to_string(), "EUR".to_string()],
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 5)],
            vec![vec![1.0, 2.0], vec![1.1, 2.2], vec![1.2, 2.4]],
        )
        .unwrap()
    }

    #[test]
    fn test_slice_range_is_inclusive() {
        let t = table();
        assert_eq!(t.slice_range(date(2024, 1, 1), date(2024, 1, 2)), 0..2);
        assert_eq!(t.slice_range(date(2024, 1, 2), date(2024, 1, 5)), 1..3);
        // End beyond coverage clamps to the available rows.
        assert_eq!(t.slice_range(date(2024, 1, 1), date(2050, 1, 1)), 0..3);
    }

    #[test]
    fn test_slice_range_empty_when_reversed() {
        let t = table();
        assert_eq!(t.slice_range(date(2024, 1, 5), date(2024, 1, 1)), 0..0);
    }

    #[test]
    fn test_row_at_exact_date_only() {
        let t = table();
        assert_eq!(t.row_at(date(2024, 1, 2)), Some(1));
        assert_eq!(t.row_at(date(2024, 1, 3)), None);
    }

    #[test]
    fn test_prior_observation_nearest_row() {
        let t = table();
        assert_eq!(t.prior_observation(date(2024, 1, 2), 5), Some(0));
        // Jan 5 looks back to Jan 2, three calendar days earlier.
        assert_eq!(t.prior_observation(date(2024, 1, 5), 5), Some(1));
    }

    #[test]
    fn test_prior_observation_respects_window() {
        let t = table();
        // Jan 2 is three calendar days before Jan 5, outside a 2-day window.
        assert_eq!(t.prior_observation(date(2024, 1, 5), 2), None);
        assert_eq!(t.prior_observation(date(2024, 1, 5), 3), Some(1));
        // No rows exist before the first date at all.
        assert_eq!(t.prior_observation(date(2024, 1, 1), 5), None);
    }

    #[test]
    fn test_new_rejects_unsorted_dates() {
        let err = TimeTable::new(
            vec!["USD".to_string()],
            vec![date(2024, 1, 2), date(2024, 1, 1)],
            vec![vec![1.0], vec![2.0]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn test_new_rejects_duplicate_dates() {
        let result = TimeTable::new(
            vec!["USD".to_string()],
            vec![date(2024, 1, 1), date(2024, 1, 1)],
            vec![vec![1.0], vec![2.0]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let err = TimeTable::new(
            vec!["USD".to_string(), "EUR".to_string()],
            vec![date(2024, 1, 1)],
            vec![vec![1.0]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("row width"));
    }

    #[test]
    fn test_column_means_skip_missing() {
        let t = TimeTable::new(
            vec!["USD".to_string(), "EUR".to_string()],
            vec![date(2024, 1, 1), date(2024, 1, 2)],
            vec![vec![1.0, f64::NAN], vec![3.0, f64::NAN]],
        )
        .unwrap();
        let means = t.column_means();
        assert_eq!(means[0], 2.0);
        assert!(means[1].is_nan());
    }

    #[test]
    fn test_impute_missing_counts_synthesized_cells() {
        let mut t = TimeTable::new(
            vec!["USD".to_string(), "EUR".to_string()],
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)],
            vec![
                vec![1.0, f64::NAN],
                vec![f64::NAN, 4.0],
                vec![3.0, 2.0],
            ],
        )
        .unwrap();
        assert_eq!(t.impute_missing(), 2);
        assert_eq!(t.row(1)[0], 2.0);
        assert_eq!(t.row(0)[1], 3.0);
        // Second pass has nothing left to fill.
        assert_eq!(t.impute_missing(), 0);
    }

    #[test]
    fn test_impute_missing_leaves_empty_columns_alone() {
        let mut t = TimeTable::new(
            vec!["USD".to_string()],
            vec![date(2024, 1, 1)],
            vec![vec![f64::NAN]],
        )
        .unwrap();
        assert_eq!(t.impute_missing(), 0);
        assert!(t.row(0)[0].is_nan());
    }
}
