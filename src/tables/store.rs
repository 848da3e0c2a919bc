//! Read-only store for the normalized market tables

use crate::error::PerformanceError;
use crate::tables::mapping::CurrencyMapping;
use crate::tables::TimeTable;

/// The three normalized tables plus the currency mapping.
///
/// Built once by the loader and immutable afterwards: queries borrow the
/// store and never mutate it, so one store may serve concurrent queries
/// without coordination.
#[derive(Debug, Clone)]
pub struct MarketData {
    prices: TimeTable,
    exchanges: TimeTable,
    weights: TimeTable,
    mapping: CurrencyMapping,
}

impl MarketData {
    /// Freeze the store, validating that prices and weights carry the
    /// mapping's canonical column order.
    pub fn new(
        prices: TimeTable,
        exchanges: TimeTable,
        weights: TimeTable,
        mapping: CurrencyMapping,
    ) -> Result<Self, PerformanceError> {
        let canonical = mapping.currencies();
        if prices.labels() != canonical.as_slice() {
            return Err(PerformanceError::InvalidTable(
                "price columns do not follow the currency mapping order".to_string(),
            ));
        }
        if weights.labels() != canonical.as_slice() {
            return Err(PerformanceError::InvalidTable(
                "weight columns do not follow the currency mapping order".to_string(),
            ));
        }
        Ok(Self {
            prices,
            exchanges,
            weights,
            mapping,
        })
    }

    pub fn prices(&self) -> &TimeTable {
        &self.prices
    }

    pub fn exchanges(&self) -> &TimeTable {
        &self.exchanges
    }

    pub fn weights(&self) -> &TimeTable {
        &self.weights
    }

    pub fn mapping(&self) -> &CurrencyMapping {
        &self.mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::mapping::MappingEntry;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn mapping() -> CurrencyMapping {
        CurrencyMapping::new(vec![
            MappingEntry {
                column: "a1".to_string(),
                currency: "USD".to_string(),
            },
            MappingEntry {
                column: "a2".to_string(),
                currency: "EUR".to_string(),
            },
        ])
    }

    fn two_col(labels: &[&str]) -> TimeTable {
        TimeTable::new(
            labels.iter().map(|s| s.to_string()).collect(),
            vec![date(1)],
            vec![vec![1.0; labels.len()]],
        )
        .unwrap()
    }

    #[test]
    fn test_new_accepts_canonical_order() {
        let store = MarketData::new(
            two_col(&["USD", "EUR"]),
            two_col(&["USD", "EUR"]),
            two_col(&["USD", "EUR"]),
            mapping(),
        );
        assert!(store.is_ok());
    }

    #[test]
    fn test_new_rejects_misordered_weights() {
        let err = MarketData::new(
            two_col(&["USD", "EUR"]),
            two_col(&["USD", "EUR"]),
            two_col(&["EUR", "USD"]),
            mapping(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("weight columns"));
    }
}
