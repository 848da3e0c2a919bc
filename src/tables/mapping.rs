//! Currency mapping and settlement grouping

use crate::error::PerformanceError;

/// One entry of the currency mapping: pairs a source column id with the
/// currency the column trades in. The entry order defines the canonical
/// column order shared by the price and weight tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub column: String,
    pub currency: String,
}

/// Ordered list of mapping entries, one per asset-currency column.
#[derive(Debug, Clone, Default)]
pub struct CurrencyMapping {
    entries: Vec<MappingEntry>,
}

impl CurrencyMapping {
    pub fn new(entries: Vec<MappingEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Currency labels in canonical column order. Labels repeat when several
    /// assets trade in the same currency.
    pub fn currencies(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.currency.clone()).collect()
    }
}

/// Maps each asset-currency column to the exchange-rate column it settles
/// in. Several asset columns may share one settlement column.
#[derive(Debug, Clone)]
pub struct SettlementGrouping {
    settlement_of: Vec<usize>,
    n_settlements: usize,
}

impl SettlementGrouping {
    /// Pair every asset-currency label with the exchange column carrying the
    /// same label. A label with no exchange column is an error.
    pub fn derive(
        asset_currencies: &[String],
        exchange_labels: &[String],
    ) -> Result<Self, PerformanceError> {
        let settlement_of = asset_currencies
            .iter()
            .map(|currency| {
                exchange_labels
                    .iter()
                    .position(|label| label == currency)
                    .ok_or_else(|| PerformanceError::MissingColumn(currency.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            settlement_of,
            n_settlements: exchange_labels.len(),
        })
    }

    /// Exchange column index for an asset column.
    pub fn settlement_column(&self, asset_column: usize) -> usize {
        self.settlement_of[asset_column]
    }

    /// Number of settlement currencies, i.e. exchange-table columns.
    pub fn n_settlements(&self) -> usize {
        self.n_settlements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_currencies_keep_mapping_order() {
        let mapping = CurrencyMapping::new(vec![
            MappingEntry {
                column: "a2".to_string(),
                currency: "EUR".to_string(),
            },
            MappingEntry {
                column: "a1".to_string(),
                currency: "USD".to_string(),
            },
        ]);
        assert_eq!(mapping.currencies(), strings(&["EUR", "USD"]));
    }

    #[test]
    fn test_derive_shares_settlement_columns() {
        let grouping = SettlementGrouping::derive(
            &strings(&["USD", "EUR", "EUR"]),
            &strings(&["USD", "EUR"]),
        )
        .unwrap();
        assert_eq!(grouping.settlement_column(0), 0);
        assert_eq!(grouping.settlement_column(1), 1);
        assert_eq!(grouping.settlement_column(2), 1);
        assert_eq!(grouping.n_settlements(), 2);
    }

    #[test]
    fn test_derive_rejects_unknown_currency() {
        let err = SettlementGrouping::derive(&strings(&["USD", "GBP"]), &strings(&["USD"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "currency GBP has no exchange rate column");
    }
}
