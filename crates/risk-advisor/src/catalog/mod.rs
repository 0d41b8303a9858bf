//! Instrument Catalog
//!
//! Read-only snapshot of the curated instruments the advisor may recommend.
//! The catalog never fetches anything; a [`CatalogStore`](crate::store::CatalogStore)
//! builds snapshots and hands them to the engine.

mod seed;

pub use seed::seed_catalog;

use std::collections::HashMap;
use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};
use crate::model::{InstrumentRecord, Sector};

/// Immutable collection of instruments keyed by symbol
///
/// Iteration follows insertion order, which keeps ranking ties deterministic.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    records: Vec<InstrumentRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(records: Vec<InstrumentRecord>) -> Result<Self> {
        let records: Vec<InstrumentRecord> = records
            .into_iter()
            .map(|mut record| {
                record.symbol = record.symbol.trim().to_uppercase();
                record
            })
            .collect();
        let mut index = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            validate_record(record)?;
            if index.insert(record.symbol.clone(), position).is_some() {
                return Err(AdvisorError::validation(format!(
                    "duplicate symbol {} in catalog",
                    record.symbol
                )));
            }
        }

        Ok(Self { records, index })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Strict lookup.
    pub fn get(&self, symbol: &str) -> Result<&InstrumentRecord> {
        self.find(symbol)
            .ok_or_else(|| AdvisorError::NotFound(format!("instrument {symbol}")))
    }

    /// Lenient lookup; symbols are matched case-insensitively.
    pub fn find(&self, symbol: &str) -> Option<&InstrumentRecord> {
        self.index
            .get(&symbol.trim().to_uppercase())
            .map(|&i| &self.records[i])
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.find(symbol).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstrumentRecord> {
        self.records.iter()
    }

    /// Lazily yield the instruments matching `filter`, in insertion order.
    pub fn filter<'a>(
        &'a self,
        filter: &'a InstrumentFilter,
    ) -> impl Iterator<Item = &'a InstrumentRecord> + 'a {
        self.records.iter().filter(move |r| filter.matches(r))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a InstrumentRecord;
    type IntoIter = std::slice::Iter<'a, InstrumentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn validate_record(record: &InstrumentRecord) -> Result<()> {
    if record.symbol.trim().is_empty() {
        return Err(AdvisorError::validation("instrument symbol cannot be empty"));
    }
    if !(1..=10).contains(&record.risk_rating) {
        return Err(AdvisorError::validation(format!(
            "{} risk rating {} outside 1-10",
            record.symbol, record.risk_rating
        )));
    }
    if record.strength < Decimal::ZERO || record.strength > dec!(100) {
        return Err(AdvisorError::validation(format!(
            "{} strength {} outside 0-100",
            record.symbol, record.strength
        )));
    }
    Ok(())
}

/// Predicate over catalog instruments
///
/// An unset criterion matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentFilter {
    #[serde(default)]
    pub sectors: Option<Vec<Sector>>,

    #[serde(default)]
    pub risk_range: Option<RangeInclusive<u8>>,
}

impl InstrumentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_sectors(mut self, sectors: impl IntoIterator<Item = Sector>) -> Self {
        self.sectors = Some(sectors.into_iter().collect());
        self
    }

    pub fn with_risk_range(mut self, range: RangeInclusive<u8>) -> Self {
        self.risk_range = Some(range);
        self
    }

    pub fn matches(&self, record: &InstrumentRecord) -> bool {
        let sector_ok = self
            .sectors
            .as_ref()
            .is_none_or(|sectors| sectors.contains(&record.sector));
        let risk_ok = self
            .risk_range
            .as_ref()
            .is_none_or(|range| range.contains(&record.risk_rating));
        sector_ok && risk_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![
            InstrumentRecord::new("KO", "Coca-Cola", Sector::ConsumerStaples, 2, dec!(78)),
            InstrumentRecord::new("MSFT", "Microsoft", Sector::Technology, 4, dec!(92)),
            InstrumentRecord::new("NVDA", "NVIDIA", Sector::Technology, 8, dec!(88)),
            InstrumentRecord::new("JPM", "JPMorgan Chase", Sector::Financials, 5, dec!(80)),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let catalog = sample();
        assert_eq!(catalog.get("MSFT").unwrap().risk_rating, 4);
        assert_eq!(catalog.get("msft").unwrap().symbol, "MSFT");
        assert!(matches!(catalog.get("TSLA"), Err(AdvisorError::NotFound(_))));
        assert!(catalog.find("TSLA").is_none());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let result = Catalog::new(vec![
            InstrumentRecord::new("KO", "Coca-Cola", Sector::ConsumerStaples, 2, dec!(78)),
            InstrumentRecord::new("ko", "Coke again", Sector::ConsumerStaples, 3, dec!(70)),
        ]);
        assert!(matches!(result, Err(AdvisorError::Validation(_))));
    }

    #[test]
    fn test_out_of_range_records_rejected() {
        let bad_rating = Catalog::new(vec![InstrumentRecord::new(
            "X",
            "X Corp",
            Sector::Energy,
            11,
            dec!(50),
        )]);
        assert!(bad_rating.is_err());

        let bad_strength = Catalog::new(vec![InstrumentRecord::new(
            "X",
            "X Corp",
            Sector::Energy,
            5,
            dec!(101),
        )]);
        assert!(bad_strength.is_err());
    }

    #[test]
    fn test_filter_preserves_insertion_order() {
        let catalog = sample();

        let tech = InstrumentFilter::new().in_sectors([Sector::Technology]);
        let symbols: Vec<_> = catalog.filter(&tech).map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["MSFT", "NVDA"]);

        let mid = InstrumentFilter::new().with_risk_range(2..=5);
        let symbols: Vec<_> = catalog.filter(&mid).map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["KO", "MSFT", "JPM"]);

        let both = InstrumentFilter::new()
            .in_sectors([Sector::Technology, Sector::Financials])
            .with_risk_range(5..=10);
        let symbols: Vec<_> = catalog.filter(&both).map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["NVDA", "JPM"]);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert_eq!(catalog.filter(&InstrumentFilter::new()).count(), 0);
    }
}
