//! Seed Universe
//!
//! The curated instruments the assistant ships with. Ratings and strength
//! scores are assigned by hand and refreshed out-of-band, never derived from
//! live prices.

use rust_decimal::Decimal;

use super::Catalog;
use crate::error::Result;
use crate::model::{InstrumentRecord, Sector};

use Sector::{
    ConsumerDiscretionary, ConsumerStaples, Energy, Financials, Healthcare, Industrials, Materials,
    RealEstate, Technology, Telecommunications, Utilities,
};

// (symbol, name, sector, risk rating, strength, expected upside %)
const SEED: &[(&str, &str, Sector, u8, i64, i64)] = &[
    // Conservative (risk 1-3)
    ("JNJ", "Johnson & Johnson", Healthcare, 2, 82, 6),
    ("PG", "Procter & Gamble", ConsumerStaples, 2, 80, 5),
    ("KO", "Coca-Cola", ConsumerStaples, 2, 78, 5),
    ("SO", "Southern Company", Utilities, 2, 70, 4),
    ("DUK", "Duke Energy", Utilities, 2, 68, 4),
    ("NEE", "NextEra Energy", Utilities, 3, 74, 8),
    ("WMT", "Walmart", ConsumerStaples, 3, 81, 7),
    ("VZ", "Verizon", Telecommunications, 3, 62, 5),
    ("TLT", "iShares 20+ Year Treasury", Financials, 3, 60, 4),
    // Moderate (risk 4-6)
    ("MSFT", "Microsoft", Technology, 4, 92, 12),
    ("V", "Visa", Financials, 4, 88, 11),
    ("UNH", "UnitedHealth", Healthcare, 4, 84, 10),
    ("GLD", "SPDR Gold Shares", Materials, 4, 65, 6),
    ("HON", "Honeywell", Industrials, 4, 76, 9),
    ("AAPL", "Apple", Technology, 5, 90, 11),
    ("JPM", "JPMorgan Chase", Financials, 5, 83, 10),
    ("HD", "Home Depot", ConsumerDiscretionary, 5, 79, 9),
    ("SPY", "SPDR S&P 500", Financials, 5, 75, 9),
    ("VTI", "Vanguard Total Stock", Financials, 5, 74, 9),
    ("CAT", "Caterpillar", Industrials, 5, 72, 10),
    ("PLD", "Prologis", RealEstate, 5, 70, 9),
    ("GOOGL", "Alphabet", Technology, 6, 89, 14),
    ("QQQ", "Invesco QQQ", Technology, 6, 78, 12),
    ("XOM", "Exxon Mobil", Energy, 6, 71, 8),
    // Growth (risk 7-8)
    ("AMZN", "Amazon", ConsumerDiscretionary, 7, 87, 16),
    ("META", "Meta Platforms", Technology, 7, 84, 15),
    ("NFLX", "Netflix", ConsumerDiscretionary, 7, 76, 14),
    ("FCX", "Freeport-McMoRan", Materials, 7, 66, 15),
    ("NVDA", "NVIDIA", Technology, 8, 91, 22),
    ("TSLA", "Tesla", ConsumerDiscretionary, 8, 70, 20),
    ("AMD", "Advanced Micro Devices", Technology, 8, 80, 20),
    ("OXY", "Occidental Petroleum", Energy, 8, 62, 15),
    // Speculative (risk 9-10)
    ("ARKK", "ARK Innovation ETF", Technology, 9, 48, 30),
    ("PLTR", "Palantir", Technology, 9, 60, 28),
    ("COIN", "Coinbase", Financials, 10, 52, 35),
    ("RIVN", "Rivian", ConsumerDiscretionary, 10, 40, 40),
];

/// The built-in catalog snapshot.
pub fn seed_catalog() -> Result<Catalog> {
    let records = SEED
        .iter()
        .map(|&(symbol, name, sector, rating, strength, upside)| {
            InstrumentRecord::new(symbol, name, sector, rating, Decimal::from(strength))
                .with_upside(Decimal::from(upside))
        })
        .collect();

    Catalog::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_valid() {
        let records: Vec<_> = SEED
            .iter()
            .map(|&(symbol, name, sector, rating, strength, _)| {
                InstrumentRecord::new(symbol, name, sector, rating, Decimal::from(strength))
            })
            .collect();
        let catalog = Catalog::new(records).unwrap();
        assert_eq!(catalog.len(), SEED.len());
    }

    #[test]
    fn test_seed_catalog() {
        let catalog = seed_catalog().unwrap();
        assert!(!catalog.is_empty());

        let nvda = catalog.get("NVDA").unwrap();
        assert_eq!(nvda.sector, Sector::Technology);
        assert_eq!(nvda.risk_rating, 8);

        // Every rating band is represented
        for rating in [2, 5, 8, 10] {
            assert!(catalog.iter().any(|r| r.risk_rating == rating));
        }
    }
}
