//! Domain Models
//!
//! Core data types for risk profiling and portfolio recommendations.
//! Uses `rust_decimal` for all weights, percentages and scores.
//! Weights are fractions (`1.0` = the whole portfolio); fields ending in
//! `_pct` are percentages in `0..=100`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};
use crate::policy::{self, PolicyRow};

/// Market sector an instrument is classified under
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Technology,
    Healthcare,
    Financials,
    ConsumerDiscretionary,
    ConsumerStaples,
    Energy,
    Utilities,
    Industrials,
    Materials,
    RealEstate,
    Telecommunications,
}

impl Sector {
    pub const ALL: [Self; 11] = [
        Self::Technology,
        Self::Healthcare,
        Self::Financials,
        Self::ConsumerDiscretionary,
        Self::ConsumerStaples,
        Self::Energy,
        Self::Utilities,
        Self::Industrials,
        Self::Materials,
        Self::RealEstate,
        Self::Telecommunications,
    ];

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Healthcare => "Healthcare",
            Self::Financials => "Financials",
            Self::ConsumerDiscretionary => "Consumer Discretionary",
            Self::ConsumerStaples => "Consumer Staples",
            Self::Energy => "Energy",
            Self::Utilities => "Utilities",
            Self::Industrials => "Industrials",
            Self::Materials => "Materials",
            Self::RealEstate => "Real Estate",
            Self::Telecommunications => "Telecommunications",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Sector {
    type Err = AdvisorError;

    /// Accepts both the wire form (`consumer_staples`) and the display form
    /// (`Consumer Staples`).
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|sector| sector.display_name().to_lowercase().replace(' ', "_") == key)
            .ok_or_else(|| AdvisorError::validation(format!("unknown sector '{s}'")))
    }
}

/// Coarse risk band derived from the 1-10 score
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskBand {
    /// 1-3 conservative, 4-6 moderate, 7-10 aggressive.
    pub fn from_score(score: u8) -> Result<Self> {
        match score {
            1..=3 => Ok(Self::Conservative),
            4..=6 => Ok(Self::Moderate),
            7..=10 => Ok(Self::Aggressive),
            _ => Err(AdvisorError::validation(format!(
                "risk score {score} outside 1-10"
            ))),
        }
    }

    /// How far an instrument's rating may sit from the profile score and
    /// still be considered. Aggressive investors tolerate wider dispersion.
    pub const fn rating_tolerance(self) -> u8 {
        match self {
            Self::Conservative => 2,
            Self::Moderate => 3,
            Self::Aggressive => 4,
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Conservative => "Conservative",
            Self::Moderate => "Moderate",
            Self::Aggressive => "Aggressive",
        };
        f.write_str(name)
    }
}

/// Target split of the portfolio across asset classes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationTarget {
    pub bond_pct: u8,
    pub stock_pct: u8,
    pub cash_pct: u8,
}

impl AllocationTarget {
    pub fn total_pct(&self) -> u16 {
        u16::from(self.bond_pct) + u16::from(self.stock_pct) + u16::from(self.cash_pct)
    }
}

/// Risk profile for a user, built from a scored questionnaire
///
/// Immutable once built. A re-assessment produces a new profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Risk score (1 = capital preservation, 10 = speculative)
    pub score: u8,

    pub band: RiskBand,

    /// Policy label, e.g. "Aggressive Risk"
    pub label: String,

    pub description: String,

    pub allocation: AllocationTarget,

    /// Largest share of the portfolio any single position may hold
    pub max_position_pct: Decimal,

    /// Budget split evenly across new `add` candidates
    pub new_money_pct: Decimal,

    pub preferred_sectors: Vec<Sector>,

    pub avoid_sectors: Vec<Sector>,

    /// Version of the policy table the profile was built from
    pub policy_version: String,
}

impl RiskProfile {
    /// Build the profile for a score straight from the policy table.
    pub fn for_score(score: u8) -> Result<Self> {
        let band = RiskBand::from_score(score)?;
        let row = policy::lookup(score)?;
        Ok(Self::from_row(band, row))
    }

    fn from_row(band: RiskBand, row: &PolicyRow) -> Self {
        Self {
            score: row.score,
            band,
            label: row.label.to_string(),
            description: row.description.to_string(),
            allocation: row.allocation(),
            max_position_pct: Decimal::from(row.max_position_pct),
            new_money_pct: Decimal::from(row.new_money_pct),
            preferred_sectors: row.preferred_sectors.to_vec(),
            avoid_sectors: row.avoid_sectors.to_vec(),
            policy_version: policy::POLICY_VERSION.to_string(),
        }
    }

    /// Max single position as a weight fraction.
    pub fn max_position_weight(&self) -> Decimal {
        self.max_position_pct / dec!(100)
    }

    pub fn prefers(&self, sector: Sector) -> bool {
        self.preferred_sectors.contains(&sector)
    }

    pub fn avoids(&self, sector: Sector) -> bool {
        self.avoid_sectors.contains(&sector)
    }

    /// Distance between an instrument rating and this profile's score.
    pub fn rating_distance(&self, rating: u8) -> u8 {
        self.score.abs_diff(rating)
    }

    pub fn accepts_rating(&self, rating: u8) -> bool {
        self.rating_distance(rating) <= self.band.rating_tolerance()
    }
}

/// A tradable instrument in the curated catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    /// Ticker symbol (e.g., "MSFT", "SPY")
    pub symbol: String,

    pub name: String,

    pub sector: Sector,

    /// Intrinsic risk rating (1 = lowest, 10 = highest)
    pub risk_rating: u8,

    /// Fundamental strength score (0-100)
    pub strength: Decimal,

    /// Analyst-style expected upside percentage
    #[serde(default)]
    pub expected_upside_pct: Decimal,
}

impl InstrumentRecord {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        sector: Sector,
        risk_rating: u8,
        strength: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            sector,
            risk_rating,
            strength,
            expected_upside_pct: Decimal::ZERO,
        }
    }

    pub fn with_upside(mut self, expected_upside_pct: Decimal) -> Self {
        self.expected_upside_pct = expected_upside_pct;
        self
    }
}

/// A held position, as reported by the brokerage
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioPosition {
    pub symbol: String,

    pub quantity: Decimal,

    /// Average cost basis per unit
    pub cost_basis: Decimal,

    /// Current market value of the whole position
    pub current_value: Decimal,

    /// current_value / total portfolio value (cash included)
    #[serde(default)]
    pub weight: Decimal,
}

impl PortfolioPosition {
    pub fn new(
        symbol: impl Into<String>,
        quantity: Decimal,
        cost_basis: Decimal,
        current_value: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            quantity,
            cost_basis,
            current_value,
            weight: Decimal::ZERO,
        }
    }

    pub fn with_weight(mut self, weight: Decimal) -> Self {
        self.weight = weight;
        self
    }

    pub fn total_cost(&self) -> Decimal {
        self.quantity * self.cost_basis
    }

    pub fn unrealized_pnl(&self) -> Decimal {
        self.current_value - self.total_cost()
    }

    pub fn weight_pct(&self) -> Decimal {
        (self.weight * dec!(100)).round_dp(2)
    }

    /// Fill in weights from current values, counting `cash_balance` toward
    /// the total so that the weights sum to at most 1.
    pub fn weigh(positions: Vec<Self>, cash_balance: Decimal) -> Result<Vec<Self>> {
        if cash_balance < Decimal::ZERO {
            return Err(AdvisorError::validation("cash balance cannot be negative"));
        }
        if let Some(bad) = positions.iter().find(|p| p.current_value < Decimal::ZERO) {
            return Err(AdvisorError::validation(format!(
                "position {} has a negative value",
                bad.symbol
            )));
        }

        let total = positions
            .iter()
            .map(|p| p.current_value)
            .try_fold(cash_balance, Decimal::checked_add)
            .ok_or_else(|| AdvisorError::validation("portfolio value overflows"))?;
        if total == Decimal::ZERO {
            return Ok(positions
                .into_iter()
                .map(|p| p.with_weight(Decimal::ZERO))
                .collect());
        }

        Ok(positions
            .into_iter()
            .map(|p| {
                let weight = p.current_value / total;
                p.with_weight(weight)
            })
            .collect())
    }
}

/// What the investor should do with a symbol
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Trim,
    Avoid,
    Hold,
    Add,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Trim => "trim",
            Self::Avoid => "avoid",
            Self::Hold => "hold",
            Self::Add => "add",
        };
        f.write_str(name)
    }
}

/// Machine-readable reason attached to a recommendation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RationaleTag {
    RiskAligned,
    RiskMisaligned,
    PreferredSector,
    SectorOverweight,
    PositionOverweight,
    SectorAvoided,
    UnknownInstrument,
    Rebalance,
    NewSector,
}

/// A single actionable suggestion
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub symbol: String,

    pub action: Action,

    /// Target share of the portfolio after acting (percentage)
    pub suggested_allocation_pct: Decimal,

    pub rationale: Vec<RationaleTag>,

    /// Current share of the portfolio, for held symbols
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight_pct: Option<Decimal>,

    /// Ranking score, for ranker candidates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_score: Option<Decimal>,
}

impl Recommendation {
    pub fn new(
        symbol: impl Into<String>,
        action: Action,
        suggested_allocation_pct: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            action,
            suggested_allocation_pct,
            rationale: Vec::new(),
            current_weight_pct: None,
            composite_score: None,
        }
    }

    pub fn tagged(mut self, tag: RationaleTag) -> Self {
        self.tag(tag);
        self
    }

    pub fn tag(&mut self, tag: RationaleTag) {
        if !self.rationale.contains(&tag) {
            self.rationale.push(tag);
        }
    }

    pub fn has_tag(&self, tag: RationaleTag) -> bool {
        self.rationale.contains(&tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(RiskBand::from_score(1).unwrap(), RiskBand::Conservative);
        assert_eq!(RiskBand::from_score(3).unwrap(), RiskBand::Conservative);
        assert_eq!(RiskBand::from_score(4).unwrap(), RiskBand::Moderate);
        assert_eq!(RiskBand::from_score(6).unwrap(), RiskBand::Moderate);
        assert_eq!(RiskBand::from_score(7).unwrap(), RiskBand::Aggressive);
        assert_eq!(RiskBand::from_score(10).unwrap(), RiskBand::Aggressive);
        assert!(RiskBand::from_score(0).is_err());
        assert!(RiskBand::from_score(11).is_err());
    }

    #[test]
    fn test_profile_for_score() {
        let profile = RiskProfile::for_score(8).unwrap();
        assert_eq!(profile.band, RiskBand::Aggressive);
        assert_eq!(profile.allocation.stock_pct, 90);
        assert_eq!(profile.max_position_pct, dec!(25));
        assert_eq!(profile.max_position_weight(), dec!(0.25));
        assert!(profile.accepts_rating(4));
        assert!(!profile.accepts_rating(3));
    }

    #[test]
    fn test_sector_parsing() {
        assert_eq!("consumer_staples".parse::<Sector>().unwrap(), Sector::ConsumerStaples);
        assert_eq!("Real Estate".parse::<Sector>().unwrap(), Sector::RealEstate);
        assert_eq!("technology".parse::<Sector>().unwrap(), Sector::Technology);
        assert!("crypto".parse::<Sector>().is_err());
    }

    #[test]
    fn test_weigh_positions() {
        let positions = vec![
            PortfolioPosition::new("MSFT", dec!(10), dec!(300), dec!(4000)),
            PortfolioPosition::new("KO", dec!(100), dec!(50), dec!(5000)),
        ];

        let weighed = PortfolioPosition::weigh(positions, dec!(1000)).unwrap();
        assert_eq!(weighed[0].weight, dec!(0.4));
        assert_eq!(weighed[1].weight, dec!(0.5));
        assert_eq!(weighed[1].weight_pct(), dec!(50));
        assert_eq!(weighed[0].unrealized_pnl(), dec!(1000));
    }

    #[test]
    fn test_weigh_rejects_overflowing_values() {
        let positions = vec![
            PortfolioPosition::new("MSFT", dec!(1), dec!(1), Decimal::MAX),
            PortfolioPosition::new("KO", dec!(1), dec!(1), Decimal::MAX),
        ];

        let result = PortfolioPosition::weigh(positions, Decimal::ZERO);
        assert!(matches!(result, Err(AdvisorError::Validation(ref m)) if m.contains("overflows")));
    }

    #[test]
    fn test_weigh_rejects_negative_cash() {
        let result = PortfolioPosition::weigh(Vec::new(), dec!(-1));
        assert!(matches!(result, Err(AdvisorError::Validation(_))));
    }

    #[test]
    fn test_rationale_tags_serialize_kebab_case() {
        let json = serde_json::to_string(&RationaleTag::SectorOverweight).unwrap();
        assert_eq!(json, "\"sector-overweight\"");
        let json = serde_json::to_string(&RationaleTag::RiskMisaligned).unwrap();
        assert_eq!(json, "\"risk-misaligned\"");
    }
}
