//! Engine Tunables

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};

/// Tunables for ranking and portfolio analysis
///
/// The allocation policy itself lives in [`crate::policy`]; these knobs only
/// shape how candidates are ranked and when portfolios get flagged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// How many `add` candidates the ranker returns
    pub top_n: usize,

    /// Composite-score bonus for instruments in a preferred sector
    pub sector_bonus: Decimal,

    /// Composite-score penalty per rating point away from the profile score
    pub risk_distance_penalty: Decimal,

    /// Sector weight above which a sector is overweight (fraction)
    pub concentration_threshold: Decimal,

    /// |weighted risk - profile score| above which a rebalance is flagged
    pub deviation_threshold: Decimal,

    /// Slack allowed when position weights sum past 1
    pub weight_epsilon: Decimal,

    /// Diversification score (0-100) below which the portfolio is flagged
    pub low_diversification_threshold: Decimal,

    /// Weighted portfolio risk above which defensive positions are suggested
    pub defensive_risk_level: Decimal,

    /// Weighted portfolio risk below which growth positions are suggested
    pub growth_risk_level: Decimal,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            sector_bonus: dec!(15),
            risk_distance_penalty: dec!(5),
            concentration_threshold: dec!(0.40),
            deviation_threshold: dec!(1.5),
            weight_epsilon: dec!(0.0001),
            low_diversification_threshold: dec!(30),
            defensive_risk_level: dec!(8),
            growth_risk_level: dec!(3),
        }
    }
}

impl AdvisorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(AdvisorError::Config("top_n must be at least 1".into()));
        }
        if self.sector_bonus < Decimal::ZERO || self.risk_distance_penalty < Decimal::ZERO {
            return Err(AdvisorError::Config(
                "sector_bonus and risk_distance_penalty cannot be negative".into(),
            ));
        }
        if self.concentration_threshold <= Decimal::ZERO
            || self.concentration_threshold > Decimal::ONE
        {
            return Err(AdvisorError::Config(
                "concentration_threshold must be in (0, 1]".into(),
            ));
        }
        if self.deviation_threshold < Decimal::ZERO {
            return Err(AdvisorError::Config("deviation_threshold cannot be negative".into()));
        }
        if self.weight_epsilon < Decimal::ZERO || self.weight_epsilon >= dec!(0.1) {
            return Err(AdvisorError::Config("weight_epsilon must be in [0, 0.1)".into()));
        }
        if self.low_diversification_threshold < Decimal::ZERO
            || self.low_diversification_threshold > dec!(100)
        {
            return Err(AdvisorError::Config(
                "low_diversification_threshold must be in [0, 100]".into(),
            ));
        }
        if self.growth_risk_level >= self.defensive_risk_level {
            return Err(AdvisorError::Config(
                "growth_risk_level must be below defensive_risk_level".into(),
            ));
        }
        Ok(())
    }
}
