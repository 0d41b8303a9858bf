//! Portfolio Risk Analyzer
//!
//! Measures a live portfolio against its owner's risk profile: weighted risk
//! score, diversification, sector concentration and deviation from target.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::config::AdvisorConfig;
use crate::error::{AdvisorError, Result};
use crate::model::{InstrumentRecord, PortfolioPosition, RiskProfile, Sector};
use crate::policy;

/// Something in the portfolio worth the investor's attention
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskFlag {
    SectorOverweight { sector: Sector, weight: Decimal },
    PositionOverweight { symbol: String, weight: Decimal },
    UnknownInstrument { symbol: String },
    SectorAvoided { symbol: String, sector: Sector },
    LowDiversification { score: Decimal },
    VeryHighRisk { score: Decimal },
    VeryConservative { score: Decimal },
    RebalanceNeeded { deviation: Decimal },
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SectorOverweight { sector, weight } => {
                write!(f, "{sector} overweight ({:.1}%)", weight * dec!(100))
            }
            Self::PositionOverweight { symbol, weight } => write!(
                f,
                "{symbol} exceeds the single-position limit ({:.1}%)",
                weight * dec!(100)
            ),
            Self::UnknownInstrument { symbol } => {
                write!(f, "{symbol} is not in the catalog; treated as neutral risk")
            }
            Self::SectorAvoided { symbol, sector } => {
                write!(f, "{symbol} is in {sector}, a sector this profile avoids")
            }
            Self::LowDiversification { score } => {
                write!(f, "Low diversification ({score:.0}/100); consider more positions")
            }
            Self::VeryHighRisk { score } => {
                write!(
                    f,
                    "Portfolio risk is very high ({score:.2}); consider adding defensive positions"
                )
            }
            Self::VeryConservative { score } => {
                write!(
                    f,
                    "Portfolio is very conservative ({score:.2}); consider adding growth positions"
                )
            }
            Self::RebalanceNeeded { deviation } => {
                write!(
                    f,
                    "Portfolio risk deviates from target by {deviation:+.2}; rebalance suggested"
                )
            }
        }
    }
}

/// Result of analyzing a portfolio against a profile
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskReport {
    pub profile_score: u8,

    /// Weight-averaged risk rating of the known holdings
    pub weighted_risk_score: Decimal,

    /// Policy label for the rounded weighted score
    pub risk_level: String,

    /// 0 = one position holds everything, 100 = perfectly spread
    pub diversification_score: Decimal,

    /// Per-sector weight of the known holdings
    pub sector_concentration: BTreeMap<Sector, Decimal>,

    /// Weight held in symbols the catalog does not know
    pub unclassified_weight: Decimal,

    pub invested_weight: Decimal,

    pub cash_weight: Decimal,

    /// weighted_risk_score - profile_score
    pub deviation: Decimal,

    pub rebalance_needed: bool,

    pub flags: Vec<RiskFlag>,
}

impl RiskReport {
    pub fn sector_weight(&self, sector: Sector) -> Decimal {
        self.sector_concentration
            .get(&sector)
            .copied()
            .unwrap_or_default()
    }

    pub fn overweight_sectors(&self) -> Vec<Sector> {
        self.flags
            .iter()
            .filter_map(|flag| match flag {
                RiskFlag::SectorOverweight { sector, .. } => Some(*sector),
                _ => None,
            })
            .collect()
    }

    pub fn is_sector_overweight(&self, sector: Sector) -> bool {
        self.overweight_sectors().contains(&sector)
    }

    /// Human-readable flag descriptions, in report order.
    pub fn messages(&self) -> Vec<String> {
        self.flags.iter().map(ToString::to_string).collect()
    }
}

/// A position merged by symbol, resolved against the catalog
#[derive(Clone, Debug)]
pub struct Holding<'a> {
    pub symbol: String,
    pub weight: Decimal,
    pub instrument: Option<&'a InstrumentRecord>,
}

/// Merge positions by symbol (first-seen order) and resolve each against
/// the catalog.
pub fn holdings<'a>(positions: &[PortfolioPosition], catalog: &'a Catalog) -> Vec<Holding<'a>> {
    let mut merged: Vec<Holding<'a>> = Vec::with_capacity(positions.len());

    for position in positions {
        let symbol = position.symbol.trim().to_uppercase();
        match merged.iter_mut().find(|h| h.symbol == symbol) {
            Some(existing) => existing.weight += position.weight,
            None => merged.push(Holding {
                instrument: catalog.find(&symbol),
                symbol,
                weight: position.weight,
            }),
        }
    }

    merged
}

/// Scores portfolios against risk profiles
pub struct PortfolioRiskAnalyzer<'c> {
    config: &'c AdvisorConfig,
}

impl<'c> PortfolioRiskAnalyzer<'c> {
    pub fn new(config: &'c AdvisorConfig) -> Self {
        Self { config }
    }

    pub fn analyze(
        &self,
        profile: &RiskProfile,
        positions: &[PortfolioPosition],
        catalog: &Catalog,
    ) -> Result<RiskReport> {
        self.validate_weights(positions)?;

        let holdings = holdings(positions, catalog);
        let profile_score = Decimal::from(profile.score);
        let max_weight = profile.max_position_weight();

        let mut flags = Vec::new();
        let mut known_weight = Decimal::ZERO;
        let mut rating_sum = Decimal::ZERO;
        let mut unclassified_weight = Decimal::ZERO;
        let mut sector_concentration: BTreeMap<Sector, Decimal> = BTreeMap::new();

        for holding in &holdings {
            match holding.instrument {
                Some(instrument) => {
                    known_weight += holding.weight;
                    rating_sum += holding.weight * Decimal::from(instrument.risk_rating);
                    *sector_concentration.entry(instrument.sector).or_default() += holding.weight;

                    if profile.avoids(instrument.sector) {
                        flags.push(RiskFlag::SectorAvoided {
                            symbol: holding.symbol.clone(),
                            sector: instrument.sector,
                        });
                    }
                }
                None => {
                    unclassified_weight += holding.weight;
                    flags.push(RiskFlag::UnknownInstrument {
                        symbol: holding.symbol.clone(),
                    });
                }
            }

            if holding.weight > max_weight {
                flags.push(RiskFlag::PositionOverweight {
                    symbol: holding.symbol.clone(),
                    weight: holding.weight,
                });
            }
        }

        for (sector, weight) in &sector_concentration {
            if *weight > self.config.concentration_threshold {
                flags.push(RiskFlag::SectorOverweight {
                    sector: *sector,
                    weight: *weight,
                });
            }
        }

        // Unknown holdings sit at the profile score, i.e. neutral.
        let weighted_risk_score = if known_weight > Decimal::ZERO {
            (rating_sum / known_weight).round_dp(4)
        } else {
            profile_score
        };

        let diversification_score = diversification_score(holdings.iter().map(|h| h.weight));
        let threshold = self.config.low_diversification_threshold;
        if !holdings.is_empty() && diversification_score < threshold {
            flags.push(RiskFlag::LowDiversification {
                score: diversification_score,
            });
        }

        // Absolute level, independent of the owner's target
        if known_weight > Decimal::ZERO {
            if weighted_risk_score > self.config.defensive_risk_level {
                flags.push(RiskFlag::VeryHighRisk {
                    score: weighted_risk_score,
                });
            } else if weighted_risk_score < self.config.growth_risk_level {
                flags.push(RiskFlag::VeryConservative {
                    score: weighted_risk_score,
                });
            }
        }

        let deviation = (weighted_risk_score - profile_score).round_dp(4);
        let rebalance_needed = deviation.abs() > self.config.deviation_threshold;
        if rebalance_needed {
            flags.push(RiskFlag::RebalanceNeeded { deviation });
        }

        let invested_weight: Decimal = holdings.iter().map(|h| h.weight).sum();

        Ok(RiskReport {
            profile_score: profile.score,
            weighted_risk_score,
            risk_level: policy::label_for(round_to_level(weighted_risk_score)).to_string(),
            diversification_score,
            sector_concentration,
            unclassified_weight,
            invested_weight,
            cash_weight: (Decimal::ONE - invested_weight).max(Decimal::ZERO),
            deviation,
            rebalance_needed,
            flags,
        })
    }

    fn validate_weights(&self, positions: &[PortfolioPosition]) -> Result<()> {
        if let Some(bad) = positions.iter().find(|p| p.weight < Decimal::ZERO) {
            return Err(AdvisorError::validation(format!(
                "position {} has a negative weight",
                bad.symbol
            )));
        }

        let total = positions
            .iter()
            .map(|p| p.weight)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
            .ok_or_else(|| AdvisorError::validation("portfolio value overflows"))?;
        if total > Decimal::ONE + self.config.weight_epsilon {
            return Err(AdvisorError::validation(format!(
                "position weights sum to {total}, more than 100% of the portfolio"
            )));
        }
        Ok(())
    }
}

/// (1 - Herfindahl index) scaled to 0-100. An empty portfolio scores 0.
///
/// Uses raw weights (cash is not renormalized away), so raising any single
/// weight never raises the score.
pub fn diversification_score(weights: impl IntoIterator<Item = Decimal>) -> Decimal {
    let mut any = false;
    let herfindahl: Decimal = weights
        .into_iter()
        .inspect(|_| any = true)
        .map(|w| w * w)
        .sum();

    if !any {
        return Decimal::ZERO;
    }

    ((Decimal::ONE - herfindahl) * dec!(100))
        .clamp(Decimal::ZERO, dec!(100))
        .round_dp(2)
}

fn round_to_level(score: Decimal) -> u8 {
    score
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u8()
        .unwrap_or(1)
}
