//! Recommendation Generator
//!
//! Combines ranker candidates with a portfolio risk report into one ordered
//! list of trim / avoid / hold / add suggestions. Risk reduction comes first.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::catalog::Catalog;
use crate::config::AdvisorConfig;
use crate::error::Result;
use crate::model::{Action, PortfolioPosition, RationaleTag, Recommendation, RiskProfile, Sector};
use crate::strategy::analyzer::{Holding, PortfolioRiskAnalyzer, RiskReport, holdings};
use crate::strategy::ranker::{CandidateRanker, position_size};

/// Recommendations plus the report they were derived from
#[derive(Clone, Debug)]
pub struct RecommendationSet {
    pub report: RiskReport,
    pub recommendations: Vec<Recommendation>,
}

pub struct RecommendationGenerator<'c> {
    config: &'c AdvisorConfig,
}

impl<'c> RecommendationGenerator<'c> {
    pub fn new(config: &'c AdvisorConfig) -> Self {
        Self { config }
    }

    pub fn recommend(
        &self,
        profile: &RiskProfile,
        positions: &[PortfolioPosition],
        catalog: &Catalog,
    ) -> Result<RecommendationSet> {
        let report = PortfolioRiskAnalyzer::new(self.config).analyze(profile, positions, catalog)?;
        let holdings = holdings(positions, catalog);

        let mut corrective = Vec::new();
        let mut holds = Vec::new();
        for holding in &holdings {
            match self.review_holding(profile, &report, holding) {
                Some(rec) if rec.action == Action::Hold => holds.push(rec),
                Some(rec) => corrective.push(rec),
                None => {}
            }
        }

        let mut adds = self.additions(profile, &report, &holdings, catalog);

        if report.rebalance_needed && corrective.is_empty() {
            self.rebalance(profile, &report, &holdings, catalog, &mut adds, &mut holds);
        }

        corrective.sort_by(trim_order);
        holds.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        let mut recommendations = corrective;
        recommendations.extend(holds);
        recommendations.extend(adds);

        Ok(RecommendationSet {
            report,
            recommendations,
        })
    }

    /// Avoid, trim or hold an existing holding.
    fn review_holding(
        &self,
        profile: &RiskProfile,
        report: &RiskReport,
        holding: &Holding<'_>,
    ) -> Option<Recommendation> {
        if holding.weight <= Decimal::ZERO {
            return None;
        }

        let current_pct = to_pct(holding.weight);
        let sector = holding.instrument.map(|i| i.sector);

        if sector.is_some_and(|s| profile.avoids(s)) {
            let mut rec = Recommendation::new(&holding.symbol, Action::Avoid, Decimal::ZERO)
                .tagged(RationaleTag::SectorAvoided);
            rec.current_weight_pct = Some(current_pct);
            return Some(rec);
        }

        let max_weight = profile.max_position_weight();
        let sector_overweight = sector.is_some_and(|s| report.is_sector_overweight(s));
        let position_overweight = holding.weight > max_weight;

        let mut target = holding.weight.min(max_weight);
        if let Some(sector) = sector.filter(|_| sector_overweight) {
            target = target.min(self.sector_share(report, sector, holding.weight));
        }

        let mut rec = if target < holding.weight {
            let mut rec = Recommendation::new(&holding.symbol, Action::Trim, to_pct(target));
            if position_overweight {
                rec.tag(RationaleTag::PositionOverweight);
            }
            if sector_overweight {
                rec.tag(RationaleTag::SectorOverweight);
            }
            rec
        } else {
            Recommendation::new(&holding.symbol, Action::Hold, current_pct)
        };

        match holding.instrument {
            Some(instrument) if !profile.accepts_rating(instrument.risk_rating) => {
                rec.tag(RationaleTag::RiskMisaligned);
            }
            Some(instrument) if profile.rating_distance(instrument.risk_rating) <= 1 => {
                rec.tag(RationaleTag::RiskAligned);
            }
            None => rec.tag(RationaleTag::UnknownInstrument),
            _ => {}
        }

        rec.current_weight_pct = Some(current_pct);
        Some(rec)
    }

    /// This holding's share of the sector once the sector is scaled back to
    /// the concentration threshold.
    fn sector_share(&self, report: &RiskReport, sector: Sector, weight: Decimal) -> Decimal {
        let sector_weight = report.sector_weight(sector);
        if sector_weight <= Decimal::ZERO {
            return weight;
        }
        weight * self.config.concentration_threshold / sector_weight
    }

    /// Ranker candidates not already held, in sectors with room to grow.
    fn additions(
        &self,
        profile: &RiskProfile,
        report: &RiskReport,
        holdings: &[Holding<'_>],
        catalog: &Catalog,
    ) -> Vec<Recommendation> {
        CandidateRanker::new(self.config)
            .rank(profile, catalog)
            .into_iter()
            .filter(|rec| !holdings.iter().any(|h| h.symbol == rec.symbol))
            .filter_map(|mut rec| {
                let sector = catalog.find(&rec.symbol)?.sector;
                let weight = report.sector_weight(sector);
                if weight >= self.config.concentration_threshold {
                    return None;
                }
                if weight == Decimal::ZERO {
                    rec.tag(RationaleTag::NewSector);
                }
                Some(rec)
            })
            .collect()
    }

    /// Point a drifting portfolio back toward its target. Walks the
    /// underweight preferred sectors in policy order and takes the first
    /// unheld instrument found; falls back to marking the most misaligned
    /// holding.
    fn rebalance(
        &self,
        profile: &RiskProfile,
        report: &RiskReport,
        holdings: &[Holding<'_>],
        catalog: &Catalog,
        adds: &mut Vec<Recommendation>,
        holds: &mut [Recommendation],
    ) {
        let pick = profile
            .preferred_sectors
            .iter()
            .copied()
            .filter(|s| report.sector_weight(*s) < self.config.concentration_threshold)
            .find_map(|sector| {
                catalog
                    .iter()
                    .filter(|i| i.sector == sector)
                    .filter(|i| !holdings.iter().any(|h| h.symbol == i.symbol))
                    .min_by(|a, b| {
                        profile
                            .rating_distance(a.risk_rating)
                            .cmp(&profile.rating_distance(b.risk_rating))
                            .then_with(|| b.strength.cmp(&a.strength))
                            .then_with(|| a.symbol.cmp(&b.symbol))
                    })
            });

        if let Some(instrument) = pick {
            if let Some(existing) = adds.iter_mut().find(|r| r.symbol == instrument.symbol) {
                existing.tag(RationaleTag::Rebalance);
                return;
            }
            let allocation = position_size(profile, 1);
            let mut rec = Recommendation::new(&instrument.symbol, Action::Add, allocation)
                .tagged(RationaleTag::Rebalance);
            if profile.prefers(instrument.sector) {
                rec.tag(RationaleTag::PreferredSector);
            }
            if report.sector_weight(instrument.sector) == Decimal::ZERO {
                rec.tag(RationaleTag::NewSector);
            }
            adds.push(rec);
            return;
        }

        let misaligned = holdings
            .iter()
            .filter_map(|h| h.instrument.map(|i| (h, profile.rating_distance(i.risk_rating))))
            .max_by(|(a, da), (b, db)| da.cmp(db).then_with(|| b.symbol.cmp(&a.symbol)));

        if let Some((holding, _)) = misaligned {
            if let Some(rec) = holds.iter_mut().find(|r| r.symbol == holding.symbol) {
                rec.tag(RationaleTag::Rebalance);
            }
        }
    }
}

fn to_pct(weight: Decimal) -> Decimal {
    (weight * dec!(100)).round_dp(2)
}

/// Trims before avoids; within trims the largest cut first; then by symbol.
fn trim_order(a: &Recommendation, b: &Recommendation) -> Ordering {
    let cut = |r: &Recommendation| {
        r.current_weight_pct.unwrap_or_default() - r.suggested_allocation_pct
    };
    a.action
        .cmp(&b.action)
        .then_with(|| cut(b).cmp(&cut(a)))
        .then_with(|| a.symbol.cmp(&b.symbol))
}
