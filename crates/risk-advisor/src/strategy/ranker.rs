//! Candidate Ranker
//!
//! Filters the catalog against a risk profile and produces a ranked, sized
//! list of `add` candidates.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::catalog::Catalog;
use crate::config::AdvisorConfig;
use crate::model::{Action, InstrumentRecord, RationaleTag, Recommendation, RiskProfile};

/// An instrument that passed the risk-band filter, with its ranking score
#[derive(Clone, Debug)]
pub struct ScoredCandidate<'a> {
    pub instrument: &'a InstrumentRecord,
    pub composite_score: Decimal,
    pub rating_distance: u8,
    pub preferred: bool,
}

impl ScoredCandidate<'_> {
    /// Composite desc, then symbol asc.
    pub fn rank_order(&self, other: &Self) -> Ordering {
        other
            .composite_score
            .cmp(&self.composite_score)
            .then_with(|| self.instrument.symbol.cmp(&other.instrument.symbol))
    }
}

/// Ranks catalog instruments for a profile
pub struct CandidateRanker<'c> {
    config: &'c AdvisorConfig,
}

impl<'c> CandidateRanker<'c> {
    pub fn new(config: &'c AdvisorConfig) -> Self {
        Self { config }
    }

    /// composite = strength + sector bonus - penalty * rating distance
    pub fn composite_score(&self, profile: &RiskProfile, instrument: &InstrumentRecord) -> Decimal {
        let bonus = if profile.prefers(instrument.sector) {
            self.config.sector_bonus
        } else {
            Decimal::ZERO
        };
        let distance = Decimal::from(profile.rating_distance(instrument.risk_rating));
        instrument.strength + bonus - self.config.risk_distance_penalty * distance
    }

    /// Every instrument inside the profile's rating band and outside its
    /// avoided sectors, best first. Not truncated.
    pub fn candidates<'a>(
        &self,
        profile: &RiskProfile,
        catalog: &'a Catalog,
    ) -> Vec<ScoredCandidate<'a>> {
        let mut candidates: Vec<ScoredCandidate<'a>> = catalog
            .iter()
            .filter(|instrument| profile.accepts_rating(instrument.risk_rating))
            .filter(|instrument| !profile.avoids(instrument.sector))
            .map(|instrument| ScoredCandidate {
                instrument,
                composite_score: self.composite_score(profile, instrument),
                rating_distance: profile.rating_distance(instrument.risk_rating),
                preferred: profile.prefers(instrument.sector),
            })
            .collect();

        candidates.sort_by(ScoredCandidate::rank_order);
        candidates
    }

    /// Top-N `add` recommendations, each sized to the lesser of the
    /// single-position limit and an even split of the new-money budget.
    pub fn rank(&self, profile: &RiskProfile, catalog: &Catalog) -> Vec<Recommendation> {
        let mut top = self.candidates(profile, catalog);
        top.truncate(self.config.top_n);

        if top.is_empty() {
            return Vec::new();
        }

        let allocation = position_size(profile, top.len());
        top.iter()
            .map(|candidate| to_recommendation(candidate, allocation))
            .collect()
    }
}

/// Lesser of the single-position limit and an even split of the budget.
pub fn position_size(profile: &RiskProfile, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    let split = profile.new_money_pct / Decimal::from(count);
    split.min(profile.max_position_pct).round_dp(2)
}

fn to_recommendation(candidate: &ScoredCandidate<'_>, allocation: Decimal) -> Recommendation {
    let mut rec = Recommendation::new(&candidate.instrument.symbol, Action::Add, allocation);
    rec.composite_score = Some(candidate.composite_score);
    if candidate.rating_distance <= 1 {
        rec.tag(RationaleTag::RiskAligned);
    }
    if candidate.preferred {
        rec.tag(RationaleTag::PreferredSector);
    }
    rec
}
