//! # risk-advisor
//!
//! Risk profiling and portfolio recommendations for a paper-trading
//! assistant. Educational guidance only; nothing here places orders.
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────────┐   ┌──────────────┐   ┌──────────────────────────┐
//! │ Questionnaire │──▶│ ProfileScorer│──▶│ RiskProfile (1-10)       │
//! └───────────────┘   └──────────────┘   │  band, allocation,       │
//!                                        │  max position, sectors   │
//!                                        └────────────┬─────────────┘
//!                      ┌──────────────────────────────┼──────────────┐
//!                      ▼                              ▼              │
//!            ┌──────────────────┐        ┌────────────────────────┐  │
//!  Catalog ─▶│ CandidateRanker  │        │ PortfolioRiskAnalyzer  │◀─ Positions
//!            └────────┬─────────┘        └───────────┬────────────┘  │
//!                     └──────────────┬───────────────┘               │
//!                                    ▼                               │
//!                     ┌──────────────────────────────┐               │
//!                     │ RecommendationGenerator      │◀──────────────┘
//!                     │  trim → avoid → hold → add   │
//!                     └──────────────────────────────┘
//! ```
//!
//! Every stage is a pure function of its inputs. Catalogs and portfolios are
//! passed in as snapshots; the async [`store`] traits are where they come
//! from.

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod policy;
pub mod questionnaire;
pub mod store;
pub mod strategy;

pub use catalog::{Catalog, InstrumentFilter, seed_catalog};
pub use config::AdvisorConfig;
pub use error::{AdvisorError, Result};
pub use model::{
    Action, AllocationTarget, InstrumentRecord, PortfolioPosition, RationaleTag, Recommendation,
    RiskBand, RiskProfile, Sector,
};
pub use questionnaire::{Factor, QuestionnaireResponse, TradeRecord};
pub use strategy::{
    CandidateRanker, PortfolioRiskAnalyzer, ProfileScorer, RecommendationGenerator,
    RecommendationSet, RiskFlag, RiskReport,
};

/// The four advisory operations behind one validated configuration
#[derive(Clone, Debug, Default)]
pub struct Advisor {
    config: AdvisorConfig,
}

impl Advisor {
    pub fn new(config: AdvisorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Questionnaire → profile
    pub fn score(&self, response: &QuestionnaireResponse) -> Result<RiskProfile> {
        ProfileScorer::new().score(response)
    }

    /// Questionnaire + past trades → profile
    pub fn score_with_history(
        &self,
        response: &QuestionnaireResponse,
        history: &[TradeRecord],
    ) -> Result<RiskProfile> {
        ProfileScorer::new().score_with_history(response, history)
    }

    /// Profile + catalog → sized `add` candidates
    pub fn rank(&self, profile: &RiskProfile, catalog: &Catalog) -> Vec<Recommendation> {
        CandidateRanker::new(&self.config).rank(profile, catalog)
    }

    /// Profile + portfolio + catalog → risk report
    pub fn analyze(
        &self,
        profile: &RiskProfile,
        positions: &[PortfolioPosition],
        catalog: &Catalog,
    ) -> Result<RiskReport> {
        PortfolioRiskAnalyzer::new(&self.config).analyze(profile, positions, catalog)
    }

    /// Profile + portfolio + catalog → ordered recommendations
    pub fn recommend(
        &self,
        profile: &RiskProfile,
        positions: &[PortfolioPosition],
        catalog: &Catalog,
    ) -> Result<RecommendationSet> {
        RecommendationGenerator::new(&self.config).recommend(profile, positions, catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_config_rejected() {
        let config = AdvisorConfig {
            top_n: 0,
            ..Default::default()
        };
        assert!(matches!(Advisor::new(config), Err(AdvisorError::Config(_))));
    }

    #[test]
    fn test_end_to_end() {
        let advisor = Advisor::default();
        let catalog = seed_catalog().unwrap();
        let answers = QuestionnaireResponse::new()
            .answer(Factor::AgeBracket, "25_34")
            .answer(Factor::IncomeBracket, "high")
            .answer(Factor::Experience, "advanced")
            .answer(Factor::RiskTolerance, "high")
            .answer(Factor::TimeHorizon, "long");

        let profile = advisor.score(&answers).unwrap();
        assert_eq!(profile.score, 8);

        let history = [TradeRecord::new("TSLA"), TradeRecord::new("KO")];
        assert_eq!(advisor.score_with_history(&answers, &history).unwrap().score, 10);

        let candidates = advisor.rank(&profile, &catalog);
        assert_eq!(candidates.len(), 5);

        let positions = PortfolioPosition::weigh(
            vec![
                PortfolioPosition::new("NVDA", dec!(10), dec!(400), dec!(8000)),
                PortfolioPosition::new("SPY", dec!(2), dec!(450), dec!(1000)),
            ],
            dec!(1000),
        )
        .unwrap();

        let report = advisor.analyze(&profile, &positions, &catalog).unwrap();
        assert_eq!(report, advisor.analyze(&profile, &positions, &catalog).unwrap());
        assert!(report.is_sector_overweight(Sector::Technology));

        let set = advisor.recommend(&profile, &positions, &catalog).unwrap();
        assert_eq!(set.recommendations[0].symbol, "NVDA");
        assert_eq!(set.recommendations[0].action, Action::Trim);
    }
}
