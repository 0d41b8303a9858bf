//! Advisory Strategies
//!
//! The four engine stages: score a questionnaire, rank catalog candidates,
//! analyze a portfolio, and turn all of it into recommendations.

mod analyzer;
mod ranker;
mod recommender;
mod scorer;

pub use analyzer::{
    Holding, PortfolioRiskAnalyzer, RiskFlag, RiskReport, diversification_score, holdings,
};
pub use ranker::{CandidateRanker, ScoredCandidate, position_size};
pub use recommender::{RecommendationGenerator, RecommendationSet};
pub use scorer::ProfileScorer;
