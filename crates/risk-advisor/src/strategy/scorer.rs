//! Profile Scorer
//!
//! Turns a completed questionnaire into a [`RiskProfile`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{AdvisorError, Result};
use crate::model::RiskProfile;
use crate::questionnaire::{QuestionnaireResponse, TradeRecord, history_adjustment};

/// Stateless questionnaire scorer
#[derive(Clone, Copy, Debug, Default)]
pub struct ProfileScorer;

impl ProfileScorer {
    pub fn new() -> Self {
        Self
    }

    /// Weighted sum of the factor sub-scores, before rounding.
    pub fn weighted_score(&self, response: &QuestionnaireResponse) -> Result<Decimal> {
        let sub_scores = response.sub_scores()?;
        Ok(sub_scores
            .iter()
            .map(|(spec, score)| spec.weight() * Decimal::from(*score))
            .sum())
    }

    /// Round to the nearest integer (halves away from zero), clamp to 1-10.
    pub fn risk_score(&self, response: &QuestionnaireResponse) -> Result<u8> {
        self.risk_score_with_history(response, &[])
    }

    /// As [`Self::risk_score`], with the trading-history bump added to the
    /// weighted sum before rounding and clamping.
    pub fn risk_score_with_history(
        &self,
        response: &QuestionnaireResponse,
        history: &[TradeRecord],
    ) -> Result<u8> {
        let weighted = self.weighted_score(response)? + Decimal::from(history_adjustment(history));
        let rounded = weighted
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(|| {
                AdvisorError::validation(format!("weighted score {weighted} out of range"))
            })?;

        let clamped = rounded.clamp(1, 10);
        u8::try_from(clamped).map_err(|_| AdvisorError::validation("risk score out of range"))
    }

    pub fn score(&self, response: &QuestionnaireResponse) -> Result<RiskProfile> {
        self.score_with_history(response, &[])
    }

    pub fn score_with_history(
        &self,
        response: &QuestionnaireResponse,
        history: &[TradeRecord],
    ) -> Result<RiskProfile> {
        let score = self.risk_score_with_history(response, history)?;
        RiskProfile::for_score(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RiskBand;
    use crate::questionnaire::Factor;
    use rust_decimal_macros::dec;

    fn response(
        age: &str,
        income: &str,
        experience: &str,
        tolerance: &str,
        horizon: &str,
    ) -> QuestionnaireResponse {
        QuestionnaireResponse::new()
            .answer(Factor::AgeBracket, age)
            .answer(Factor::IncomeBracket, income)
            .answer(Factor::Experience, experience)
            .answer(Factor::RiskTolerance, tolerance)
            .answer(Factor::TimeHorizon, horizon)
    }

    #[test]
    fn test_seven_point_six_rounds_to_aggressive_eight() {
        let scorer = ProfileScorer::new();
        let answers = response("25_34", "high", "advanced", "high", "long");

        assert_eq!(scorer.weighted_score(&answers).unwrap(), dec!(7.6));

        let profile = scorer.score(&answers).unwrap();
        assert_eq!(profile.score, 8);
        assert_eq!(profile.band, RiskBand::Aggressive);
        assert_eq!(profile.allocation.stock_pct, 90);
        assert_eq!(profile.allocation.bond_pct, 5);
        assert_eq!(profile.allocation.cash_pct, 5);
        assert_eq!(profile.max_position_pct, dec!(25));
    }

    #[test]
    fn test_lowest_answers_clamp_to_one() {
        let scorer = ProfileScorer::new();
        let answers = response("65_plus", "low", "beginner", "very_low", "short");

        assert_eq!(scorer.weighted_score(&answers).unwrap(), dec!(0.85));
        let profile = scorer.score(&answers).unwrap();
        assert_eq!(profile.score, 1);
        assert_eq!(profile.band, RiskBand::Conservative);
    }

    #[test]
    fn test_highest_answers_score_ten() {
        let scorer = ProfileScorer::new();
        let answers = response("under_25", "very_high", "expert", "very_high", "very_long");

        let profile = scorer.score(&answers).unwrap();
        assert_eq!(profile.score, 10);
        assert_eq!(profile.allocation.stock_pct, 100);
    }

    #[test]
    fn test_midpoint_rounds_up() {
        let scorer = ProfileScorer::new();
        let answers = response("35_44", "moderate", "intermediate", "moderate", "medium");

        assert_eq!(scorer.weighted_score(&answers).unwrap(), dec!(4.75));
        assert_eq!(scorer.risk_score(&answers).unwrap(), 5);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let scorer = ProfileScorer::new();
        let answers = response("45_54", "high", "intermediate", "moderate", "long");

        let first = scorer.score(&answers).unwrap();
        let second = scorer.score(&answers.clone()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_aggressive_trading_history_raises_score() {
        let scorer = ProfileScorer::new();
        // 4.75 on its own
        let answers = response("35_44", "moderate", "intermediate", "moderate", "medium");
        let history: Vec<_> = ["TSLA", "NVDA", "COIN", "KO"]
            .into_iter()
            .map(TradeRecord::new)
            .collect();

        // 75% high-risk trades: +2 before rounding
        assert_eq!(scorer.risk_score_with_history(&answers, &history).unwrap(), 7);
        let profile = scorer.score_with_history(&answers, &history).unwrap();
        assert_eq!(profile.band, RiskBand::Aggressive);

        // No history leaves the score alone
        assert_eq!(scorer.risk_score_with_history(&answers, &[]).unwrap(), 5);
    }

    #[test]
    fn test_history_bump_is_clamped() {
        let scorer = ProfileScorer::new();
        let answers = response("under_25", "very_high", "expert", "very_high", "very_long");
        let history = vec![TradeRecord::new("ARKK"), TradeRecord::new("PLTR")];

        assert_eq!(scorer.risk_score_with_history(&answers, &history).unwrap(), 10);
    }

    #[test]
    fn test_incomplete_questionnaire_fails() {
        let scorer = ProfileScorer::new();
        let answers = QuestionnaireResponse::new().answer(Factor::AgeBracket, "25_34");
        assert!(matches!(scorer.score(&answers), Err(AdvisorError::Validation(_))));
    }
}
