//! Risk Questionnaire
//!
//! The questionnaire is a declarative table of weighted factors. Each factor
//! has a fixed set of choices, and each choice maps to a sub-score in
//! `0..=10`. Scoring logic never branches on individual answers; tuning the
//! questionnaire means editing [`FACTOR_TABLE`].

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};

/// A question the investor answers
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    AgeBracket,
    IncomeBracket,
    Experience,
    RiskTolerance,
    TimeHorizon,
}

impl Factor {
    pub const fn key(self) -> &'static str {
        match self {
            Self::AgeBracket => "age_bracket",
            Self::IncomeBracket => "income_bracket",
            Self::Experience => "experience",
            Self::RiskTolerance => "risk_tolerance",
            Self::TimeHorizon => "time_horizon",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One row of the factor table
#[derive(Clone, Debug, Serialize)]
pub struct FactorSpec {
    pub factor: Factor,

    pub prompt: &'static str,

    /// Weight in percent; all weights sum to 100
    pub weight_pct: u8,

    /// (choice key, sub-score), ordered from lowest to highest sub-score
    pub choices: &'static [(&'static str, u8)],
}

impl FactorSpec {
    pub fn weight(&self) -> Decimal {
        Decimal::new(i64::from(self.weight_pct), 2)
    }

    pub fn sub_score(&self, choice: &str) -> Option<u8> {
        let choice = choice.trim();
        self.choices
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(choice))
            .map(|&(_, score)| score)
    }

    pub fn choice_keys(&self) -> Vec<&'static str> {
        self.choices.iter().map(|&(key, _)| key).collect()
    }
}

/// Younger investors, higher incomes, deeper experience, stated appetite and
/// longer horizons all permit a higher sub-score.
pub static FACTOR_TABLE: [FactorSpec; 5] = [
    FactorSpec {
        factor: Factor::AgeBracket,
        prompt: "What is your age?",
        weight_pct: 15,
        choices: &[
            ("65_plus", 1),
            ("55_64", 2),
            ("45_54", 4),
            ("35_44", 6),
            ("25_34", 8),
            ("under_25", 10),
        ],
    },
    FactorSpec {
        factor: Factor::IncomeBracket,
        prompt: "What is your annual income?",
        weight_pct: 15,
        choices: &[("low", 2), ("moderate", 5), ("high", 8), ("very_high", 10)],
    },
    FactorSpec {
        factor: Factor::Experience,
        prompt: "What is your investment and trading experience level?",
        weight_pct: 20,
        choices: &[
            ("beginner", 1),
            ("intermediate", 4),
            ("advanced", 7),
            ("expert", 10),
        ],
    },
    FactorSpec {
        factor: Factor::RiskTolerance,
        prompt: "What is your overall risk tolerance for investments?",
        weight_pct: 30,
        choices: &[
            ("very_low", 0),
            ("low", 3),
            ("moderate", 5),
            ("high", 8),
            ("very_high", 10),
        ],
    },
    FactorSpec {
        factor: Factor::TimeHorizon,
        prompt: "How long can you keep money invested before needing it?",
        weight_pct: 20,
        choices: &[("short", 1), ("medium", 4), ("long", 7), ("very_long", 10)],
    },
];

pub fn factor_spec(factor: Factor) -> &'static FactorSpec {
    // The table has exactly one row per factor, in declaration order.
    &FACTOR_TABLE[factor as usize]
}

/// An investor's answers, keyed by factor
///
/// Serialized as a flat object, e.g. `{"age_bracket": "25_34", ...}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionnaireResponse {
    answers: BTreeMap<Factor, String>,
}

impl QuestionnaireResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, factor: Factor, choice: impl Into<String>) -> Self {
        self.answers.insert(factor, choice.into());
        self
    }

    pub fn get(&self, factor: Factor) -> Option<&str> {
        self.answers.get(&factor).map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        FACTOR_TABLE.iter().all(|spec| self.answers.contains_key(&spec.factor))
    }

    /// Resolve every factor to its sub-score, failing on the first missing
    /// factor or unknown choice.
    pub fn sub_scores(&self) -> Result<Vec<(&'static FactorSpec, u8)>> {
        FACTOR_TABLE
            .iter()
            .map(|spec| {
                let choice = self.get(spec.factor).ok_or_else(|| {
                    AdvisorError::validation(format!("missing answer for {}", spec.factor))
                })?;
                let score = spec.sub_score(choice).ok_or_else(|| {
                    AdvisorError::validation(format!(
                        "'{choice}' is not a valid {} (expected one of: {})",
                        spec.factor,
                        spec.choice_keys().join(", ")
                    ))
                })?;
                Ok((spec, score))
            })
            .collect()
    }
}

/// Symbols whose trading marks an investor as comfortable with volatility
pub const HIGH_RISK_SYMBOLS: [&str; 5] = ["TSLA", "NVDA", "ARKK", "COIN", "PLTR"];

/// One past trade from the investor's brokerage history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol: String,
}

impl TradeRecord {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn is_high_risk(&self) -> bool {
        let symbol = self.symbol.trim();
        HIGH_RISK_SYMBOLS
            .iter()
            .any(|s| s.eq_ignore_ascii_case(symbol))
    }
}

/// Score bump for a trading history: +2 when more than half the trades are
/// in high-risk symbols, +1 when more than 30% are, otherwise 0.
pub fn history_adjustment(history: &[TradeRecord]) -> u8 {
    if history.is_empty() {
        return 0;
    }

    let high_risk = history.iter().filter(|t| t.is_high_risk()).count();
    let ratio = Decimal::from(high_risk) / Decimal::from(history.len());

    if ratio > dec!(0.5) {
        2
    } else if ratio > dec!(0.3) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total: u32 = FACTOR_TABLE.iter().map(|s| u32::from(s.weight_pct)).sum();
        assert_eq!(total, 100);
        let total: Decimal = FACTOR_TABLE.iter().map(FactorSpec::weight).sum();
        assert_eq!(total, Decimal::ONE);
    }

    #[test]
    fn test_choices_are_monotonic_and_in_range() {
        for spec in &FACTOR_TABLE {
            for pair in spec.choices.windows(2) {
                assert!(pair[0].1 < pair[1].1, "{} choices not increasing", spec.factor);
            }
            assert!(spec.choices.iter().all(|&(_, s)| s <= 10));
        }
    }

    #[test]
    fn test_factor_spec_matches_factor() {
        for spec in &FACTOR_TABLE {
            assert_eq!(factor_spec(spec.factor).factor, spec.factor);
        }
    }

    #[test]
    fn test_missing_factor_is_rejected() {
        let response = QuestionnaireResponse::new()
            .answer(Factor::AgeBracket, "25_34")
            .answer(Factor::IncomeBracket, "high");

        assert!(!response.is_complete());
        let err = response.sub_scores().unwrap_err();
        assert!(matches!(err, AdvisorError::Validation(ref m) if m.contains("experience")));
    }

    #[test]
    fn test_unknown_choice_is_rejected() {
        let response = QuestionnaireResponse::new()
            .answer(Factor::AgeBracket, "25_34")
            .answer(Factor::IncomeBracket, "billionaire")
            .answer(Factor::Experience, "expert")
            .answer(Factor::RiskTolerance, "high")
            .answer(Factor::TimeHorizon, "long");

        assert!(response.is_complete());
        let err = response.sub_scores().unwrap_err();
        assert!(matches!(err, AdvisorError::Validation(ref m) if m.contains("billionaire")));
    }

    fn trades(symbols: &[&str]) -> Vec<TradeRecord> {
        symbols.iter().map(|s| TradeRecord::new(*s)).collect()
    }

    #[test]
    fn test_history_adjustment_thresholds() {
        assert_eq!(history_adjustment(&[]), 0);
        // 3 of 5 = 60%
        assert_eq!(history_adjustment(&trades(&["TSLA", "nvda", "COIN", "KO", "JNJ"])), 2);
        // 2 of 5 = 40%
        assert_eq!(history_adjustment(&trades(&["TSLA", "NVDA", "KO", "JNJ", "PG"])), 1);
        // exactly half is not more than half
        assert_eq!(history_adjustment(&trades(&["ARKK", "KO"])), 1);
        // 3 of 10 = 30%, not more than 30%
        let mut history = trades(&["PLTR", "COIN", "TSLA"]);
        history.extend(trades(&["KO"; 7]));
        assert_eq!(history_adjustment(&history), 0);
    }

    #[test]
    fn test_deserialize_flat_object() {
        let json = r#"{
            "age_bracket": "under_25",
            "income_bracket": "Moderate",
            "experience": "beginner",
            "risk_tolerance": "very_high",
            "time_horizon": "very_long"
        }"#;
        let response: QuestionnaireResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.get(Factor::IncomeBracket), Some("Moderate"));

        let scores = response.sub_scores().unwrap();
        assert_eq!(scores[1].1, 5);
    }
}
