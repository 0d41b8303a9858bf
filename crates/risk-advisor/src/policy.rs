//! Allocation Policy Table
//!
//! One row per risk score. Lookup is by exact score; moving from one score
//! to the next is a discrete policy jump, never a blend of two rows.

use serde::Serialize;

use crate::error::{AdvisorError, Result};
use crate::model::{AllocationTarget, Sector};

/// Bumped whenever a row changes so archived profiles can be traced back.
pub const POLICY_VERSION: &str = "2024.1";

#[derive(Clone, Debug, Serialize)]
pub struct PolicyRow {
    pub score: u8,
    pub label: &'static str,
    pub description: &'static str,
    pub bond_pct: u8,
    pub stock_pct: u8,
    pub cash_pct: u8,
    pub max_position_pct: u8,
    /// Budget split evenly across new `add` candidates: the stock sleeve.
    pub new_money_pct: u8,
    pub preferred_sectors: &'static [Sector],
    pub avoid_sectors: &'static [Sector],
}

impl PolicyRow {
    pub const fn allocation(&self) -> AllocationTarget {
        AllocationTarget {
            bond_pct: self.bond_pct,
            stock_pct: self.stock_pct,
            cash_pct: self.cash_pct,
        }
    }
}

use Sector::{
    ConsumerDiscretionary, ConsumerStaples, Energy, Financials, Healthcare, Industrials, Materials,
    Technology, Utilities,
};

const GROWTH_SECTORS: &[Sector] = &[Technology, Energy, Materials, ConsumerDiscretionary];

pub static POLICY_TABLE: [PolicyRow; 10] = [
    PolicyRow {
        score: 1,
        label: "Very Low Risk",
        description: "Ultra-conservative investor seeking capital preservation",
        bond_pct: 70,
        stock_pct: 10,
        cash_pct: 20,
        max_position_pct: 5,
        new_money_pct: 10,
        preferred_sectors: &[Utilities, ConsumerStaples],
        avoid_sectors: &[Technology, Energy, ConsumerDiscretionary],
    },
    PolicyRow {
        score: 2,
        label: "Low Risk",
        description: "Conservative investor with minimal risk tolerance",
        bond_pct: 60,
        stock_pct: 30,
        cash_pct: 10,
        max_position_pct: 8,
        new_money_pct: 30,
        preferred_sectors: &[Utilities, ConsumerStaples, Healthcare],
        avoid_sectors: &[Technology, Energy],
    },
    PolicyRow {
        score: 3,
        label: "Low-Moderate Risk",
        description: "Cautious investor with slight growth orientation",
        bond_pct: 50,
        stock_pct: 40,
        cash_pct: 10,
        max_position_pct: 10,
        new_money_pct: 40,
        preferred_sectors: &[Healthcare, ConsumerStaples, Utilities, Financials],
        avoid_sectors: &[Energy, Materials],
    },
    PolicyRow {
        score: 4,
        label: "Moderate Risk",
        description: "Balanced investor seeking steady growth",
        bond_pct: 40,
        stock_pct: 50,
        cash_pct: 10,
        max_position_pct: 12,
        new_money_pct: 50,
        preferred_sectors: &[Healthcare, Financials, ConsumerStaples, Industrials],
        avoid_sectors: &[Energy],
    },
    PolicyRow {
        score: 5,
        label: "Moderate-High Risk",
        description: "Growth-oriented investor with moderate risk tolerance",
        bond_pct: 30,
        stock_pct: 60,
        cash_pct: 10,
        max_position_pct: 15,
        new_money_pct: 60,
        preferred_sectors: &[Technology, Healthcare, Financials, Industrials],
        avoid_sectors: &[],
    },
    PolicyRow {
        score: 6,
        label: "High Risk",
        description: "Growth investor comfortable with market volatility",
        bond_pct: 20,
        stock_pct: 70,
        cash_pct: 10,
        max_position_pct: 18,
        new_money_pct: 70,
        preferred_sectors: &[Technology, Healthcare, ConsumerDiscretionary, Financials],
        avoid_sectors: &[],
    },
    PolicyRow {
        score: 7,
        label: "High-Aggressive Risk",
        description: "Aggressive growth investor",
        bond_pct: 15,
        stock_pct: 80,
        cash_pct: 5,
        max_position_pct: 20,
        new_money_pct: 80,
        preferred_sectors: &[Technology, ConsumerDiscretionary, Healthcare, Industrials],
        avoid_sectors: &[],
    },
    PolicyRow {
        score: 8,
        label: "Aggressive Risk",
        description: "High-risk investor seeking maximum growth",
        bond_pct: 5,
        stock_pct: 90,
        cash_pct: 5,
        max_position_pct: 25,
        new_money_pct: 90,
        preferred_sectors: &[Technology, ConsumerDiscretionary, Energy, Materials],
        avoid_sectors: &[],
    },
    PolicyRow {
        score: 9,
        label: "Very Aggressive Risk",
        description: "Very high-risk investor with growth focus",
        bond_pct: 0,
        stock_pct: 95,
        cash_pct: 5,
        max_position_pct: 30,
        new_money_pct: 95,
        preferred_sectors: GROWTH_SECTORS,
        avoid_sectors: &[],
    },
    PolicyRow {
        score: 10,
        label: "Extreme Risk",
        description: "Maximum risk tolerance, speculative investor",
        bond_pct: 0,
        stock_pct: 100,
        cash_pct: 0,
        max_position_pct: 35,
        new_money_pct: 100,
        preferred_sectors: GROWTH_SECTORS,
        avoid_sectors: &[],
    },
];

/// Row for an exact score.
pub fn lookup(score: u8) -> Result<&'static PolicyRow> {
    POLICY_TABLE
        .iter()
        .find(|row| row.score == score)
        .ok_or_else(|| AdvisorError::validation(format!("no policy row for risk score {score}")))
}

/// Label for a rounded portfolio risk level. Out-of-range levels clamp.
pub fn label_for(score: u8) -> &'static str {
    lookup(score.clamp(1, 10)).map_or("Moderate Risk", |row| row.label)
}
