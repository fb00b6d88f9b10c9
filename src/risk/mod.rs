//! Risk classification of calls.
//!
//! Rules, in precedence order:
//!
//! 1. allow-listed (`greenList`) calls score `0.0`
//! 2. deny-listed (`redList`) calls score `1.0`
//! 3. otherwise the stored `riskScore`, rounded half-to-even to one decimal
//!
//! A call on both lists is therefore allow-listed. Stored scores outside
//! `[0, 1]` are passed through unclamped.

use crate::core::Call;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Decimal places kept in a normalized score.
pub const SCORE_SCALE: u32 = 1;

/// Which rule produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskBasis {
    AllowListed,
    DenyListed,
    Scored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub score: Decimal,
    pub basis: RiskBasis,
}

pub fn assess(call: &Call) -> RiskAssessment {
    let assessment = if call.green_list {
        RiskAssessment {
            score: Decimal::ZERO,
            basis: RiskBasis::AllowListed,
        }
    } else if call.red_list {
        RiskAssessment {
            score: Decimal::ONE,
            basis: RiskBasis::DenyListed,
        }
    } else {
        RiskAssessment {
            score: call.risk_score,
            basis: RiskBasis::Scored,
        }
    };
    assessment.normalized()
}

/// Normalized risk score of `call`.
pub fn classify(call: &Call) -> Decimal {
    assess(call).score
}

impl RiskAssessment {
    fn normalized(self) -> Self {
        Self {
            score: normalize_score(self.score),
            ..self
        }
    }
}

/// Round half-to-even to one decimal and always keep exactly one decimal
/// digit, so `1` renders as `1.0`.
pub fn normalize_score(score: Decimal) -> Decimal {
    let mut rounded = score.round_dp_with_strategy(SCORE_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(SCORE_SCALE);
    rounded
}
