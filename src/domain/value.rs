//! Value assessment of a bookmaker price against a model probability,
//! and closing line value of a placed bet.

use serde::{Deserialize, Serialize};

use super::error::{ensure_decimal_odds, ensure_finite, EngineError};
use super::kelly::{kelly_stake, KellyFraction};

/// Edge bands, in probability points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueThresholds {
    /// Edge above this is high value.
    pub strong: f64,
    /// Edge above this is potential value.
    pub marginal: f64,
}

impl ValueThresholds {
    pub const STANDARD: Self = Self {
        strong: 0.03,
        marginal: 0.005,
    };
}

impl Default for ValueThresholds {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Qualitative rating of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueRating {
    HighValue,
    PotentialValue,
    Neutral,
    Caution,
    LowValue,
}

impl ValueRating {
    pub fn from_edge(edge: f64, thresholds: ValueThresholds) -> Self {
        if edge > thresholds.strong {
            Self::HighValue
        } else if edge > thresholds.marginal {
            Self::PotentialValue
        } else if edge < -thresholds.strong {
            Self::LowValue
        } else if edge < -thresholds.marginal {
            Self::Caution
        } else {
            Self::Neutral
        }
    }

    pub const fn is_positive(self) -> bool {
        matches!(self, Self::HighValue | Self::PotentialValue)
    }
}

/// Model probability compared with the bookmaker's implied probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueAssessment {
    pub model_probability: f64,
    pub offered_odds: f64,
    pub implied_probability: f64,
    /// `model_probability − implied_probability`.
    pub edge: f64,
    /// Expected profit per unit staked: `p · odds − 1`.
    pub expected_value: f64,
    pub rating: ValueRating,
    /// Present only with a positive Kelly edge.
    pub kelly: Option<KellyFraction>,
}

/// Rates `offered_odds` against `model_probability`.
///
/// # Errors
/// `InvalidInput` if the odds are not above 1.0 or the probability lies
/// outside `[0, 1]`.
pub fn assess_value(
    model_probability: f64,
    offered_odds: f64,
    thresholds: ValueThresholds,
) -> Result<ValueAssessment, EngineError> {
    let p = ensure_finite("model_probability", model_probability)?;
    if !(0.0..=1.0).contains(&p) {
        return Err(EngineError::invalid(
            "model_probability",
            p,
            "must lie in [0, 1]",
        ));
    }
    let odds = ensure_decimal_odds("offered_odds", offered_odds)?;

    let implied = 1.0 / odds;
    let edge = p - implied;

    Ok(ValueAssessment {
        model_probability: p,
        offered_odds: odds,
        implied_probability: implied,
        edge,
        expected_value: p * odds - 1.0,
        rating: ValueRating::from_edge(edge, thresholds),
        kelly: kelly_stake(p, odds),
    })
}

/// Closing line value: `placed / closing − 1`.
///
/// Positive when the bet was struck at a longer price than the market
/// closed at.
///
/// # Errors
/// `InvalidInput` if either price is not above 1.0.
pub fn closing_line_value(placed_odds: f64, closing_odds: f64) -> Result<f64, EngineError> {
    let placed = ensure_decimal_odds("placed_odds", placed_odds)?;
    let closing = ensure_decimal_odds("closing_odds", closing_odds)?;
    Ok(placed / closing - 1.0)
}
