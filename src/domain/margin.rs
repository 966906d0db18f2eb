//! Bookmaker margin removal.
//!
//! Converts three quoted decimal odds into fair probabilities under four
//! competing assumptions about how the bookmaker spread its overround:
//! - equal margin: every price scaled by the overround
//! - proportional: margin subtracted evenly from implied probabilities
//! - odds ratio: fair and implied odds differ by a constant odds ratio
//! - logarithmic: fair probability is implied probability raised to `k`
//!
//! The last two have no closed form and share the bisection solver.

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::outcome::{OddsTriple, Outcome};
use super::solver::{Bisection, Root};

/// Which margin model produced a set of fair odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginMethod {
    EqualMargin,
    Proportional,
    OddsRatio,
    Logarithmic,
}

/// Fair price for one outcome. `None` when the model drives the
/// probability to zero or below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FairOutcome {
    pub odds: Option<f64>,
    pub probability: Option<f64>,
}

impl FairOutcome {
    fn from_probability(p: f64) -> Self {
        if p > 0.0 {
            Self {
                odds: Some(1.0 / p),
                probability: Some(p),
            }
        } else {
            Self {
                odds: None,
                probability: None,
            }
        }
    }
}

/// Fair odds for the three outcomes under one margin model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FairOdds {
    pub method: MarginMethod,
    pub home: FairOutcome,
    pub draw: FairOutcome,
    pub away: FairOutcome,
    /// Solved `c` (odds ratio) or `k` (logarithmic); `None` for closed forms.
    pub parameter: Option<Root>,
}

impl FairOdds {
    fn from_probabilities(method: MarginMethod, probs: [f64; 3], parameter: Option<Root>) -> Self {
        Self {
            method,
            home: FairOutcome::from_probability(probs[0]),
            draw: FairOutcome::from_probability(probs[1]),
            away: FairOutcome::from_probability(probs[2]),
            parameter,
        }
    }

    pub const fn get(&self, outcome: Outcome) -> FairOutcome {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    /// Sum of the defined probabilities.
    pub fn probability_sum(&self) -> f64 {
        [self.home, self.draw, self.away]
            .iter()
            .filter_map(|o| o.probability)
            .sum()
    }

    /// Whether all three outcomes have a defined fair price.
    pub fn is_complete(&self) -> bool {
        [self.home, self.draw, self.away]
            .iter()
            .all(|o| o.probability.is_some())
    }
}

/// Fair odds under all four models for one book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourModelResult {
    pub quoted: OddsTriple,
    /// Sum of implied probabilities.
    pub overround: f64,
    /// `overround − 1`.
    pub margin: f64,
    pub equal_margin: FairOdds,
    pub proportional: FairOdds,
    pub odds_ratio: FairOdds,
    pub logarithmic: FairOdds,
}

impl FourModelResult {
    pub const fn by_method(&self, method: MarginMethod) -> &FairOdds {
        match method {
            MarginMethod::EqualMargin => &self.equal_margin,
            MarginMethod::Proportional => &self.proportional,
            MarginMethod::OddsRatio => &self.odds_ratio,
            MarginMethod::Logarithmic => &self.logarithmic,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FairOdds> {
        [
            &self.equal_margin,
            &self.proportional,
            &self.odds_ratio,
            &self.logarithmic,
        ]
        .into_iter()
    }
}

/// Margin removal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginModel {
    pub solver: Bisection,
    /// Search interval for the odds-ratio constant `c`.
    pub odds_ratio_bracket: (f64, f64),
    /// Search interval for the logarithmic exponent `k`.
    pub power_bracket: (f64, f64),
}

impl MarginModel {
    pub const STANDARD: Self = Self {
        solver: Bisection::STANDARD,
        odds_ratio_bracket: (0.01, 5.0),
        power_bracket: (0.5, 2.0),
    };

    /// Removes the margin from a home/draw/away book under all four models.
    ///
    /// # Errors
    /// `InvalidInput` if any price is non-finite or not above 1.0.
    pub fn remove_margin(
        &self,
        home: f64,
        draw: f64,
        away: f64,
    ) -> Result<FourModelResult, EngineError> {
        let quoted = OddsTriple::try_new(home, draw, away)?;
        Ok(self.remove_margin_from(quoted))
    }

    /// Same as [`remove_margin`](Self::remove_margin) for an already validated book.
    pub fn remove_margin_from(&self, quoted: OddsTriple) -> FourModelResult {
        let overround = quoted.overround();
        FourModelResult {
            quoted,
            overround,
            margin: overround - 1.0,
            equal_margin: equal_margin(quoted, overround),
            proportional: proportional(quoted, overround),
            odds_ratio: self.odds_ratio(quoted),
            logarithmic: self.logarithmic(quoted),
        }
    }

    fn odds_ratio(&self, quoted: OddsTriple) -> FairOdds {
        let implied = quoted.implied();
        let fair = |c: f64, pi: f64| c * pi / (1.0 - pi + c * pi);
        let objective = |c: f64| implied.iter().map(|&pi| fair(c, pi)).sum::<f64>() - 1.0;

        let (lo, hi) = self.odds_ratio_bracket;
        let root = self.solver.solve(objective, lo, hi);
        let probs = implied.map(|pi| fair(root.value, pi));
        FairOdds::from_probabilities(MarginMethod::OddsRatio, probs, Some(root))
    }

    fn logarithmic(&self, quoted: OddsTriple) -> FairOdds {
        let implied = quoted.implied();
        let objective = |k: f64| implied.iter().map(|pi| pi.powf(k)).sum::<f64>() - 1.0;

        let (lo, hi) = self.power_bracket;
        let root = self.solver.solve(objective, lo, hi);
        let probs = implied.map(|pi| pi.powf(root.value));
        FairOdds::from_probabilities(MarginMethod::Logarithmic, probs, Some(root))
    }
}

impl Default for MarginModel {
    fn default() -> Self {
        Self::STANDARD
    }
}

fn equal_margin(quoted: OddsTriple, overround: f64) -> FairOdds {
    let scaled = |odds: f64| {
        let fair = odds * overround;
        FairOutcome {
            odds: Some(fair),
            probability: Some(1.0 / fair),
        }
    };
    FairOdds {
        method: MarginMethod::EqualMargin,
        home: scaled(quoted.home),
        draw: scaled(quoted.draw),
        away: scaled(quoted.away),
        parameter: None,
    }
}

fn proportional(quoted: OddsTriple, overround: f64) -> FairOdds {
    let per_outcome = (overround - 1.0) / 3.0;
    let probs = quoted.implied().map(|pi| pi - per_outcome);
    FairOdds::from_probabilities(MarginMethod::Proportional, probs, None)
}
