//! Pricing Port - Fair Probability Source Interface
//!
//! Staking and value code is written once against `FairPriceSource`
//! and does not care whether the fair 1X2 probabilities came from the
//! expected-goals model or the rating model.

use serde::{Deserialize, Serialize};

use crate::domain::elo::RatingModel;
use crate::domain::error::EngineError;
use crate::domain::outcome::OutcomeProbabilities;
use crate::domain::poisson::GoalModel;

/// Anything that can price a fixture's home/draw/away outcomes.
pub trait FairPriceSource: Send + Sync {
  /// Short label used in logs and reports (e.g. "xg", "elo").
  fn name(&self) -> &'static str;

  /// Fair home/draw/away probabilities for the bound fixture.
  fn fair_probabilities(&self) -> Result<OutcomeProbabilities, EngineError>;
}

/// Expected-goals inputs bound to a goal model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedGoalsSource {
  /// Model used for pricing.
  pub model: GoalModel,
  /// Home expected goals.
  pub home_rate: f64,
  /// Away expected goals.
  pub away_rate: f64,
}

impl ExpectedGoalsSource {
  pub fn new(model: GoalModel, home_rate: f64, away_rate: f64) -> Self {
    Self {
      model,
      home_rate,
      away_rate,
    }
  }
}

impl FairPriceSource for ExpectedGoalsSource {
  fn name(&self) -> &'static str {
    "xg"
  }

  fn fair_probabilities(&self) -> Result<OutcomeProbabilities, EngineError> {
    self
      .model
      .compute_all(self.home_rate, self.away_rate)
      .map(|m| m.full_time)
  }
}

/// Team ratings bound to a rating model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSource {
  /// Model used for pricing.
  pub model: RatingModel,
  /// Home team rating.
  pub home_rating: f64,
  /// Away team rating.
  pub away_rating: f64,
}

impl RatingSource {
  pub const fn new(model: RatingModel, home_rating: f64, away_rating: f64) -> Self {
    Self {
      model,
      home_rating,
      away_rating,
    }
  }
}

impl FairPriceSource for RatingSource {
  fn name(&self) -> &'static str {
    "elo"
  }

  fn fair_probabilities(&self) -> Result<OutcomeProbabilities, EngineError> {
    self
      .model
      .compute_from_ratings(self.home_rating, self.away_rating)
  }
}
