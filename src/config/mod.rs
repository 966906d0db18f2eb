//! Configuration Module - TOML-based Engine Configuration
//!
//! Every field has a default, so an absent or partial `config.toml`
//! still yields the standard model constants. Nothing here changes the
//! pricing formulas; it only picks their parameters.

pub mod loader;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::domain::elo::RatingModel;
use crate::domain::kelly::{KellySizer, KellyTier};
use crate::domain::margin::MarginModel;
use crate::domain::poisson::{GoalModel, DEFAULT_TOTALS_LINES, UNUSUAL_RATE};
use crate::domain::solver::Bisection;
use crate::domain::value::ValueThresholds;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  /// Log output settings.
  pub logging: LoggingConfig,
  /// Poisson goal model parameters.
  pub goals: GoalsConfig,
  /// Rating model constants.
  pub ratings: RatingsConfig,
  /// Margin removal solver settings.
  pub margin: MarginConfig,
  /// Staking and value-detection settings.
  pub staking: StakingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
  pub level: String,
  /// Emit JSON lines instead of human-readable output.
  pub json: bool,
}

/// Goal model configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoalsConfig {
  /// Highest goal count summed for aggregate markets.
  pub summation_horizon: usize,
  /// Highest goal count shown in the correct-score grid.
  pub matrix_horizon: usize,
  /// Over/under lines to price.
  pub totals_lines: Vec<f64>,
  /// Rates above this are logged as unusual.
  pub unusual_rate: f64,
}

/// Rating model configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RatingsConfig {
  /// Rating points added to the home side.
  pub home_advantage: f64,
  /// Draw probability at zero rating gap.
  pub draw_peak: f64,
  /// Draw probability decay per squared rating point.
  pub draw_decay: f64,
}

/// Margin model configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarginConfig {
  /// Bisection residual tolerance.
  pub tolerance: f64,
  /// Bisection iteration cap.
  pub max_iterations: u32,
  /// Search interval for the odds-ratio constant.
  pub odds_ratio_bracket: (f64, f64),
  /// Search interval for the logarithmic exponent.
  pub power_bracket: (f64, f64),
}

/// Staking configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StakingConfig {
  /// Kelly multiple used for recommended stakes.
  pub kelly_tier: KellyTier,
  /// Cap on the bankroll share of a single bet.
  pub max_bankroll_fraction: Decimal,
  /// Edge above which a price is high value.
  pub strong_edge: f64,
  /// Edge above which a price is potential value.
  pub marginal_edge: f64,
}

impl EngineConfig {
  /// Goal model built from `[goals]`.
  ///
  /// # Errors
  /// Fails if the display grid is wider than the summation horizon.
  pub fn goal_model(&self) -> anyhow::Result<GoalModel> {
    Ok(GoalModel::new(
      self.goals.summation_horizon,
      self.goals.matrix_horizon,
      self.goals.totals_lines.clone(),
    )?)
  }

  pub const fn rating_model(&self) -> RatingModel {
    RatingModel {
      home_advantage: self.ratings.home_advantage,
      draw_peak: self.ratings.draw_peak,
      draw_decay: self.ratings.draw_decay,
    }
  }

  pub const fn margin_model(&self) -> MarginModel {
    MarginModel {
      solver: Bisection::new(self.margin.tolerance, self.margin.max_iterations),
      odds_ratio_bracket: self.margin.odds_ratio_bracket,
      power_bracket: self.margin.power_bracket,
    }
  }

  pub const fn kelly_sizer(&self) -> KellySizer {
    KellySizer::new(self.staking.kelly_tier, self.staking.max_bankroll_fraction)
  }

  pub const fn value_thresholds(&self) -> ValueThresholds {
    ValueThresholds {
      strong: self.staking.strong_edge,
      marginal: self.staking.marginal_edge,
    }
  }
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
      json: false,
    }
  }
}

impl Default for GoalsConfig {
  fn default() -> Self {
    let model = GoalModel::STANDARD;
    Self {
      summation_horizon: model.summation_horizon(),
      matrix_horizon: model.matrix_horizon(),
      totals_lines: DEFAULT_TOTALS_LINES.to_vec(),
      unusual_rate: UNUSUAL_RATE,
    }
  }
}

impl Default for RatingsConfig {
  fn default() -> Self {
    let model = RatingModel::STANDARD;
    Self {
      home_advantage: model.home_advantage,
      draw_peak: model.draw_peak,
      draw_decay: model.draw_decay,
    }
  }
}

impl Default for MarginConfig {
  fn default() -> Self {
    let model = MarginModel::STANDARD;
    Self {
      tolerance: model.solver.tolerance,
      max_iterations: model.solver.max_iterations,
      odds_ratio_bracket: model.odds_ratio_bracket,
      power_bracket: model.power_bracket,
    }
  }
}

impl Default for StakingConfig {
  fn default() -> Self {
    let thresholds = ValueThresholds::STANDARD;
    Self {
      kelly_tier: KellyTier::Quarter,
      max_bankroll_fraction: dec!(0.10),
      strong_edge: thresholds.strong,
      marginal_edge: thresholds.marginal,
    }
  }
}
