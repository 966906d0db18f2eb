//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::info;

use super::EngineConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)
    .with_context(|| format!("Invalid configuration in {}", path.display()))?;

  info!(
    summation_horizon = config.goals.summation_horizon,
    matrix_horizon = config.goals.matrix_horizon,
    home_advantage = config.ratings.home_advantage,
    kelly_tier = ?config.staking.kelly_tier,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
///
/// # Errors
/// Fails on malformed TOML or a rule violation.
pub fn parse_config(content: &str) -> Result<EngineConfig> {
  let config: EngineConfig = toml::from_str(content).context("Failed to parse config.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Display grid inside the summation horizon
/// - Valid probability ranges (0..1)
/// - Solver brackets that are ordered and positive
/// - Sensible staking limits
fn validate_config(config: &EngineConfig) -> Result<()> {
  // Goal model validation
  anyhow::ensure!(
    config.goals.summation_horizon >= 1,
    "goals.summation_horizon must be at least 1"
  );
  anyhow::ensure!(
    config.goals.matrix_horizon <= config.goals.summation_horizon,
    "goals.matrix_horizon ({}) must not exceed summation_horizon ({})",
    config.goals.matrix_horizon,
    config.goals.summation_horizon
  );
  anyhow::ensure!(
    config.goals.totals_lines.iter().all(|l| l.is_finite() && *l >= 0.0),
    "goals.totals_lines must be non-negative, got {:?}",
    config.goals.totals_lines
  );
  anyhow::ensure!(
    config.goals.unusual_rate > 0.0,
    "goals.unusual_rate must be positive, got {}",
    config.goals.unusual_rate
  );

  // Rating model validation
  anyhow::ensure!(
    config.ratings.home_advantage.is_finite(),
    "ratings.home_advantage must be finite"
  );
  anyhow::ensure!(
    config.ratings.draw_peak >= 0.0 && config.ratings.draw_peak < 1.0,
    "ratings.draw_peak must be in [0, 1), got {}",
    config.ratings.draw_peak
  );
  anyhow::ensure!(
    config.ratings.draw_decay >= 0.0,
    "ratings.draw_decay must be non-negative, got {}",
    config.ratings.draw_decay
  );

  // Margin solver validation
  anyhow::ensure!(
    config.margin.tolerance > 0.0,
    "margin.tolerance must be positive, got {}",
    config.margin.tolerance
  );
  anyhow::ensure!(
    config.margin.max_iterations > 0,
    "margin.max_iterations must be positive"
  );
  for (name, (lo, hi)) in [
    ("odds_ratio_bracket", config.margin.odds_ratio_bracket),
    ("power_bracket", config.margin.power_bracket),
  ] {
    anyhow::ensure!(
      lo > 0.0 && lo < hi,
      "margin.{name} must satisfy 0 < lo < hi, got ({lo}, {hi})"
    );
  }

  // Staking validation
  anyhow::ensure!(
    config.staking.max_bankroll_fraction > Decimal::ZERO
      && config.staking.max_bankroll_fraction <= Decimal::ONE,
    "staking.max_bankroll_fraction must be in (0, 1], got {}",
    config.staking.max_bankroll_fraction
  );
  anyhow::ensure!(
    config.staking.marginal_edge >= 0.0
      && config.staking.marginal_edge <= config.staking.strong_edge,
    "staking edges must satisfy 0 <= marginal_edge <= strong_edge, got {} / {}",
    config.staking.marginal_edge,
    config.staking.strong_edge
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_empty_config_is_valid() {
    assert!(parse_config("").is_ok());
  }

  #[test]
  fn test_example_config_matches_defaults() {
    let config = parse_config(include_str!("../../config.example.toml")).unwrap();
    let defaults = EngineConfig::default();
    assert_eq!(config.goal_model().unwrap(), defaults.goal_model().unwrap());
    assert_eq!(config.rating_model(), defaults.rating_model());
    assert_eq!(config.margin_model(), defaults.margin_model());
    assert_eq!(config.kelly_sizer(), defaults.kelly_sizer());
  }

  #[test]
  fn test_rejects_wide_grid() {
    let err = parse_config("[goals]\nsummation_horizon = 3\nmatrix_horizon = 4\n").unwrap_err();
    assert!(format!("{err:#}").contains("matrix_horizon"));
  }

  #[test]
  fn test_rejects_inverted_bracket() {
    assert!(parse_config("[margin]\npower_bracket = [2.0, 0.5]\n").is_err());
  }

  #[test]
  fn test_rejects_oversized_kelly_cap() {
    assert!(parse_config("[staking]\nmax_bankroll_fraction = 1.5\n").is_err());
  }
}
