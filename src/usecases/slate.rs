//! Slate Analyzer - Parallel Pricing of Many Fixtures
//!
//! Every fixture is priced independently on the rayon pool. A bad input
//! fails its own fixture only, and results come back in request order.

use std::time::Instant;

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::domain::error::EngineError;
use crate::domain::outcome::Quote;

use super::fixture_pricer::{FixturePricer, FixtureValueReport};

/// Model inputs for one fixture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ModelInput {
  /// Priced with the Poisson goal model.
  ExpectedGoals { home_rate: f64, away_rate: f64 },
  /// Priced with the rating model.
  Ratings { home_rating: f64, away_rating: f64 },
}

/// One fixture on a slate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRequest {
  /// Caller's label, echoed back in the outcome.
  pub fixture: String,
  #[serde(flatten)]
  pub input: ModelInput,
  #[serde(default)]
  pub quotes: Vec<Quote>,
}

/// Priced fixture, or why it could not be priced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureOutcome {
  pub fixture: String,
  #[serde(flatten)]
  pub result: SlateResult,
}

/// Serializable per-fixture result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlateResult {
  Report(FixtureValueReport),
  Error(String),
}

impl FixtureOutcome {
  fn from_result(fixture: String, result: Result<FixtureValueReport, EngineError>) -> Self {
    let result = match result {
      Ok(report) => SlateResult::Report(report),
      Err(e) => SlateResult::Error(e.to_string()),
    };
    Self { fixture, result }
  }

  pub const fn report(&self) -> Option<&FixtureValueReport> {
    match &self.result {
      SlateResult::Report(report) => Some(report),
      SlateResult::Error(_) => None,
    }
  }

  pub const fn is_error(&self) -> bool {
    matches!(self.result, SlateResult::Error(_))
  }
}

/// Prices a slate of fixtures against a shared bankroll.
pub struct SlateAnalyzer {
  pricer: FixturePricer,
  /// Bankroll each fixture's stakes are sized against.
  bankroll: Decimal,
}

impl SlateAnalyzer {
  pub const fn new(pricer: FixturePricer, bankroll: Decimal) -> Self {
    Self { pricer, bankroll }
  }

  /// Price a single fixture.
  ///
  /// # Errors
  /// `InvalidInput` from the fixture's model inputs or quotes.
  pub fn price_fixture(
    &self,
    request: &FixtureRequest,
  ) -> Result<FixtureValueReport, EngineError> {
    match request.input {
      ModelInput::ExpectedGoals {
        home_rate,
        away_rate,
      } => {
        let source = self.pricer.expected_goals_source(home_rate, away_rate);
        self
          .pricer
          .value_report(&source, &request.quotes, self.bankroll)
      }
      ModelInput::Ratings {
        home_rating,
        away_rating,
      } => {
        let source = self.pricer.rating_source(home_rating, away_rating);
        self
          .pricer
          .value_report(&source, &request.quotes, self.bankroll)
      }
    }
  }

  /// Price every fixture in parallel, preserving input order.
  #[instrument(skip(self, fixtures), fields(fixtures = fixtures.len()), name = "price_slate")]
  pub fn price_slate(&self, fixtures: &[FixtureRequest]) -> Vec<FixtureOutcome> {
    let started = Instant::now();

    let outcomes: Vec<FixtureOutcome> = fixtures
      .par_iter()
      .map(|request| {
        FixtureOutcome::from_result(request.fixture.clone(), self.price_fixture(request))
      })
      .collect();

    let failed = outcomes.iter().filter(|o| o.is_error()).count();
    if failed > 0 {
      warn!(failed, "Some fixtures could not be priced");
    }
    info!(
      priced = outcomes.len() - failed,
      failed,
      elapsed_us = started.elapsed().as_micros() as u64,
      "Slate priced"
    );

    outcomes
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::EngineConfig;
  use rust_decimal_macros::dec;

  fn analyzer() -> SlateAnalyzer {
    let pricer = FixturePricer::from_config(&EngineConfig::default()).unwrap();
    SlateAnalyzer::new(pricer, dec!(1000))
  }

  fn xg(name: &str, home_rate: f64, away_rate: f64) -> FixtureRequest {
    FixtureRequest {
      fixture: name.to_string(),
      input: ModelInput::ExpectedGoals {
        home_rate,
        away_rate,
      },
      quotes: Vec::new(),
    }
  }

  #[test]
  fn test_order_preserved_and_failures_isolated() {
    let fixtures = vec![
      xg("first", 1.5, 1.1),
      xg("broken", -0.5, 1.0),
      FixtureRequest {
        fixture: "third".to_string(),
        input: ModelInput::Ratings {
          home_rating: 1700.0,
          away_rating: 1550.0,
        },
        quotes: vec!["Book:1.80,3.60,4.80".parse().unwrap()],
      },
    ];

    let outcomes = analyzer().price_slate(&fixtures);
    let names: Vec<_> = outcomes.iter().map(|o| o.fixture.as_str()).collect();
    assert_eq!(names, ["first", "broken", "third"]);
    assert!(outcomes[0].report().is_some());
    assert!(outcomes[1].is_error());
    assert_eq!(outcomes[2].report().unwrap().source, "elo");
  }

  #[test]
  fn test_empty_slate() {
    assert!(analyzer().price_slate(&[]).is_empty());
  }

  #[test]
  fn test_request_from_json() {
    let request: FixtureRequest = serde_json::from_str(
      r#"{"fixture":"derby","model":"expected_goals","home_rate":1.4,"away_rate":1.2}"#,
    )
    .unwrap();
    assert_eq!(request.fixture, "derby");
    assert!(request.quotes.is_empty());
    assert!(matches!(request.input, ModelInput::ExpectedGoals { .. }));
  }

  #[test]
  fn test_request_with_invalid_quote_is_rejected() {
    let json = r#"{"fixture":"x","model":"ratings","home_rating":1500.0,"away_rating":1500.0,
      "quotes":[{"bookmaker":"B","odds":{"home":0.5,"draw":1.0,"away":-7.0}}]}"#;
    assert!(serde_json::from_str::<FixtureRequest>(json).is_err());

    let slate = r#"[
      {"fixture":"ok","model":"expected_goals","home_rate":1.4,"away_rate":1.2},
      {"fixture":"bad","model":"expected_goals","home_rate":1.4,"away_rate":1.2,
       "quotes":[{"bookmaker":"B","odds":{"home":1.0,"draw":3.0,"away":4.0}}]}
    ]"#;
    assert!(serde_json::from_str::<Vec<FixtureRequest>>(slate).is_err());
  }

  #[test]
  fn test_extreme_rate_fixture_is_priced() {
    let mut fixture = xg("blowout", 800.0, 1.0);
    fixture.quotes = vec!["Book:1.01,40.0,60.0".parse().unwrap()];

    let report = analyzer().price_fixture(&fixture).unwrap();
    assert!((report.fair.total() - 1.0).abs() < 1e-9);
    assert!(report.fair.home > 0.999);
    assert!(report.selections.iter().all(|s| s.stake >= Decimal::ZERO));
  }
}
