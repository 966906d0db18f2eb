//! Fixture Pricer - Model Front Door and Value Reports
//!
//! Holds every calculator configured from `EngineConfig` and adds the
//! logging the domain layer leaves out:
//! - warns on implausible expected-goal rates
//! - reports arbitrage when a quote set is in surebet territory
//! - builds per-fixture value reports from any `FairPriceSource`

use anyhow::Result;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::EngineConfig;
use crate::domain::arbitrage::{best_price, detect_arbitrage, ArbitragePlan, BestPrice};
use crate::domain::elo::RatingModel;
use crate::domain::error::EngineError;
use crate::domain::kelly::{kelly_stake, KellyFraction, KellySizer};
use crate::domain::margin::{FourModelResult, MarginModel};
use crate::domain::outcome::{Outcome, OutcomeProbabilities, Quote};
use crate::domain::poisson::{GoalModel, MatchProbabilities};
use crate::domain::value::{assess_value, ValueAssessment, ValueThresholds};
use crate::ports::pricing::{ExpectedGoalsSource, FairPriceSource, RatingSource};

/// Value picture for one outcome of a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionValue {
  pub outcome: Outcome,
  /// Fair probability from the pricing source.
  pub fair_probability: f64,
  /// Best quoted price, absent when no quotes were supplied.
  pub best: Option<BestPrice>,
  /// Present whenever a best price exists.
  pub assessment: Option<ValueAssessment>,
  /// Bankroll fraction after tier and cap. Zero without an edge.
  pub kelly_fraction: Decimal,
  /// `bankroll · kelly_fraction`, rounded to cents.
  pub stake: Decimal,
}

/// Value report for a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureValueReport {
  /// Name of the pricing source ("xg", "elo", ...).
  pub source: String,
  pub fair: OutcomeProbabilities,
  /// Home, draw, away in that order.
  pub selections: Vec<SelectionValue>,
  /// Arbitrage scan of the same quotes, if any were supplied.
  pub arbitrage: Option<ArbitragePlan>,
}

impl FixtureValueReport {
  /// Selection with the largest positive edge.
  pub fn best_value(&self) -> Option<&SelectionValue> {
    self
      .selections
      .iter()
      .filter(|s| s.assessment.is_some_and(|a| a.rating.is_positive()))
      .max_by(|a, b| {
        let edge = |s: &SelectionValue| s.assessment.map_or(f64::MIN, |a| a.edge);
        edge(*a).total_cmp(&edge(*b))
      })
  }

  /// Sum of recommended stakes across all outcomes.
  pub fn total_stake(&self) -> Decimal {
    self.selections.iter().map(|s| s.stake).sum()
  }
}

/// Configured entry point to every pricing model.
#[derive(Debug, Clone, PartialEq)]
pub struct FixturePricer {
  goals: GoalModel,
  ratings: RatingModel,
  margin: MarginModel,
  sizer: KellySizer,
  thresholds: ValueThresholds,
  /// Expected-goal rates above this are logged.
  unusual_rate: f64,
}

impl FixturePricer {
  /// Build every model from configuration.
  ///
  /// # Errors
  /// Fails if the goal model parameters are inconsistent.
  pub fn from_config(config: &EngineConfig) -> Result<Self> {
    Ok(Self {
      goals: config.goal_model()?,
      ratings: config.rating_model(),
      margin: config.margin_model(),
      sizer: config.kelly_sizer(),
      thresholds: config.value_thresholds(),
      unusual_rate: config.goals.unusual_rate,
    })
  }

  pub const fn goal_model(&self) -> &GoalModel {
    &self.goals
  }

  pub const fn rating_model(&self) -> &RatingModel {
    &self.ratings
  }

  pub const fn sizer(&self) -> &KellySizer {
    &self.sizer
  }

  /// Pricing source backed by the configured goal model.
  ///
  /// Unusual rates are logged here, since the source itself only prices.
  pub fn expected_goals_source(&self, home_rate: f64, away_rate: f64) -> ExpectedGoalsSource {
    self.flag_unusual_rates(home_rate, away_rate);
    ExpectedGoalsSource::new(self.goals.clone(), home_rate, away_rate)
  }

  /// Whether an expected-goal rate is above the configured warning level.
  pub fn is_unusual_rate(&self, rate: f64) -> bool {
    rate > self.unusual_rate
  }

  fn flag_unusual_rates(&self, home_rate: f64, away_rate: f64) {
    for (side, rate) in [("home", home_rate), ("away", away_rate)] {
      if self.is_unusual_rate(rate) {
        warn!(side, rate, threshold = self.unusual_rate, "Unusually high expected goals");
      }
    }
  }

  /// Pricing source backed by the configured rating model.
  pub const fn rating_source(&self, home_rating: f64, away_rating: f64) -> RatingSource {
    RatingSource::new(self.ratings, home_rating, away_rating)
  }

  /// Every goal market for a fixture.
  ///
  /// # Errors
  /// `InvalidInput` for a negative or non-finite rate.
  #[instrument(skip(self), name = "goal_markets")]
  pub fn goal_markets(
    &self,
    home_rate: f64,
    away_rate: f64,
  ) -> Result<MatchProbabilities, EngineError> {
    self.flag_unusual_rates(home_rate, away_rate);

    let markets = self.goals.compute_all(home_rate, away_rate)?;
    debug!(
      home = markets.full_time.home,
      draw = markets.full_time.draw,
      away = markets.full_time.away,
      captured_mass = markets.captured_mass,
      "Goal markets computed"
    );
    Ok(markets)
  }

  /// Home/draw/away from team ratings.
  ///
  /// # Errors
  /// `InvalidInput` for a non-finite rating.
  #[instrument(skip(self), name = "rating_markets")]
  pub fn rating_markets(
    &self,
    home_rating: f64,
    away_rating: f64,
  ) -> Result<OutcomeProbabilities, EngineError> {
    let probabilities = self.ratings.compute_from_ratings(home_rating, away_rating)?;
    debug!(
      gap = self.ratings.rating_gap(home_rating, away_rating),
      draw = probabilities.draw,
      "Rating markets computed"
    );
    Ok(probabilities)
  }

  /// Four fair-odds estimates for one bookmaker's 1X2 prices.
  ///
  /// # Errors
  /// `InvalidInput` if any price is not above 1.0.
  #[instrument(skip(self), name = "remove_margin")]
  pub fn remove_margin(
    &self,
    home: f64,
    draw: f64,
    away: f64,
  ) -> Result<FourModelResult, EngineError> {
    let result = self.margin.remove_margin(home, draw, away)?;
    for fair in result.iter() {
      if let Some(root) = fair.parameter.filter(|r| !r.converged) {
        warn!(
          method = ?fair.method,
          residual = root.residual,
          iterations = root.iterations,
          "Margin solver hit the iteration cap"
        );
      }
      if !fair.is_complete() {
        debug!(method = ?fair.method, "Margin model left an outcome unpriced");
      }
    }
    Ok(result)
  }

  /// Best prices across `quotes` and stakes if they lock in a profit.
  #[instrument(skip(self, quotes), fields(bookmakers = quotes.len()), name = "arbitrage_scan")]
  pub fn arbitrage(&self, quotes: &[Quote], investment: f64) -> Option<ArbitragePlan> {
    let plan = detect_arbitrage(quotes, investment)?;
    if plan.is_arbitrage {
      info!(
        profit_pct = plan.profit_percentage,
        home = %plan.best_home.bookmaker,
        draw = %plan.best_draw.bookmaker,
        away = %plan.best_away.bookmaker,
        "Arbitrage opportunity found"
      );
    } else {
      debug!(implied_sum = plan.implied_sum, "No arbitrage in quote set");
    }
    Some(plan)
  }

  /// Full, half and quarter Kelly. `None` without a positive edge.
  pub fn kelly(&self, fair_prob: f64, offered_odds: f64) -> Option<KellyFraction> {
    kelly_stake(fair_prob, offered_odds)
  }

  /// Rate one price against a model probability.
  ///
  /// # Errors
  /// `InvalidInput` for odds not above 1.0 or a probability outside `[0, 1]`.
  pub fn assess(&self, fair_prob: f64, offered_odds: f64) -> Result<ValueAssessment, EngineError> {
    assess_value(fair_prob, offered_odds, self.thresholds)
  }

  /// Compare a source's fair prices against the best quotes for a fixture.
  ///
  /// # Errors
  /// Propagates the source's `InvalidInput`.
  #[instrument(
    skip(self, source, quotes),
    fields(source = source.name(), bookmakers = quotes.len()),
    name = "value_report"
  )]
  pub fn value_report(
    &self,
    source: &dyn FairPriceSource,
    quotes: &[Quote],
    bankroll: Decimal,
  ) -> Result<FixtureValueReport, EngineError> {
    let fair = source.fair_probabilities()?;

    let mut selections = Vec::with_capacity(Outcome::ALL.len());
    for outcome in Outcome::ALL {
      let fair_probability = fair.get(outcome);
      let best = best_price(quotes, outcome);
      let assessment = best
        .as_ref()
        .map(|b| self.assess(fair_probability, b.odds))
        .transpose()?;
      let (kelly_fraction, stake) = match &best {
        Some(b) => (
          self.sizer.fraction(fair_probability, b.odds),
          self.sizer.stake(bankroll, fair_probability, b.odds),
        ),
        None => (Decimal::ZERO, Decimal::ZERO),
      };

      if let (Some(b), Some(a)) = (&best, &assessment) {
        if a.rating.is_positive() {
          info!(
            %outcome,
            bookmaker = %b.bookmaker,
            odds = b.odds,
            edge = a.edge,
            %stake,
            "Value selection"
          );
        }
      }

      selections.push(SelectionValue {
        outcome,
        fair_probability,
        best,
        assessment,
        kelly_fraction,
        stake,
      });
    }

    let investment = bankroll.to_f64().unwrap_or(0.0);
    let arbitrage = self.arbitrage(quotes, investment);

    Ok(FixtureValueReport {
      source: source.name().to_string(),
      fair,
      selections,
      arbitrage,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::outcome::OddsTriple;
  use rust_decimal_macros::dec;

  fn pricer() -> FixturePricer {
    FixturePricer::from_config(&EngineConfig::default()).unwrap()
  }

  fn quote(name: &str, h: f64, d: f64, a: f64) -> Quote {
    Quote::new(name, OddsTriple::try_new(h, d, a).unwrap())
  }

  #[test]
  fn test_from_config_uses_standard_models() {
    let pricer = pricer();
    assert_eq!(pricer.goal_model(), &GoalModel::STANDARD);
    assert_eq!(pricer.rating_model(), &RatingModel::STANDARD);
  }

  #[test]
  fn test_value_report_without_quotes() {
    let pricer = pricer();
    let source = pricer.rating_source(1600.0, 1500.0);
    let report = pricer.value_report(&source, &[], dec!(1000)).unwrap();

    assert_eq!(report.source, "elo");
    assert_eq!(report.selections.len(), 3);
    assert!(report.selections.iter().all(|s| s.best.is_none()));
    assert_eq!(report.total_stake(), Decimal::ZERO);
    assert!(report.arbitrage.is_none());
    assert!(report.best_value().is_none());
  }

  #[test]
  fn test_value_report_finds_long_away_price() {
    let pricer = pricer();
    let source = pricer.expected_goals_source(1.2, 1.4);
    let quotes = vec![quote("A", 2.20, 3.40, 3.10), quote("B", 2.10, 3.30, 4.50)];
    let report = pricer.value_report(&source, &quotes, dec!(1000)).unwrap();

    let best = report.best_value().unwrap();
    assert_eq!(best.outcome, Outcome::Away);
    assert_eq!(best.best.as_ref().unwrap().bookmaker, "B");
    assert!(best.stake > Decimal::ZERO);
    assert!(best.kelly_fraction <= dec!(0.10));
  }

  #[test]
  fn test_value_report_propagates_source_error() {
    let pricer = pricer();
    let source = pricer.expected_goals_source(f64::NAN, 1.0);
    assert!(pricer.value_report(&source, &[], dec!(100)).is_err());
  }

  #[test]
  fn test_unusual_rate_uses_configured_threshold() {
    let mut config = EngineConfig::default();
    config.goals.unusual_rate = 3.0;
    let pricer = FixturePricer::from_config(&config).unwrap();
    assert!(pricer.is_unusual_rate(3.5));
    assert!(!pricer.is_unusual_rate(3.0));

    // Flagged rates are still priced.
    let source = pricer.expected_goals_source(3.5, 0.8);
    let report = pricer.value_report(&source, &[], dec!(100)).unwrap();
    assert!(report.fair.home > report.fair.away);
  }

  #[test]
  fn test_remove_margin_rejects_short_odds() {
    assert!(pricer().remove_margin(1.0, 3.0, 4.0).is_err());
  }
}
