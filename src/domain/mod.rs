//! Domain layer - pure pricing models.
//!
//! Everything here is a side-effect-free function of its inputs: no
//! I/O, no logging, no state carried between calls. All types are
//! serializable and testable in isolation.

pub mod arbitrage;
pub mod contrarian;
pub mod elo;
pub mod error;
pub mod kelly;
pub mod ledger;
pub mod margin;
pub mod outcome;
pub mod poisson;
pub mod solver;
pub mod value;

// Re-export core types for convenience
pub use arbitrage::{best_price, detect_arbitrage, ArbitragePlan, BestPrice, Stakes};
pub use elo::RatingModel;
pub use error::EngineError;
pub use kelly::{kelly_stake, KellyFraction, KellySizer, KellyTier};
pub use margin::{FairOdds, FairOutcome, FourModelResult, MarginMethod, MarginModel};
pub use outcome::{OddsTriple, Outcome, OutcomeProbabilities, Quote};
pub use poisson::{GoalModel, MatchProbabilities, ScoreGrid};
pub use solver::{Bisection, Root};
pub use value::{assess_value, closing_line_value, ValueAssessment, ValueRating, ValueThresholds};
