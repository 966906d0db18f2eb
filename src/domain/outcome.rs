//! Shared three-way market types.
//!
//! `OutcomeProbabilities` is the common shape produced by both the goal
//! model and the rating model, so staking and value code can consume
//! either source without caring which one priced the fixture.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{ensure_decimal_odds, EngineError};

/// One leg of a 1X2 market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    /// All outcomes in market order.
    pub const ALL: [Self; 3] = [Self::Home, Self::Draw, Self::Away];
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::Draw => write!(f, "draw"),
            Self::Away => write!(f, "away"),
        }
    }
}

/// Home/draw/away probabilities that sum to 1.
///
/// The only public constructor renormalizes, so every instance that
/// leaves the engine is a proper distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OutcomeProbabilities {
    /// Builds a distribution from raw (possibly truncated) masses.
    ///
    /// Divides by the total whenever it is positive. A zero or
    /// non-finite total leaves the raw values untouched.
    pub fn normalized(home: f64, draw: f64, away: f64) -> Self {
        let total = home + draw + away;
        if total > 0.0 && total.is_finite() {
            Self {
                home: home / total,
                draw: draw / total,
                away: away / total,
            }
        } else {
            Self { home, draw, away }
        }
    }

    /// Probability of a single outcome.
    pub const fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    pub fn total(&self) -> f64 {
        self.home + self.draw + self.away
    }

    /// Most likely outcome. Ties resolve in market order.
    pub fn favourite(&self) -> Outcome {
        if self.home >= self.draw && self.home >= self.away {
            Outcome::Home
        } else if self.draw >= self.away {
            Outcome::Draw
        } else {
            Outcome::Away
        }
    }

    /// Fair decimal odds (`1/p`); `None` for a zero-probability outcome.
    pub fn fair_odds(&self, outcome: Outcome) -> Option<f64> {
        let p = self.get(outcome);
        (p > 0.0).then(|| 1.0 / p)
    }
}

/// Three decimal odds quoted by one bookmaker.
///
/// Deserialization goes through [`OddsTriple::try_new`], so a quote read
/// from JSON or TOML is held to the same rules as one built in code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOdds")]
pub struct OddsTriple {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

/// Unchecked wire form of [`OddsTriple`].
#[derive(Deserialize)]
struct RawOdds {
    home: f64,
    draw: f64,
    away: f64,
}

impl TryFrom<RawOdds> for OddsTriple {
    type Error = EngineError;

    fn try_from(raw: RawOdds) -> Result<Self, Self::Error> {
        Self::try_new(raw.home, raw.draw, raw.away)
    }
}

impl OddsTriple {
    /// Validates that every price is finite and strictly above 1.0.
    pub fn try_new(home: f64, draw: f64, away: f64) -> Result<Self, EngineError> {
        Ok(Self {
            home: ensure_decimal_odds("home", home)?,
            draw: ensure_decimal_odds("draw", draw)?,
            away: ensure_decimal_odds("away", away)?,
        })
    }

    pub const fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    /// Raw implied probabilities `1/odds`, margin included.
    pub fn implied(&self) -> [f64; 3] {
        [1.0 / self.home, 1.0 / self.draw, 1.0 / self.away]
    }

    /// Sum of implied probabilities. Above 1.0 for a real book.
    pub fn overround(&self) -> f64 {
        self.implied().iter().sum()
    }
}

/// A bookmaker's price for the three outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub bookmaker: String,
    pub odds: OddsTriple,
}

impl Quote {
    pub fn new(bookmaker: impl Into<String>, odds: OddsTriple) -> Self {
        Self {
            bookmaker: bookmaker.into(),
            odds,
        }
    }
}

/// Parses `NAME:HOME,DRAW,AWAY`, e.g. `bet365:2.10,3.40,3.80`.
impl FromStr for Quote {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, prices) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected NAME:HOME,DRAW,AWAY, got `{s}`"))?;

        let parsed = prices
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("bad price in `{s}`: {e}"))?;

        let [home, draw, away] = parsed[..] else {
            return Err(format!("expected three prices in `{s}`, got {}", parsed.len()));
        };

        let odds = OddsTriple::try_new(home, draw, away).map_err(|e| e.to_string())?;
        Ok(Self::new(name.trim(), odds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_sums_to_one() {
        let p = OutcomeProbabilities::normalized(0.4, 0.3, 0.2);
        assert!((p.total() - 1.0).abs() < 1e-12);
        assert!((p.home - 0.4 / 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_zero_total_passes_through() {
        let p = OutcomeProbabilities::normalized(0.0, 0.0, 0.0);
        assert_eq!(p.total(), 0.0);
    }

    #[test]
    fn test_favourite() {
        let p = OutcomeProbabilities::normalized(0.2, 0.3, 0.5);
        assert_eq!(p.favourite(), Outcome::Away);
        assert_eq!(p.fair_odds(Outcome::Away), Some(2.0));
    }

    #[test]
    fn test_odds_triple_rejects_even_money_or_less() {
        assert!(OddsTriple::try_new(1.0, 3.0, 4.0).is_err());
        assert!(OddsTriple::try_new(2.0, 0.5, 4.0).is_err());
        assert!(OddsTriple::try_new(2.0, 3.0, f64::INFINITY).is_err());
        assert!(OddsTriple::try_new(1.01, 3.0, 4.0).is_ok());
    }

    #[test]
    fn test_overround() {
        let odds = OddsTriple::try_new(2.0, 4.0, 4.0).unwrap();
        assert!((odds.overround() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_quote() {
        let q: Quote = "Pinnacle:2.10,3.40,3.80".parse().unwrap();
        assert_eq!(q.bookmaker, "Pinnacle");
        assert_eq!(q.odds.draw, 3.40);
    }

    #[test]
    fn test_deserialize_odds_runs_price_checks() {
        let ok: OddsTriple =
            serde_json::from_str(r#"{"home": 2.1, "draw": 3.4, "away": 3.8}"#).unwrap();
        assert_eq!(ok, OddsTriple::try_new(2.1, 3.4, 3.8).unwrap());

        assert!(serde_json::from_str::<OddsTriple>(r#"{"home": 1.0, "draw": 3.4, "away": 3.8}"#).is_err());
        assert!(serde_json::from_str::<OddsTriple>(r#"{"home": 2.1, "draw": -3.4, "away": 3.8}"#).is_err());
        assert!(serde_json::from_str::<OddsTriple>(r#"{"home": 2.1, "draw": 0.0, "away": 3.8}"#).is_err());
    }

    #[test]
    fn test_deserialize_quote_rejects_bad_book() {
        let bad = r#"{"bookmaker": "X", "odds": {"home": 0.5, "draw": 3.4, "away": 3.8}}"#;
        let err = serde_json::from_str::<Quote>(bad).unwrap_err();
        assert!(err.to_string().contains("decimal odds must exceed 1.0"), "{err}");

        let good = r#"{"bookmaker": "X", "odds": {"home": 1.5, "draw": 3.4, "away": 3.8}}"#;
        assert_eq!(serde_json::from_str::<Quote>(good).unwrap().odds.home, 1.5);
    }

    #[test]
    fn test_parse_quote_rejects_two_prices() {
        assert!("x:2.0,3.0".parse::<Quote>().is_err());
        assert!("2.0,3.0,4.0".parse::<Quote>().is_err());
        assert!("x:1.0,3.0,4.0".parse::<Quote>().is_err());
    }
}
