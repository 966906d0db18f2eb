//! Cross-bookmaker arbitrage detection and stake allocation.
//!
//! Takes the best price per outcome across a set of quotes. If the
//! implied probabilities of those best prices sum to less than 1, staking
//! each outcome in proportion to its implied probability returns the same
//! amount whichever result lands.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use super::outcome::{Outcome, Quote};

/// Best available price for one outcome and who offers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestPrice {
    pub odds: f64,
    pub bookmaker: String,
}

/// Per-outcome stakes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stakes {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl Stakes {
    pub const fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }
}

/// Result of scanning a quote set for arbitrage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitragePlan {
    pub best_home: BestPrice,
    pub best_draw: BestPrice,
    pub best_away: BestPrice,
    /// `Σ 1/best_odds`.
    pub implied_sum: f64,
    pub is_arbitrage: bool,
    /// `(1 − implied_sum) · 100`. Negative when there is no opportunity.
    pub profit_percentage: f64,
    /// Zero for every outcome when there is no arbitrage.
    pub stakes: Stakes,
    pub total_stake: f64,
    pub guaranteed_return: f64,
}

impl ArbitragePlan {
    pub const fn best(&self, outcome: Outcome) -> &BestPrice {
        match outcome {
            Outcome::Home => &self.best_home,
            Outcome::Draw => &self.best_draw,
            Outcome::Away => &self.best_away,
        }
    }

    /// Payout if `outcome` wins: `stake · best_odds`.
    pub fn payout(&self, outcome: Outcome) -> f64 {
        self.stakes.get(outcome) * self.best(outcome).odds
    }

    /// Largest gap between the three outcome payouts. Near zero for a
    /// correctly balanced plan.
    pub fn payout_spread(&self) -> f64 {
        let payouts = Outcome::ALL.map(|o| self.payout(o));
        let max = payouts.iter().copied().fold(f64::MIN, f64::max);
        let min = payouts.iter().copied().fold(f64::MAX, f64::min);
        max - min
    }

    /// Stakes rounded to cents for placing at the bookmaker.
    pub fn rounded_stakes(&self) -> [Decimal; 3] {
        Outcome::ALL.map(|o| {
            Decimal::from_f64(self.stakes.get(o))
                .unwrap_or(Decimal::ZERO)
                .round_dp(2)
        })
    }
}

/// Scans `quotes` for the best price per outcome and, when the book is
/// in arbitrage, splits `investment` across the three outcomes.
///
/// The first bookmaker to offer a maximum keeps it on ties. Returns
/// `None` for an empty quote set or a non-positive investment.
pub fn detect_arbitrage(quotes: &[Quote], investment: f64) -> Option<ArbitragePlan> {
    if quotes.is_empty() || !investment.is_finite() || investment <= 0.0 {
        return None;
    }

    let best_home = best_price(quotes, Outcome::Home)?;
    let best_draw = best_price(quotes, Outcome::Draw)?;
    let best_away = best_price(quotes, Outcome::Away)?;

    let implied = [
        1.0 / best_home.odds,
        1.0 / best_draw.odds,
        1.0 / best_away.odds,
    ];
    let implied_sum: f64 = implied.iter().sum();
    let is_arbitrage = implied_sum < 1.0;
    let profit_percentage = (1.0 - implied_sum) * 100.0;

    let (stakes, total_stake, guaranteed_return) = if is_arbitrage {
        let share = |p: f64| p / implied_sum * investment;
        let stakes = Stakes {
            home: share(implied[0]),
            draw: share(implied[1]),
            away: share(implied[2]),
        };
        let total = stakes.home + stakes.draw + stakes.away;
        (stakes, total, stakes.home * best_home.odds)
    } else {
        (Stakes::default(), 0.0, 0.0)
    };

    Some(ArbitragePlan {
        best_home,
        best_draw,
        best_away,
        implied_sum,
        is_arbitrage,
        profit_percentage,
        stakes,
        total_stake,
        guaranteed_return,
    })
}

/// Highest price for `outcome` across `quotes`, first bookmaker on ties.
pub fn best_price(quotes: &[Quote], outcome: Outcome) -> Option<BestPrice> {
    let mut best: Option<&Quote> = None;
    for quote in quotes {
        if best.is_none_or(|b| quote.odds.get(outcome) > b.odds.get(outcome)) {
            best = Some(quote);
        }
    }
    best.map(|q| BestPrice {
        odds: q.odds.get(outcome),
        bookmaker: q.bookmaker.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::outcome::OddsTriple;

    fn quote(name: &str, h: f64, d: f64, a: f64) -> Quote {
        Quote::new(name, OddsTriple::try_new(h, d, a).unwrap())
    }

    #[test]
    fn test_detects_arbitrage() {
        let quotes = vec![quote("A", 2.10, 3.40, 3.80), quote("B", 2.05, 3.60, 4.10)];
        let plan = detect_arbitrage(&quotes, 1000.0).unwrap();

        assert_eq!(plan.best_home.bookmaker, "A");
        assert_eq!(plan.best_draw.bookmaker, "B");
        assert_eq!(plan.best_away.bookmaker, "B");
        assert!(plan.is_arbitrage);
        assert!((plan.implied_sum - 0.9979).abs() < 1e-4);
        assert!((plan.profit_percentage - 0.21).abs() < 0.01);
        assert!((plan.total_stake - 1000.0).abs() < 1e-9);
        assert!(plan.payout_spread() < 1e-6);
        assert!(plan.guaranteed_return > plan.total_stake);
    }

    #[test]
    fn test_no_arbitrage_zero_stakes() {
        let quotes = vec![quote("A", 2.0, 3.2, 3.6), quote("B", 1.95, 3.3, 3.5)];
        let plan = detect_arbitrage(&quotes, 500.0).unwrap();
        assert!(!plan.is_arbitrage);
        assert!(plan.profit_percentage < 0.0);
        assert_eq!(plan.stakes, Stakes::default());
        assert_eq!(plan.total_stake, 0.0);
        assert_eq!(plan.guaranteed_return, 0.0);
    }

    #[test]
    fn test_first_bookmaker_wins_ties() {
        let quotes = vec![quote("first", 2.0, 3.0, 4.0), quote("second", 2.0, 3.0, 4.0)];
        let plan = detect_arbitrage(&quotes, 100.0).unwrap();
        assert_eq!(plan.best_home.bookmaker, "first");
    }

    #[test]
    fn test_empty_or_bad_investment() {
        assert!(detect_arbitrage(&[], 100.0).is_none());
        let quotes = vec![quote("A", 2.1, 3.6, 4.1)];
        assert!(detect_arbitrage(&quotes, 0.0).is_none());
        assert!(detect_arbitrage(&quotes, f64::NAN).is_none());
    }

    #[test]
    fn test_rounded_stakes() {
        let quotes = vec![quote("A", 2.10, 3.40, 3.80), quote("B", 2.05, 3.60, 4.10)];
        let plan = detect_arbitrage(&quotes, 100.0).unwrap();
        let rounded = plan.rounded_stakes();
        let total: Decimal = rounded.iter().sum();
        assert!((total - Decimal::ONE_HUNDRED).abs() <= Decimal::new(2, 2));
    }
}
