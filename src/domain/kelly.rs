//! Kelly Criterion stake sizing for decimal-odds bets.
//!
//! Given a fair probability from one of the pricing models and a price
//! offered by a bookmaker, returns the full, half and quarter Kelly
//! bankroll fractions. Fractions are returned as `f64`; conversion to a
//! currency stake goes through `Decimal` and is rounded to cents.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Which Kelly multiple to stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KellyTier {
    Full,
    Half,
    /// Default: retains most of the growth rate at a fraction of the variance.
    #[default]
    Quarter,
}

/// Bankroll fractions at full, half and quarter Kelly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KellyFraction {
    pub full: f64,
    pub half: f64,
    pub quarter: f64,
}

impl KellyFraction {
    pub const fn get(&self, tier: KellyTier) -> f64 {
        match tier {
            KellyTier::Full => self.full,
            KellyTier::Half => self.half,
            KellyTier::Quarter => self.quarter,
        }
    }
}

/// Kelly fractions for a bet at decimal odds `offered_odds` that wins
/// with probability `fair_prob`.
///
/// Kelly formula for decimal odds:
///   f* = p − (1 − p) / b,  b = odds − 1
///
/// Returns `None` when there is no positive edge (`p ≤ 1/odds`), when the
/// odds are not above 1.0, or when `p` lies outside `(0, 1)`.
pub fn kelly_stake(fair_prob: f64, offered_odds: f64) -> Option<KellyFraction> {
    if !fair_prob.is_finite() || !offered_odds.is_finite() {
        return None;
    }
    if fair_prob <= 0.0 || fair_prob >= 1.0 || offered_odds <= 1.0 {
        return None;
    }
    if fair_prob <= 1.0 / offered_odds {
        return None;
    }

    let b = offered_odds - 1.0;
    let full = fair_prob - (1.0 - fair_prob) / b;
    if full <= 0.0 {
        return None;
    }

    Some(KellyFraction {
        full,
        half: full / 2.0,
        quarter: full / 4.0,
    })
}

/// Turns Kelly fractions into currency stakes.
///
/// The tier picks the multiple; `max_fraction` caps the share of bankroll
/// any single bet may take.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KellySizer {
    tier: KellyTier,
    max_fraction: Decimal,
}

impl KellySizer {
    pub const fn new(tier: KellyTier, max_fraction: Decimal) -> Self {
        Self { tier, max_fraction }
    }

    pub const fn tier(&self) -> KellyTier {
        self.tier
    }

    /// Bankroll fraction after tier selection and the cap. Zero without an edge.
    pub fn fraction(&self, fair_prob: f64, offered_odds: f64) -> Decimal {
        kelly_stake(fair_prob, offered_odds)
            .and_then(|k| Decimal::from_f64(k.get(self.tier)))
            .map_or(Decimal::ZERO, |f| f.min(self.max_fraction))
    }

    /// Stake in currency units, rounded to 2 dp.
    pub fn stake(&self, bankroll: Decimal, fair_prob: f64, offered_odds: f64) -> Decimal {
        if bankroll <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (bankroll * self.fraction(fair_prob, offered_odds)).round_dp(2)
    }
}

impl Default for KellySizer {
    /// Quarter Kelly, at most 10% of bankroll per bet.
    fn default() -> Self {
        Self::new(KellyTier::Quarter, dec!(0.10))
    }
}
