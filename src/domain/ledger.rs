//! Bet ledger types and per-league performance statistics.
//!
//! The engine does not store bets. Callers hand in whatever records they
//! keep and get back settled profit, closing line value and per-league
//! aggregates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{ensure_decimal_odds, EngineError};
use super::value::closing_line_value;

/// Settlement state of a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    #[default]
    Pending,
    Won,
    Lost,
    Void,
}

/// A single logged bet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetRecord {
    pub id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    /// Free-form market label, e.g. "Home Win" or "Over 2.5".
    pub market: String,
    pub stake: Decimal,
    pub odds: f64,
    /// Probability the model gave the selection when the bet was struck.
    pub model_probability: f64,
    /// Kelly fraction recommended at placement, if any.
    pub kelly_recommendation: Option<f64>,
    pub closing_odds: Option<f64>,
    pub clv: Option<f64>,
    pub status: BetStatus,
}

impl BetRecord {
    /// Creates a pending bet with a fresh id.
    ///
    /// # Errors
    /// `InvalidInput` if the odds are not above 1.0.
    pub fn new(
        league: impl Into<String>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        market: impl Into<String>,
        stake: Decimal,
        odds: f64,
        model_probability: f64,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            id: Uuid::new_v4(),
            placed_at: Utc::now(),
            league: league.into(),
            home_team: home_team.into(),
            away_team: away_team.into(),
            market: market.into(),
            stake,
            odds: ensure_decimal_odds("odds", odds)?,
            model_probability,
            kelly_recommendation: None,
            closing_odds: None,
            clv: None,
            status: BetStatus::Pending,
        })
    }

    #[must_use]
    pub fn with_kelly_recommendation(mut self, fraction: f64) -> Self {
        self.kelly_recommendation = Some(fraction);
        self
    }

    /// Records the closing price and derives closing line value.
    ///
    /// # Errors
    /// `InvalidInput` if the closing price is not above 1.0.
    pub fn record_closing_odds(&mut self, closing_odds: f64) -> Result<f64, EngineError> {
        let clv = closing_line_value(self.odds, closing_odds)?;
        self.closing_odds = Some(closing_odds);
        self.clv = Some(clv);
        Ok(clv)
    }

    pub fn settle(&mut self, status: BetStatus) {
        self.status = status;
    }

    /// Realized profit: `(odds − 1) · stake` if won, `−stake` if lost,
    /// zero while pending or void.
    pub fn profit(&self) -> Decimal {
        match self.status {
            BetStatus::Won => {
                let odds = Decimal::from_f64(self.odds).unwrap_or(Decimal::ONE);
                ((odds - Decimal::ONE) * self.stake).round_dp(2)
            }
            BetStatus::Lost => -self.stake,
            BetStatus::Pending | BetStatus::Void => Decimal::ZERO,
        }
    }
}

/// Aggregate performance for one league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueBetStats {
    pub league: String,
    pub total_bets: usize,
    pub won_bets: usize,
    pub lost_bets: usize,
    pub void_bets: usize,
    pub total_stake: Decimal,
    pub total_profit: Decimal,
    /// Percentage of settled win/loss bets that won.
    pub win_rate: f64,
    /// Profit as a percentage of stake.
    pub roi: f64,
    /// Mean closing line value over bets with a closing price.
    pub average_clv: Option<f64>,
}

impl LeagueBetStats {
    fn empty(league: &str) -> Self {
        Self {
            league: league.to_string(),
            total_bets: 0,
            won_bets: 0,
            lost_bets: 0,
            void_bets: 0,
            total_stake: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            win_rate: 0.0,
            roi: 0.0,
            average_clv: None,
        }
    }
}

/// Per-league statistics, leagues in order of first appearance.
pub fn league_stats(bets: &[BetRecord]) -> Vec<LeagueBetStats> {
    let mut stats: Vec<LeagueBetStats> = Vec::new();
    let mut clv_sums: Vec<(f64, usize)> = Vec::new();

    for bet in bets {
        let idx = match stats.iter().position(|s| s.league == bet.league) {
            Some(i) => i,
            None => {
                stats.push(LeagueBetStats::empty(&bet.league));
                clv_sums.push((0.0, 0));
                stats.len() - 1
            }
        };
        let s = &mut stats[idx];

        s.total_bets += 1;
        s.total_stake += bet.stake;
        s.total_profit += bet.profit();
        match bet.status {
            BetStatus::Won => s.won_bets += 1,
            BetStatus::Lost => s.lost_bets += 1,
            BetStatus::Void => s.void_bets += 1,
            BetStatus::Pending => {}
        }
        if let Some(clv) = bet.clv {
            clv_sums[idx].0 += clv;
            clv_sums[idx].1 += 1;
        }
    }

    for (s, (clv_sum, clv_count)) in stats.iter_mut().zip(clv_sums) {
        let settled = s.won_bets + s.lost_bets;
        s.win_rate = if settled > 0 {
            s.won_bets as f64 / settled as f64 * 100.0
        } else {
            0.0
        };
        s.roi = if s.total_stake > Decimal::ZERO {
            (s.total_profit / s.total_stake * Decimal::ONE_HUNDRED)
                .to_f64()
                .unwrap_or(0.0)
        } else {
            0.0
        };
        s.average_clv = (clv_count > 0).then(|| clv_sum / clv_count as f64);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bet(league: &str, stake: Decimal, odds: f64, status: BetStatus) -> BetRecord {
        let mut b = BetRecord::new(league, "H", "A", "Home Win", stake, odds, 0.5).unwrap();
        b.settle(status);
        b
    }

    #[test]
    fn test_profit() {
        assert_eq!(bet("L", dec!(10), 2.5, BetStatus::Won).profit(), dec!(15.00));
        assert_eq!(bet("L", dec!(10), 2.5, BetStatus::Lost).profit(), dec!(-10));
        assert_eq!(bet("L", dec!(10), 2.5, BetStatus::Void).profit(), Decimal::ZERO);
        assert_eq!(bet("L", dec!(10), 2.5, BetStatus::Pending).profit(), Decimal::ZERO);
    }

    #[test]
    fn test_league_stats() {
        let bets = vec![
            bet("Serie A", dec!(10), 2.0, BetStatus::Won),
            bet("Bundesliga", dec!(20), 3.0, BetStatus::Lost),
            bet("Serie A", dec!(10), 2.0, BetStatus::Lost),
            bet("Serie A", dec!(10), 2.0, BetStatus::Void),
        ];
        let stats = league_stats(&bets);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].league, "Serie A");

        let serie_a = &stats[0];
        assert_eq!(serie_a.total_bets, 3);
        assert_eq!(serie_a.void_bets, 1);
        assert_eq!(serie_a.total_stake, dec!(30));
        assert_eq!(serie_a.total_profit, Decimal::ZERO);
        assert!((serie_a.win_rate - 50.0).abs() < 1e-12);
        assert_eq!(serie_a.roi, 0.0);

        let bundesliga = &stats[1];
        assert_eq!(bundesliga.win_rate, 0.0);
        assert!((bundesliga.roi + 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_pending_only_league() {
        let stats = league_stats(&[bet("Süper Lig", dec!(5), 1.9, BetStatus::Pending)]);
        assert_eq!(stats[0].win_rate, 0.0);
        assert_eq!(stats[0].total_profit, Decimal::ZERO);
        assert!(stats[0].average_clv.is_none());
    }

    #[test]
    fn test_closing_odds_sets_clv() {
        let mut b = bet("L", dec!(10), 2.2, BetStatus::Pending);
        let clv = b.record_closing_odds(2.0).unwrap();
        assert!((clv - 0.1).abs() < 1e-12);
        assert_eq!(b.clv, Some(clv));
        assert!(b.record_closing_odds(0.9).is_err());

        let stats = league_stats(&[b]);
        assert!((stats[0].average_clv.unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_odds() {
        assert!(BetRecord::new("L", "H", "A", "Draw", dec!(1), 1.0, 0.3).is_err());
    }
}
