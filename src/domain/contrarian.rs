//! Contrarian team ratings.
//!
//! Scores each team's recent results against the fair odds it was
//! priced at: a win earns `1 − 1/odds`, a draw or loss costs `1/odds`.
//! A team that keeps underperforming its prices runs "cold". The match
//! rating is home minus away, and strongly negative or positive ratings
//! point at the cold side as a contrarian pick.

use serde::{Deserialize, Serialize};

use super::outcome::Outcome;

/// Match rating magnitude beyond which the signal is strong.
pub const STRONG_SIGNAL: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

/// One past match from a team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalMatch {
    pub result: MatchResult,
    /// Fair (margin-free) odds the team was priced at before kick-off.
    pub fair_odds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStrength {
    Strong,
    Weak,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrarianSignal {
    pub home_rating: f64,
    pub away_rating: f64,
    /// `home_rating − away_rating`.
    pub match_rating: f64,
    pub strength: SignalStrength,
    /// The cold side, if any.
    pub pick: Option<Outcome>,
}

/// Sum of per-match scores. Zero for an empty history. Matches with
/// non-positive or non-finite odds are skipped.
pub fn team_rating(history: &[HistoricalMatch]) -> f64 {
    history
        .iter()
        .filter(|m| m.fair_odds.is_finite() && m.fair_odds > 0.0)
        .map(|m| match m.result {
            MatchResult::Win => 1.0 - 1.0 / m.fair_odds,
            MatchResult::Draw | MatchResult::Loss => -1.0 / m.fair_odds,
        })
        .sum()
}

/// Contrarian signal for a fixture.
pub fn contrarian_signal(home: &[HistoricalMatch], away: &[HistoricalMatch]) -> ContrarianSignal {
    let home_rating = team_rating(home);
    let away_rating = team_rating(away);
    let match_rating = home_rating - away_rating;

    let (strength, pick) = if match_rating < -STRONG_SIGNAL {
        (SignalStrength::Strong, Some(Outcome::Home))
    } else if match_rating > STRONG_SIGNAL {
        (SignalStrength::Strong, Some(Outcome::Away))
    } else if match_rating < 0.0 {
        (SignalStrength::Weak, Some(Outcome::Home))
    } else if match_rating > 0.0 {
        (SignalStrength::Weak, Some(Outcome::Away))
    } else {
        (SignalStrength::None, None)
    };

    ContrarianSignal {
        home_rating,
        away_rating,
        match_rating,
        strength,
        pick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(result: MatchResult, fair_odds: f64) -> HistoricalMatch {
        HistoricalMatch { result, fair_odds }
    }

    #[test]
    fn test_team_rating() {
        let history = [m(MatchResult::Win, 2.0), m(MatchResult::Loss, 4.0), m(MatchResult::Draw, 5.0)];
        assert!((team_rating(&history) - (0.5 - 0.25 - 0.2)).abs() < 1e-12);
        assert_eq!(team_rating(&[]), 0.0);
    }

    #[test]
    fn test_strong_signal_on_cold_home() {
        let home: Vec<_> = (0..8).map(|_| m(MatchResult::Loss, 1.5)).collect();
        let signal = contrarian_signal(&home, &[]);
        assert!(signal.match_rating < -3.0);
        assert_eq!(signal.strength, SignalStrength::Strong);
        assert_eq!(signal.pick, Some(Outcome::Home));
    }

    #[test]
    fn test_weak_signal_on_cold_away() {
        let away = [m(MatchResult::Loss, 2.0)];
        let signal = contrarian_signal(&[], &away);
        assert!((signal.match_rating - 0.5).abs() < 1e-12);
        assert_eq!(signal.strength, SignalStrength::Weak);
        assert_eq!(signal.pick, Some(Outcome::Away));
    }

    #[test]
    fn test_balanced_has_no_signal() {
        let signal = contrarian_signal(&[], &[]);
        assert_eq!(signal.strength, SignalStrength::None);
        assert_eq!(signal.pick, None);
    }
}
