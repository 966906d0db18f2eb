//! Poisson goal model.
//!
//! Turns two expected-goal rates into a full set of match markets:
//! 1X2, over/under lines, clean sheets, both-teams-to-score and a
//! correct-score grid. Goals for each side are independent Poisson
//! variables, so every market is an aggregation of the same joint
//! distribution `P(i, j) = P_home(i) · P_away(j)`.
//!
//! Two horizons are kept apart on purpose:
//! - `summation_horizon` (S) bounds the goal counts summed for the
//!   aggregate markets
//! - `matrix_horizon` (M) bounds the displayed correct-score grid,
//!   which is a truncated view and does not sum to 1

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::error::{ensure_non_negative, EngineError};
use super::outcome::OutcomeProbabilities;

/// Over/under lines priced by default.
pub const DEFAULT_TOTALS_LINES: [f64; 5] = [0.5, 1.5, 2.5, 3.5, 4.5];

/// Rates above this are accepted but worth flagging to the user.
pub const UNUSUAL_RATE: f64 = 10.0;

/// Poisson goal model parameters.
///
/// Deserialized models are checked by [`GoalModel::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GoalModelParams")]
pub struct GoalModel {
    summation_horizon: usize,
    matrix_horizon: usize,
    totals_lines: Cow<'static, [f64]>,
}

/// Unchecked wire form of [`GoalModel`].
#[derive(Deserialize)]
struct GoalModelParams {
    summation_horizon: usize,
    matrix_horizon: usize,
    totals_lines: Vec<f64>,
}

impl TryFrom<GoalModelParams> for GoalModel {
    type Error = EngineError;

    fn try_from(p: GoalModelParams) -> Result<Self, Self::Error> {
        Self::new(p.summation_horizon, p.matrix_horizon, p.totals_lines)
    }
}

/// Over/under probabilities for a single line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TotalsLine {
    pub threshold: f64,
    pub over: f64,
    pub under: f64,
}

/// Probability that each side keeps a clean sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleanSheet {
    pub home: f64,
    pub away: f64,
}

/// Both-teams-to-score market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BothTeamsToScore {
    pub yes: f64,
    pub no: f64,
}

/// Correct-score probabilities, rows = home goals, columns = away goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreGrid {
    cells: Vec<Vec<f64>>,
}

impl ScoreGrid {
    /// Highest goal count on each axis.
    pub fn max_goals(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// `P(home scores exactly i, away scores exactly j)` if inside the grid.
    pub fn get(&self, home_goals: usize, away_goals: usize) -> Option<f64> {
        self.cells.get(home_goals)?.get(away_goals).copied()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.cells
    }

    /// Mass covered by the grid. Strictly below 1 for positive rates.
    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    /// Most likely scoreline inside the grid as `(home, away, probability)`.
    pub fn most_likely(&self) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for (i, row) in self.cells.iter().enumerate() {
            for (j, &p) in row.iter().enumerate() {
                if best.is_none_or(|(_, _, b)| p > b) {
                    best = Some((i, j, p));
                }
            }
        }
        best
    }
}

/// Every market derived from one pair of goal rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchProbabilities {
    pub home_rate: f64,
    pub away_rate: f64,
    pub full_time: OutcomeProbabilities,
    pub totals: Vec<TotalsLine>,
    pub clean_sheet: CleanSheet,
    pub btts: BothTeamsToScore,
    pub correct_scores: ScoreGrid,
    /// Per-goal-count pmf for the home side over `0..=S`.
    pub home_goals: Vec<f64>,
    /// Per-goal-count pmf for the away side over `0..=S`.
    pub away_goals: Vec<f64>,
    /// Joint mass inside the summation horizon before renormalizing.
    pub captured_mass: f64,
}

impl MatchProbabilities {
    /// Looks up a totals line by threshold.
    pub fn totals_line(&self, threshold: f64) -> Option<&TotalsLine> {
        self.totals
            .iter()
            .find(|l| (l.threshold - threshold).abs() < f64::EPSILON)
    }
}

impl GoalModel {
    /// S = 15 summation horizon, M = 4 display grid, lines 0.5 to 4.5.
    pub const STANDARD: Self = Self {
        summation_horizon: 15,
        matrix_horizon: 4,
        totals_lines: Cow::Borrowed(&DEFAULT_TOTALS_LINES),
    };

    /// Builds a model with custom horizons.
    ///
    /// The display grid must fit inside the summation horizon.
    pub fn new(
        summation_horizon: usize,
        matrix_horizon: usize,
        totals_lines: Vec<f64>,
    ) -> Result<Self, EngineError> {
        if matrix_horizon > summation_horizon {
            return Err(EngineError::invalid(
                "matrix_horizon",
                matrix_horizon as f64,
                "must not exceed summation_horizon",
            ));
        }
        for &line in &totals_lines {
            ensure_non_negative("totals_line", line)?;
        }
        Ok(Self {
            summation_horizon,
            matrix_horizon,
            totals_lines: Cow::Owned(totals_lines),
        })
    }

    pub const fn summation_horizon(&self) -> usize {
        self.summation_horizon
    }

    pub const fn matrix_horizon(&self) -> usize {
        self.matrix_horizon
    }

    /// Computes every market for a fixture.
    ///
    /// # Errors
    /// `InvalidInput` if either rate is negative or non-finite.
    pub fn compute_all(
        &self,
        home_rate: f64,
        away_rate: f64,
    ) -> Result<MatchProbabilities, EngineError> {
        let home_rate = ensure_non_negative("home_rate", home_rate)?;
        let away_rate = ensure_non_negative("away_rate", away_rate)?;

        let log_factorials = log_factorial_table(self.summation_horizon);
        let home_weights = log_weights(home_rate, &log_factorials);
        let away_weights = log_weights(away_rate, &log_factorials);
        let home_goals = goal_distribution(home_rate, &home_weights);
        let away_goals = goal_distribution(away_rate, &away_weights);

        let full_time = full_time_result(&home_weights, &away_weights);
        let captured_mass = home_goals.iter().sum::<f64>() * away_goals.iter().sum::<f64>();

        Ok(MatchProbabilities {
            home_rate,
            away_rate,
            full_time,
            totals: self.totals(&home_goals, &away_goals),
            clean_sheet: CleanSheet {
                home: away_goals[0],
                away: home_goals[0],
            },
            btts: btts(home_goals[0], away_goals[0]),
            correct_scores: self.score_grid(&home_goals, &away_goals),
            home_goals,
            away_goals,
            captured_mass,
        })
    }

    fn totals(&self, home: &[f64], away: &[f64]) -> Vec<TotalsLine> {
        // buckets[n] = P(total goals == n)
        let mut buckets = vec![0.0; home.len() + away.len() - 1];
        for (i, p_i) in home.iter().enumerate() {
            for (j, p_j) in away.iter().enumerate() {
                buckets[i + j] += p_i * p_j;
            }
        }

        self.totals_lines
            .iter()
            .map(|&threshold| {
                let (mut over, mut under) = (0.0, 0.0);
                for (goals, p) in buckets.iter().enumerate() {
                    if goals as f64 > threshold {
                        over += p;
                    } else {
                        under += p;
                    }
                }
                TotalsLine {
                    threshold,
                    over,
                    under,
                }
            })
            .collect()
    }

    fn score_grid(&self, home: &[f64], away: &[f64]) -> ScoreGrid {
        let m = self.matrix_horizon;
        let cells = home[..=m]
            .iter()
            .map(|p_i| away[..=m].iter().map(|p_j| p_i * p_j).collect())
            .collect();
        ScoreGrid { cells }
    }
}

impl Default for GoalModel {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Whether a rate is high enough that callers should flag it.
pub fn is_unusual_rate(rate: f64) -> bool {
    rate > UNUSUAL_RATE
}

/// `ln k!` for `k` in `0..=n`, local to one computation.
fn log_factorial_table(n: usize) -> Vec<f64> {
    let mut table = Vec::with_capacity(n + 1);
    table.push(0.0);
    for k in 1..=n {
        table.push(table[k - 1] + (k as f64).ln());
    }
    table
}

/// `k·ln λ − ln k!`, the log pmf without its `−λ` term.
///
/// The `k = 0` weight is 0 for every rate, including `λ = 0`, and
/// higher counts go to `−∞` when `λ = 0`.
fn log_weights(rate: f64, log_factorials: &[f64]) -> Vec<f64> {
    let log_rate = rate.ln();
    log_factorials
        .iter()
        .enumerate()
        .map(|(k, lf)| if k == 0 { 0.0 } else { k as f64 * log_rate - lf })
        .collect()
}

/// `P(k; λ) = exp(k·ln λ − λ − ln k!)` for every weighted `k`.
///
/// Underflows to 0 once `λ` is far beyond the summation horizon.
fn goal_distribution(rate: f64, weights: &[f64]) -> Vec<f64> {
    weights.iter().map(|w| (w - rate).exp()).collect()
}

/// Weights shifted so the largest becomes `e⁰ = 1`.
///
/// Proportional to the pmf over `0..=S`, and never all zero.
fn scaled_weights(weights: &[f64]) -> Vec<f64> {
    let peak = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    weights.iter().map(|w| (w - peak).exp()).collect()
}

/// 1X2 probabilities conditioned on both sides staying inside the horizon.
///
/// Works on peak-scaled weights, so the result stays a distribution
/// for rates whose raw pmf underflows.
fn full_time_result(home_weights: &[f64], away_weights: &[f64]) -> OutcomeProbabilities {
    let home = scaled_weights(home_weights);
    let away = scaled_weights(away_weights);
    let (mut p_home, mut p_draw, mut p_away) = (0.0, 0.0, 0.0);
    for (i, p_i) in home.iter().enumerate() {
        for (j, p_j) in away.iter().enumerate() {
            let p = p_i * p_j;
            if i > j {
                p_home += p;
            } else if i < j {
                p_away += p;
            } else {
                p_draw += p;
            }
        }
    }
    OutcomeProbabilities::normalized(p_home, p_draw, p_away)
}

fn btts(home_blank: f64, away_blank: f64) -> BothTeamsToScore {
    let yes = (1.0 - home_blank) * (1.0 - away_blank);
    BothTeamsToScore { yes, no: 1.0 - yes }
}
