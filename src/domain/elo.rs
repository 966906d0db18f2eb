//! Elo-style rating model for three-way football markets.
//!
//! The two-way win expectancy is the standard logistic rating curve.
//! A draw probability that decays with the squared rating gap is carved
//! out first, and the remaining mass is split by the two-way expectancy.

use serde::{Deserialize, Serialize};

use super::error::{ensure_finite, EngineError};
use super::outcome::OutcomeProbabilities;

/// Rating model constants.
///
/// The standard values are empirical and must stay as they are for the
/// probabilities to match previously published numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingModel {
    /// Points added to the home side before differencing.
    pub home_advantage: f64,
    /// Draw probability at a rating gap of zero.
    pub draw_peak: f64,
    /// Gaussian decay of the draw probability in the rating gap.
    pub draw_decay: f64,
}

impl RatingModel {
    pub const STANDARD: Self = Self {
        home_advantage: 65.0,
        draw_peak: 0.32,
        draw_decay: 0.000_012,
    };

    /// Home/draw/away probabilities from two ratings.
    ///
    /// Ratings may be any real number.
    ///
    /// # Errors
    /// `InvalidInput` if either rating is non-finite.
    pub fn compute_from_ratings(
        &self,
        home_rating: f64,
        away_rating: f64,
    ) -> Result<OutcomeProbabilities, EngineError> {
        let home_rating = ensure_finite("home_rating", home_rating)?;
        let away_rating = ensure_finite("away_rating", away_rating)?;

        let diff = self.rating_gap(home_rating, away_rating);
        let two_way = expected_score(diff);
        let draw = self.draw_probability(diff);

        Ok(OutcomeProbabilities::normalized(
            two_way * (1.0 - draw),
            draw,
            (1.0 - two_way) * (1.0 - draw),
        ))
    }

    /// `(home + advantage) − away`.
    pub fn rating_gap(&self, home_rating: f64, away_rating: f64) -> f64 {
        (home_rating + self.home_advantage) - away_rating
    }

    /// `draw_peak · e^(−draw_decay · d²)`.
    pub fn draw_probability(&self, diff: f64) -> f64 {
        self.draw_peak * (-self.draw_decay * diff * diff).exp()
    }
}

impl Default for RatingModel {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Two-way expectancy `1 / (1 + 10^(−d/400))`.
pub fn expected_score(diff: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(-diff / 400.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_ratings_favour_home() {
        let p = RatingModel::STANDARD.compute_from_ratings(1500.0, 1500.0).unwrap();
        assert!(p.home > p.away, "home {} away {}", p.home, p.away);
        assert!((p.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_draw_peaks_at_zero_gap() {
        let model = RatingModel::STANDARD;
        // Away side exactly cancels the home advantage.
        let p = model.compute_from_ratings(1500.0, 1565.0).unwrap();
        assert!((p.draw - 0.32).abs() < 1e-12);
        assert!((p.home - p.away).abs() < 1e-12);
        assert!((p.home - 0.34).abs() < 1e-12);
    }

    #[test]
    fn test_known_gap() {
        let model = RatingModel::STANDARD;
        let p = model.compute_from_ratings(1735.0, 1400.0).unwrap();
        let d: f64 = 400.0;
        let two_way = 1.0 / (1.0 + 10f64.powf(-1.0));
        let draw = 0.32 * (-0.000_012 * d * d).exp();
        assert!((p.draw - draw).abs() < 1e-12);
        assert!((p.home - two_way * (1.0 - draw)).abs() < 1e-12);
    }

    #[test]
    fn test_large_gap_shrinks_draw() {
        let model = RatingModel::STANDARD;
        let close = model.compute_from_ratings(1600.0, 1550.0).unwrap();
        let wide = model.compute_from_ratings(2000.0, 1400.0).unwrap();
        assert!(wide.draw < close.draw);
        assert!(wide.home > close.home);
    }

    #[test]
    fn test_negative_ratings_allowed() {
        assert!(RatingModel::STANDARD.compute_from_ratings(-200.0, 50.0).is_ok());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(RatingModel::STANDARD.compute_from_ratings(f64::NAN, 1500.0).is_err());
        assert!(RatingModel::STANDARD
            .compute_from_ratings(1500.0, f64::NEG_INFINITY)
            .is_err());
    }

    #[test]
    fn test_bit_identical_on_repeat() {
        for (home, away) in [(1500.0, 1500.0), (1712.5, 1488.0), (1300.0, 2100.0)] {
            let a = RatingModel::STANDARD.compute_from_ratings(home, away).unwrap();
            let b = RatingModel::STANDARD.compute_from_ratings(home, away).unwrap();
            assert_eq!(a, b);
        }
    }
}
