//! Bisection root-finder shared by the implicit margin models.
//!
//! Never fails and never loops forever: after `max_iterations` it hands
//! back the last midpoint together with its residual, so callers can
//! judge convergence quality separately from the result itself.

use serde::{Deserialize, Serialize};

/// Bisection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bisection {
    /// Stop as soon as `|f(mid)|` drops below this.
    pub tolerance: f64,
    /// Hard cap on halvings.
    pub max_iterations: u32,
}

/// Outcome of a bisection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Root {
    /// Best estimate of the root.
    pub value: f64,
    /// `f(value)`.
    pub residual: f64,
    /// Halvings performed.
    pub iterations: u32,
    /// Whether `|residual| < tolerance` was reached.
    pub converged: bool,
}

impl Bisection {
    pub const STANDARD: Self = Self {
        tolerance: 1e-9,
        max_iterations: 100,
    };

    pub const fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Searches `[lo, hi]` for a root of `f`.
    ///
    /// Each step keeps the lower half when `f(lo)·f(mid) < 0`, otherwise
    /// the upper half. If the bracket holds no sign change the estimate
    /// drifts to the `hi` end and `converged` stays false.
    pub fn solve<F>(&self, f: F, lo: f64, hi: f64) -> Root
    where
        F: Fn(f64) -> f64,
    {
        let (mut a, mut b) = (lo, hi);
        let mut mid = a;
        let mut residual = f(mid);

        for i in 1..=self.max_iterations {
            mid = (a + b) / 2.0;
            residual = f(mid);
            if residual.abs() < self.tolerance {
                return Root {
                    value: mid,
                    residual,
                    iterations: i,
                    converged: true,
                };
            }
            if f(a) * residual < 0.0 {
                b = mid;
            } else {
                a = mid;
            }
        }

        Root {
            value: mid,
            residual,
            iterations: self.max_iterations,
            converged: residual.abs() < self.tolerance,
        }
    }
}

impl Default for Bisection {
    fn default() -> Self {
        Self::STANDARD
    }
}
