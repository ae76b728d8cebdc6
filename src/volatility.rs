//! Re-estimation of the volatility after a rating period.
//!
//! The new volatility `σ'` is the root of
//!
//! ```text
//! f(x) = e^x (Δ² − φ² − v − e^x) / (2 (φ² + v + e^x)²) − (x − ln σ²) / τ²
//! ```
//!
//! at `x = ln σ'²`. There is no closed form, so the root is found with the
//! Illinois variant of regula falsi, starting from an interval that brackets
//! the root by construction. See step 5 of Glickman's
//! [Example of the Glicko-2 system](http://www.glicko.net/glicko/glicko2.pdf).

use tracing::{trace, warn};

use crate::{error::UpdateError, rating::Volatility};

/// Everything the solver needs to know about a rating period.
#[derive(Debug, Copy, Clone)]
pub(crate) struct VolatilityProblem {
    /// Squared internal deviation `φ²` of the player before the period.
    pub phi_sq: f64,
    /// Estimated variance `v` of the player's rating from game outcomes.
    pub variance: f64,
    /// Estimated improvement `Δ`.
    pub delta: f64,
    /// Volatility `σ` before the period.
    pub volatility: Volatility,
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct Solver {
    pub tau: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl VolatilityProblem {
    fn f(&self, x: f64, a: f64, tau_sq: f64) -> f64 {
        let ex = x.exp();
        let denominator = self.phi_sq + self.variance + ex;
        ex * (self.delta * self.delta - self.phi_sq - self.variance - ex)
            / (2.0 * denominator * denominator)
            - (x - a) / tau_sq
    }
}

impl Solver {
    pub fn solve(&self, problem: &VolatilityProblem) -> Result<Volatility, UpdateError> {
        let a = problem.volatility.sq().ln();
        let tau_sq = self.tau * self.tau;
        let f = |x: f64| problem.f(x, a, tau_sq);

        // Bracket the root with [A, B].
        let mut big_a = a;
        let excess = ensure_finite(
            problem.delta * problem.delta - problem.phi_sq - problem.variance,
            "volatility bracket",
        )?;
        let mut big_b = if excess > 0.0 {
            excess.ln()
        } else {
            let mut k = 1;
            loop {
                if k > self.max_iterations {
                    return Err(self.non_convergence("bracketing"));
                }
                let candidate = a - f64::from(k) * self.tau;
                if f(candidate) >= 0.0 {
                    break candidate;
                }
                k += 1;
            }
        };

        let mut f_a = f(big_a);
        let mut f_b = f(big_b);
        ensure_finite(f_a, "volatility bracket")?;
        ensure_finite(f_b, "volatility bracket")?;

        let mut iterations = 0;
        while (big_b - big_a).abs() > self.tolerance {
            if iterations >= self.max_iterations {
                return Err(self.non_convergence("root finding"));
            }
            iterations += 1;

            let big_c = big_a + (big_a - big_b) * f_a / (f_b - f_a);
            let f_c = f(big_c);
            ensure_finite(f_c, "volatility iteration")?;

            if f_c * f_b <= 0.0 {
                big_a = big_b;
                f_a = f_b;
            } else {
                f_a /= 2.0;
            }
            big_b = big_c;
            f_b = f_c;
        }

        trace!(iterations, "volatility converged");

        let volatility = (big_a / 2.0).exp();
        ensure_finite(volatility, "volatility")?;
        Ok(Volatility(volatility))
    }

    fn non_convergence(&self, phase: &str) -> UpdateError {
        warn!(
            phase,
            max_iterations = self.max_iterations,
            tau = self.tau,
            "volatility solver exceeded iteration cap"
        );
        UpdateError::NumericalNonConvergence {
            iterations: self.max_iterations,
        }
    }
}

pub(crate) fn ensure_finite(value: f64, stage: &'static str) -> Result<f64, UpdateError> {
    if value.is_finite() {
        Ok(value)
    } else {
        warn!(stage, value, "non-finite value in rating update");
        Err(UpdateError::NumericalInstability { stage })
    }
}
