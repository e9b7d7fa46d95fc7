//! Secant iteration with bound fallback and step clamping.

use crate::error::SolverError;
use crate::{RootResult, eval};
use tracing::{debug, warn};

/// Relative size of the perturbation that creates the second starting point.
const START_PERTURBATION: f64 = 1e-4;

/// Secant solver configuration.
#[derive(Clone, Copy, Debug)]
pub struct SecantConfig {
    /// Relative step tolerance: converged once `|dx| < tol * (1 + |x|)`
    pub tol: f64,
    /// Absolute residual tolerance (0 disables the residual test)
    pub f_tol: f64,
    /// Lower bound on iterates
    pub x_min: f64,
    /// Upper bound on iterates
    pub x_max: f64,
    /// Largest allowed single step
    pub max_step: f64,
    /// Iteration cap
    pub max_iterations: usize,
}

impl Default for SecantConfig {
    fn default() -> Self {
        Self {
            tol: 1e-10,
            f_tol: 0.0,
            x_min: f64::NEG_INFINITY,
            x_max: f64::INFINITY,
            max_step: f64::INFINITY,
            max_iterations: 100,
        }
    }
}

impl SecantConfig {
    pub fn with_bounds(mut self, x_min: f64, x_max: f64) -> Self {
        self.x_min = x_min;
        self.x_max = x_max;
        self
    }

    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = max_step;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    fn validate(&self, x0: f64) -> Result<(), SolverError> {
        if !x0.is_finite() {
            return Err(SolverError::InvalidArg {
                what: "initial guess must be finite",
            });
        }
        if !(self.x_min < self.x_max) {
            return Err(SolverError::InvalidArg {
                what: "x_min must be below x_max",
            });
        }
        if x0 < self.x_min || x0 > self.x_max {
            return Err(SolverError::InvalidArg {
                what: "initial guess outside bounds",
            });
        }
        if !(self.tol > 0.0) || !(self.max_step > 0.0) || self.max_iterations == 0 {
            return Err(SolverError::InvalidArg {
                what: "tolerance, step limit and iteration cap must be positive",
            });
        }
        Ok(())
    }

    /// Pull an iterate that left the bounds back to the midpoint between the
    /// current point and the violated bound.
    fn fallback(&self, from: f64, to: f64) -> f64 {
        if to < self.x_min {
            0.5 * (from + self.x_min)
        } else if to > self.x_max {
            0.5 * (from + self.x_max)
        } else {
            to
        }
    }
}

/// Find `x` with `f(x) ≈ 0` starting from `x0`.
///
/// The second starting point is a small perturbation of `x0`. Steps are
/// clamped to `max_step`, and an iterate that would leave `[x_min, x_max]` is
/// replaced by the midpoint toward the violated bound.
pub fn secant_solve<F, E>(mut f: F, x0: f64, config: &SecantConfig) -> Result<RootResult, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<SolverError>,
{
    config.validate(x0)?;

    let mut xa = x0;
    let mut fa = eval(&mut f, xa)?;
    if fa.abs() <= config.f_tol {
        return Ok(RootResult {
            x: xa,
            residual: fa,
            iterations: 0,
        });
    }

    let delta = START_PERTURBATION * (1.0 + xa.abs());
    let mut xb = if xa + delta <= config.x_max {
        xa + delta
    } else {
        xa - delta
    };
    xb = config.fallback(xa, xb);
    let mut fb = eval(&mut f, xb)?;

    // Keep the better point as the current iterate
    if fa.abs() > fb.abs() {
        std::mem::swap(&mut xa, &mut xb);
        std::mem::swap(&mut fa, &mut fb);
    }

    for iteration in 1..=config.max_iterations {
        if fa.abs() <= config.f_tol {
            return Ok(RootResult {
                x: xa,
                residual: fa,
                iterations: iteration - 1,
            });
        }

        let df = fa - fb;
        if df == 0.0 {
            warn!(x = xa, residual = fa, "secant stalled");
            return Err(SolverError::Stalled {
                x: xa,
                residual: fa,
            }
            .into());
        }

        let mut dx = fa * (xa - xb) / df;
        if dx.abs() > config.max_step {
            dx = config.max_step.copysign(dx);
        }

        if dx.abs() < config.tol * (1.0 + xa.abs()) {
            let x = (xa - dx).clamp(config.x_min, config.x_max);
            debug!(iteration, x, residual = fa, "secant converged");
            return Ok(RootResult {
                x,
                residual: fa,
                iterations: iteration - 1,
            });
        }

        let x_next = config.fallback(xa, xa - dx);
        xb = xa;
        fb = fa;
        xa = x_next;
        fa = eval(&mut f, xa)?;
        debug!(iteration, x = xa, residual = fa, "secant step");
    }

    warn!(
        iterations = config.max_iterations,
        x = xa,
        residual = fa,
        "secant hit iteration cap"
    );
    Err(SolverError::NonConvergence {
        method: "secant",
        iterations: config.max_iterations,
        best_x: xa,
        residual: fa,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(
        f: impl FnMut(f64) -> Result<f64, SolverError>,
        x0: f64,
        config: &SecantConfig,
    ) -> Result<RootResult, SolverError> {
        secant_solve(f, x0, config)
    }

    #[test]
    fn finds_square_root() {
        let result = solve(|x| Ok(x * x - 2.0), 1.0, &SecantConfig::default()).unwrap();
        assert!((result.x - 2.0_f64.sqrt()).abs() < 1e-9);
        assert!(result.iterations < 20);
    }

    #[test]
    fn stays_inside_bounds() {
        // ln(x) is undefined for x <= 0; the first secant step from 5.0
        // overshoots below zero and must be pulled back.
        let mut lowest = f64::INFINITY;
        let config = SecantConfig::default().with_bounds(0.0, 100.0);
        let result = solve(
            |x| {
                lowest = lowest.min(x);
                Ok(x.ln() - 0.1)
            },
            50.0,
            &config,
        )
        .unwrap();
        assert!((result.x - 0.1_f64.exp()).abs() < 1e-8);
        assert!(lowest > 0.0);
    }

    #[test]
    fn step_is_clamped() {
        let mut previous: Option<f64> = None;
        let mut largest_jump: f64 = 0.0;
        let config = SecantConfig::default().with_max_step(0.5);
        let result = solve(
            |x| {
                if let Some(p) = previous {
                    largest_jump = largest_jump.max((x - p).abs());
                }
                previous = Some(x);
                Ok(x - 10.0)
            },
            0.0,
            &config,
        )
        .unwrap();
        assert!((result.x - 10.0).abs() < 1e-8);
        assert!(largest_jump <= 0.5 + 1e-12);
    }

    #[test]
    fn reports_non_convergence() {
        let config = SecantConfig {
            max_iterations: 2,
            ..SecantConfig::default()
        };
        let err = solve(|x| Ok(x.powi(3) - x - 50.0), 0.5, &config).unwrap_err();
        assert!(matches!(
            err,
            SolverError::NonConvergence { iterations: 2, .. }
        ));
        assert!(err.best_estimate().is_some());
    }

    #[test]
    fn rejects_guess_outside_bounds() {
        let config = SecantConfig::default().with_bounds(0.0, 1.0);
        let err = solve(|x| Ok(x), 2.0, &config).unwrap_err();
        assert!(matches!(err, SolverError::InvalidArg { .. }));
    }

    #[test]
    fn propagates_residual_errors() {
        let err = solve(
            |x| {
                if x > 1.0 {
                    Err(SolverError::InvalidArg { what: "too big" })
                } else {
                    Ok(x - 3.0)
                }
            },
            0.9,
            &SecantConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, SolverError::InvalidArg { what: "too big" });
    }

    #[test]
    fn flat_residual_stalls() {
        let err = solve(|_| Ok(1.0), 0.0, &SecantConfig::default()).unwrap_err();
        assert!(matches!(err, SolverError::Stalled { .. }));
    }
}
