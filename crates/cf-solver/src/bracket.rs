//! Bracketed root finding (Illinois false position).

use crate::error::SolverError;
use crate::{RootResult, eval};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug)]
pub struct BracketConfig {
    /// Relative tolerance on bracket width and successive iterates
    pub tol: f64,
    /// Absolute residual tolerance (0 disables the residual test)
    pub f_tol: f64,
    pub max_iterations: usize,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            tol: 1e-12,
            f_tol: 0.0,
            max_iterations: 200,
        }
    }
}

/// Find a root of `f` inside `[lo, hi]`, where `f(lo)` and `f(hi)` differ in
/// sign.
///
/// An optional interior `guess` is evaluated first and used to shrink the
/// bracket. Each step takes the false-position point, halving the retained
/// endpoint's residual when the same side is kept twice in a row, and falls
/// back to bisection if the interpolated point is not strictly inside.
pub fn bracketed_solve<F, E>(
    mut f: F,
    lo: f64,
    hi: f64,
    guess: Option<f64>,
    config: &BracketConfig,
) -> Result<RootResult, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<SolverError>,
{
    if !lo.is_finite() || !hi.is_finite() || !(lo < hi) {
        return Err(SolverError::InvalidArg {
            what: "bracket must be finite with lo < hi",
        }
        .into());
    }

    let (mut lo, mut hi) = (lo, hi);
    let mut f_lo = eval(&mut f, lo)?;
    if f_lo == 0.0 {
        return Ok(RootResult {
            x: lo,
            residual: 0.0,
            iterations: 0,
        });
    }
    let mut f_hi = eval(&mut f, hi)?;
    if f_hi == 0.0 {
        return Ok(RootResult {
            x: hi,
            residual: 0.0,
            iterations: 0,
        });
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(SolverError::InvalidBracket { lo, hi, f_lo, f_hi }.into());
    }

    if let Some(g) = guess.filter(|g| *g > lo && *g < hi) {
        let f_g = eval(&mut f, g)?;
        if f_g.abs() <= config.f_tol {
            return Ok(RootResult {
                x: g,
                residual: f_g,
                iterations: 0,
            });
        }
        if f_g.signum() == f_lo.signum() {
            lo = g;
            f_lo = f_g;
        } else {
            hi = g;
            f_hi = f_g;
        }
    }

    // -1 when lo was replaced last, +1 when hi was
    let mut side = 0_i8;
    let mut x_prev = f64::NAN;
    let mut fx = f_lo;

    for iteration in 1..=config.max_iterations {
        let mut x = (lo * f_hi - hi * f_lo) / (f_hi - f_lo);
        if !(x > lo && x < hi) {
            x = 0.5 * (lo + hi);
        }

        fx = eval(&mut f, x)?;
        if fx.abs() <= config.f_tol {
            debug!(iteration, x, residual = fx, "bracket converged on residual");
            return Ok(RootResult {
                x,
                residual: fx,
                iterations: iteration,
            });
        }

        if fx.signum() == f_hi.signum() {
            hi = x;
            f_hi = fx;
            if side == 1 {
                f_lo *= 0.5;
            }
            side = 1;
        } else {
            lo = x;
            f_lo = fx;
            if side == -1 {
                f_hi *= 0.5;
            }
            side = -1;
        }

        let scale = config.tol * (1.0 + x.abs());
        if (hi - lo) <= scale || (x - x_prev).abs() <= scale {
            debug!(iteration, x, residual = fx, "bracket converged");
            return Ok(RootResult {
                x,
                residual: fx,
                iterations: iteration,
            });
        }
        x_prev = x;
    }

    let best_x = if f_lo.abs() < f_hi.abs() { lo } else { hi };
    warn!(best_x, residual = fx, "bracketed solve hit iteration cap");
    Err(SolverError::NonConvergence {
        method: "false position",
        iterations: config.max_iterations,
        best_x,
        residual: fx,
    }
    .into())
}
