//! cf-solver: scalar root finding for flow-station resolution.
//!
//! Two methods share one result type:
//! - [`secant_solve`]: unbracketed secant with bound fallback, step clamp and
//!   an iteration cap, for problems with a good starting guess but no known
//!   bracket (e.g. static pressure for a target Mach number).
//! - [`bracketed_solve`]: Illinois false position with a bisection safeguard,
//!   for monotonic residuals with a known sign change (e.g. area matching).
//!
//! Residual closures return `Result<f64, E>` so property-evaluation failures
//! propagate untouched; solver failures reach the caller through
//! `E: From<SolverError>`.

pub mod bracket;
pub mod error;
pub mod secant;

pub use bracket::{BracketConfig, bracketed_solve};
pub use error::{SolverError, SolverResult};
pub use secant::{SecantConfig, secant_solve};

/// Converged root with diagnostics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootResult {
    /// Root estimate
    pub x: f64,
    /// Residual at the last evaluated iterate
    pub residual: f64,
    /// Residual evaluations performed, excluding the starting points
    pub iterations: usize,
}

/// Evaluate a residual and reject non-finite values before they poison the
/// iteration.
pub(crate) fn eval<F, E>(f: &mut F, x: f64) -> Result<f64, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<SolverError>,
{
    let value = f(x)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SolverError::NonFinite { x, value }.into())
    }
}
