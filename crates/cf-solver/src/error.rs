//! Error types for root finding.

use cf_core::CfError;
use thiserror::Error;

pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Iteration cap reached without meeting tolerance.
    #[error(
        "{method} did not converge in {iterations} iterations (best x = {best_x:.6e}, residual = {residual:.3e})"
    )]
    NonConvergence {
        method: &'static str,
        iterations: usize,
        best_x: f64,
        residual: f64,
    },

    /// Two successive residuals are equal so no secant step exists.
    #[error("secant stalled at x = {x:.6e} (residual = {residual:.3e})")]
    Stalled { x: f64, residual: f64 },

    #[error("residuals at [{lo:.6e}, {hi:.6e}] do not bracket a root ({f_lo:.3e}, {f_hi:.3e})")]
    InvalidBracket {
        lo: f64,
        hi: f64,
        f_lo: f64,
        f_hi: f64,
    },

    #[error("non-finite residual {value} at x = {x:.6e}")]
    NonFinite { x: f64, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl SolverError {
    /// Last best estimate carried by iteration failures.
    pub fn best_estimate(&self) -> Option<f64> {
        match self {
            SolverError::NonConvergence { best_x, .. } => Some(*best_x),
            SolverError::Stalled { x, .. } | SolverError::NonFinite { x, .. } => Some(*x),
            SolverError::InvalidBracket { .. } | SolverError::InvalidArg { .. } => None,
        }
    }
}

impl From<SolverError> for CfError {
    fn from(err: SolverError) -> Self {
        let message = err.to_string();
        match err {
            SolverError::InvalidArg { what } => CfError::invalid_spec(what),
            SolverError::NonFinite { .. } => CfError::domain(message),
            _ => CfError::NonConvergence { what: message },
        }
    }
}
