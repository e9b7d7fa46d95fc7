//! Gas property errors.

use cf_core::CfError;
use cf_solver::SolverError;
use thiserror::Error;

pub type GasResult<T> = Result<T, GasError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GasError {
    /// Non-physical state (negative temperature, zero pressure, ...).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Composition or input pair the backend cannot handle.
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },

    /// Temperature inversion from enthalpy or entropy failed.
    #[error("Temperature inversion failed: {0}")]
    Inversion(#[from] SolverError),
}

impl From<GasError> for CfError {
    fn from(err: GasError) -> Self {
        match err {
            GasError::InvalidArg { what } => CfError::invalid_spec(what),
            GasError::Inversion(inner) => inner.into(),
            other => CfError::domain(other.to_string()),
        }
    }
}
