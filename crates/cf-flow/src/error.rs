//! Station resolution errors.

use cf_core::CfError;
use cf_gas::GasError;
use cf_solver::SolverError;
use thiserror::Error;

pub type FlowResult<T> = Result<T, FlowError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// Ill-posed station request, rejected before any iteration.
    #[error("Invalid station specification: {what}")]
    InvalidSpec { what: &'static str },

    #[error("Station '{station}' did not resolve: {source}")]
    NonConvergence {
        station: String,
        #[source]
        source: SolverError,
    },

    #[error("Station '{station}' gas property error: {source}")]
    Gas {
        station: String,
        #[source]
        source: GasError,
    },

    /// Target area is smaller than the sonic area for this mass flow.
    #[error(
        "Station '{station}' is choked: area {area:.4} in² is below the sonic area {sonic_area:.4} in²"
    )]
    Choked {
        station: String,
        area: f64,
        sonic_area: f64,
    },
}

impl From<SolverError> for FlowError {
    fn from(source: SolverError) -> Self {
        FlowError::NonConvergence {
            station: String::new(),
            source,
        }
    }
}

impl From<GasError> for FlowError {
    fn from(source: GasError) -> Self {
        FlowError::Gas {
            station: String::new(),
            source,
        }
    }
}

impl FlowError {
    /// Attach a station label to an error raised inside a residual closure.
    pub fn at_station(self, name: &str) -> Self {
        match self {
            FlowError::NonConvergence { station, source } if station.is_empty() => {
                FlowError::NonConvergence {
                    station: name.to_owned(),
                    source,
                }
            }
            FlowError::Gas { station, source } if station.is_empty() => FlowError::Gas {
                station: name.to_owned(),
                source,
            },
            FlowError::Choked {
                station,
                area,
                sonic_area,
            } if station.is_empty() => FlowError::Choked {
                station: name.to_owned(),
                area,
                sonic_area,
            },
            other => other,
        }
    }
}

impl From<FlowError> for CfError {
    fn from(err: FlowError) -> Self {
        let message = err.to_string();
        match err {
            FlowError::InvalidSpec { what } => CfError::invalid_spec(what),
            FlowError::Gas { source, .. } => source.into(),
            FlowError::Choked { .. } => CfError::domain(message),
            FlowError::NonConvergence { .. } => CfError::NonConvergence { what: message },
        }
    }
}
