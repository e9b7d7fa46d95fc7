//! Error types for component evaluation.

use cf_core::CfError;
use cf_flow::FlowError;
use cf_solver::SolverError;
use thiserror::Error;

/// Errors that can occur while evaluating a cycle component.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Invalid specification: {what}")]
    InvalidSpec { what: &'static str },

    /// A station owned by the component failed to resolve.
    #[error("{component}: {source}")]
    Resolution {
        component: String,
        #[source]
        source: FlowError,
    },

    /// A component-level root-find (not a station) failed.
    #[error("{component}: {source}")]
    Solver {
        component: String,
        #[source]
        source: SolverError,
    },

    #[error("{component} has no design point; run a design evaluation first")]
    NotDesigned { component: String },

    #[error("{component} is already designed; reset the design before resizing")]
    AlreadyDesigned { component: String },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl ComponentError {
    pub fn resolution(component: &str) -> impl FnOnce(FlowError) -> ComponentError + '_ {
        move |source| ComponentError::Resolution {
            component: component.to_owned(),
            source,
        }
    }

    pub fn solver(component: &str) -> impl FnOnce(SolverError) -> ComponentError + '_ {
        move |source| ComponentError::Solver {
            component: component.to_owned(),
            source,
        }
    }
}

impl From<ComponentError> for CfError {
    fn from(e: ComponentError) -> Self {
        let message = e.to_string();
        match e {
            ComponentError::InvalidSpec { what } => CfError::invalid_spec(what),
            ComponentError::Resolution { source, .. } => match CfError::from(source) {
                CfError::NonConvergence { .. } => CfError::NonConvergence { what: message },
                CfError::Domain { .. } => CfError::domain(message),
                other => other,
            },
            ComponentError::Solver { .. } => CfError::NonConvergence { what: message },
            ComponentError::NotDesigned { .. } | ComponentError::AlreadyDesigned { .. } => {
                CfError::invalid_spec(message)
            }
        }
    }
}
