use thiserror::Error;

pub type CfResult<T> = Result<T, CfError>;

/// Top-level failure classes shared by every cycleflow crate.
///
/// Lower crates keep their own richer enums and convert into this one at the
/// boundary, so a host only has to match on three outcomes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CfError {
    /// Ill-posed request. Caller error, never retried.
    #[error("Invalid specification: {what}")]
    InvalidSpec { what: String },

    /// An iterative resolution ran out of iterations.
    #[error("Non-convergence: {what}")]
    NonConvergence { what: String },

    /// A property evaluation was asked for an unphysical state.
    #[error("Domain error: {what}")]
    Domain { what: String },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

impl CfError {
    pub fn invalid_spec(what: impl Into<String>) -> Self {
        CfError::InvalidSpec { what: what.into() }
    }

    pub fn domain(what: impl Into<String>) -> Self {
        CfError::Domain { what: what.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = CfError::invalid_spec("both Mach and area supplied");
        assert!(err.to_string().contains("Mach and area"));

        let err = CfError::NonConvergence {
            what: "station 'exit'".into(),
        };
        assert!(err.to_string().starts_with("Non-convergence"));
    }
}
