//! cf-core: shared foundation for cycleflow.
//!
//! Contains:
//! - error (the error taxonomy every other crate converts into)
//! - numeric (Real + tolerances + float helpers)
//! - units (uom SI types, constructors and fixed engineering constants)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CfError, CfResult};
pub use numeric::*;
pub use units::*;
