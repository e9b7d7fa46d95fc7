//! cf-flow: flow-station resolution.
//!
//! A station is requested with one thermal property (`Tt`, `ht` or `s`),
//! `Pt`, a mass flow and at most one static constraint (Mach, area or `Ps`).
//! [`FlowState::resolve`] produces the total state through the gas adapter,
//! then iterates on static pressure until the constraint holds.
//!
//! # Example
//!
//! ```
//! use cf_flow::{FlowState, StationSpec};
//! use cf_gas::{GasAdapter, IdealGasModel};
//!
//! let model = IdealGasModel::new();
//! let gas = GasAdapter::new(&model);
//! let spec = StationSpec::new("fan face").tt(518.67).pt(14.696).w(100.0).mach(0.5);
//! let station = FlowState::resolve(&gas, &spec).unwrap();
//! assert!((station.mach() - 0.5).abs() < 1e-8);
//! assert!(station.ps() < station.pt());
//! ```

pub mod error;
pub mod station;
pub mod statics;
pub mod total;

pub use error::{FlowError, FlowResult};
pub use station::{FlowState, StaticConditions, StationSpec};
pub use statics::{StaticConstraint, StaticProblem, StaticState, isentropic_ps_ratio};
pub use total::{TotalSpec, TotalState, corrected_flow, resolve_total};
