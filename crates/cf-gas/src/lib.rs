//! cf-gas: gas equilibrium properties for cycleflow.
//!
//! Provides:
//! - Species with NASA polynomial data and named reactants (air, water)
//! - Mass-fraction compositions derived from reactant mixing ratios
//! - The `EquilibriumModel` trait (SI, thread-safe) with an ideal-gas backend
//!   and an optional CoolProp backend (`coolprop` feature)
//! - `GasAdapter`, which owns every SI ↔ engineering-unit conversion
//!
//! # Example
//!
//! ```
//! use cf_gas::{Composition, GasAdapter, GasSpec, IdealGasModel};
//!
//! let model = IdealGasModel::new();
//! let gas = GasAdapter::new(&model);
//! let props = gas
//!     .equilibrate(GasSpec::TP { t: 518.67, p: 14.696 }, &Composition::dry_air())
//!     .unwrap();
//! assert!((props.gamma() - 1.4).abs() < 0.01);
//! ```

pub mod adapter;
pub mod composition;
#[cfg(feature = "coolprop")]
pub mod coolprop;
pub mod error;
pub mod ideal_gas;
pub mod model;
pub mod nasa;
pub mod reactant;
pub mod species;
pub mod units;

pub use adapter::{GasAdapter, GasProperties, GasSpec};
pub use composition::{Composition, MIN_MASS_FRACTION};
#[cfg(feature = "coolprop")]
pub use coolprop::CoolPropModel;
pub use error::{GasError, GasResult};
pub use ideal_gas::IdealGasModel;
pub use model::{
    EquilibriumModel, EquilibriumState, SpecEnthalpy, SpecEntropy, SpecHeatCapacity, StateInput,
};
pub use nasa::NasaPolynomial;
pub use reactant::Reactant;
pub use species::Species;
