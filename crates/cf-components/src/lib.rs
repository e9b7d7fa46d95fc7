//! cf-components: cycle components for a serial gas-turbine flow path.
//!
//! Provides:
//! - Sources ([`FlowStart`], [`FlowStartStatic`])
//! - Inlet, duct, compressor and heat exchanger
//! - Convergent-divergent nozzle with regime detection
//! - Splitters by bypass ratio and by flow
//!
//! Every component implements [`CycleComponent`]: a design evaluation sizes
//! the component and stores its geometry, later off-design evaluations hold
//! that geometry fixed.
//!
//! # Example
//!
//! ```
//! use cf_components::{CycleComponent, Duct, DuctParams, FlowStart, StartConditions};
//! use cf_gas::{GasAdapter, IdealGasModel};
//!
//! let model = IdealGasModel::new();
//! let gas = GasAdapter::new(&model);
//!
//! let mut start = FlowStart::new("start");
//! let mut duct = Duct::new("duct", DuctParams::default()).unwrap();
//!
//! let conditions = StartConditions { w: 50.0, ..StartConditions::default() };
//! let source = start.design(&gas, &conditions).unwrap();
//! let exit = duct.design(&gas, &source.flow_out).unwrap();
//! assert!((exit.flow_out.mach() - 0.6).abs() < 1e-8);
//! ```

pub mod common;
pub mod compressor;
pub mod design;
pub mod duct;
pub mod error;
pub mod heat_exchanger;
pub mod inlet;
pub mod nozzle;
pub mod splitter;
pub mod start;
pub mod traits;

// Re-exports
pub use compressor::{Compressor, CompressorDesign, CompressorOutputs, CompressorParams};
pub use design::DesignMemory;
pub use duct::{Duct, DuctOutputs, DuctParams};
pub use error::{ComponentError, ComponentResult};
pub use heat_exchanger::{HeatExchanger, HeatExchangerOutputs, HeatExchangerParams, lmtd};
pub use inlet::{Inlet, InletDesign, InletOutputs, InletParams};
pub use nozzle::{
    Nozzle, NozzleDesign, NozzleInputs, NozzleOutputs, NozzleParams, NozzleRegime,
    shock_pressure_ratio,
};
pub use splitter::{
    SplitterBpr, SplitterBprParams, SplitterDesign, SplitterInputs, SplitterOutputs, SplitterW,
    SplitterWParams,
};
pub use start::{FlowStart, FlowStartStatic, StartConditions, StartOutputs, StaticStartConditions};
pub use traits::CycleComponent;
