//! Core trait for cycle components.

use crate::error::ComponentResult;
use cf_gas::GasAdapter;

/// A component in a serial engine flow path.
///
/// Every component has two evaluation modes over the same physics:
/// - design: geometry (areas, reference corrected flow, split ratio) is sized
///   from the operating point and written to the instance's design memory
/// - off-design: the remembered geometry is held fixed and the operating
///   condition is solved for instead
///
/// Both modes are deterministic functions of the inputs and the design
/// memory, so separately owned instances can be evaluated in parallel.
pub trait CycleComponent: Send + Sync {
    /// Incoming stations and operating inputs.
    type Inputs;
    /// Outgoing stations and engineering outputs.
    type Outputs;

    /// Component name for diagnostics and station labels.
    fn name(&self) -> &str;

    /// Size the component at this operating point.
    ///
    /// Fails with `AlreadyDesigned` if a design point is already stored.
    fn design(
        &mut self,
        gas: &GasAdapter<'_>,
        inputs: &Self::Inputs,
    ) -> ComponentResult<Self::Outputs>;

    /// Evaluate with the stored geometry.
    ///
    /// Fails with `NotDesigned` before the first design evaluation.
    fn off_design(
        &self,
        gas: &GasAdapter<'_>,
        inputs: &Self::Inputs,
    ) -> ComponentResult<Self::Outputs>;

    /// Dispatch on the design flag.
    fn evaluate(
        &mut self,
        gas: &GasAdapter<'_>,
        inputs: &Self::Inputs,
        design: bool,
    ) -> ComponentResult<Self::Outputs> {
        if design {
            self.design(gas, inputs)
        } else {
            self.off_design(gas, inputs)
        }
    }

    fn is_designed(&self) -> bool;

    /// Forget the stored design point so the component can be resized.
    fn reset_design(&mut self);
}
