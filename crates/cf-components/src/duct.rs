//! Duct with total-pressure loss and heat addition.

use crate::common::{check_finite, check_fraction, check_positive, port, resolve};
use crate::design::DesignMemory;
use crate::error::{ComponentError, ComponentResult};
use crate::traits::CycleComponent;
use cf_flow::{FlowState, StaticConstraint};
use cf_gas::GasAdapter;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DuctParams {
    /// Total-pressure loss as a fraction of inlet `Pt`
    pub dpqp: f64,
    /// Heat rate into the flow [Btu/s]; negative removes heat
    pub q_dot: f64,
    pub mach_exit_des: f64,
}

impl Default for DuctParams {
    fn default() -> Self {
        Self {
            dpqp: 0.0,
            q_dot: 0.0,
            mach_exit_des: 0.6,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuctOutputs {
    pub flow_out: FlowState,
}

#[derive(Clone, Debug)]
pub struct Duct {
    pub name: String,
    pub params: DuctParams,
    /// Exit area [in²]
    memory: DesignMemory<f64>,
}

impl Duct {
    pub fn new(name: impl Into<String>, params: DuctParams) -> ComponentResult<Self> {
        check_fraction(params.dpqp, "duct pressure loss must be in [0, 1)")?;
        check_finite(params.q_dot, "duct heat rate must be finite")?;
        check_positive(params.mach_exit_des, "duct design exit Mach must be positive")?;
        Ok(Self {
            name: name.into(),
            params,
            memory: DesignMemory::new(),
        })
    }

    pub fn exit_area_des(&self) -> Option<f64> {
        self.memory.get(&self.name).ok().copied()
    }

    fn exit(
        &self,
        gas: &GasAdapter<'_>,
        flow_in: &FlowState,
        constraint: StaticConstraint,
    ) -> ComponentResult<FlowState> {
        let dh = if self.params.q_dot == 0.0 {
            0.0
        } else if flow_in.w > 0.0 {
            self.params.q_dot / flow_in.w
        } else {
            return Err(ComponentError::InvalidSpec {
                what: "heat addition needs a positive mass flow",
            });
        };
        let spec = flow_in
            .downstream(port(&self.name, "exit"))
            .ht(flow_in.ht() + dh)
            .pt(flow_in.pt() * (1.0 - self.params.dpqp))
            .with_constraint(constraint);
        resolve(gas, &self.name, &spec)
    }
}

impl CycleComponent for Duct {
    type Inputs = FlowState;
    type Outputs = DuctOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn design(&mut self, gas: &GasAdapter<'_>, flow_in: &FlowState) -> ComponentResult<DuctOutputs> {
        let flow_out = self.exit(
            gas,
            flow_in,
            StaticConstraint::Mach(self.params.mach_exit_des),
        )?;
        self.memory.record(&self.name, flow_out.area())?;
        info!(component = %self.name, exit_area = flow_out.area(), "duct sized");
        Ok(DuctOutputs { flow_out })
    }

    fn off_design(&self, gas: &GasAdapter<'_>, flow_in: &FlowState) -> ComponentResult<DuctOutputs> {
        let area = *self.memory.get(&self.name)?;
        let flow_out = self.exit(gas, flow_in, StaticConstraint::Area(area))?;
        Ok(DuctOutputs { flow_out })
    }

    fn is_designed(&self) -> bool {
        self.memory.is_set()
    }

    fn reset_design(&mut self) {
        self.memory.reset();
    }
}
