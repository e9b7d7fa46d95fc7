//! Inlet: ram pressure recovery and capture area.

use crate::common::{check_positive, port, resolve};
use crate::design::DesignMemory;
use crate::error::{ComponentError, ComponentResult};
use crate::traits::CycleComponent;
use cf_core::constants::G_C;
use cf_flow::{FlowState, StaticConstraint};
use cf_gas::GasAdapter;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InletParams {
    /// Fraction of incoming total pressure retained
    pub ram_recovery: f64,
    /// Exit Mach number at design
    pub mach_exit_des: f64,
}

impl Default for InletParams {
    fn default() -> Self {
        Self {
            ram_recovery: 1.0,
            mach_exit_des: 0.6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InletDesign {
    /// [in²]
    pub exit_area: f64,
    /// [in²]
    pub capture_area: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InletOutputs {
    pub flow_out: FlowState,
    /// Ram drag [lbf]
    pub f_ram: f64,
    /// Capture area [in²]
    pub a_capture: f64,
}

#[derive(Clone, Debug)]
pub struct Inlet {
    pub name: String,
    pub params: InletParams,
    memory: DesignMemory<InletDesign>,
}

impl Inlet {
    pub fn new(name: impl Into<String>, params: InletParams) -> ComponentResult<Self> {
        check_positive(params.ram_recovery, "ram recovery must be positive")?;
        if params.ram_recovery > 1.0 {
            return Err(ComponentError::InvalidSpec {
                what: "ram recovery cannot exceed 1",
            });
        }
        check_positive(params.mach_exit_des, "inlet design exit Mach must be positive")?;
        Ok(Self {
            name: name.into(),
            params,
            memory: DesignMemory::new(),
        })
    }

    pub fn design_point(&self) -> Option<&InletDesign> {
        self.memory.get(&self.name).ok()
    }

    fn exit(
        &self,
        gas: &GasAdapter<'_>,
        flow_in: &FlowState,
        constraint: StaticConstraint,
    ) -> ComponentResult<FlowState> {
        let spec = flow_in
            .downstream(port(&self.name, "exit"))
            .ht(flow_in.ht())
            .pt(flow_in.pt() * self.params.ram_recovery)
            .with_constraint(constraint);
        resolve(gas, &self.name, &spec)
    }

    fn ram_drag(flow_in: &FlowState) -> f64 {
        flow_in.w * flow_in.vflow() / G_C
    }
}

impl CycleComponent for Inlet {
    type Inputs = FlowState;
    type Outputs = InletOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn design(&mut self, gas: &GasAdapter<'_>, flow_in: &FlowState) -> ComponentResult<InletOutputs> {
        let flow_out = self.exit(
            gas,
            flow_in,
            StaticConstraint::Mach(self.params.mach_exit_des),
        )?;
        let point = InletDesign {
            exit_area: flow_out.area(),
            capture_area: flow_in.area(),
        };
        self.memory.record(&self.name, point)?;
        info!(
            component = %self.name,
            exit_area = point.exit_area,
            capture_area = point.capture_area,
            "inlet sized"
        );
        Ok(InletOutputs {
            f_ram: Self::ram_drag(flow_in),
            a_capture: point.capture_area,
            flow_out,
        })
    }

    fn off_design(&self, gas: &GasAdapter<'_>, flow_in: &FlowState) -> ComponentResult<InletOutputs> {
        let point = *self.memory.get(&self.name)?;
        let flow_out = self.exit(gas, flow_in, StaticConstraint::Area(point.exit_area))?;
        Ok(InletOutputs {
            f_ram: Self::ram_drag(flow_in),
            a_capture: point.capture_area,
            flow_out,
        })
    }

    fn is_designed(&self) -> bool {
        self.memory.is_set()
    }

    fn reset_design(&mut self) {
        self.memory.reset();
    }
}
