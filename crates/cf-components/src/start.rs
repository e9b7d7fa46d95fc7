//! Flow sources: the first station of a chain.

use crate::common::{check_finite, check_positive, port};
use crate::design::DesignMemory;
use crate::error::{ComponentError, ComponentResult};
use crate::traits::CycleComponent;
use cf_flow::{FlowState, StaticConditions, StationSpec};
use cf_gas::{Composition, GasAdapter};
use tracing::info;

/// Total conditions of a source station.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StartConditions {
    /// [lbm/s]
    pub w: f64,
    /// [psia]
    pub pt: f64,
    /// [°R]
    pub tt: f64,
    pub mach: f64,
    /// Water-air ratio
    pub war: f64,
}

impl Default for StartConditions {
    fn default() -> Self {
        Self {
            w: 1.0,
            pt: 14.7,
            tt: 518.0,
            mach: 0.1,
            war: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartOutputs {
    pub flow_out: FlowState,
    /// Station area at the design point [in²]
    pub area_des: f64,
}

/// Source declared by `W`, `Pt`, `Tt` and Mach.
///
/// The station always resolves at the given Mach; the design pass only
/// records its area.
#[derive(Clone, Debug)]
pub struct FlowStart {
    pub name: String,
    memory: DesignMemory<f64>,
}

impl FlowStart {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            memory: DesignMemory::new(),
        }
    }

    fn station(&self, gas: &GasAdapter<'_>, c: &StartConditions) -> ComponentResult<FlowState> {
        check_finite(c.mach, "start Mach must be finite")?;
        let spec = StationSpec::new(port(&self.name, "out"))
            .tt(c.tt)
            .pt(c.pt)
            .w(c.w)
            .war(c.war)
            .mach(c.mach);
        crate::common::resolve(gas, &self.name, &spec)
    }
}

impl CycleComponent for FlowStart {
    type Inputs = StartConditions;
    type Outputs = StartOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn design(&mut self, gas: &GasAdapter<'_>, c: &StartConditions) -> ComponentResult<StartOutputs> {
        let flow_out = self.station(gas, c)?;
        self.memory.record(&self.name, flow_out.area())?;
        info!(component = %self.name, area = flow_out.area(), "start sized");
        Ok(StartOutputs {
            area_des: flow_out.area(),
            flow_out,
        })
    }

    fn off_design(&self, gas: &GasAdapter<'_>, c: &StartConditions) -> ComponentResult<StartOutputs> {
        let area_des = *self.memory.get(&self.name)?;
        Ok(StartOutputs {
            flow_out: self.station(gas, c)?,
            area_des,
        })
    }

    fn is_designed(&self) -> bool {
        self.memory.is_set()
    }

    fn reset_design(&mut self) {
        self.memory.reset();
    }
}

/// Static conditions of a source station.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StaticStartConditions {
    /// [lbm/s]
    pub w: f64,
    /// [psia]
    pub ps: f64,
    /// [°R]
    pub ts: f64,
    pub mach: f64,
    pub war: f64,
}

impl Default for StaticStartConditions {
    fn default() -> Self {
        Self {
            w: 1.0,
            ps: 14.7,
            ts: 518.0,
            mach: 0.1,
            war: 0.0,
        }
    }
}

/// Source declared by `W`, `Ps`, `Ts` and Mach. It sizes nothing, so both
/// modes are the same evaluation.
#[derive(Clone, Debug)]
pub struct FlowStartStatic {
    pub name: String,
}

impl FlowStartStatic {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn station(
        &self,
        gas: &GasAdapter<'_>,
        c: &StaticStartConditions,
    ) -> ComponentResult<FlowState> {
        check_positive(c.ps, "start static pressure must be positive")?;
        check_positive(c.ts, "start static temperature must be positive")?;
        if !c.w.is_finite() || c.w < 0.0 {
            return Err(ComponentError::InvalidSpec {
                what: "start mass flow must be finite and non-negative",
            });
        }
        let composition = if c.war == 0.0 {
            Composition::dry_air()
        } else {
            Composition::humid_air(c.war)
                .map_err(|e| ComponentError::resolution(&self.name)(e.into()))?
        };
        let conditions = StaticConditions {
            ts: c.ts,
            ps: c.ps,
            mach: c.mach,
            w: c.w,
        };
        let mut flow = FlowState::from_static(gas, port(&self.name, "out"), conditions, composition)
            .map_err(ComponentError::resolution(&self.name))?;
        flow.war = c.war;
        Ok(flow)
    }
}

impl CycleComponent for FlowStartStatic {
    type Inputs = StaticStartConditions;
    type Outputs = StartOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn design(
        &mut self,
        gas: &GasAdapter<'_>,
        c: &StaticStartConditions,
    ) -> ComponentResult<StartOutputs> {
        self.off_design(gas, c)
    }

    fn off_design(
        &self,
        gas: &GasAdapter<'_>,
        c: &StaticStartConditions,
    ) -> ComponentResult<StartOutputs> {
        let flow_out = self.station(gas, c)?;
        Ok(StartOutputs {
            area_des: flow_out.area(),
            flow_out,
        })
    }

    fn is_designed(&self) -> bool {
        true
    }

    fn reset_design(&mut self) {}
}
