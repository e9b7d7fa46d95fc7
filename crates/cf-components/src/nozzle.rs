//! Convergent-divergent nozzle with a flow-regime state machine.

use crate::common::{check_fraction, port, resolve};
use crate::design::DesignMemory;
use crate::error::{ComponentError, ComponentResult};
use crate::traits::CycleComponent;
use cf_core::constants::G_C;
use cf_flow::{FlowState, StaticConstraint};
use cf_gas::GasAdapter;
use std::fmt;
use tracing::{debug, info};

/// Relative distance from the supersonic exit pressure inside which the
/// nozzle is reported as perfectly expanded.
const PERFECT_EXPANSION_TOL: f64 = 1e-3;

/// Operating regime of the nozzle at a given back pressure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum NozzleRegime {
    /// Throat below Mach 1, exit on the subsonic branch
    Unchoked,
    /// Normal shock standing at the exit plane
    NormalShock,
    Overexpanded,
    Underexpanded,
    /// Back pressure within 0.1 % of the supersonic exit pressure
    PerfectlyExpanded,
}

impl fmt::Display for NozzleRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NozzleRegime::Unchoked => "UNCHOKED",
            NozzleRegime::NormalShock => "NORMAL_SHOCK",
            NozzleRegime::Overexpanded => "OVEREXPANDED",
            NozzleRegime::Underexpanded => "UNDEREXPANDED",
            NozzleRegime::PerfectlyExpanded => "PERFECTLY_EXPANDED",
        };
        f.write_str(s)
    }
}

/// Stagnation pressure ratio `Pt2/Pt1` across a normal shock at `mach`.
pub fn shock_pressure_ratio(mach: f64, gamma: f64) -> f64 {
    let m2 = mach * mach;
    let density_ratio = 0.5 * (gamma + 1.0) * m2 / (1.0 + 0.5 * (gamma - 1.0) * m2);
    let ps_ratio_recip = (gamma + 1.0) / (2.0 * gamma * m2 - (gamma - 1.0));
    density_ratio.powf(gamma / (gamma - 1.0)) * ps_ratio_recip.powf(1.0 / (gamma - 1.0))
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NozzleParams {
    /// Total-pressure loss fraction
    pub dpqp: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NozzleDesign {
    /// [in²]
    pub throat_area: f64,
    /// [in²]
    pub exit_area: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NozzleInputs {
    pub flow_in: FlowState,
    /// Ambient static pressure at the exit [psia]
    pub back_ps: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NozzleOutputs {
    pub flow_out: FlowState,
    pub throat: FlowState,
    pub regime: NozzleRegime,
    /// Gross thrust [lbf]
    pub fg: f64,
    /// Throat total pressure over exit static pressure
    pub pr: f64,
    /// Exit area over throat area
    pub ar: f64,
    /// Sonic throat area demanded by the current flow [in²]
    pub athroat_dmd: f64,
    /// Mass flux through the governing area [lbm/(s·in²)]
    pub wq_aexit: f64,
    /// Mass flux the current operating point can pass [lbm/(s·in²)]
    pub wq_aexit_dmd: f64,
}

/// Nozzle sized for ideal expansion at the design back pressure.
///
/// Off design the exit area is fixed and the regime follows from comparing
/// the back pressure against the reference exit pressures at that area
/// (subsonic, post-shock, supersonic).
///
/// `wq_aexit` and `wq_aexit_dmd` are the mass-flow closure pair for a host
/// that iterates on `W`. When choked both are referenced to the throat
/// (`W/A_throat_des` against `W/A_throat_dmd`); when unchoked to the exit
/// (`W/A_exit_des` against the flux of the stream expanded to back
/// pressure).
#[derive(Clone, Debug)]
pub struct Nozzle {
    pub name: String,
    pub params: NozzleParams,
    memory: DesignMemory<NozzleDesign>,
}

impl Nozzle {
    pub fn new(name: impl Into<String>, params: NozzleParams) -> ComponentResult<Self> {
        check_fraction(params.dpqp, "nozzle pressure loss must be in [0, 1)")?;
        Ok(Self {
            name: name.into(),
            params,
            memory: DesignMemory::new(),
        })
    }

    pub fn design_point(&self) -> Option<&NozzleDesign> {
        self.memory.get(&self.name).ok()
    }

    /// Flow entering the throat: inlet flow after the total-pressure loss,
    /// at rest.
    fn throat_total(&self, gas: &GasAdapter<'_>, flow_in: &FlowState) -> ComponentResult<FlowState> {
        let spec = flow_in
            .downstream(port(&self.name, "throat"))
            .ht(flow_in.ht())
            .pt(flow_in.pt() * (1.0 - self.params.dpqp));
        resolve(gas, &self.name, &spec)
    }

    fn at(
        &self,
        gas: &GasAdapter<'_>,
        flow: &FlowState,
        label: &str,
        constraint: StaticConstraint,
        is_super: bool,
    ) -> ComponentResult<FlowState> {
        // Label first so a failed solve names the port it was resolving
        let mut from = flow.clone();
        from.name = port(&self.name, label);
        from.with_static(gas, constraint, is_super)
            .map_err(ComponentError::resolution(&self.name))
    }

    fn check_inputs(inputs: &NozzleInputs) -> ComponentResult<()> {
        if !inputs.back_ps.is_finite() || inputs.back_ps <= 0.0 {
            return Err(ComponentError::InvalidSpec {
                what: "nozzle back pressure must be positive and finite",
            });
        }
        Ok(())
    }

    fn outputs(
        inputs: &NozzleInputs,
        flow_out: FlowState,
        throat: FlowState,
        regime: NozzleRegime,
        athroat_dmd: f64,
        (wq_aexit, wq_aexit_dmd): (f64, f64),
    ) -> NozzleOutputs {
        let back = inputs.back_ps;
        let fg = flow_out.w * flow_out.vflow() / G_C + flow_out.area() * (flow_out.ps() - back);
        NozzleOutputs {
            fg,
            pr: throat.pt() / flow_out.ps(),
            ar: flow_out.area() / throat.area(),
            athroat_dmd,
            wq_aexit,
            wq_aexit_dmd,
            regime,
            flow_out,
            throat,
        }
    }
}

impl CycleComponent for Nozzle {
    type Inputs = NozzleInputs;
    type Outputs = NozzleOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn design(&mut self, gas: &GasAdapter<'_>, inputs: &NozzleInputs) -> ComponentResult<NozzleOutputs> {
        Self::check_inputs(inputs)?;
        let total = self.throat_total(gas, &inputs.flow_in)?;
        if inputs.back_ps >= total.pt() {
            return Err(ComponentError::InvalidSpec {
                what: "design back pressure must be below nozzle total pressure",
            });
        }
        let throat = self.at(gas, &total, "throat", StaticConstraint::Mach(1.0), false)?;
        let mut exit = self.at(
            gas,
            &total,
            "exit",
            StaticConstraint::Ps(inputs.back_ps),
            false,
        )?;
        exit.is_super = exit.mach() > 1.0;

        let point = NozzleDesign {
            throat_area: throat.area(),
            exit_area: exit.area(),
        };
        self.memory.record(&self.name, point)?;
        info!(
            component = %self.name,
            throat_area = point.throat_area,
            exit_area = point.exit_area,
            exit_mach = exit.mach(),
            "nozzle sized"
        );

        let w = inputs.flow_in.w;
        let athroat_dmd = throat.area();
        let flux = (w / point.throat_area, w / athroat_dmd);
        Ok(Self::outputs(
            inputs,
            exit,
            throat,
            NozzleRegime::PerfectlyExpanded,
            athroat_dmd,
            flux,
        ))
    }

    fn off_design(&self, gas: &GasAdapter<'_>, inputs: &NozzleInputs) -> ComponentResult<NozzleOutputs> {
        Self::check_inputs(inputs)?;
        let point = *self.memory.get(&self.name)?;
        let back = inputs.back_ps;
        let w = inputs.flow_in.w;

        let total = self.throat_total(gas, &inputs.flow_in)?;
        let sonic = self.at(gas, &total, "throat", StaticConstraint::Mach(1.0), false)?;
        let athroat_dmd = sonic.area();

        let exit_area = StaticConstraint::Area(point.exit_area);
        let sub = self.at(gas, &total, "exit", exit_area, false)?;
        let sup = self.at(gas, &total, "exit", exit_area, true)?;

        // Total state behind a normal shock standing at the exit plane
        let pt_shock = shock_pressure_ratio(sup.mach(), sonic.statics.gams) * sonic.pt();
        let spec = inputs
            .flow_in
            .downstream(port(&self.name, "exit"))
            .ht(total.ht())
            .pt(pt_shock);
        let shocked = resolve(gas, &self.name, &spec)?;
        let shock = self.at(gas, &shocked, "exit", exit_area, false)?;
        debug!(
            component = %self.name,
            ps_sub = sub.ps(),
            ps_shock = shock.ps(),
            ps_sup = sup.ps(),
            "nozzle reference pressures"
        );

        let ps_sup = sup.ps();
        let (mut regime, flow_out, throat) = if back >= sub.ps() {
            let throat = self.at(
                gas,
                &total,
                "throat",
                StaticConstraint::Area(point.throat_area),
                false,
            )?;
            (NozzleRegime::Unchoked, sub, throat)
        } else if back >= shock.ps() {
            let exit = self.at(gas, &shocked, "exit", StaticConstraint::Ps(back), false)?;
            (NozzleRegime::NormalShock, exit, sonic)
        } else if back > ps_sup {
            (NozzleRegime::Overexpanded, sup, sonic)
        } else {
            (NozzleRegime::Underexpanded, sup, sonic)
        };
        if (back - ps_sup).abs() / back < PERFECT_EXPANSION_TOL {
            regime = NozzleRegime::PerfectlyExpanded;
        }

        let flux = if regime == NozzleRegime::Unchoked {
            let expanded = self.at(gas, &total, "exit", StaticConstraint::Ps(back), false)?;
            (w / point.exit_area, expanded.statics.mass_flux())
        } else {
            (w / point.throat_area, w / athroat_dmd)
        };
        info!(component = %self.name, back_ps = back, %regime, "nozzle regime");
        Ok(Self::outputs(inputs, flow_out, throat, regime, athroat_dmd, flux))
    }

    fn is_designed(&self) -> bool {
        self.memory.is_set()
    }

    fn reset_design(&mut self) {
        self.memory.reset();
    }
}
