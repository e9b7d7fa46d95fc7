//! Compressor on a linear operating line.

use crate::common::{check_fraction, check_positive, port, resolve};
use crate::design::DesignMemory;
use crate::error::{ComponentError, ComponentResult};
use crate::traits::CycleComponent;
use cf_core::constants::HP_PER_BTU_PER_S;
use cf_flow::{FlowState, StaticConstraint};
use cf_gas::{GasAdapter, GasSpec};
use std::f64::consts::PI;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompressorParams {
    /// Total-pressure ratio at design
    pub pr_des: f64,
    pub mach_exit_des: f64,
    /// Adiabatic efficiency at design
    pub eff_des: f64,
    /// Hub-to-tip radius ratio of the exit annulus
    pub hub_to_tip: f64,
    /// Operating-line slope of normalized PR against normalized `Wc`
    pub op_slope: f64,
}

impl Default for CompressorParams {
    fn default() -> Self {
        Self {
            pr_des: 12.47,
            mach_exit_des: 0.4,
            eff_des: 0.95,
            hub_to_tip: 0.4,
            op_slope: 0.85,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressorDesign {
    /// [in²]
    pub exit_area: f64,
    /// Inlet corrected flow at design [lbm/s]
    pub wc_des: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressorOutputs {
    pub flow_out: FlowState,
    pub pr: f64,
    /// Adiabatic efficiency used for the work
    pub eff: f64,
    pub eff_poly: f64,
    /// Shaft power absorbed [hp]
    pub pwr: f64,
    /// Exit annulus tip radius [in]
    pub tip_radius: f64,
    /// Exit annulus hub radius [in]
    pub hub_radius: f64,
}

/// Compressor with fixed design efficiency.
///
/// At design the pressure ratio is `pr_des`; off design it follows
/// `PR = PR_des · [op_slope·Wc/Wc_des + (1 − op_slope)]`, so the design point
/// lies on the operating line.
#[derive(Clone, Debug)]
pub struct Compressor {
    pub name: String,
    pub params: CompressorParams,
    memory: DesignMemory<CompressorDesign>,
}

impl Compressor {
    pub fn new(name: impl Into<String>, params: CompressorParams) -> ComponentResult<Self> {
        check_positive(params.pr_des, "compressor design pressure ratio must be positive")?;
        if params.pr_des < 1.0 {
            return Err(ComponentError::InvalidSpec {
                what: "compressor design pressure ratio must be at least 1",
            });
        }
        check_positive(params.eff_des, "compressor efficiency must be in (0, 1]")?;
        if params.eff_des > 1.0 {
            return Err(ComponentError::InvalidSpec {
                what: "compressor efficiency must be in (0, 1]",
            });
        }
        check_positive(params.mach_exit_des, "compressor design exit Mach must be positive")?;
        check_fraction(params.hub_to_tip, "hub-to-tip ratio must be in [0, 1)")?;
        check_positive(params.op_slope, "operating-line slope must be positive")?;
        Ok(Self {
            name: name.into(),
            params,
            memory: DesignMemory::new(),
        })
    }

    pub fn design_point(&self) -> Option<&CompressorDesign> {
        self.memory.get(&self.name).ok()
    }

    /// Pressure ratio on the operating line at corrected flow `wc`.
    pub fn operating_line(&self, wc: f64, wc_des: f64) -> f64 {
        let slope = self.params.op_slope;
        self.params.pr_des * (slope * wc / wc_des + (1.0 - slope))
    }

    fn compress(
        &self,
        gas: &GasAdapter<'_>,
        flow_in: &FlowState,
        pr: f64,
        constraint: StaticConstraint,
    ) -> ComponentResult<CompressorOutputs> {
        if !(pr > 0.0) || !pr.is_finite() {
            return Err(ComponentError::InvalidSpec {
                what: "compressor pressure ratio must be positive",
            });
        }
        let eff = self.params.eff_des;
        let pt_out = flow_in.pt() * pr;
        let ideal = gas
            .equilibrate(
                GasSpec::SP {
                    s: flow_in.s(),
                    p: pt_out,
                },
                &flow_in.composition,
            )
            .map_err(|e| ComponentError::resolution(&self.name)(e.into()))?;
        let ht_out = (ideal.h - flow_in.ht()) / eff + flow_in.ht();

        let spec = flow_in
            .downstream(port(&self.name, "exit"))
            .ht(ht_out)
            .pt(pt_out)
            .with_constraint(constraint);
        let flow_out = resolve(gas, &self.name, &spec)?;

        let ds = flow_out.s() - flow_in.s();
        let c = flow_out.total.r * pr.ln();
        let eff_poly = if c + ds == 0.0 { 1.0 } else { c / (c + ds) };
        let pwr = flow_in.w * (flow_out.ht() - flow_in.ht()) * HP_PER_BTU_PER_S;

        let tip_radius =
            (flow_out.area() / (PI * (1.0 - self.params.hub_to_tip.powi(2)))).sqrt();
        debug!(component = %self.name, pr, pwr, eff_poly, "compressor evaluated");
        Ok(CompressorOutputs {
            pr,
            eff,
            eff_poly,
            pwr,
            tip_radius,
            hub_radius: self.params.hub_to_tip * tip_radius,
            flow_out,
        })
    }

    fn inlet_wc(flow_in: &FlowState) -> ComponentResult<f64> {
        flow_in.wc.ok_or(ComponentError::InvalidSpec {
            what: "compressor inlet corrected flow is undefined",
        })
    }
}

impl CycleComponent for Compressor {
    type Inputs = FlowState;
    type Outputs = CompressorOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn design(
        &mut self,
        gas: &GasAdapter<'_>,
        flow_in: &FlowState,
    ) -> ComponentResult<CompressorOutputs> {
        let wc_des = Self::inlet_wc(flow_in)?;
        let out = self.compress(
            gas,
            flow_in,
            self.params.pr_des,
            StaticConstraint::Mach(self.params.mach_exit_des),
        )?;
        let point = CompressorDesign {
            exit_area: out.flow_out.area(),
            wc_des,
        };
        self.memory.record(&self.name, point)?;
        info!(
            component = %self.name,
            exit_area = point.exit_area,
            wc_des,
            "compressor sized"
        );
        Ok(out)
    }

    fn off_design(
        &self,
        gas: &GasAdapter<'_>,
        flow_in: &FlowState,
    ) -> ComponentResult<CompressorOutputs> {
        let point = *self.memory.get(&self.name)?;
        let pr = self.operating_line(Self::inlet_wc(flow_in)?, point.wc_des);
        self.compress(gas, flow_in, pr, StaticConstraint::Area(point.exit_area))
    }

    fn is_designed(&self) -> bool {
        self.memory.is_set()
    }

    fn reset_design(&mut self) {
        self.memory.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_flow::StationSpec;
    use cf_gas::IdealGasModel;

    fn inlet(gas: &GasAdapter<'_>, w: f64) -> FlowState {
        FlowState::resolve(
            gas,
            &StationSpec::new("fs").tt(630.74523).pt(0.0271945).w(w).mach(0.6),
        )
        .unwrap()
    }

    fn rel(actual: f64, expected: f64) -> f64 {
        ((actual - expected) / expected).abs()
    }

    #[test]
    fn design_point() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let params = CompressorParams {
            eff_des: 0.8,
            ..CompressorParams::default()
        };
        let mut comp = Compressor::new("hpc", params).unwrap();
        let out = comp.evaluate(&gas, &inlet(&gas, 1.08), true).unwrap();
        assert!(rel(out.flow_out.pt(), 0.33899) < 1e-3);
        assert!(rel(out.flow_out.tt(), 1424.01) < 1e-3);
        assert!(rel(out.flow_out.area(), 364.7) < 5e-3);
        assert!(rel(out.flow_out.statics.rhos, 0.000594) < 5e-3);
        assert!(rel(out.pwr, 303.2) < 5e-3);
        assert!(rel(out.eff_poly, 0.8545) < 2e-3);
        assert!((out.flow_out.mach() - 0.4).abs() < 1e-8);

        let annulus = PI * (out.tip_radius.powi(2) - out.hub_radius.powi(2));
        assert!(rel(annulus, out.flow_out.area()) < 1e-12);
    }

    #[test]
    fn operating_line_scales_with_corrected_flow() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let mut comp = Compressor::new("hpc", CompressorParams::default()).unwrap();
        comp.design(&gas, &inlet(&gas, 1.08)).unwrap();
        let off = comp.off_design(&gas, &inlet(&gas, 1.08 * 1.1)).unwrap();
        assert!(rel(off.pr, 13.52995) < 1e-6);
    }

    #[test]
    fn second_design_is_rejected() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let mut comp = Compressor::new("hpc", CompressorParams::default()).unwrap();
        let flow = inlet(&gas, 1.08);
        comp.design(&gas, &flow).unwrap();
        assert!(matches!(
            comp.design(&gas, &flow),
            Err(ComponentError::AlreadyDesigned { .. })
        ));
        comp.reset_design();
        assert!(comp.design(&gas, &flow).is_ok());
    }

    #[test]
    fn rejects_bad_efficiency() {
        let params = CompressorParams {
            eff_des: 1.5,
            ..CompressorParams::default()
        };
        assert!(Compressor::new("hpc", params).is_err());
    }
}
