//! Flow splitters: by bypass ratio or by design flow of the first stream.

use crate::common::{check_positive, port, resolve};
use crate::design::DesignMemory;
use crate::error::{ComponentError, ComponentResult};
use crate::traits::CycleComponent;
use cf_flow::{FlowState, StaticConstraint};
use cf_gas::GasAdapter;
use tracing::info;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitterInputs {
    pub flow_in: FlowState,
    /// Take the supersonic area root for exit 1 off design
    pub exit1_is_super: bool,
    pub exit2_is_super: bool,
}

impl SplitterInputs {
    pub fn subsonic(flow_in: FlowState) -> Self {
        Self {
            flow_in,
            exit1_is_super: false,
            exit2_is_super: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitterOutputs {
    pub flow_out1: FlowState,
    pub flow_out2: FlowState,
    /// `W2/W1` at design
    pub bpr_des: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitterDesign {
    /// [in²]
    pub exit1_area: f64,
    /// [in²]
    pub exit2_area: f64,
    pub bpr_des: f64,
}

/// Both exits keep the inlet total state; only the mass flow divides.
fn split(
    gas: &GasAdapter<'_>,
    name: &str,
    inputs: &SplitterInputs,
    w1: f64,
    exits: [StaticConstraint; 2],
) -> ComponentResult<(FlowState, FlowState)> {
    let flow_in = &inputs.flow_in;
    let w2 = flow_in.w - w1;
    let spec1 = flow_in
        .downstream(port(name, "exit1"))
        .ht(flow_in.ht())
        .pt(flow_in.pt())
        .w(w1)
        .is_super(inputs.exit1_is_super)
        .with_constraint(exits[0]);
    let spec2 = flow_in
        .downstream(port(name, "exit2"))
        .ht(flow_in.ht())
        .pt(flow_in.pt())
        .w(w2)
        .is_super(inputs.exit2_is_super)
        .with_constraint(exits[1]);
    Ok((resolve(gas, name, &spec1)?, resolve(gas, name, &spec2)?))
}

fn design_exits(mach1: f64, mach2: f64) -> [StaticConstraint; 2] {
    [StaticConstraint::Mach(mach1), StaticConstraint::Mach(mach2)]
}

fn fixed_exits(point: &SplitterDesign) -> [StaticConstraint; 2] {
    [
        StaticConstraint::Area(point.exit1_area),
        StaticConstraint::Area(point.exit2_area),
    ]
}

fn record(
    memory: &mut DesignMemory<SplitterDesign>,
    name: &str,
    out: &SplitterOutputs,
) -> ComponentResult<()> {
    let point = SplitterDesign {
        exit1_area: out.flow_out1.area(),
        exit2_area: out.flow_out2.area(),
        bpr_des: out.bpr_des,
    };
    memory.record(name, point)?;
    info!(
        component = name,
        exit1_area = point.exit1_area,
        exit2_area = point.exit2_area,
        bpr_des = point.bpr_des,
        "splitter sized"
    );
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SplitterBprParams {
    /// Bypass ratio `W2/W1`
    pub bpr: f64,
    pub mach_exit1_des: f64,
    pub mach_exit2_des: f64,
}

impl Default for SplitterBprParams {
    fn default() -> Self {
        Self {
            bpr: 2.0,
            mach_exit1_des: 0.4,
            mach_exit2_des: 0.4,
        }
    }
}

/// Splits by a bypass ratio that holds in both modes.
#[derive(Clone, Debug)]
pub struct SplitterBpr {
    pub name: String,
    pub params: SplitterBprParams,
    memory: DesignMemory<SplitterDesign>,
}

impl SplitterBpr {
    pub fn new(name: impl Into<String>, params: SplitterBprParams) -> ComponentResult<Self> {
        check_positive(params.bpr, "bypass ratio must be positive")?;
        check_positive(params.mach_exit1_des, "splitter design exit Mach must be positive")?;
        check_positive(params.mach_exit2_des, "splitter design exit Mach must be positive")?;
        Ok(Self {
            name: name.into(),
            params,
            memory: DesignMemory::new(),
        })
    }

    fn w1(&self, flow_in: &FlowState) -> f64 {
        flow_in.w / (self.params.bpr + 1.0)
    }
}

impl CycleComponent for SplitterBpr {
    type Inputs = SplitterInputs;
    type Outputs = SplitterOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn design(
        &mut self,
        gas: &GasAdapter<'_>,
        inputs: &SplitterInputs,
    ) -> ComponentResult<SplitterOutputs> {
        let exits = design_exits(self.params.mach_exit1_des, self.params.mach_exit2_des);
        let (flow_out1, flow_out2) =
            split(gas, &self.name, inputs, self.w1(&inputs.flow_in), exits)?;
        let out = SplitterOutputs {
            flow_out1,
            flow_out2,
            bpr_des: self.params.bpr,
        };
        record(&mut self.memory, &self.name, &out)?;
        Ok(out)
    }

    fn off_design(
        &self,
        gas: &GasAdapter<'_>,
        inputs: &SplitterInputs,
    ) -> ComponentResult<SplitterOutputs> {
        let point = self.memory.get(&self.name)?;
        let (flow_out1, flow_out2) = split(
            gas,
            &self.name,
            inputs,
            self.w1(&inputs.flow_in),
            fixed_exits(point),
        )?;
        Ok(SplitterOutputs {
            flow_out1,
            flow_out2,
            bpr_des: point.bpr_des,
        })
    }

    fn is_designed(&self) -> bool {
        self.memory.is_set()
    }

    fn reset_design(&mut self) {
        self.memory.reset();
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SplitterWParams {
    /// Design mass flow of exit 1 [lbm/s]
    pub w1_des: f64,
    pub mach_exit1_des: f64,
    pub mach_exit2_des: f64,
}

impl Default for SplitterWParams {
    fn default() -> Self {
        Self {
            w1_des: 0.44,
            mach_exit1_des: 0.4,
            mach_exit2_des: 0.4,
        }
    }
}

/// Splits off a fixed flow at design; off design the design bypass ratio
/// is kept.
#[derive(Clone, Debug)]
pub struct SplitterW {
    pub name: String,
    pub params: SplitterWParams,
    memory: DesignMemory<SplitterDesign>,
}

impl SplitterW {
    pub fn new(name: impl Into<String>, params: SplitterWParams) -> ComponentResult<Self> {
        check_positive(params.w1_des, "design exit-1 flow must be positive")?;
        check_positive(params.mach_exit1_des, "splitter design exit Mach must be positive")?;
        check_positive(params.mach_exit2_des, "splitter design exit Mach must be positive")?;
        Ok(Self {
            name: name.into(),
            params,
            memory: DesignMemory::new(),
        })
    }
}

impl CycleComponent for SplitterW {
    type Inputs = SplitterInputs;
    type Outputs = SplitterOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn design(
        &mut self,
        gas: &GasAdapter<'_>,
        inputs: &SplitterInputs,
    ) -> ComponentResult<SplitterOutputs> {
        let w1 = self.params.w1_des;
        if w1 >= inputs.flow_in.w {
            return Err(ComponentError::InvalidSpec {
                what: "design exit-1 flow must be below the inlet flow",
            });
        }
        let exits = design_exits(self.params.mach_exit1_des, self.params.mach_exit2_des);
        let (flow_out1, flow_out2) = split(gas, &self.name, inputs, w1, exits)?;
        let out = SplitterOutputs {
            bpr_des: flow_out2.w / flow_out1.w,
            flow_out1,
            flow_out2,
        };
        record(&mut self.memory, &self.name, &out)?;
        Ok(out)
    }

    fn off_design(
        &self,
        gas: &GasAdapter<'_>,
        inputs: &SplitterInputs,
    ) -> ComponentResult<SplitterOutputs> {
        let point = self.memory.get(&self.name)?;
        let w1 = inputs.flow_in.w / (point.bpr_des + 1.0);
        let (flow_out1, flow_out2) = split(gas, &self.name, inputs, w1, fixed_exits(point))?;
        Ok(SplitterOutputs {
            flow_out1,
            flow_out2,
            bpr_des: point.bpr_des,
        })
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

    fn rel(actual: f64, expected: f64) -> f64 {
        ((actual - expected) / expected).abs()
    }

    fn flow(gas: &GasAdapter<'_>, w: f64) -> FlowState {
        FlowState::resolve(
            gas,
            &StationSpec::new("fs").tt(630.74523).pt(0.0271945).w(w).mach(1.0),
        )
        .unwrap()
    }

    #[test]
    fn bypass_ratio_split() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let params = SplitterBprParams {
            bpr: 2.2285,
            mach_exit1_des: 1.0,
            mach_exit2_des: 1.0,
        };
        let mut splitter = SplitterBpr::new("split", params).unwrap();
        let des = splitter
            .design(&gas, &SplitterInputs::subsonic(flow(&gas, 3.48771299)))
            .unwrap();
        assert!(rel(des.flow_out1.w, 1.08) < 1e-3);
        assert!(rel(des.flow_out2.w, 2.407) < 1e-3);
        assert!(rel(des.flow_out1.area(), 1877.2) < 5e-3);
        assert!(rel(des.flow_out2.area(), 4183.4) < 5e-3);
        assert!(rel(des.flow_out1.statics.rhos, 0.0000737216) < 5e-3);
        assert_eq!(des.flow_out1.pt(), des.flow_out2.pt());

        let inputs = SplitterInputs {
            flow_in: flow(&gas, 3.48771299),
            exit1_is_super: true,
            exit2_is_super: true,
        };
        let off = splitter.off_design(&gas, &inputs).unwrap();
        assert!((off.flow_out1.mach() - 1.0).abs() < 1e-3);
        assert!((off.flow_out2.mach() - 1.0).abs() < 1e-3);

        let slower = SplitterInputs::subsonic(flow(&gas, 3.48771299 * 0.95));
        let off = splitter.off_design(&gas, &slower).unwrap();
        assert!(rel(off.flow_out1.mach(), 0.76922) < 5e-3);
        assert!(rel(off.flow_out2.mach(), 0.76922) < 5e-3);
        assert_eq!(off.bpr_des, 2.2285);
    }

    #[test]
    fn flow_split_keeps_design_ratio() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let params = SplitterWParams {
            w1_des: 1.08,
            mach_exit1_des: 1.0,
            mach_exit2_des: 1.0,
        };
        let mut splitter = SplitterW::new("split", params).unwrap();
        let des = splitter
            .design(&gas, &SplitterInputs::subsonic(flow(&gas, 3.48771299)))
            .unwrap();
        assert!(rel(des.bpr_des, (3.48771299 - 1.08) / 1.08) < 1e-12);

        let slower = SplitterInputs::subsonic(flow(&gas, 3.48771299 * 0.95));
        let off = splitter.off_design(&gas, &slower).unwrap();
        assert!(rel(off.flow_out1.w, 1.08 * 0.95) < 1e-12);
        assert!(rel(off.flow_out1.mach(), 0.76922) < 5e-3);
    }

    #[test]
    fn flow_split_rejects_oversized_stream() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let params = SplitterWParams {
            w1_des: 5.0,
            ..SplitterWParams::default()
        };
        let mut splitter = SplitterW::new("split", params).unwrap();
        let err = splitter
            .design(&gas, &SplitterInputs::subsonic(flow(&gas, 3.0)))
            .unwrap_err();
        assert!(matches!(err, ComponentError::InvalidSpec { .. }));
    }
}
