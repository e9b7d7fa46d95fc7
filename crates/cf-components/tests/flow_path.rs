//! Serial flow paths and conservation across components.

use cf_components::{
    Compressor, CompressorParams, CycleComponent, Duct, DuctParams, FlowStart, HeatExchanger,
    HeatExchangerParams, Inlet, InletParams, Nozzle, NozzleInputs, NozzleParams, SplitterBpr,
    SplitterBprParams, SplitterInputs, SplitterW, SplitterWParams, StartConditions,
};
use cf_core::rel_diff as rel;
use cf_flow::{FlowState, StationSpec};
use cf_gas::{GasAdapter, IdealGasModel};
use proptest::prelude::*;

struct Chain {
    start: FlowStart,
    inlet: Inlet,
    duct: Duct,
    compressor: Compressor,
    exchanger: HeatExchanger,
    nozzle: Nozzle,
}

impl Chain {
    fn new() -> Self {
        Self {
            start: FlowStart::new("start"),
            inlet: Inlet::new("inlet", InletParams::default()).unwrap(),
            duct: Duct::new(
                "duct",
                DuctParams {
                    dpqp: 0.02,
                    ..DuctParams::default()
                },
            )
            .unwrap(),
            compressor: Compressor::new(
                "hpc",
                CompressorParams {
                    eff_des: 0.8,
                    ..CompressorParams::default()
                },
            )
            .unwrap(),
            exchanger: HeatExchanger::new("hx", HeatExchangerParams::default()).unwrap(),
            nozzle: Nozzle::new("nozzle", NozzleParams { dpqp: 0.01 }).unwrap(),
        }
    }

    fn run(
        &mut self,
        gas: &GasAdapter<'_>,
        w: f64,
        design: bool,
    ) -> Vec<FlowState> {
        let conditions = StartConditions {
            w,
            pt: 0.0272,
            tt: 630.75,
            mach: 0.6,
            war: 0.0,
        };
        let s0 = self.start.evaluate(gas, &conditions, design).unwrap().flow_out;
        let s1 = self.inlet.evaluate(gas, &s0, design).unwrap().flow_out;
        let s2 = self.duct.evaluate(gas, &s1, design).unwrap().flow_out;
        let s3 = self.compressor.evaluate(gas, &s2, design).unwrap().flow_out;
        let s4 = self.exchanger.evaluate(gas, &s3, design).unwrap().flow_out;
        let inputs = NozzleInputs {
            flow_in: s4.clone(),
            back_ps: 0.0272,
        };
        let s5 = self.nozzle.evaluate(gas, &inputs, design).unwrap().flow_out;
        vec![s0, s1, s2, s3, s4, s5]
    }
}

#[test]
fn chain_design_then_off_design() {
    let model = IdealGasModel::new();
    let gas = GasAdapter::new(&model);
    let mut chain = Chain::new();

    let design = chain.run(&gas, 1.08, true);
    for station in &design {
        assert!(rel(station.w, 1.08) < 1e-12, "{}", station.name);
        assert!(station.ps() > 0.0 && station.area() > 0.0, "{}", station.name);
    }
    // Adiabatic elements keep total enthalpy
    assert!(rel(design[1].ht(), design[0].ht()) < 1e-12);
    assert!(rel(design[2].ht(), design[1].ht()) < 1e-12);
    assert!(design[3].pt() > design[2].pt());
    assert!(design[4].tt() < design[3].tt());
    assert!(design[5].mach() > 1.0);

    let off = chain.run(&gas, 1.08 * 1.05, false);
    for (d, o) in design.iter().zip(&off).skip(1).take(4) {
        assert!(rel(o.area(), d.area()) < 1e-6, "{} area drifted", o.name);
    }
    assert!(off[1].mach() > design[1].mach());
    assert!(off[3].pt() > design[3].pt());
}

#[test]
fn compressor_off_design_at_design_flow_reproduces_design() {
    let model = IdealGasModel::new();
    let gas = GasAdapter::new(&model);
    let flow_in = FlowState::resolve(
        &gas,
        &StationSpec::new("hpc.in").tt(630.75).pt(0.0272).w(1.08).mach(0.6),
    )
    .unwrap();
    let mut compressor = Compressor::new("hpc", CompressorParams::default()).unwrap();
    let design = compressor.design(&gas, &flow_in).unwrap();
    let off = compressor.off_design(&gas, &flow_in).unwrap();

    assert!(rel(off.pr, design.pr) < 1e-12);
    assert!(rel(off.pwr, design.pwr) < 1e-9);
    assert!(rel(off.eff_poly, design.eff_poly) < 1e-9);
    assert!(rel(off.flow_out.pt(), design.flow_out.pt()) < 1e-9);
    assert!(rel(off.flow_out.tt(), design.flow_out.tt()) < 1e-9);
    assert!((off.flow_out.mach() - design.flow_out.mach()).abs() < 1e-6);
    assert!(rel(off.flow_out.ps(), design.flow_out.ps()) < 1e-6);
}

fn splitter_feed(gas: &GasAdapter<'_>, w: f64) -> FlowState {
    FlowState::resolve(
        gas,
        &StationSpec::new("split.in").tt(630.75).pt(0.0272).w(w).mach(0.3),
    )
    .unwrap()
}

fn assert_split(input: &FlowState, out1: &FlowState, out2: &FlowState) -> Result<(), TestCaseError> {
    prop_assert!(rel(out1.w + out2.w, input.w) < 1e-12);
    prop_assert!(rel(out1.ht(), input.ht()) < 1e-12);
    prop_assert!(rel(out2.ht(), input.ht()) < 1e-12);
    prop_assert!(rel(out1.pt(), input.pt()) < 1e-12);
    prop_assert!(rel(out2.pt(), input.pt()) < 1e-12);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn splitters_conserve_flow_and_totals(
        bpr in 0.5_f64..5.0,
        w1_share in 0.1_f64..0.8,
        scale in 0.7_f64..1.1,
    ) {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let design_feed = splitter_feed(&gas, 3.488);
        let off_feed = splitter_feed(&gas, 3.488 * scale);

        let mut by_ratio = SplitterBpr::new(
            "fan_split",
            SplitterBprParams { bpr, ..SplitterBprParams::default() },
        )
        .unwrap();
        let out = by_ratio.design(&gas, &SplitterInputs::subsonic(design_feed.clone())).unwrap();
        assert_split(&design_feed, &out.flow_out1, &out.flow_out2)?;
        prop_assert!(rel(out.flow_out2.w / out.flow_out1.w, bpr) < 1e-9);
        let out = by_ratio.off_design(&gas, &SplitterInputs::subsonic(off_feed.clone())).unwrap();
        assert_split(&off_feed, &out.flow_out1, &out.flow_out2)?;

        let mut by_flow = SplitterW::new(
            "bleed",
            SplitterWParams { w1_des: 3.488 * w1_share, ..SplitterWParams::default() },
        )
        .unwrap();
        let out = by_flow.design(&gas, &SplitterInputs::subsonic(design_feed.clone())).unwrap();
        assert_split(&design_feed, &out.flow_out1, &out.flow_out2)?;
        let out = by_flow.off_design(&gas, &SplitterInputs::subsonic(off_feed.clone())).unwrap();
        assert_split(&off_feed, &out.flow_out1, &out.flow_out2)?;
        prop_assert!(rel(out.flow_out2.w / out.flow_out1.w, out.bpr_des) < 1e-9);
    }
}
