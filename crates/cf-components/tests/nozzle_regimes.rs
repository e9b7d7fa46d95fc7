//! Nozzle regime sweep and the unchoked mass-flow closure.

use cf_components::{
    ComponentError, CycleComponent, Nozzle, NozzleInputs, NozzleOutputs, NozzleParams,
    NozzleRegime,
};
use cf_core::constants::G_C;
use cf_core::rel_diff as rel;
use cf_flow::{FlowError, FlowState, StationSpec};
use cf_gas::{GasAdapter, IdealGasModel};
use cf_solver::{BracketConfig, SolverError, bracketed_solve};

fn flow_in(gas: &GasAdapter<'_>, w: f64) -> FlowState {
    FlowState::resolve(
        gas,
        &StationSpec::new("nozzle.in").tt(700.0).pt(50.0).w(w).mach(0.4),
    )
    .unwrap()
}

/// Gross thrust less the momentum term.
fn pressure_thrust(out: &NozzleOutputs) -> f64 {
    out.fg - out.flow_out.w * out.flow_out.vflow() / G_C
}

fn designed(gas: &GasAdapter<'_>) -> Nozzle {
    let mut nozzle = Nozzle::new("nozzle", NozzleParams::default()).unwrap();
    let out = nozzle
        .design(
            gas,
            &NozzleInputs {
                flow_in: flow_in(gas, 100.0),
                back_ps: 15.0,
            },
        )
        .unwrap();
    assert_eq!(out.regime, NozzleRegime::PerfectlyExpanded);
    nozzle
}

#[test]
fn design_sizes_throat_and_exit() {
    let model = IdealGasModel::new();
    let gas = GasAdapter::new(&model);
    let mut nozzle = Nozzle::new("nozzle", NozzleParams::default()).unwrap();
    let out = nozzle
        .design(
            &gas,
            &NozzleInputs {
                flow_in: flow_in(&gas, 100.0),
                back_ps: 15.0,
            },
        )
        .unwrap();
    let point = *nozzle.design_point().unwrap();
    assert!(rel(point.throat_area, 99.59) < 5e-3);
    assert!(rel(point.exit_area, 112.88) < 5e-3);
    assert!(rel(out.flow_out.mach(), 1.432) < 5e-3);
    assert!((out.throat.mach() - 1.0).abs() < 1e-8);
    assert!(rel(out.flow_out.ps(), 15.0) < 1e-9);
    assert!(rel(out.ar, point.exit_area / point.throat_area) < 1e-12);
    // Ideal expansion: gross thrust is momentum only
    let momentum = out.flow_out.w * out.flow_out.vflow() / cf_core::constants::G_C;
    assert!(rel(out.fg, momentum) < 1e-9);
}

#[test]
fn regime_follows_back_pressure() {
    let model = IdealGasModel::new();
    let gas = GasAdapter::new(&model);
    let nozzle = designed(&gas);
    let inputs = |back_ps| NozzleInputs {
        flow_in: flow_in(&gas, 100.0),
        back_ps,
    };

    let cases = [
        (14.0, NozzleRegime::Underexpanded),
        (14.99, NozzleRegime::PerfectlyExpanded),
        (15.0, NozzleRegime::PerfectlyExpanded),
        (16.0, NozzleRegime::Overexpanded),
        (19.0, NozzleRegime::Overexpanded),
        (24.0, NozzleRegime::Overexpanded),
        (27.0, NozzleRegime::Overexpanded),
        (32.0, NozzleRegime::Overexpanded),
        (35.0, NozzleRegime::NormalShock),
        (37.0, NozzleRegime::NormalShock),
        (40.0, NozzleRegime::Unchoked),
    ];
    for (back_ps, regime) in cases {
        let out = nozzle.off_design(&gas, &inputs(back_ps)).unwrap();
        assert_eq!(out.regime, regime, "back pressure {back_ps}");
        assert!(rel(out.flow_out.w, 100.0) < 1e-12);
        assert!(rel(out.flow_out.tt(), 700.0) < 1e-9);
    }
}

#[test]
fn supersonic_exit_is_fixed_by_area() {
    let model = IdealGasModel::new();
    let gas = GasAdapter::new(&model);
    let nozzle = designed(&gas);
    let point = *nozzle.design_point().unwrap();
    let run = |back_ps| {
        nozzle
            .off_design(
                &gas,
                &NozzleInputs {
                    flow_in: flow_in(&gas, 100.0),
                    back_ps,
                },
            )
            .unwrap()
    };

    let under = run(14.0);
    assert_eq!(under.regime, NozzleRegime::Underexpanded);
    assert!(rel(under.athroat_dmd, 99.59) < 5e-3);
    assert!(rel(under.athroat_dmd, point.throat_area) < 1e-6);
    assert!(rel(under.flow_out.area(), 112.88) < 5e-3);
    assert!(rel(under.flow_out.pt(), 50.0) < 1e-9);
    // Exit still above ambient: pressure term adds thrust
    assert!(pressure_thrust(&under) > 0.0);
    let expected = under.flow_out.area() * (under.flow_out.ps() - 14.0);
    assert!(rel(pressure_thrust(&under), expected) < 1e-6);

    for back_ps in [16.0, 19.0] {
        let over = run(back_ps);
        assert_eq!(over.regime, NozzleRegime::Overexpanded);
        assert!(rel(over.flow_out.ps(), 15.0) < 1e-6, "back pressure {back_ps}");
        assert!(rel(over.flow_out.mach(), 1.432) < 5e-3);
        assert!(rel(over.flow_out.mach(), under.flow_out.mach()) < 1e-6);
        assert!(rel(over.flow_out.area(), point.exit_area) < 1e-9);
        // Exit below ambient: pressure term is a penalty
        let penalty = pressure_thrust(&over);
        assert!(penalty < 0.0);
        assert!(rel(penalty, point.exit_area * (over.flow_out.ps() - back_ps)) < 1e-6);
    }
}

#[test]
fn normal_shock_at_exit_plane() {
    let model = IdealGasModel::new();
    let gas = GasAdapter::new(&model);
    let nozzle = designed(&gas);
    let run = |back_ps| {
        nozzle
            .off_design(
                &gas,
                &NozzleInputs {
                    flow_in: flow_in(&gas, 100.0),
                    back_ps,
                },
            )
            .unwrap()
    };

    let at_35 = run(35.0);
    assert_eq!(at_35.regime, NozzleRegime::NormalShock);
    assert!((at_35.flow_out.mach() - 0.675).abs() < 5e-3);
    assert!(rel(at_35.flow_out.ps(), 35.0) < 1e-6);
    assert!(at_35.flow_out.pt() < at_35.throat.pt());
    assert!(rel(at_35.flow_out.tt(), 700.0) < 1e-9);

    let at_37 = run(37.0);
    assert_eq!(at_37.regime, NozzleRegime::NormalShock);
    assert!(rel(at_37.flow_out.ps(), 37.0) < 1e-6);
    // The shock stands at the exit plane whatever the back pressure
    assert!(rel(at_37.flow_out.pt(), at_35.flow_out.pt()) < 1e-9);
    assert!(at_37.flow_out.mach() < at_35.flow_out.mach());
    assert!(rel(at_37.flow_out.w, 100.0) < 1e-12);
}

#[test]
fn high_pressure_ratio_nozzle_runs_off_design() {
    let model = IdealGasModel::new();
    let gas = GasAdapter::new(&model);
    let mut nozzle = Nozzle::new("nozzle", NozzleParams::default()).unwrap();
    let inputs = |back_ps| NozzleInputs {
        flow_in: flow_in(&gas, 100.0),
        back_ps,
    };
    let design = nozzle.design(&gas, &inputs(0.4)).unwrap();
    assert!(design.flow_out.mach() > 3.8);

    let same = nozzle.off_design(&gas, &inputs(0.4)).unwrap();
    assert_eq!(same.regime, NozzleRegime::PerfectlyExpanded);
    assert!((same.flow_out.mach() - design.flow_out.mach()).abs() < 1e-5);
    assert!(rel(same.flow_out.ps(), 0.4) < 1e-5);

    assert_eq!(
        nozzle.off_design(&gas, &inputs(0.3)).unwrap().regime,
        NozzleRegime::Underexpanded
    );
    assert_eq!(
        nozzle.off_design(&gas, &inputs(1.0)).unwrap().regime,
        NozzleRegime::Overexpanded
    );
}

#[test]
fn exit_failures_name_the_exit_port() {
    let model = IdealGasModel::new();
    let gas = GasAdapter::new(&model);
    let nozzle = designed(&gas);
    // Sonic area at this flow exceeds the fixed exit area
    let err = nozzle
        .off_design(
            &gas,
            &NozzleInputs {
                flow_in: flow_in(&gas, 120.0),
                back_ps: 15.0,
            },
        )
        .unwrap_err();
    match err {
        ComponentError::Resolution { component, source } => {
            assert_eq!(component, "nozzle");
            assert!(
                matches!(&source, FlowError::Choked { station, .. } if station == "nozzle.exit"),
                "{source}"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unchoked_host_closure() {
    let model = IdealGasModel::new();
    let gas = GasAdapter::new(&model);
    let nozzle = designed(&gas);
    let back_ps = 39.0;
    let evaluate = |w: f64| {
        nozzle
            .off_design(
                &gas,
                &NozzleInputs {
                    flow_in: flow_in(&gas, w),
                    back_ps,
                },
            )
            .unwrap()
    };

    let config = BracketConfig {
        tol: 1e-9,
        ..BracketConfig::default()
    };
    let root = bracketed_solve(
        |w| {
            let out = evaluate(w);
            Ok::<f64, SolverError>(out.wq_aexit - out.wq_aexit_dmd)
        },
        80.0,
        99.5,
        None,
        &config,
    )
    .unwrap();
    assert!((root.x - 96.04).abs() < 0.05);

    let out = evaluate(root.x + 1e-3);
    assert_eq!(out.regime, NozzleRegime::Unchoked);
    assert!((out.flow_out.mach() - 0.607).abs() < 0.01);
    assert!(rel(out.flow_out.ps(), back_ps) < 1e-3);
}
