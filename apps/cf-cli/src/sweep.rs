//! Back-pressure sweep of a design-sized nozzle.

use crate::error::{AppError, AppResult};
use crate::report::SweepRow;
use cf_components::{CycleComponent, Nozzle, NozzleInputs, NozzleParams};
use cf_flow::{FlowState, StationSpec};
use cf_gas::GasAdapter;
use rayon::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct SweepRequest {
    pub w: f64,
    pub tt: f64,
    pub pt: f64,
    pub design_back_ps: f64,
    pub from: f64,
    pub to: f64,
    pub points: usize,
}

/// Evenly spaced back pressures from `from` to `to`, both included.
pub fn back_pressures(from: f64, to: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![from],
        n => (0..n)
            .map(|i| from + (to - from) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Size the nozzle once, then evaluate every back pressure in parallel
/// against the shared design.
pub fn run(gas: &GasAdapter<'_>, req: &SweepRequest) -> AppResult<Vec<SweepRow>> {
    if req.points == 0 {
        return Err(AppError::InvalidInput(
            "sweep needs at least one point".to_string(),
        ));
    }
    let flow_in = FlowState::resolve(
        gas,
        &StationSpec::new("nozzle.in").tt(req.tt).pt(req.pt).w(req.w),
    )?;
    let mut nozzle = Nozzle::new("nozzle", NozzleParams::default())?;
    nozzle.design(
        gas,
        &NozzleInputs {
            flow_in: flow_in.clone(),
            back_ps: req.design_back_ps,
        },
    )?;

    let nozzle = &nozzle;
    back_pressures(req.from, req.to, req.points)
        .par_iter()
        .map(|&back_ps| -> AppResult<SweepRow> {
            let out = nozzle.off_design(
                gas,
                &NozzleInputs {
                    flow_in: flow_in.clone(),
                    back_ps,
                },
            )?;
            Ok(SweepRow {
                back_ps,
                regime: out.regime.to_string(),
                exit_mach: out.flow_out.mach(),
                exit_ps: out.flow_out.ps(),
                fg: out.fg,
                wq_aexit: out.wq_aexit,
                wq_aexit_dmd: out.wq_aexit_dmd,
            })
        })
        .collect()
}
