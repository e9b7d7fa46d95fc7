//! Counterflow heat exchanger against a constant-property cold stream.

use crate::common::{check_finite, check_fraction, check_positive, port, resolve};
use crate::design::DesignMemory;
use crate::error::{ComponentError, ComponentResult};
use crate::traits::CycleComponent;
use cf_core::constants::HP_PER_BTU_PER_S;
use cf_flow::{FlowState, StaticConstraint};
use cf_gas::GasAdapter;
use cf_solver::{SecantConfig, SolverError, secant_solve};
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeatExchangerParams {
    /// Cold-stream mass flow [lbm/s]
    pub w_cold: f64,
    /// Cold-stream specific heat [Btu/(lbm·°R)]
    pub cp_cold: f64,
    /// Cold-stream inlet temperature [°R]
    pub t_cold_in: f64,
    pub effectiveness: f64,
    pub mach_exit_des: f64,
    /// Hot-side total-pressure loss fraction
    pub dpqp: f64,
}

impl Default for HeatExchangerParams {
    fn default() -> Self {
        Self {
            w_cold: 0.992,
            cp_cold: 0.9993,
            t_cold_in: 518.58,
            effectiveness: 0.9765,
            mach_exit_des: 0.6,
            dpqp: 0.1,
        }
    }
}

/// Heat rates are in hp.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeatExchangerOutputs {
    pub flow_out: FlowState,
    pub q_max: f64,
    pub q_released: f64,
    pub q_absorbed: f64,
    /// Log-mean temperature difference [°R]
    pub lmtd: f64,
    pub t_hot_out: f64,
    pub t_cold_out: f64,
    /// `Qreleased − effectiveness·Qmax`
    pub resid_qmax: f64,
    /// `Qreleased − Qabsorbed`
    pub resid_e_balance: f64,
}

/// Exchanger energy balance, independent of the exit station.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Balance {
    q_max: f64,
    q_released: f64,
    q_absorbed: f64,
    t_hot_out: f64,
    t_cold_out: f64,
}

#[derive(Clone, Debug)]
pub struct HeatExchanger {
    pub name: String,
    pub params: HeatExchangerParams,
    /// Exit area [in²]
    memory: DesignMemory<f64>,
}

impl HeatExchanger {
    pub fn new(name: impl Into<String>, params: HeatExchangerParams) -> ComponentResult<Self> {
        check_positive(params.w_cold, "cold-stream flow must be positive")?;
        check_positive(params.cp_cold, "cold-stream specific heat must be positive")?;
        check_positive(params.t_cold_in, "cold-stream inlet temperature must be positive")?;
        check_finite(params.effectiveness, "effectiveness must be in (0, 1]")?;
        if !(params.effectiveness > 0.0 && params.effectiveness <= 1.0) {
            return Err(ComponentError::InvalidSpec {
                what: "effectiveness must be in (0, 1]",
            });
        }
        check_positive(params.mach_exit_des, "exchanger design exit Mach must be positive")?;
        check_fraction(params.dpqp, "exchanger pressure loss must be in [0, 1)")?;
        Ok(Self {
            name: name.into(),
            params,
            memory: DesignMemory::new(),
        })
    }

    fn balance(&self, flow_in: &FlowState) -> ComponentResult<Balance> {
        let p = &self.params;
        let c_hot = flow_in.w * flow_in.total.cp;
        let c_cold = p.w_cold * p.cp_cold;
        let tt_in = flow_in.tt();
        let q_max = c_hot.min(c_cold) * (tt_in - p.t_cold_in) * HP_PER_BTU_PER_S;
        let q_target = p.effectiveness * q_max;
        if c_hot <= 0.0 {
            return Err(ComponentError::InvalidSpec {
                what: "exchanger hot stream needs a positive mass flow",
            });
        }

        let config = SecantConfig::default().with_max_step(1e4);
        let hot = secant_solve(
            |t_hot_out| Ok::<f64, SolverError>(c_hot * (tt_in - t_hot_out) * HP_PER_BTU_PER_S - q_target),
            tt_in,
            &config,
        )
        .map_err(ComponentError::solver(&self.name))?;
        let q_released = c_hot * (tt_in - hot.x) * HP_PER_BTU_PER_S;

        let cold = secant_solve(
            |t_cold_out| {
                Ok::<f64, SolverError>(c_cold * (t_cold_out - p.t_cold_in) * HP_PER_BTU_PER_S - q_released)
            },
            p.t_cold_in,
            &config,
        )
        .map_err(ComponentError::solver(&self.name))?;

        Ok(Balance {
            q_max,
            q_released,
            q_absorbed: c_cold * (cold.x - p.t_cold_in) * HP_PER_BTU_PER_S,
            t_hot_out: hot.x,
            t_cold_out: cold.x,
        })
    }

    fn evaluate_at(
        &self,
        gas: &GasAdapter<'_>,
        flow_in: &FlowState,
        constraint: StaticConstraint,
    ) -> ComponentResult<HeatExchangerOutputs> {
        let b = self.balance(flow_in)?;
        let spec = flow_in
            .downstream(port(&self.name, "exit"))
            .tt(b.t_hot_out)
            .pt(flow_in.pt() * (1.0 - self.params.dpqp))
            .with_constraint(constraint);
        let flow_out = resolve(gas, &self.name, &spec)?;
        Ok(HeatExchangerOutputs {
            flow_out,
            q_max: b.q_max,
            q_released: b.q_released,
            q_absorbed: b.q_absorbed,
            lmtd: lmtd(
                flow_in.tt() - b.t_cold_out,
                b.t_hot_out - self.params.t_cold_in,
            ),
            t_hot_out: b.t_hot_out,
            t_cold_out: b.t_cold_out,
            resid_qmax: b.q_released - self.params.effectiveness * b.q_max,
            resid_e_balance: b.q_released - b.q_absorbed,
        })
    }
}

/// Counterflow log-mean temperature difference from the hot-end and
/// cold-end temperature differences.
///
/// Equal differences give the difference itself; differences of opposite
/// sign (or a zero) have no logarithmic mean and give 0.
pub fn lmtd(dt_hot_end: f64, dt_cold_end: f64) -> f64 {
    if dt_hot_end == dt_cold_end {
        return dt_hot_end;
    }
    let ratio = dt_cold_end / dt_hot_end;
    if !(ratio > 0.0) || !ratio.is_finite() {
        warn!(dt_hot_end, dt_cold_end, "LMTD undefined, reporting 0");
        return 0.0;
    }
    (dt_cold_end - dt_hot_end) / ratio.ln()
}

impl CycleComponent for HeatExchanger {
    type Inputs = FlowState;
    type Outputs = HeatExchangerOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn design(
        &mut self,
        gas: &GasAdapter<'_>,
        flow_in: &FlowState,
    ) -> ComponentResult<HeatExchangerOutputs> {
        let out = self.evaluate_at(
            gas,
            flow_in,
            StaticConstraint::Mach(self.params.mach_exit_des),
        )?;
        self.memory.record(&self.name, out.flow_out.area())?;
        info!(
            component = %self.name,
            exit_area = out.flow_out.area(),
            q_released = out.q_released,
            "heat exchanger sized"
        );
        Ok(out)
    }

    fn off_design(
        &self,
        gas: &GasAdapter<'_>,
        flow_in: &FlowState,
    ) -> ComponentResult<HeatExchangerOutputs> {
        let area = *self.memory.get(&self.name)?;
        self.evaluate_at(gas, flow_in, StaticConstraint::Area(area))
    }

    fn is_designed(&self) -> bool {
        self.memory.is_set()
    }

    fn reset_design(&mut self) {
        self.memory.reset();
    }
}
