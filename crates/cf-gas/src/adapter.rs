//! Engineering-unit façade over an [`EquilibriumModel`].

use crate::composition::Composition;
use crate::error::GasResult;
use crate::model::{EquilibriumModel, EquilibriumState, StateInput};
use crate::units::{
    BTU_PER_LBM_R_PER_J_PER_KG_K, FT_PER_M, LBM_FT3_PER_KG_M3, enthalpy_to_btu, enthalpy_to_si,
    entropy_to_btu, entropy_to_si, kelvin_to_rankine, pa_to_psi, psi_to_pa, rankine_to_kelvin,
};
use cf_core::units::{k, pa};
use tracing::trace;

/// Independent pair in engineering units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GasSpec {
    /// Temperature [°R] and pressure [psia]
    TP { t: f64, p: f64 },
    /// Enthalpy [Btu/lbm] and pressure [psia]
    HP { h: f64, p: f64 },
    /// Entropy [Btu/(lbm·°R)] and pressure [psia]
    SP { s: f64, p: f64 },
}

/// Equilibrium properties in engineering units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasProperties {
    /// Enthalpy [Btu/lbm]
    pub h: f64,
    /// Entropy [Btu/(lbm·°R)]
    pub s: f64,
    /// Temperature [°R]
    pub t: f64,
    /// Pressure [psia]
    pub p: f64,
    /// Density [lbm/ft³]
    pub rho: f64,
    /// Specific heat at constant pressure [Btu/(lbm·°R)]
    pub cp: f64,
    /// Specific heat at constant volume [Btu/(lbm·°R)]
    pub cv: f64,
    /// Gas constant [Btu/(lbm·°R)]
    pub r: f64,
    /// Speed of sound [ft/s]
    pub sonic_velocity: f64,
}

impl GasProperties {
    pub fn gamma(&self) -> f64 {
        self.cp / self.cv
    }

    fn from_si(state: &EquilibriumState) -> Self {
        Self {
            h: enthalpy_to_btu(state.h),
            s: entropy_to_btu(state.s),
            t: kelvin_to_rankine(state.t.value),
            p: pa_to_psi(state.p.value),
            rho: state.rho.value * LBM_FT3_PER_KG_M3,
            cp: state.cp * BTU_PER_LBM_R_PER_J_PER_KG_K,
            cv: state.cv * BTU_PER_LBM_R_PER_J_PER_KG_K,
            r: state.r_specific() * BTU_PER_LBM_R_PER_J_PER_KG_K,
            sonic_velocity: state.speed_of_sound() * FT_PER_M,
        }
    }
}

/// Converts engineering-unit requests into model calls and back.
///
/// Stateless apart from the borrowed model; cheap to copy.
#[derive(Clone, Copy)]
pub struct GasAdapter<'m> {
    model: &'m dyn EquilibriumModel,
}

impl std::fmt::Debug for GasAdapter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GasAdapter")
            .field("model", &self.model.name())
            .finish()
    }
}

impl<'m> GasAdapter<'m> {
    pub fn new(model: &'m dyn EquilibriumModel) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn equilibrate(&self, spec: GasSpec, comp: &Composition) -> GasResult<GasProperties> {
        let input = match spec {
            GasSpec::TP { t, p } => StateInput::PT {
                p: pa(psi_to_pa(p)),
                t: k(rankine_to_kelvin(t)),
            },
            GasSpec::HP { h, p } => StateInput::PH {
                p: pa(psi_to_pa(p)),
                h: enthalpy_to_si(h),
            },
            GasSpec::SP { s, p } => StateInput::PS {
                p: pa(psi_to_pa(p)),
                s: entropy_to_si(s),
            },
        };
        let state = self.model.equilibrate(input, comp)?;
        trace!(state = %state.summary(), "equilibrated");
        Ok(GasProperties::from_si(&state))
    }
}
