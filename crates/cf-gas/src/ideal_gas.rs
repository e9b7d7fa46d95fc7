//! Ideal-gas mixture model built on NASA polynomials.

use crate::composition::Composition;
use crate::error::GasResult;
use crate::model::{EquilibriumModel, EquilibriumState, StateInput, validation};
use cf_core::constants::R_UNIVERSAL;
use cf_core::units::{Pressure, k, kg_per_m3};
use cf_solver::{SecantConfig, secant_solve};
use tracing::trace;

/// Reference pressure of the standard-state entropy [Pa].
pub const P_REF_PA: f64 = 101_325.0;

/// Frozen-composition ideal-gas mixture.
///
/// Species properties come from NASA 7-coefficient polynomials and mix by
/// mole fraction, with the ideal entropy of mixing. Temperature is inverted
/// from enthalpy or entropy with the secant root finder.
#[derive(Clone, Debug)]
pub struct IdealGasModel {
    /// Inversion bounds [K]
    t_min: f64,
    t_max: f64,
}

impl Default for IdealGasModel {
    fn default() -> Self {
        Self::new()
    }
}

impl IdealGasModel {
    pub fn new() -> Self {
        Self {
            t_min: 50.0,
            t_max: 6_000.0,
        }
    }

    /// Mixture state at a known temperature.
    fn state_at(&self, p: Pressure, t_k: f64, comp: &Composition) -> EquilibriumState {
        let molar_mass = comp.molar_mass();
        let r = R_UNIVERSAL / molar_mass;

        let mut cp_r = 0.0;
        let mut h_rt = 0.0;
        let mut s_r = 0.0;
        for (species, x) in comp.mole_fractions() {
            let poly = species.nasa();
            cp_r += x * poly.cp_r(t_k);
            h_rt += x * poly.h_rt(t_k);
            s_r += x * (poly.s_r(t_k) - x.ln());
        }
        s_r -= (p.value / P_REF_PA).ln();

        let cp = cp_r * r;
        EquilibriumState {
            p,
            t: k(t_k),
            rho: kg_per_m3(p.value / (r * t_k)),
            h: h_rt * r * t_k,
            s: s_r * r,
            cp,
            cv: cp - r,
            molar_mass,
        }
    }

    /// Temperature at which `property(T) = target` at fixed pressure.
    fn invert(
        &self,
        p: Pressure,
        comp: &Composition,
        target: f64,
        property: fn(&EquilibriumState) -> f64,
    ) -> GasResult<f64> {
        let config = SecantConfig::default()
            .with_bounds(self.t_min, self.t_max)
            .with_tol(1e-12);
        let root = secant_solve(
            |t| Ok::<f64, crate::GasError>(property(&self.state_at(p, t, comp)) - target),
            300.0,
            &config,
        )?;
        trace!(t = root.x, iterations = root.iterations, "ideal gas inversion");
        Ok(root.x)
    }
}

impl EquilibriumModel for IdealGasModel {
    fn name(&self) -> &str {
        "NASA ideal gas"
    }

    fn supports_composition(&self, _comp: &Composition) -> bool {
        true
    }

    fn equilibrate(&self, input: StateInput, comp: &Composition) -> GasResult<EquilibriumState> {
        let p = input.pressure();
        validation::validate_pressure(p)?;

        let t_k = match input {
            StateInput::PT { t, .. } => {
                validation::validate_temperature(t)?;
                t.value
            }
            StateInput::PH { h, .. } => {
                validation::validate_finite(h, "enthalpy must be finite")?;
                self.invert(p, comp, h, |st| st.h)?
            }
            StateInput::PS { s, .. } => {
                validation::validate_finite(s, "entropy must be finite")?;
                self.invert(p, comp, s, |st| st.s)?
            }
        };

        let state = self.state_at(p, t_k, comp);
        validation::validate_state(&state)?;
        Ok(state)
    }
}
