//! Equilibrium model trait and validation helpers.

use crate::composition::Composition;
use crate::error::{GasError, GasResult};
use cf_core::constants::R_UNIVERSAL;
use cf_core::units::{Density, Pressure, Temperature};

/// Specific enthalpy [J/kg]
pub type SpecEnthalpy = f64;
/// Specific entropy [J/(kg·K)]
pub type SpecEntropy = f64;
/// Specific heat capacity [J/(kg·K)]
pub type SpecHeatCapacity = f64;

/// The independent pair fixing an equilibrium state (SI).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StateInput {
    PT { p: Pressure, t: Temperature },
    PH { p: Pressure, h: SpecEnthalpy },
    PS { p: Pressure, s: SpecEntropy },
}

impl StateInput {
    pub fn pressure(&self) -> Pressure {
        match self {
            StateInput::PT { p, .. } | StateInput::PH { p, .. } | StateInput::PS { p, .. } => *p,
        }
    }
}

/// Complete equilibrium state returned by a model (SI).
#[derive(Clone, Debug, PartialEq)]
pub struct EquilibriumState {
    pub p: Pressure,
    pub t: Temperature,
    pub rho: Density,
    pub h: SpecEnthalpy,
    pub s: SpecEntropy,
    pub cp: SpecHeatCapacity,
    pub cv: SpecHeatCapacity,
    /// Mixture molar mass [kg/kmol]
    pub molar_mass: f64,
}

impl EquilibriumState {
    pub fn gamma(&self) -> f64 {
        self.cp / self.cv
    }

    /// Specific gas constant [J/(kg·K)].
    pub fn r_specific(&self) -> f64 {
        R_UNIVERSAL / self.molar_mass
    }

    /// Ideal-gas speed of sound from gamma, the local gas constant and
    /// temperature [m/s].
    pub fn speed_of_sound(&self) -> f64 {
        (self.gamma() * self.r_specific() * self.t.value).sqrt()
    }

    pub fn summary(&self) -> String {
        format!(
            "State(P={:.0}Pa,T={:.2}K,ρ={:.4}kg/m³,h={:.1}J/kg,s={:.2}J/kg·K,γ={:.4})",
            self.p.value,
            self.t.value,
            self.rho.value,
            self.h,
            self.s,
            self.gamma()
        )
    }
}

/// Gas equilibrium backend.
///
/// Implementations are stateless per call and thread-safe so independent
/// stations can be resolved in parallel.
pub trait EquilibriumModel: Send + Sync {
    /// Model name for logging.
    fn name(&self) -> &str;

    fn supports_composition(&self, comp: &Composition) -> bool;

    /// Equilibrate `comp` at the given independent pair.
    fn equilibrate(&self, input: StateInput, comp: &Composition) -> GasResult<EquilibriumState>;
}

pub(crate) mod validation {
    use super::*;

    pub fn validate_pressure(p: Pressure) -> GasResult<()> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(GasError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    pub fn validate_temperature(t: Temperature) -> GasResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(GasError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    pub fn validate_finite(v: f64, what: &'static str) -> GasResult<()> {
        if !v.is_finite() {
            return Err(GasError::NonPhysical { what });
        }
        Ok(())
    }

    /// Check every field of a state a backend produced.
    pub fn validate_state(state: &EquilibriumState) -> GasResult<()> {
        validate_pressure(state.p)?;
        validate_temperature(state.t)?;
        if !state.rho.value.is_finite() || state.rho.value <= 0.0 {
            return Err(GasError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        validate_finite(state.h, "enthalpy must be finite")?;
        validate_finite(state.s, "entropy must be finite")?;
        if !(state.cp > 0.0 && state.cv > 0.0 && state.cp.is_finite() && state.cv.is_finite()) {
            return Err(GasError::NonPhysical {
                what: "specific heats must be positive and finite",
            });
        }
        if state.gamma() < 1.0 {
            return Err(GasError::NonPhysical {
                what: "gamma must be >= 1",
            });
        }
        Ok(())
    }
}
