//! CoolProp-based equilibrium model (pure substances only).

use crate::composition::Composition;
use crate::error::{GasError, GasResult};
use crate::model::{EquilibriumModel, EquilibriumState, StateInput, validation};
use cf_core::units::{k, kg_per_m3, pa};
use rfluids::prelude::*;

/// CoolProp backend via `rfluids`.
///
/// Supports pure compositions only. Enthalpy and entropy use CoolProp's
/// reference state, so states from this model must not be mixed with states
/// from [`crate::IdealGasModel`].
#[derive(Clone, Debug, Default)]
pub struct CoolPropModel;

impl CoolPropModel {
    pub fn new() -> Self {
        Self
    }

    fn backend(message: impl std::fmt::Display) -> GasError {
        GasError::Backend {
            message: format!("rfluids error: {message}"),
        }
    }
}

impl EquilibriumModel for CoolPropModel {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn supports_composition(&self, comp: &Composition) -> bool {
        comp.is_pure().is_some()
    }

    fn equilibrate(&self, input: StateInput, comp: &Composition) -> GasResult<EquilibriumState> {
        let species = comp.is_pure().ok_or(GasError::NotSupported {
            what: "CoolProp backend handles pure compositions only",
        })?;
        let p_pa = input.pressure().value;
        validation::validate_pressure(input.pressure())?;

        let second = match input {
            StateInput::PT { t, .. } => {
                validation::validate_temperature(t)?;
                FluidInput::temperature(t.value)
            }
            StateInput::PH { h, .. } => {
                validation::validate_finite(h, "enthalpy must be finite")?;
                FluidInput::enthalpy(h)
            }
            StateInput::PS { s, .. } => {
                validation::validate_finite(s, "entropy must be finite")?;
                FluidInput::entropy(s)
            }
        };

        let mut fluid = Fluid::from(species.rfluids_pure())
            .in_state(FluidInput::pressure(p_pa), second)
            .map_err(Self::backend)?;

        let t_k = fluid.temperature().map_err(Self::backend)?;
        let rho = fluid.density().map_err(Self::backend)?;
        let h = fluid.enthalpy().map_err(Self::backend)?;
        let s = fluid.entropy().map_err(Self::backend)?;
        let cp = fluid.specific_heat().map_err(Self::backend)?;
        let r_specific = p_pa / (rho * t_k);

        let state = EquilibriumState {
            p: pa(p_pa),
            t: k(t_k),
            rho: kg_per_m3(rho),
            h,
            s,
            cp,
            cv: cp - r_specific,
            molar_mass: species.molar_mass(),
        };
        validation::validate_state(&state)?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mixtures() {
        let model = CoolPropModel::new();
        let comp = Composition::humid_air(0.05).unwrap();
        assert!(!model.supports_composition(&comp));
        let err = model
            .equilibrate(
                StateInput::PT {
                    p: pa(1e5),
                    t: k(300.0),
                },
                &comp,
            )
            .unwrap_err();
        assert!(matches!(err, GasError::NotSupported { .. }));
    }

    #[test]
    fn air_density_at_sea_level() {
        let model = CoolPropModel::new();
        let state = model
            .equilibrate(
                StateInput::PT {
                    p: pa(101_325.0),
                    t: k(288.15),
                },
                &Composition::dry_air(),
            )
            .unwrap();
        assert!((state.rho.value - 1.225).abs() < 0.01);
    }
}
