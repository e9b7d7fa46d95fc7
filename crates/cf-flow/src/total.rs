//! Total (stagnation) state resolution.

use crate::error::{FlowError, FlowResult};
use cf_core::constants::{P_STD_PSI, T_STD_R};
use cf_gas::{Composition, GasAdapter, GasProperties, GasSpec};

/// The one independent thermal property that fixes a total state with `Pt`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TotalSpec {
    /// Total temperature [°R]
    Tt(f64),
    /// Total enthalpy [Btu/lbm]
    Ht(f64),
    /// Entropy [Btu/(lbm·°R)]
    S(f64),
}

/// Stagnation properties of a station.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TotalState {
    /// Total enthalpy [Btu/lbm]
    pub ht: f64,
    /// Total temperature [°R]
    pub tt: f64,
    /// Total pressure [psia]
    pub pt: f64,
    /// Entropy [Btu/(lbm·°R)]
    pub s: f64,
    /// Total density [lbm/ft³]
    pub rhot: f64,
    /// [Btu/(lbm·°R)]
    pub cp: f64,
    /// [Btu/(lbm·°R)]
    pub cv: f64,
    pub gamt: f64,
    /// Gas constant of the mixture [Btu/(lbm·°R)]
    pub r: f64,
}

impl TotalState {
    fn from_props(props: &GasProperties) -> Self {
        Self {
            ht: props.h,
            tt: props.t,
            pt: props.p,
            s: props.s,
            rhot: props.rho,
            cp: props.cp,
            cv: props.cv,
            gamt: props.gamma(),
            r: props.r,
        }
    }
}

/// Resolve the total state from one thermal property plus `Pt`.
pub fn resolve_total(
    gas: &GasAdapter<'_>,
    spec: TotalSpec,
    pt: f64,
    comp: &Composition,
) -> FlowResult<TotalState> {
    if !pt.is_finite() {
        return Err(FlowError::InvalidSpec {
            what: "total pressure must be finite",
        });
    }
    let gas_spec = match spec {
        TotalSpec::Tt(t) if t.is_finite() => GasSpec::TP { t, p: pt },
        TotalSpec::Ht(h) if h.is_finite() => GasSpec::HP { h, p: pt },
        TotalSpec::S(s) if s.is_finite() => GasSpec::SP { s, p: pt },
        _ => {
            return Err(FlowError::InvalidSpec {
                what: "total temperature, enthalpy or entropy must be finite",
            });
        }
    };
    let props = gas.equilibrate(gas_spec, comp)?;
    Ok(TotalState {
        pt,
        ..TotalState::from_props(&props)
    })
}

/// Corrected flow `W·sqrt(Tt/518.67)/(Pt/14.696)`.
///
/// `None` unless both `Tt` and `Pt` are positive.
pub fn corrected_flow(w: f64, tt: f64, pt: f64) -> Option<f64> {
    if tt > 0.0 && pt > 0.0 {
        Some(w * (tt / T_STD_R).sqrt() / (pt / P_STD_PSI))
    } else {
        None
    }
}
