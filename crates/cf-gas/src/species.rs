//! Chemical species carried in gas compositions.

use crate::error::GasError;
use crate::nasa::{self, NasaPolynomial};
use std::fmt;
use std::str::FromStr;

/// Species with ideal-gas thermodynamic data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Species {
    /// Dry air treated as a single pseudo-species
    Air,
    /// Nitrogen (N₂)
    N2,
    /// Oxygen (O₂)
    O2,
    /// Argon (Ar)
    Ar,
    /// Carbon dioxide (CO₂)
    CO2,
    /// Water vapor (H₂O)
    H2O,
}

impl Species {
    pub const ALL: [Species; 6] = [
        Species::Air,
        Species::N2,
        Species::O2,
        Species::Ar,
        Species::CO2,
        Species::H2O,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Species::Air => "Air",
            Species::N2 => "N2",
            Species::O2 => "O2",
            Species::Ar => "Ar",
            Species::CO2 => "CO2",
            Species::H2O => "H2O",
        }
    }

    /// Molar mass [kg/kmol].
    ///
    /// Air is N1.56 O0.42 Ar0.01 per formula unit.
    pub fn molar_mass(&self) -> f64 {
        match self {
            Species::Air => 28.969_66,
            Species::N2 => 28.013_4,
            Species::O2 => 31.998_8,
            Species::Ar => 39.948,
            Species::CO2 => 44.009_5,
            Species::H2O => 18.015_28,
        }
    }

    /// NASA 7-coefficient polynomial for this species.
    pub fn nasa(&self) -> &'static NasaPolynomial {
        match self {
            Species::Air => &nasa::AIR,
            Species::N2 => &nasa::N2,
            Species::O2 => &nasa::O2,
            Species::Ar => &nasa::AR,
            Species::CO2 => &nasa::CO2,
            Species::H2O => &nasa::H2O,
        }
    }

    /// Map to the rfluids pure substance used by the CoolProp backend.
    #[cfg(feature = "coolprop")]
    pub(crate) fn rfluids_pure(&self) -> rfluids::substance::Pure {
        use rfluids::substance::Pure;
        match self {
            Species::Air => Pure::Air,
            Species::N2 => Pure::Nitrogen,
            Species::O2 => Pure::Oxygen,
            Species::Ar => Pure::Argon,
            Species::CO2 => Pure::CarbonDioxide,
            Species::H2O => Pure::Water,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Species {
    type Err = GasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .iter()
            .copied()
            .find(|sp| sp.key().eq_ignore_ascii_case(s.trim()))
            .ok_or(GasError::InvalidArg {
                what: "unknown species key",
            })
    }
}
