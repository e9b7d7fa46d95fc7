//! Named reactants mixed into a station's gas.

use crate::species::Species;

/// A reactant that can be mixed into the flow by mass.
///
/// Each reactant contributes a fixed species split; a composition is the
/// mass-weighted sum of the splits of the reactants present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reactant {
    Air,
    Water,
}

impl Reactant {
    pub const ALL: [Reactant; 2] = [Reactant::Air, Reactant::Water];

    pub fn key(&self) -> &'static str {
        match self {
            Reactant::Air => "Air",
            Reactant::Water => "H2O",
        }
    }

    /// Species mass fractions making up one unit mass of this reactant.
    pub fn species_split(&self) -> &'static [(Species, f64)] {
        match self {
            Reactant::Air => &[(Species::Air, 1.0)],
            Reactant::Water => &[(Species::H2O, 1.0)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_sum_to_one() {
        for reactant in Reactant::ALL {
            let sum: f64 = reactant.species_split().iter().map(|(_, f)| f).sum();
            assert!((sum - 1.0).abs() < 1e-12, "{}", reactant.key());
        }
    }
}
