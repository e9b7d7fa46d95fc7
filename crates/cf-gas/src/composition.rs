//! Gas composition by species mass fraction.

use crate::error::{GasError, GasResult};
use crate::reactant::Reactant;
use crate::species::Species;
use cf_core::numeric::{Tolerances, nearly_equal};

/// Fractions below this are dropped and the remainder renormalized.
pub const MIN_MASS_FRACTION: f64 = 1e-5;

/// Gas composition defined by normalized mass fractions.
///
/// Always normalized (fractions sum to 1.0) and free of trace species below
/// [`MIN_MASS_FRACTION`]. Items are kept sorted by species.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Composition {
    items: Vec<(Species, f64)>,
}

impl Default for Composition {
    fn default() -> Self {
        Self::dry_air()
    }
}

impl Composition {
    pub fn pure(species: Species) -> Self {
        Self {
            items: vec![(species, 1.0)],
        }
    }

    pub fn dry_air() -> Self {
        Self::pure(Species::Air)
    }

    /// Air carrying `war` pounds of water per pound of dry air.
    pub fn humid_air(war: f64) -> GasResult<Self> {
        if !war.is_finite() || war < 0.0 {
            return Err(GasError::NonPhysical {
                what: "water-air ratio must be finite and non-negative",
            });
        }
        Self::from_reactants(&[
            (Reactant::Air, 1.0 / (1.0 + war)),
            (Reactant::Water, war / (1.0 + war)),
        ])
    }

    /// Build a composition from reactant mass fractions.
    pub fn from_reactants(reactants: &[(Reactant, f64)]) -> GasResult<Self> {
        let mut fractions: Vec<(Species, f64)> = Vec::new();
        for (reactant, amount) in reactants {
            for (species, split) in reactant.species_split() {
                match fractions.iter_mut().find(|(s, _)| s == species) {
                    Some((_, f)) => *f += amount * split,
                    None => fractions.push((*species, amount * split)),
                }
            }
        }
        Self::new_mass_fractions(fractions)
    }

    /// Create a composition from species mass fractions.
    ///
    /// Validates that all fractions are finite and non-negative with a
    /// positive sum, drops trace species and normalizes to sum = 1.
    pub fn new_mass_fractions(fractions: Vec<(Species, f64)>) -> GasResult<Self> {
        if fractions.is_empty() {
            return Err(GasError::InvalidArg {
                what: "empty composition",
            });
        }

        let mut merged: Vec<(Species, f64)> = Vec::with_capacity(fractions.len());
        for (species, frac) in fractions {
            if !frac.is_finite() {
                return Err(GasError::NonPhysical {
                    what: "non-finite mass fraction",
                });
            }
            if frac < 0.0 {
                return Err(GasError::NonPhysical {
                    what: "negative mass fraction",
                });
            }
            match merged.iter_mut().find(|(s, _)| *s == species) {
                Some((_, f)) => *f += frac,
                None => merged.push((species, frac)),
            }
        }

        let sum: f64 = merged.iter().map(|(_, f)| f).sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(GasError::NonPhysical {
                what: "mass fractions sum to zero or non-finite",
            });
        }

        merged.retain(|(_, f)| f / sum >= MIN_MASS_FRACTION);
        let kept: f64 = merged.iter().map(|(_, f)| f).sum();
        if merged.is_empty() {
            return Err(GasError::NonPhysical {
                what: "all mass fractions negligible",
            });
        }
        for (_, f) in merged.iter_mut() {
            *f /= kept;
        }
        merged.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Self { items: merged })
    }

    /// Mass-weighted blend of two compositions.
    pub fn blend(&self, w_self: f64, other: &Composition, w_other: f64) -> GasResult<Self> {
        if w_self < 0.0 || w_other < 0.0 {
            return Err(GasError::NonPhysical {
                what: "blend weights must be non-negative",
            });
        }
        let fractions = self
            .iter()
            .map(|(s, f)| (s, f * w_self))
            .chain(other.iter().map(|(s, f)| (s, f * w_other)))
            .collect();
        Self::new_mass_fractions(fractions)
    }

    /// Mass fraction of a species (0.0 if not present).
    pub fn mass_fraction(&self, species: Species) -> f64 {
        self.items
            .iter()
            .find(|(s, _)| *s == species)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }

    /// Returns `Some(species)` if exactly one species has fraction ≈1.0.
    pub fn is_pure(&self) -> Option<Species> {
        if let [(species, frac)] = self.items.as_slice() {
            let tol = Tolerances {
                abs: 1e-10,
                rel: 1e-10,
            };
            if nearly_equal(*frac, 1.0, tol) {
                return Some(*species);
            }
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = (Species, f64)> + '_ {
        self.items.iter().copied()
    }

    /// Mixture molar mass [kg/kmol]: 1 / Σ (y_i / M_i).
    pub fn molar_mass(&self) -> f64 {
        let moles: f64 = self.items.iter().map(|(s, y)| y / s.molar_mass()).sum();
        1.0 / moles
    }

    /// Species mole fractions, in the same order as [`Composition::iter`].
    pub fn mole_fractions(&self) -> Vec<(Species, f64)> {
        let molar_mass = self.molar_mass();
        self.items
            .iter()
            .map(|(s, y)| (*s, y * molar_mass / s.molar_mass()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: Tolerances = Tolerances {
        abs: 1e-10,
        rel: 1e-10,
    };

    #[test]
    fn dry_air_is_pure() {
        let comp = Composition::dry_air();
        assert_eq!(comp.is_pure(), Some(Species::Air));
        assert_eq!(comp.mass_fraction(Species::H2O), 0.0);
        assert!(nearly_equal(
            comp.molar_mass(),
            Species::Air.molar_mass(),
            TOL
        ));
    }

    #[test]
    fn humid_air_splits_by_war() {
        let comp = Composition::humid_air(0.02).unwrap();
        assert_eq!(comp.is_pure(), None);
        assert!(nearly_equal(comp.mass_fraction(Species::H2O), 0.02 / 1.02, TOL));
        assert!(nearly_equal(comp.mass_fraction(Species::Air), 1.0 / 1.02, TOL));
        assert!(comp.molar_mass() < Species::Air.molar_mass());
    }

    #[test]
    fn trace_species_are_dropped() {
        let comp =
            Composition::new_mass_fractions(vec![(Species::Air, 1.0), (Species::H2O, 5e-6)])
                .unwrap();
        assert_eq!(comp.is_pure(), Some(Species::Air));
    }

    #[test]
    fn duplicate_species_merge() {
        let comp = Composition::new_mass_fractions(vec![
            (Species::N2, 1.0),
            (Species::O2, 1.0),
            (Species::N2, 2.0),
        ])
        .unwrap();
        assert!(nearly_equal(comp.mass_fraction(Species::N2), 0.75, TOL));
        assert_eq!(comp.iter().count(), 2);
    }

    #[test]
    fn mole_fractions_favor_light_species() {
        let comp =
            Composition::new_mass_fractions(vec![(Species::Air, 0.5), (Species::H2O, 0.5)])
                .unwrap();
        let x = comp.mole_fractions();
        let x_h2o = x.iter().find(|(s, _)| *s == Species::H2O).unwrap().1;
        assert!(x_h2o > 0.5);
        let sum: f64 = x.iter().map(|(_, f)| f).sum();
        assert!(nearly_equal(sum, 1.0, TOL));
    }

    #[test]
    fn blend_weights_by_mass() {
        let wet = Composition::humid_air(0.1).unwrap();
        let dry = Composition::dry_air();
        let mixed = dry.blend(1.0, &wet, 1.0).unwrap();
        let expected = 0.5 * (0.1 / 1.1);
        assert!(nearly_equal(mixed.mass_fraction(Species::H2O), expected, TOL));
    }

    #[test]
    fn invalid_inputs() {
        assert!(Composition::new_mass_fractions(vec![]).is_err());
        assert!(Composition::new_mass_fractions(vec![(Species::O2, -0.5)]).is_err());
        assert!(Composition::new_mass_fractions(vec![(Species::O2, 0.0)]).is_err());
        assert!(Composition::new_mass_fractions(vec![(Species::O2, f64::NAN)]).is_err());
        assert!(Composition::humid_air(-0.1).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalized_sum_is_one(fracs in prop::collection::vec(0.0_f64..1.0_f64, 1..6)) {
            let input: Vec<(Species, f64)> = fracs
                .iter()
                .enumerate()
                .map(|(i, &f)| (Species::ALL[i % Species::ALL.len()], f))
                .collect();

            if let Ok(comp) = Composition::new_mass_fractions(input) {
                let sum: f64 = comp.iter().map(|(_, f)| f).sum();
                let tol = Tolerances { abs: 1e-9, rel: 1e-9 };
                prop_assert!(nearly_equal(sum, 1.0, tol));
                prop_assert!(comp.iter().all(|(_, f)| f >= MIN_MASS_FRACTION));
            }
        }

        #[test]
        fn humid_air_water_fraction(war in 0.0_f64..0.2) {
            let comp = Composition::humid_air(war).unwrap();
            let y = comp.mass_fraction(Species::H2O);
            if war / (1.0 + war) >= MIN_MASS_FRACTION {
                prop_assert!((y - war / (1.0 + war)).abs() < 1e-12);
            } else {
                prop_assert_eq!(y, 0.0);
            }
        }
    }
}
