// cf-core/src/units.rs

use uom::si::f64::{
    MassDensity as UomMassDensity, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Canonical SI types used at the equilibrium-model boundary
pub type Density = UomMassDensity;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

/// Fixed physical constants in the engineering unit system used by flow
/// stations (°R, psia, Btu/lbm, lbm/s, in²).
pub mod constants {
    /// Gravitational conversion constant [lbm·ft/(lbf·s²)].
    pub const G_C: f64 = 32.174;

    /// Mechanical equivalent of heat [ft·lbf/Btu].
    pub const J_C: f64 = 778.169;

    /// Sea-level standard temperature [°R] used for corrected flow.
    pub const T_STD_R: f64 = 518.67;

    /// Sea-level standard pressure [psia] used for corrected flow.
    pub const P_STD_PSI: f64 = 14.696;

    /// Shaft power per heat rate [hp per Btu/s].
    pub const HP_PER_BTU_PER_S: f64 = 1.414_853_2;

    /// Square inches per square foot.
    pub const IN2_PER_FT2: f64 = 144.0;

    /// Universal gas constant [J/(kmol·K)].
    pub const R_UNIVERSAL: f64 = 8_314.462_618;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let p = pa(101_325.0);
        let t = k(300.0);
        let rho = kg_per_m3(1.2);
        assert_eq!(p.value, 101_325.0);
        assert_eq!(t.value, 300.0);
        assert_eq!(rho.value, 1.2);
    }

    #[test]
    fn energy_equation_constant() {
        // 2·g·J for one Btu/lbm of enthalpy drop gives ~223.8 ft/s
        let v = (2.0 * constants::G_C * constants::J_C).sqrt();
        assert!((v - 223.77).abs() < 0.01);
    }
}
