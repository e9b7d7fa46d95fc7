//! Fixed conversion factors between SI and the engineering unit system.
//!
//! Engineering units: °R, psia, Btu/lbm, Btu/(lbm·°R), lbm/ft³, ft/s.

/// [Btu/lbm] per [J/kg] (International Table Btu, 2326 J/kg per Btu/lbm)
pub const BTU_PER_LBM_PER_J_PER_KG: f64 = 1.0 / 2_326.0;

/// [Btu/(lbm·°R)] per [J/(kg·K)]
pub const BTU_PER_LBM_R_PER_J_PER_KG_K: f64 = 1.0 / 4_186.8;

/// [lbm/ft³] per [kg/m³]
pub const LBM_FT3_PER_KG_M3: f64 = 0.062_427_960_6;

/// [Pa] per [psi]
pub const PA_PER_PSI: f64 = 6_894.757_293;

/// [K] per [°R]
pub const K_PER_R: f64 = 5.0 / 9.0;

/// [ft] per [m]
pub const FT_PER_M: f64 = 3.280_839_895;

#[inline]
pub fn psi_to_pa(p: f64) -> f64 {
    p * PA_PER_PSI
}

#[inline]
pub fn pa_to_psi(p: f64) -> f64 {
    p / PA_PER_PSI
}

#[inline]
pub fn rankine_to_kelvin(t: f64) -> f64 {
    t * K_PER_R
}

#[inline]
pub fn kelvin_to_rankine(t: f64) -> f64 {
    t / K_PER_R
}

#[inline]
pub fn enthalpy_to_btu(h: f64) -> f64 {
    h * BTU_PER_LBM_PER_J_PER_KG
}

#[inline]
pub fn enthalpy_to_si(h: f64) -> f64 {
    h / BTU_PER_LBM_PER_J_PER_KG
}

#[inline]
pub fn entropy_to_btu(s: f64) -> f64 {
    s * BTU_PER_LBM_R_PER_J_PER_KG_K
}

#[inline]
pub fn entropy_to_si(s: f64) -> f64 {
    s / BTU_PER_LBM_R_PER_J_PER_KG_K
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_are_consistent() {
        // Entropy factor is the enthalpy factor times K per °R
        assert!(
            (BTU_PER_LBM_R_PER_J_PER_KG_K - BTU_PER_LBM_PER_J_PER_KG * K_PER_R).abs() < 1e-12
        );
        assert!((psi_to_pa(14.696) - 101_325.0).abs() < 0.5);
        assert!((kelvin_to_rankine(288.15) - 518.67).abs() < 1e-9);
        assert!((enthalpy_to_si(enthalpy_to_btu(1234.5)) - 1234.5).abs() < 1e-9);
    }
}
