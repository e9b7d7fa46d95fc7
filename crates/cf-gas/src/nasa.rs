//! NASA 7-coefficient ideal-gas polynomials.
//!
//! ```text
//! cp/R  = a0 + a1 T + a2 T² + a3 T³ + a4 T⁴
//! h/RT  = a0 + a1 T/2 + a2 T²/3 + a3 T³/4 + a4 T⁴/5 + a5/T
//! s°/R  = a0 ln T + a1 T + a2 T²/2 + a3 T³/3 + a4 T⁴/4 + a6
//! ```
//!
//! The low-range set is used at or below `t_mid` (including extrapolation
//! below its nominal floor), the high-range set above.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NasaPolynomial {
    /// Switch-over temperature [K]
    pub t_mid: f64,
    pub low: [f64; 7],
    pub high: [f64; 7],
}

impl NasaPolynomial {
    #[inline]
    fn coeffs(&self, t: f64) -> &[f64; 7] {
        if t <= self.t_mid { &self.low } else { &self.high }
    }

    /// Dimensionless heat capacity cp/R.
    pub fn cp_r(&self, t: f64) -> f64 {
        let a = self.coeffs(t);
        a[0] + t * (a[1] + t * (a[2] + t * (a[3] + t * a[4])))
    }

    /// Dimensionless enthalpy h/(R·T).
    pub fn h_rt(&self, t: f64) -> f64 {
        let a = self.coeffs(t);
        a[0] + t * (a[1] / 2.0 + t * (a[2] / 3.0 + t * (a[3] / 4.0 + t * a[4] / 5.0))) + a[5] / t
    }

    /// Dimensionless standard-state entropy s°/R.
    pub fn s_r(&self, t: f64) -> f64 {
        let a = self.coeffs(t);
        a[0] * t.ln() + t * (a[1] + t * (a[2] / 2.0 + t * (a[3] / 3.0 + t * a[4] / 4.0))) + a[6]
    }
}

pub const AIR: NasaPolynomial = NasaPolynomial {
    t_mid: 1000.0,
    low: [
        3.568_396_20,
        -6.787_294_29e-4,
        1.553_714_76e-6,
        -3.299_370_60e-12,
        -4.663_953_87e-13,
        -1.062_346_59e3,
        3.715_829_65,
    ],
    high: [
        3.087_927_17,
        1.245_971_84e-3,
        -4.237_189_45e-7,
        6.747_747_89e-11,
        -3.970_769_72e-15,
        -9.952_627_55e2,
        5.959_609_30,
    ],
};

pub const N2: NasaPolynomial = NasaPolynomial {
    t_mid: 1000.0,
    low: [
        3.298_677,
        1.408_240_4e-3,
        -3.963_222e-6,
        5.641_515e-9,
        -2.444_854e-12,
        -1.020_899_9e3,
        3.950_372,
    ],
    high: [
        2.926_64,
        1.487_976_8e-3,
        -5.684_76e-7,
        1.009_703_8e-10,
        -6.753_351e-15,
        -9.227_977e2,
        5.980_528,
    ],
};

pub const O2: NasaPolynomial = NasaPolynomial {
    t_mid: 1000.0,
    low: [
        3.782_456_36,
        -2.996_734_16e-3,
        9.847_302_01e-6,
        -9.681_295_09e-9,
        3.243_728_37e-12,
        -1.063_943_56e3,
        3.657_675_73,
    ],
    high: [
        3.282_537_84,
        1.483_087_54e-3,
        -7.579_666_69e-7,
        2.094_705_55e-10,
        -2.167_177_94e-14,
        -1.088_457_72e3,
        5.453_231_29,
    ],
};

pub const AR: NasaPolynomial = NasaPolynomial {
    t_mid: 1000.0,
    low: [2.5, 0.0, 0.0, 0.0, 0.0, -7.453_75e2, 4.366],
    high: [2.5, 0.0, 0.0, 0.0, 0.0, -7.453_75e2, 4.366],
};

pub const CO2: NasaPolynomial = NasaPolynomial {
    t_mid: 1000.0,
    low: [
        2.356_773_52,
        8.984_596_77e-3,
        -7.123_562_69e-6,
        2.459_190_22e-9,
        -1.436_995_48e-13,
        -4.837_196_97e4,
        9.901_052_22,
    ],
    high: [
        3.857_460_29,
        4.414_370_26e-3,
        -2.214_814_04e-6,
        5.234_901_88e-10,
        -4.720_841_64e-14,
        -4.875_916_6e4,
        2.271_638_06,
    ],
};

pub const H2O: NasaPolynomial = NasaPolynomial {
    t_mid: 1000.0,
    low: [
        4.198_640_56,
        -2.036_434_1e-3,
        6.520_402_11e-6,
        -5.487_970_62e-9,
        1.771_978_17e-12,
        -3.029_372_67e4,
        -0.849_032_208,
    ],
    high: [
        3.033_992_49,
        2.176_918_04e-3,
        -1.640_725_18e-7,
        -9.704_198_7e-11,
        1.682_009_92e-14,
        -3.000_429_71e4,
        4.966_770_1,
    ],
};
