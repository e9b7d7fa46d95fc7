//! Flow stations: the request that describes one and the resolved state.

use crate::error::{FlowError, FlowResult};
use crate::statics::{StaticConstraint, StaticProblem, StaticState, isentropic_ps_ratio};
use crate::total::{TotalSpec, TotalState, corrected_flow, resolve_total};
use cf_core::constants::{G_C, J_C};
use cf_gas::{Composition, GasAdapter, GasSpec};
use cf_solver::{SecantConfig, secant_solve};
use tracing::debug;

/// Request for one station.
///
/// Exactly one of `Tt`, `ht`, `s` must be set, plus `Pt`. At most one static
/// constraint (`Mach`, `area`, `Ps`) may be set; none means flow at rest.
///
/// Merge rule: the individual constraint setters only fill their own slot, so
/// setting two of them makes the request invalid. [`with_constraint`]
/// replaces whatever constraint was present, which is how a component swaps a
/// design Mach for a remembered area.
///
/// [`with_constraint`]: StationSpec::with_constraint
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationSpec {
    pub name: String,
    pub tt: Option<f64>,
    pub ht: Option<f64>,
    pub s: Option<f64>,
    pub pt: Option<f64>,
    /// Mass flow [lbm/s]
    pub w: f64,
    pub mach: Option<f64>,
    pub area: Option<f64>,
    pub ps: Option<f64>,
    pub is_super: bool,
    pub far: f64,
    pub war: f64,
    /// Explicit composition; derived from `war` when absent
    pub composition: Option<Composition>,
}

impl StationSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tt: None,
            ht: None,
            s: None,
            pt: None,
            w: 0.0,
            mach: None,
            area: None,
            ps: None,
            is_super: false,
            far: 0.0,
            war: 0.0,
            composition: None,
        }
    }

    pub fn tt(mut self, tt: f64) -> Self {
        self.tt = Some(tt);
        self
    }

    pub fn ht(mut self, ht: f64) -> Self {
        self.ht = Some(ht);
        self
    }

    pub fn s(mut self, s: f64) -> Self {
        self.s = Some(s);
        self
    }

    pub fn pt(mut self, pt: f64) -> Self {
        self.pt = Some(pt);
        self
    }

    pub fn w(mut self, w: f64) -> Self {
        self.w = w;
        self
    }

    pub fn mach(mut self, mach: f64) -> Self {
        self.mach = Some(mach);
        self
    }

    pub fn area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn ps(mut self, ps: f64) -> Self {
        self.ps = Some(ps);
        self
    }

    pub fn is_super(mut self, is_super: bool) -> Self {
        self.is_super = is_super;
        self
    }

    pub fn far(mut self, far: f64) -> Self {
        self.far = far;
        self
    }

    pub fn war(mut self, war: f64) -> Self {
        self.war = war;
        self
    }

    pub fn composition(mut self, comp: Composition) -> Self {
        self.composition = Some(comp);
        self
    }

    /// Replace any static constraint with `constraint`.
    pub fn with_constraint(mut self, constraint: StaticConstraint) -> Self {
        self.mach = None;
        self.area = None;
        self.ps = None;
        match constraint {
            StaticConstraint::None => {}
            StaticConstraint::Mach(m) => self.mach = Some(m),
            StaticConstraint::Area(a) => self.area = Some(a),
            StaticConstraint::Ps(p) => self.ps = Some(p),
        }
        self
    }

    pub fn total_spec(&self) -> FlowResult<TotalSpec> {
        match (self.tt, self.ht, self.s) {
            (Some(tt), None, None) => Ok(TotalSpec::Tt(tt)),
            (None, Some(ht), None) => Ok(TotalSpec::Ht(ht)),
            (None, None, Some(s)) => Ok(TotalSpec::S(s)),
            (None, None, None) => Err(FlowError::InvalidSpec {
                what: "one of Tt, ht or s is required",
            }),
            _ => Err(FlowError::InvalidSpec {
                what: "only one of Tt, ht or s may be given",
            }),
        }
    }

    pub fn constraint(&self) -> FlowResult<StaticConstraint> {
        match (self.mach, self.area, self.ps) {
            (None, None, None) => Ok(StaticConstraint::None),
            (Some(m), None, None) => Ok(StaticConstraint::Mach(m)),
            (None, Some(a), None) => Ok(StaticConstraint::Area(a)),
            (None, None, Some(p)) => Ok(StaticConstraint::Ps(p)),
            _ => Err(FlowError::InvalidSpec {
                what: "at most one of Mach, area or Ps may be given",
            }),
        }
    }

    fn resolved_composition(&self) -> FlowResult<Composition> {
        match &self.composition {
            Some(comp) => Ok(comp.clone()),
            None if self.war == 0.0 => Ok(Composition::dry_air()),
            None => Ok(Composition::humid_air(self.war)?),
        }
    }

    fn validate(&self) -> FlowResult<(TotalSpec, f64, StaticConstraint)> {
        let total = self.total_spec()?;
        let constraint = self.constraint()?;
        let pt = self.pt.ok_or(FlowError::InvalidSpec {
            what: "Pt is required",
        })?;
        if !self.w.is_finite() || self.w < 0.0 {
            return Err(FlowError::InvalidSpec {
                what: "mass flow must be finite and non-negative",
            });
        }
        if !self.far.is_finite() || self.far < 0.0 {
            return Err(FlowError::InvalidSpec {
                what: "fuel-air ratio must be finite and non-negative",
            });
        }
        Ok((total, pt, constraint))
    }
}

/// Static conditions that define a source station from the moving flow.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticConditions {
    /// Static temperature [°R]
    pub ts: f64,
    /// Static pressure [psia]
    pub ps: f64,
    pub mach: f64,
    /// Mass flow [lbm/s]
    pub w: f64,
}

/// A fully resolved flow station.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowState {
    pub name: String,
    pub total: TotalState,
    pub statics: StaticState,
    /// Mass flow [lbm/s]
    pub w: f64,
    /// Corrected flow [lbm/s]; `None` when `Tt` or `Pt` is not positive
    pub wc: Option<f64>,
    pub far: f64,
    pub war: f64,
    pub composition: Composition,
    pub is_super: bool,
}

impl FlowState {
    /// Resolve a station request: totals first, then the static constraint.
    ///
    /// Every failure past request validation carries `spec.name`.
    pub fn resolve(gas: &GasAdapter<'_>, spec: &StationSpec) -> FlowResult<Self> {
        let (total_spec, pt, constraint) = spec.validate()?;
        let (composition, total, statics) =
            Self::resolve_parts(gas, spec, total_spec, pt, constraint)
                .map_err(|e| e.at_station(&spec.name))?;

        let state = Self {
            name: spec.name.clone(),
            wc: corrected_flow(spec.w, total.tt, total.pt),
            total,
            statics,
            w: spec.w,
            far: spec.far,
            war: spec.war,
            composition,
            is_super: spec.is_super,
        };
        debug!(
            station = %state.name,
            tt = state.total.tt,
            pt = state.total.pt,
            mach = state.statics.mach,
            area = state.statics.area,
            "station resolved"
        );
        Ok(state)
    }

    fn resolve_parts(
        gas: &GasAdapter<'_>,
        spec: &StationSpec,
        total_spec: TotalSpec,
        pt: f64,
        constraint: StaticConstraint,
    ) -> FlowResult<(Composition, TotalState, StaticState)> {
        let composition = spec.resolved_composition()?;
        let total = resolve_total(gas, total_spec, pt, &composition)?;
        let statics =
            StaticProblem::new(*gas, &total, &composition, spec.w).resolve(constraint, spec.is_super)?;
        Ok((composition, total, statics))
    }

    /// Same totals, mass flow and composition with a different static
    /// constraint.
    pub fn with_static(
        &self,
        gas: &GasAdapter<'_>,
        constraint: StaticConstraint,
        is_super: bool,
    ) -> FlowResult<Self> {
        let statics = StaticProblem::new(*gas, &self.total, &self.composition, self.w)
            .resolve(constraint, is_super)
            .map_err(|e| e.at_station(&self.name))?;
        Ok(Self {
            statics,
            is_super,
            ..self.clone()
        })
    }

    /// Request for a station downstream of this one: same mass flow,
    /// composition and mixing ratios, no thermal state or constraint yet.
    pub fn downstream(&self, name: impl Into<String>) -> StationSpec {
        StationSpec::new(name)
            .w(self.w)
            .far(self.far)
            .war(self.war)
            .composition(self.composition.clone())
    }

    /// Adiabatic mixing of two streams at the first stream's total pressure.
    pub fn mix(
        gas: &GasAdapter<'_>,
        name: impl Into<String>,
        a: &FlowState,
        b: &FlowState,
    ) -> FlowResult<Self> {
        let w = a.w + b.w;
        if !(w > 0.0) {
            return Err(FlowError::InvalidSpec {
                what: "mixed streams need positive total mass flow",
            });
        }
        let ht = (a.w * a.total.ht + b.w * b.total.ht) / w;
        // FAR and WAR are per unit dry air, so they mix on air mass
        let (air_a, air_b) = (a.dry_air_flow(), b.dry_air_flow());
        let air = air_a + air_b;
        let name = name.into();
        let composition = a
            .composition
            .blend(a.w, &b.composition, b.w)
            .map_err(|e| FlowError::from(e).at_station(&name))?;
        let spec = StationSpec::new(name)
            .ht(ht)
            .pt(a.total.pt)
            .w(w)
            .far((air_a * a.far + air_b * b.far) / air)
            .war((air_a * a.war + air_b * b.war) / air)
            .composition(composition);
        Self::resolve(gas, &spec)
    }

    /// Recover a station from static temperature, static pressure and Mach.
    ///
    /// `ht` follows from the energy equation; `Pt` is found by a root-find
    /// matching the static entropy at `(ht, Pt)`.
    pub fn from_static(
        gas: &GasAdapter<'_>,
        name: impl Into<String>,
        conditions: StaticConditions,
        composition: Composition,
    ) -> FlowResult<Self> {
        let name = name.into();
        let StaticConditions { ts, ps, mach, w } = conditions;
        if !mach.is_finite() || mach < 0.0 {
            return Err(FlowError::InvalidSpec {
                what: "Mach number must be finite and non-negative",
            });
        }
        let stat = gas
            .equilibrate(GasSpec::TP { t: ts, p: ps }, &composition)
            .map_err(|e| FlowError::from(e).at_station(&name))?;
        let v = mach * stat.sonic_velocity;
        let ht = stat.h + v * v / (2.0 * G_C * J_C);

        let guess = ps / isentropic_ps_ratio(mach, stat.gamma());
        let config = SecantConfig {
            f_tol: 1e-12,
            ..SecantConfig::default()
        }
        .with_bounds(ps, f64::INFINITY)
        .with_max_step(guess);
        let root = secant_solve(
            |pt| Ok::<f64, FlowError>(gas.equilibrate(GasSpec::HP { h: ht, p: pt }, &composition)?.s - stat.s),
            guess.max(ps),
            &config,
        )
        .map_err(|e| e.at_station(&name))?;

        let spec = StationSpec::new(name)
            .ht(ht)
            .pt(root.x)
            .w(w)
            .ps(ps)
            .composition(composition);
        Self::resolve(gas, &spec)
    }

    /// Dry-air mass flow `W/(1 + FAR + WAR)` [lbm/s].
    pub fn dry_air_flow(&self) -> f64 {
        self.w / (1.0 + self.far + self.war)
    }

    pub fn tt(&self) -> f64 {
        self.total.tt
    }

    pub fn pt(&self) -> f64 {
        self.total.pt
    }

    pub fn ht(&self) -> f64 {
        self.total.ht
    }

    pub fn s(&self) -> f64 {
        self.total.s
    }

    pub fn ps(&self) -> f64 {
        self.statics.ps
    }

    pub fn mach(&self) -> f64 {
        self.statics.mach
    }

    pub fn area(&self) -> f64 {
        self.statics.area
    }

    pub fn vflow(&self) -> f64 {
        self.statics.vflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_gas::{IdealGasModel, Species};

    fn rel(actual: f64, expected: f64) -> f64 {
        ((actual - expected) / expected).abs()
    }

    #[test]
    fn resolves_and_computes_corrected_flow() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let spec = StationSpec::new("start")
            .tt(630.75)
            .pt(0.0272)
            .w(3.488)
            .mach(1.0);
        let st = FlowState::resolve(&gas, &spec).unwrap();
        assert!(rel(st.area(), 6060.6) < 5e-3);
        assert!(rel(st.statics.rhos, 0.000074) < 5e-3);
        let wc = st.wc.unwrap();
        assert!(rel(wc, 3.488 * (630.75_f64 / 518.67).sqrt() / (0.0272 / 14.696)) < 1e-12);
    }

    #[test]
    fn under_and_over_specified_totals() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let none = StationSpec::new("x").pt(14.7).w(1.0);
        assert!(matches!(
            FlowState::resolve(&gas, &none),
            Err(FlowError::InvalidSpec { .. })
        ));
        let both = StationSpec::new("x").tt(518.0).ht(10.0).pt(14.7);
        assert!(matches!(
            FlowState::resolve(&gas, &both),
            Err(FlowError::InvalidSpec { .. })
        ));
        let no_pt = StationSpec::new("x").tt(518.0);
        assert!(matches!(
            FlowState::resolve(&gas, &no_pt),
            Err(FlowError::InvalidSpec { .. })
        ));
    }

    #[test]
    fn two_constraints_rejected_until_replaced() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let spec = StationSpec::new("x")
            .tt(518.0)
            .pt(14.7)
            .w(1.0)
            .mach(0.5)
            .area(10.0);
        assert!(matches!(
            FlowState::resolve(&gas, &spec),
            Err(FlowError::InvalidSpec { .. })
        ));

        let spec = spec.with_constraint(StaticConstraint::Area(10.0));
        assert_eq!(spec.constraint().unwrap(), StaticConstraint::Area(10.0));
        assert!(FlowState::resolve(&gas, &spec).is_ok());
    }

    #[test]
    fn humid_air_from_war() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let spec = StationSpec::new("x").tt(600.0).pt(14.7).w(1.0).war(0.02);
        let st = FlowState::resolve(&gas, &spec).unwrap();
        assert!(st.composition.mass_fraction(Species::H2O) > 0.0);
        assert_eq!(st.war, 0.02);
    }

    #[test]
    fn mixing_conserves_mass_and_energy() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let hot = FlowState::resolve(&gas, &StationSpec::new("hot").tt(1200.0).pt(30.0).w(2.0))
            .unwrap();
        let cold = FlowState::resolve(
            &gas,
            &StationSpec::new("cold").tt(600.0).pt(29.0).w(1.0).war(0.01),
        )
        .unwrap();
        let mixed = FlowState::mix(&gas, "mixed", &hot, &cold).unwrap();
        assert_eq!(mixed.w, 3.0);
        assert_eq!(mixed.pt(), 30.0);
        let expected = (2.0 * hot.ht() + 1.0 * cold.ht()) / 3.0;
        assert!((mixed.ht() - expected).abs() < 1e-9);
        assert!(mixed.tt() > 600.0 && mixed.tt() < 1200.0);
        let cold_air = 1.0 / 1.01;
        assert!((cold.dry_air_flow() - cold_air).abs() < 1e-12);
        assert!((mixed.war - 0.01 * cold_air / (2.0 + cold_air)).abs() < 1e-12);
        // Air-mass weighting, not total-mass weighting
        assert!(mixed.war < 0.01 / 3.0);
        assert_eq!(mixed.far, 0.0);
    }

    #[test]
    fn mixing_weights_fuel_air_ratio_by_air_mass() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let core = FlowState::resolve(
            &gas,
            &StationSpec::new("core").tt(1500.0).pt(40.0).w(1.02).far(0.02),
        )
        .unwrap();
        let bypass =
            FlowState::resolve(&gas, &StationSpec::new("bypass").tt(700.0).pt(40.0).w(3.0))
                .unwrap();
        let mixed = FlowState::mix(&gas, "mixer", &core, &bypass).unwrap();
        // 1 lbm/s of core air carries 0.02 lbm/s of fuel over 4 lbm/s of air
        assert!((mixed.far - 0.005).abs() < 1e-12);
        assert!((mixed.dry_air_flow() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn failures_carry_the_station_name() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let spec = StationSpec::new("combustor.exit").tt(900.0).pt(-5.0).w(1.0);
        let err = FlowState::resolve(&gas, &spec).unwrap_err();
        assert!(matches!(&err, FlowError::Gas { station, .. } if station == "combustor.exit"));
        assert!(err.to_string().contains("combustor.exit"));
    }

    #[test]
    fn static_conditions_round_trip() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let reference = FlowState::resolve(
            &gas,
            &StationSpec::new("ref").tt(700.0).pt(50.0).w(100.0).mach(0.6),
        )
        .unwrap();
        let conditions = StaticConditions {
            ts: reference.statics.ts,
            ps: reference.ps(),
            mach: reference.mach(),
            w: 100.0,
        };
        let back =
            FlowState::from_static(&gas, "back", conditions, Composition::dry_air()).unwrap();
        assert!(rel(back.pt(), 50.0) < 1e-6);
        assert!(rel(back.tt(), 700.0) < 1e-6);
        assert!((back.mach() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn choked_area_names_the_station() {
        let model = IdealGasModel::new();
        let gas = GasAdapter::new(&model);
        let spec = StationSpec::new("throat")
            .tt(700.0)
            .pt(50.0)
            .w(100.0)
            .area(1.0);
        let err = FlowState::resolve(&gas, &spec).unwrap_err();
        assert!(matches!(err, FlowError::Choked { .. }));
        assert!(err.to_string().contains("throat"));
    }
}
