//! Static state resolution for a known total state and mass flow.
//!
//! Every constraint reduces to the isentropic `(s, Ps)` evaluation in
//! [`StaticProblem::at_ps`]:
//!
//! - `Ps`: evaluated directly.
//! - `Mach`: secant over `Ps` in `(0, Pt]`, started from the isentropic
//!   perfect-gas estimate.
//! - `Area`: sonic point first, then a bracketed search on the subsonic
//!   branch `[Ps*, Pt]` and, if requested, on the supersonic branch below
//!   `Ps*`, whose lower end is found by halving `Ps` from the sonic point.

use crate::error::{FlowError, FlowResult};
use crate::total::TotalState;
use cf_core::constants::{G_C, IN2_PER_FT2, J_C};
use cf_gas::{Composition, GasAdapter, GasSpec};
use cf_solver::{BracketConfig, SecantConfig, SolverError, bracketed_solve, secant_solve};
use tracing::{debug, trace, warn};

/// Lowest static pressure any search may visit, as a fraction of `Pt`.
const PRESSURE_FLOOR: f64 = 1e-9;

/// The Mach search stays within this factor below the perfect-gas estimate.
const MACH_SEARCH_SPAN: f64 = 1e-2;

/// Relative mass-flow shortfall at the sonic point still accepted as choked
/// exactly at the target area.
const SONIC_FLOW_TOL: f64 = 1e-6;

/// Static constraint selector. At most one governs a resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StaticConstraint {
    /// Static equals total, zero velocity
    #[default]
    None,
    Mach(f64),
    /// Flow area [in²]
    Area(f64),
    /// Static pressure [psia]
    Ps(f64),
}

/// Local (moving-flow) properties of a station.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticState {
    /// Static enthalpy [Btu/lbm]
    pub hs: f64,
    /// Static temperature [°R]
    pub ts: f64,
    /// Static pressure [psia]
    pub ps: f64,
    /// Static density [lbm/ft³]
    pub rhos: f64,
    pub gams: f64,
    pub mach: f64,
    /// Flow velocity [ft/s]
    pub vflow: f64,
    /// Speed of sound [ft/s]
    pub vsonic: f64,
    /// Flow area [in²]
    pub area: f64,
}

impl StaticState {
    /// Static state of a flow at rest: totals copied, zero velocity and area.
    pub fn at_rest(total: &TotalState) -> Self {
        Self {
            hs: total.ht,
            ts: total.tt,
            ps: total.pt,
            rhos: total.rhot,
            gams: total.gamt,
            mach: 0.0,
            vflow: 0.0,
            vsonic: (total.gamt * total.r * G_C * J_C * total.tt).sqrt(),
            area: 0.0,
        }
    }

    /// Mass flux `ρs·V` [lbm/(s·in²)].
    pub fn mass_flux(&self) -> f64 {
        self.rhos * self.vflow / IN2_PER_FT2
    }
}

/// Isentropic static pressure ratio `Ps/Pt` for a perfect gas.
pub fn isentropic_ps_ratio(mach: f64, gamma: f64) -> f64 {
    (1.0 + 0.5 * (gamma - 1.0) * mach * mach).powf(gamma / (1.0 - gamma))
}

/// One total state and mass flow, ready to be resolved against a constraint.
#[derive(Clone, Copy, Debug)]
pub struct StaticProblem<'a> {
    pub gas: GasAdapter<'a>,
    pub total: &'a TotalState,
    pub comp: &'a Composition,
    /// Mass flow [lbm/s]
    pub w: f64,
}

impl<'a> StaticProblem<'a> {
    pub fn new(
        gas: GasAdapter<'a>,
        total: &'a TotalState,
        comp: &'a Composition,
        w: f64,
    ) -> Self {
        Self {
            gas,
            total,
            comp,
            w,
        }
    }

    /// Resolve against any constraint. `is_super` picks the supersonic root
    /// of an area match.
    pub fn resolve(&self, constraint: StaticConstraint, is_super: bool) -> FlowResult<StaticState> {
        match constraint {
            StaticConstraint::None => Ok(StaticState::at_rest(self.total)),
            StaticConstraint::Ps(ps) => self.at_ps(ps),
            StaticConstraint::Mach(mach) => self.by_mach(mach),
            StaticConstraint::Area(area) => self.by_area(area, is_super),
        }
    }

    /// Static state at a given static pressure, isentropic from the totals.
    pub fn at_ps(&self, ps: f64) -> FlowResult<StaticState> {
        if !ps.is_finite() || ps <= 0.0 {
            return Err(FlowError::InvalidSpec {
                what: "static pressure must be positive and finite",
            });
        }
        let props = self.gas.equilibrate(
            GasSpec::SP {
                s: self.total.s,
                p: ps,
            },
            self.comp,
        )?;

        let dh = self.total.ht - props.h;
        let vflow = if dh > 0.0 {
            (2.0 * G_C * J_C * dh).sqrt()
        } else {
            0.0
        };
        let area = if vflow > 0.0 {
            self.w / (props.rho * vflow) * IN2_PER_FT2
        } else {
            0.0
        };

        Ok(StaticState {
            hs: props.h,
            ts: props.t,
            ps,
            rhos: props.rho,
            gams: props.gamma(),
            mach: vflow / props.sonic_velocity,
            vflow,
            vsonic: props.sonic_velocity,
            area,
        })
    }

    /// Static state at a target Mach number.
    pub fn by_mach(&self, mach: f64) -> FlowResult<StaticState> {
        if !mach.is_finite() || mach < 0.0 {
            return Err(FlowError::InvalidSpec {
                what: "Mach number must be finite and non-negative",
            });
        }
        if mach == 0.0 {
            return Ok(StaticState::at_rest(self.total));
        }

        let pt = self.total.pt;
        let estimate = pt * isentropic_ps_ratio(mach, self.total.gamt);
        let x_min = (MACH_SEARCH_SPAN * estimate).max(PRESSURE_FLOOR * pt);
        let guess = estimate.clamp(x_min, pt);
        let config = SecantConfig {
            f_tol: 1e-12,
            ..SecantConfig::default()
        }
        .with_bounds(x_min, pt)
        .with_max_step(0.5 * pt);

        let root = secant_solve(|ps| Ok::<f64, FlowError>(self.at_ps(ps)?.mach - mach), guess, &config)?;
        trace!(mach, ps = root.x, iterations = root.iterations, "Mach match");
        self.at_ps(root.x)
    }

    /// Static state whose flow area matches `area`.
    ///
    /// The subsonic root is always found first; with `is_super` the
    /// supersonic root is then searched below the sonic pressure, seeded by
    /// the reciprocal of the subsonic Mach number.
    pub fn by_area(&self, area: f64, is_super: bool) -> FlowResult<StaticState> {
        if !area.is_finite() || area <= 0.0 {
            return Err(FlowError::InvalidSpec {
                what: "flow area must be positive and finite",
            });
        }
        if self.w == 0.0 {
            return Ok(StaticState {
                area,
                ..StaticState::at_rest(self.total)
            });
        }

        let sonic = self.by_mach(1.0)?;
        let flow_at = |ps: f64| -> FlowResult<f64> { Ok(self.at_ps(ps)?.mass_flux() * area - self.w) };

        let excess = sonic.mass_flux() * area - self.w;
        if excess < 0.0 {
            if excess.abs() <= SONIC_FLOW_TOL * self.w {
                return Ok(sonic);
            }
            warn!(area, sonic_area = sonic.area, "area below sonic area");
            return Err(FlowError::Choked {
                station: String::new(),
                area,
                sonic_area: sonic.area,
            });
        }

        let config = BracketConfig::default();
        let sub = bracketed_solve(flow_at, sonic.ps, self.total.pt, None, &config)?;
        let sub = self.at_ps(sub.x)?;
        if !is_super || excess == 0.0 {
            debug!(area, mach = sub.mach, "subsonic area match");
            return Ok(sub);
        }

        let guess_mach = if sub.mach > 0.0 { 1.0 / sub.mach } else { 2.0 };
        let guess = self.total.pt * isentropic_ps_ratio(guess_mach, self.total.gamt);
        let (lo, hi) = self.supersonic_bracket(&flow_at, sonic.ps)?;
        let sup = bracketed_solve(flow_at, lo, hi, Some(guess), &config)?;
        let sup = self.at_ps(sup.x)?;
        debug!(area, mach = sup.mach, "supersonic area match");
        Ok(sup)
    }

    /// Walk the static pressure down from the sonic point, halving it until
    /// the mass-flow residual turns negative.
    ///
    /// Supersonic mass flux falls monotonically toward zero with `Ps`, so the
    /// walk ends once the bracket `[lo, hi]` straddles the root.
    fn supersonic_bracket(
        &self,
        flow_at: &impl Fn(f64) -> FlowResult<f64>,
        ps_sonic: f64,
    ) -> FlowResult<(f64, f64)> {
        let floor = PRESSURE_FLOOR * self.total.pt;
        let mut hi = ps_sonic;
        let mut lo = 0.5 * ps_sonic;
        let mut steps = 0;
        loop {
            steps += 1;
            let residual = flow_at(lo)?;
            if residual <= 0.0 {
                trace!(lo, hi, steps, "supersonic bracket");
                return Ok((lo, hi));
            }
            if lo <= floor {
                warn!(ps = lo, residual, "no supersonic area match above the pressure floor");
                return Err(SolverError::NonConvergence {
                    method: "supersonic bracket search",
                    iterations: steps,
                    best_x: lo,
                    residual,
                }
                .into());
            }
            hi = lo;
            lo = (0.5 * lo).max(floor);
        }
    }
}
