//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use cf_core::numeric::ensure_finite;
use cf_flow::{FlowState, StationSpec};
use cf_gas::GasAdapter;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::InvalidSpec { what })?;
    Ok(())
}

/// Ensure a value is finite and strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> ComponentResult<()> {
    check_finite(value, what)?;
    if value <= 0.0 {
        return Err(ComponentError::InvalidSpec { what });
    }
    Ok(())
}

/// Ensure a loss or ratio lies in `[0, 1)`.
pub fn check_fraction(value: f64, what: &'static str) -> ComponentResult<()> {
    check_finite(value, what)?;
    if !(0.0..1.0).contains(&value) {
        return Err(ComponentError::InvalidSpec { what });
    }
    Ok(())
}

/// Resolve a station owned by `component`, tagging failures with its name.
pub fn resolve(
    gas: &GasAdapter<'_>,
    component: &str,
    spec: &StationSpec,
) -> ComponentResult<FlowState> {
    FlowState::resolve(gas, spec).map_err(ComponentError::resolution(component))
}

/// Station label `"<component>.<port>"`.
pub fn port(component: &str, port: &str) -> String {
    format!("{component}.{port}")
}
