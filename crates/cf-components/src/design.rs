//! Per-instance design memory.

use crate::error::{ComponentError, ComponentResult};

/// Sizing results written once by a design evaluation and read by every
/// later off-design evaluation of the same instance.
///
/// A second write without [`reset`](DesignMemory::reset) is rejected so an
/// off-design run never sees a silently replaced geometry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DesignMemory<T> {
    point: Option<T>,
}

impl<T> Default for DesignMemory<T> {
    fn default() -> Self {
        Self { point: None }
    }
}

impl<T> DesignMemory<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, component: &str, point: T) -> ComponentResult<()> {
        if self.point.is_some() {
            return Err(ComponentError::AlreadyDesigned {
                component: component.to_owned(),
            });
        }
        self.point = Some(point);
        Ok(())
    }

    pub fn get(&self, component: &str) -> ComponentResult<&T> {
        self.point.as_ref().ok_or_else(|| ComponentError::NotDesigned {
            component: component.to_owned(),
        })
    }

    pub fn is_set(&self) -> bool {
        self.point.is_some()
    }

    pub fn reset(&mut self) {
        self.point = None;
    }
}
