//! Constraint weight accessor.

use serde::{Deserialize, Deserializer, Serialize};

/// Overall influence of a constraint, always within [0, 1].
///
/// 0 leaves the stream untouched, 1 fully applies the constraint.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ConstraintWeight(f32);

impl ConstraintWeight {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    /// Clamp `value` into [0, 1]; NaN becomes 0.
    pub fn new(value: f32) -> Self {
        Self(crate::math::clamp01(value))
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn set(&mut self, value: f32) {
        *self = Self::new(value);
    }
}

impl Default for ConstraintWeight {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<f32> for ConstraintWeight {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for ConstraintWeight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f32::deserialize(deserializer).map(Self::new)
    }
}
