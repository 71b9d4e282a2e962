//! Identifiers for transforms and constraints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense index of a transform inside a host stream.
/// Hosts hand these out from `BindContext::bind`; they are opaque to constraints.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransformId(pub u32);

impl TransformId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Author-facing constraint id, unique within a rig.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintId(pub String);

impl ConstraintId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConstraintId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
