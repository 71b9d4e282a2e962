//! Error types for rig configuration and activation.
//!
//! Per-tick evaluation is infallible; everything here surfaces while building
//! a rig, parsing configs or binding constraints to a host.

/// Errors produced while building, configuring or activating a rig.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum RigError {
    /// No factory registered under this constraint type name.
    #[error("unknown constraint type: {kind}")]
    UnknownConstraintType { kind: String },

    /// Constraint data JSON did not match the descriptor shape.
    #[error("invalid data for constraint type {kind}: {reason}")]
    InvalidData { kind: String, reason: String },

    /// The host could not resolve a transform reference into a handle.
    #[error("transform not found: {path}")]
    UnresolvedTransform { path: String },

    /// A binder was handed a descriptor with an unset reference.
    #[error("constraint {kind} has no {field} reference")]
    MissingReference { kind: String, field: &'static str },

    /// A constraint with this id already lives in the rig.
    #[error("duplicate constraint id: {id}")]
    DuplicateConstraint { id: String },

    /// A transform with this path already lives in the hierarchy.
    #[error("duplicate transform path: {path}")]
    DuplicateTransform { path: String },

    /// A transform names a parent that has not been added yet.
    #[error("unknown parent {parent} for transform {path}")]
    UnknownParent { path: String, parent: String },

    /// Rig JSON could not be parsed.
    #[error("rig json parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for RigError {
    fn from(err: serde_json::Error) -> Self {
        RigError::Parse(err.to_string())
    }
}
