use bevy::prelude::*;

/// Marker component designating the root of a subtree whose transforms a rig
/// may bind to. The index system walks descendants of every entity with this marker.
///
/// Rig-space ("world") rotations compose from the root downward: the root's own
/// `Transform` is included, anything above the root is not. Constraints that
/// blend between different roots should place those roots under the same
/// (or an unrotated) parent.
#[derive(Component)]
pub struct VizijRigRoot;

/// Optional per-entity override for the path segment used when binding.
/// When present, `name` is used instead of the entity's `Name`.
#[derive(Component, Debug, Clone)]
pub struct VizijBindingHint {
    pub name: String,
}
