use bevy::prelude::*;
use vizij_rig_core::{Rig, TransformHierarchy, TransformId};

/// The rig evaluated every frame against the indexed transforms.
#[derive(Resource, Default, Debug)]
pub struct VizijRig(pub Rig);

/// Canonical paths (e.g. "Face/Jaw") of every entity under a `VizijRigRoot`,
/// with their transforms as of the last index build.
///
/// `entities[id]` is the entity behind `TransformId(id)`.
#[derive(Resource, Default, Debug)]
pub struct RigBindingIndex {
    pub hierarchy: TransformHierarchy,
    pub entities: Vec<Entity>,
    /// Set when the index was rebuilt and the rig has not been re-bound yet.
    pub needs_activation: bool,
}

impl RigBindingIndex {
    pub fn entity(&self, path: &str) -> Option<Entity> {
        self.hierarchy
            .id_of(path)
            .and_then(|TransformId(i)| self.entities.get(i as usize).copied())
    }
}
