use bevy::prelude::*;

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{VizijBindingHint, VizijRigRoot};
pub use resources::{RigBindingIndex, VizijRig};

use vizij_rig_core::{ConstraintRegistry, Rig, RigConfig, RigError};

impl VizijRig {
    /// Build the rig resource from a config using the built-in constraint types.
    pub fn from_config(cfg: &RigConfig) -> Result<Self, RigError> {
        Rig::from_config(cfg, &ConstraintRegistry::with_builtins()).map(Self)
    }
}

/// Drives a [`VizijRig`] against the `Transform`s under every [`VizijRigRoot`].
///
/// Each `Update` the plugin re-indexes newly added roots, re-binds the rig when
/// the index or the rig changed, and evaluates every active constraint.
pub struct VizijRigPlugin;

impl Plugin for VizijRigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VizijRig>()
            .init_resource::<RigBindingIndex>()
            .add_systems(
                Update,
                (
                    systems::build_binding_index_system,
                    systems::activate_rig_system,
                    systems::evaluate_rig_system,
                )
                    .chain(),
            );
    }
}
