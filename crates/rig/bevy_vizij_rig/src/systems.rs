use bevy::prelude::*;

use crate::components::{VizijBindingHint, VizijRigRoot};
use crate::resources::{RigBindingIndex, VizijRig};
use vizij_rig_core::{LocalTransform, MemoryStream, TransformHierarchy, TransformId};

type NodeQuery<'w, 's> = Query<
    'w,
    's,
    (
        Option<&'static Name>,
        Option<&'static VizijBindingHint>,
        Option<&'static Transform>,
    ),
>;

fn to_local(tf: &Transform) -> LocalTransform {
    LocalTransform {
        translation: tf.translation.to_array(),
        rotation: tf.rotation.to_array(),
        scale: tf.scale.to_array(),
    }
}

/// Walks descendants under each VizijRigRoot and rebuilds the RigBindingIndex
/// whenever a root is added. Paths join segment names with `/`, where a segment
/// is the entity's VizijBindingHint or else its Name.
///
/// Entities without a segment name (and their subtrees) are not bindable.
pub fn build_binding_index_system(
    added: Query<(), Added<VizijRigRoot>>,
    roots: Query<Entity, With<VizijRigRoot>>,
    children: Query<&Children>,
    nodes: NodeQuery,
    mut index: ResMut<RigBindingIndex>,
) {
    if added.is_empty() {
        return;
    }

    fn walk(
        e: Entity,
        parent: Option<&str>,
        hierarchy: &mut TransformHierarchy,
        entities: &mut Vec<Entity>,
        nodes: &NodeQuery,
        children: &Query<&Children>,
    ) {
        let Ok((name, hint, tf)) = nodes.get(e) else {
            return;
        };
        let segment = match (hint, name) {
            (Some(h), _) => h.name.clone(),
            (None, Some(n)) => n.as_str().to_string(),
            (None, None) => return,
        };
        let path = match parent {
            Some(p) => format!("{p}/{segment}"),
            None => segment,
        };
        let local = tf.map(to_local).unwrap_or_default();
        if let Err(err) = hierarchy.add(path.clone(), local) {
            warn!("vizij rig: not indexing {e:?}: {err}");
            return;
        }
        entities.push(e);
        if let Ok(cs) = children.get(e) {
            for &c in cs.iter() {
                walk(c, Some(&path), hierarchy, entities, nodes, children);
            }
        }
    }

    let mut hierarchy = TransformHierarchy::new();
    let mut entities = Vec::new();
    for root in roots.iter() {
        walk(root, None, &mut hierarchy, &mut entities, &nodes, &children);
    }

    debug!("vizij rig: indexed {} transforms", hierarchy.len());
    index.hierarchy = hierarchy;
    index.entities = entities;
    index.needs_activation = true;
}

/// Binds the rig against the index after a rebuild or when a new rig resource
/// was inserted. Binding failures are logged and leave the rig inactive.
pub fn activate_rig_system(mut rig: ResMut<VizijRig>, mut index: ResMut<RigBindingIndex>) {
    if !index.needs_activation && !rig.is_added() {
        return;
    }
    index.needs_activation = false;
    if index.hierarchy.is_empty() {
        return;
    }

    if let Err(err) = rig.0.activate(&mut index.hierarchy) {
        warn!("vizij rig '{}': activation failed: {err}", rig.0.name);
    }
}

/// Evaluates the rig over a stream snapshotted from the indexed Transforms and
/// writes changed values back.
pub fn evaluate_rig_system(world: &mut World) {
    let Some(index) = world.get_resource::<RigBindingIndex>() else {
        return;
    };
    if index.entities.is_empty() {
        return;
    }
    let entities = index.entities.clone();
    let mut scene = index.hierarchy.clone();

    // Pick up edits made to the Transforms since the index was built.
    let mut q_tf = world.query::<&Transform>();
    for (i, e) in entities.iter().enumerate() {
        let id = TransformId(i as u32);
        if let (Ok(tf), Some(local)) = (q_tf.get(world, *e), scene.local_mut(id)) {
            *local = to_local(tf);
        }
    }
    let before: Vec<LocalTransform> = scene.iter().map(|(_, n)| n.local.clone()).collect();
    let mut stream = MemoryStream::new(scene);

    let Some(mut rig) = world.get_resource_mut::<VizijRig>() else {
        return;
    };
    if !rig.0.is_active() {
        return;
    }
    rig.0.evaluate(&mut stream);

    let mut q_tf = world.query::<&mut Transform>();
    for (i, e) in entities.iter().enumerate() {
        let Some(after) = stream.local(TransformId(i as u32)) else {
            continue;
        };
        if *after == before[i] {
            continue;
        }
        if let Ok(mut tf) = q_tf.get_mut(world, *e) {
            tf.translation = Vec3::from_array(after.translation);
            tf.rotation = Quat::from_array(after.rotation);
            tf.scale = Vec3::from_array(after.scale);
        }
    }
}
