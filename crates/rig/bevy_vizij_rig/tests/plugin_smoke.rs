use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use bevy::prelude::*;
use bevy_vizij_rig::{RigBindingIndex, VizijBindingHint, VizijRig, VizijRigPlugin, VizijRigRoot};
use vizij_rig_core::{parse_rig_json, MemoryStream, RigConfig, TransformHierarchy};

const RIG_JSON: &str = r#"{
  "name": "head",
  "constraints": [
    {
      "id": "head_turn",
      "type": "rotation_blend_slider",
      "data": {
        "target": "Rig/Target",
        "source_a": "Rig/PoseA",
        "source_b": "Rig/PoseB",
        "slider": "Rig/Controls/Slider"
      }
    }
  ]
}"#;

fn app_with_rig() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(VizijRigPlugin);
    let cfg = parse_rig_json(RIG_JSON).unwrap();
    app.insert_resource(VizijRig::from_config(&cfg).unwrap());
    app
}

/// Spawns Rig/{Target, PoseA, PoseB, Controls/Slider}; returns (target, slider).
fn spawn_rig(app: &mut App, slider_y: f32) -> (Entity, Entity) {
    let world = app.world_mut();
    let target = world
        .spawn((Name::new("Target"), Transform::default()))
        .id();
    let pose_a = world.spawn((Name::new("PoseA"), Transform::default())).id();
    let pose_b = world
        .spawn((
            Name::new("PoseB"),
            Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_2)),
        ))
        .id();
    let slider = world
        .spawn((
            Name::new("slider_ctrl"),
            VizijBindingHint {
                name: "Slider".into(),
            },
            Transform::from_xyz(0.25, slider_y, -1.0),
        ))
        .id();
    let controls = world
        .spawn((Name::new("Controls"), Transform::default()))
        .push_children(&[slider])
        .id();
    world
        .spawn((Name::new("Rig"), VizijRigRoot, Transform::default()))
        .push_children(&[target, pose_a, pose_b, controls]);
    (target, slider)
}

fn assert_rot(actual: Quat, expected: Quat) {
    let angle = actual.angle_between(expected);
    assert!(angle < 1e-4, "actual={actual:?} expected={expected:?} angle={angle}");
}

/// it should insert the rig resources when the plugin is added
#[test]
fn plugin_inserts_resources() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(VizijRigPlugin);

    assert!(app.world().get_resource::<VizijRig>().is_some());
    assert!(app.world().get_resource::<RigBindingIndex>().is_some());
}

/// it should index rig roots by name, honoring binding hints
#[test]
fn binding_index_uses_names_and_hints() {
    let mut app = app_with_rig();
    let (target, slider) = spawn_rig(&mut app, 0.5);
    app.update();

    let index = app.world().resource::<RigBindingIndex>();
    assert_eq!(index.entity("Rig/Target"), Some(target));
    assert_eq!(index.entity("Rig/Controls/Slider"), Some(slider));
    assert_eq!(index.entity("Rig/Controls/slider_ctrl"), None);
    assert!(app.world().resource::<VizijRig>().0.is_active());
}

/// it should turn the target 45 degrees and normalize the slider after one update
#[test]
fn rig_drives_transforms() {
    let mut app = app_with_rig();
    let (target, slider) = spawn_rig(&mut app, 0.5);
    app.update();

    let world = app.world();
    let target_tf = world.get::<Transform>(target).unwrap();
    assert_rot(target_tf.rotation, Quat::from_rotation_y(FRAC_PI_4));
    let slider_tf = world.get::<Transform>(slider).unwrap();
    assert_eq!(slider_tf.translation, Vec3::new(0.0, 0.5, 0.0));
}

/// it should follow slider edits made between frames
#[test]
fn slider_edits_apply_next_frame() {
    let mut app = app_with_rig();
    let (target, slider) = spawn_rig(&mut app, 0.0);
    app.update();
    assert_rot(
        app.world().get::<Transform>(target).unwrap().rotation,
        Quat::IDENTITY,
    );

    app.world_mut()
        .get_mut::<Transform>(slider)
        .unwrap()
        .translation
        .y = 3.0;
    app.update();

    let world = app.world();
    assert_rot(
        world.get::<Transform>(target).unwrap().rotation,
        Quat::from_rotation_y(FRAC_PI_2),
    );
    assert_eq!(
        world.get::<Transform>(slider).unwrap().translation,
        Vec3::new(0.0, 1.0, 0.0)
    );
}

/// it should leave transforms alone when the constraint weight is zero
#[test]
fn zero_weight_leaves_transforms() {
    let mut app = app_with_rig();
    let (target, slider) = spawn_rig(&mut app, 0.5);
    app.world_mut()
        .resource_mut::<VizijRig>()
        .0
        .set_weight("head_turn", 0.0);
    app.update();

    let world = app.world();
    assert_eq!(world.get::<Transform>(target).unwrap().rotation, Quat::IDENTITY);
    assert_eq!(
        world.get::<Transform>(slider).unwrap().translation,
        Vec3::new(0.25, 0.5, -1.0)
    );
}

/// it should stay inactive when a reference cannot be resolved
#[test]
fn unresolved_reference_leaves_rig_inactive() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(VizijRigPlugin);
    let cfg = parse_rig_json(&RIG_JSON.replace("Rig/PoseB", "Rig/Missing")).unwrap();
    app.insert_resource(VizijRig::from_config(&cfg).unwrap());
    let (target, _) = spawn_rig(&mut app, 1.0);
    app.update();

    assert!(!app.world().resource::<VizijRig>().0.is_active());
    assert_eq!(
        app.world().get::<Transform>(target).unwrap().rotation,
        Quat::IDENTITY
    );
}

/// Spawns every scene node as an entity; top-level nodes become rig roots.
fn spawn_scene(app: &mut App, scene: &TransformHierarchy) -> Vec<Entity> {
    let world = app.world_mut();
    let mut entities: Vec<Entity> = Vec::with_capacity(scene.len());
    for (id, node) in scene.iter() {
        let segment = node.path.rsplit('/').next().unwrap_or(&node.path);
        let tf = Transform {
            translation: Vec3::from_array(node.local.translation),
            rotation: Quat::from_array(node.local.rotation),
            scale: Vec3::from_array(node.local.scale),
        };
        let e = world.spawn((Name::new(segment.to_string()), tf)).id();
        match scene.parent(id) {
            Some(parent) => {
                world
                    .entity_mut(entities[parent.index()])
                    .push_children(&[e]);
            }
            None => {
                world.entity_mut(e).insert(VizijRigRoot);
            }
        }
        entities.push(e);
    }
    entities
}

/// it should produce the same transforms as the in-memory host for a shared fixture
#[test]
fn fixture_rig_matches_memory_stream() {
    let fixture: serde_json::Value = vizij_test_fixtures::rigs::load("slider-half").unwrap();
    let scene: TransformHierarchy = serde_json::from_value(fixture["scene"].clone()).unwrap();
    let cfg: RigConfig = serde_json::from_value(fixture["rig"].clone()).unwrap();

    let mut expected = MemoryStream::new(scene.clone());
    let mut rig = VizijRig::from_config(&cfg).unwrap().0;
    rig.activate(&mut expected).unwrap();
    rig.evaluate(&mut expected);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(VizijRigPlugin);
    app.insert_resource(VizijRig::from_config(&cfg).unwrap());
    let entities = spawn_scene(&mut app, &scene);
    app.update();

    for (id, node) in scene.iter() {
        let tf = app.world().get::<Transform>(entities[id.index()]).unwrap();
        let want = expected.local(id).unwrap();
        assert_rot(tf.rotation, Quat::from_array(want.rotation));
        assert!(
            tf.translation
                .abs_diff_eq(Vec3::from_array(want.translation), 1e-6),
            "{}: {:?} vs {:?}",
            node.path,
            tf.translation,
            want.translation
        );
    }
}

/// it should compose rotations from the rig root down, ignoring ancestors above it
#[test]
fn rig_space_starts_at_the_root() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(VizijRigPlugin);
    let cfg = parse_rig_json(
        r#"{ "constraints": [ { "id": "turn", "type": "rotation_blend_slider", "data": {
            "target": "Head/Target", "source_a": "Poses/A",
            "source_b": "Poses/B", "slider": "Poses/Slider" } } ] }"#,
    )
    .unwrap();
    app.insert_resource(VizijRig::from_config(&cfg).unwrap());

    let world = app.world_mut();
    let target = world
        .spawn((Name::new("Target"), Transform::default()))
        .id();
    let head = world
        .spawn((
            Name::new("Head"),
            VizijRigRoot,
            Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_2)),
        ))
        .push_children(&[target])
        .id();
    // Rotated parent above the root; not part of rig space.
    world
        .spawn((
            Name::new("World"),
            Transform::from_rotation(Quat::from_rotation_x(FRAC_PI_2)),
        ))
        .push_children(&[head]);
    let a = world.spawn((Name::new("A"), Transform::default())).id();
    let b = world
        .spawn((
            Name::new("B"),
            Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_2)),
        ))
        .id();
    let slider = world
        .spawn((Name::new("Slider"), Transform::from_xyz(0.0, 1.0, 0.0)))
        .id();
    world
        .spawn((Name::new("Poses"), VizijRigRoot, Transform::default()))
        .push_children(&[a, b, slider]);

    app.update();

    // Root already supplies the quarter turn, so the target's local is identity.
    assert!(app.world().resource::<RigBindingIndex>().entity("World").is_none());
    assert_rot(
        app.world().get::<Transform>(target).unwrap().rotation,
        Quat::IDENTITY,
    );
}
