//! Animation stream contract and an in-memory implementation.
//!
//! The stream is the per-tick transform buffer constraints read and write.
//! Positions are exposed in parent (local) space; rotations both in local space
//! and composed to world space, mirroring what rig hosts usually provide.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::handle::{BindContext, TransformRef};
use crate::ids::TransformId;
use crate::math::{quat_conjugate, quat_mul, QUAT_IDENTITY};

/// Host-provided transform access for one evaluation tick.
pub trait AnimationStream {
    fn local_position(&self, id: TransformId) -> [f32; 3];
    fn set_local_position(&mut self, id: TransformId, value: [f32; 3]);

    fn local_rotation(&self, id: TransformId) -> [f32; 4];
    fn set_local_rotation(&mut self, id: TransformId, value: [f32; 4]);

    /// World-space rotation.
    fn rotation(&self, id: TransformId) -> [f32; 4];
    /// Set the world-space rotation; implementations convert into parent space.
    fn set_rotation(&mut self, id: TransformId, value: [f32; 4]);

    /// Push the authored scene value of `id` into the stream.
    /// Hosts without a separate scene state leave this as a no-op.
    fn sync_scene(&mut self, _id: TransformId) {}
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_rotation() -> [f32; 4] {
    QUAT_IDENTITY
}

/// Translation / rotation / scale relative to the parent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalTransform {
    #[serde(default)]
    pub translation: [f32; 3],
    /// Quaternion (x, y, z, w)
    #[serde(default = "default_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: QUAT_IDENTITY,
            scale: default_scale(),
        }
    }
}

impl LocalTransform {
    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn from_rotation(rotation: [f32; 4]) -> Self {
        Self {
            rotation,
            ..Self::default()
        }
    }
}

/// Serialized form of one hierarchy entry. The parent is the path prefix
/// before the last `/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformNode {
    pub path: String,
    #[serde(flatten)]
    pub local: LocalTransform,
}

/// Authored transforms addressed by canonical path.
///
/// Parents must be added before their children, which keeps ids topologically
/// ordered.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<TransformNode>", into = "Vec<TransformNode>")]
pub struct TransformHierarchy {
    nodes: Vec<TransformNode>,
    parents: Vec<Option<TransformId>>,
    index: HashMap<String, TransformId>,
}

impl TransformHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transform at `path`. Its parent (the prefix before the last `/`)
    /// must already exist.
    pub fn add(
        &mut self,
        path: impl Into<String>,
        local: LocalTransform,
    ) -> Result<TransformId, RigError> {
        let path = path.into();
        if self.index.contains_key(&path) {
            return Err(RigError::DuplicateTransform { path });
        }
        let parent_path = path.rsplit_once('/').map(|(prefix, _)| prefix.to_string());
        let parent = match parent_path {
            Some(parent) => match self.index.get(&parent) {
                Some(id) => Some(*id),
                None => return Err(RigError::UnknownParent { path, parent }),
            },
            None => None,
        };
        let id = TransformId(self.nodes.len() as u32);
        self.index.insert(path.clone(), id);
        self.nodes.push(TransformNode { path, local });
        self.parents.push(parent);
        Ok(id)
    }

    pub fn id_of(&self, path: &str) -> Option<TransformId> {
        self.index.get(path).copied()
    }

    pub fn path(&self, id: TransformId) -> Option<&str> {
        self.nodes.get(id.index()).map(|n| n.path.as_str())
    }

    pub fn parent(&self, id: TransformId) -> Option<TransformId> {
        self.parents.get(id.index()).copied().flatten()
    }

    pub fn local(&self, id: TransformId) -> Option<&LocalTransform> {
        self.nodes.get(id.index()).map(|n| &n.local)
    }

    pub fn local_mut(&mut self, id: TransformId) -> Option<&mut LocalTransform> {
        self.nodes.get_mut(id.index()).map(|n| &mut n.local)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransformId, &TransformNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (TransformId(i as u32), n))
    }
}

impl TryFrom<Vec<TransformNode>> for TransformHierarchy {
    type Error = RigError;

    fn try_from(nodes: Vec<TransformNode>) -> Result<Self, Self::Error> {
        let mut hierarchy = TransformHierarchy::new();
        for node in nodes {
            hierarchy.add(node.path, node.local)?;
        }
        Ok(hierarchy)
    }
}

impl From<TransformHierarchy> for Vec<TransformNode> {
    fn from(hierarchy: TransformHierarchy) -> Self {
        hierarchy.nodes
    }
}

impl BindContext for TransformHierarchy {
    fn bind(&mut self, reference: &TransformRef) -> Result<TransformId, RigError> {
        self.id_of(reference.path())
            .ok_or_else(|| RigError::UnresolvedTransform {
                path: reference.path().to_string(),
            })
    }
}

/// In-memory stream over a [`TransformHierarchy`].
///
/// The hierarchy is the scene; the stream keeps its own copy of every local
/// transform. `sync_scene` copies one transform scene -> stream and `commit`
/// writes the whole stream back into the scene.
#[derive(Clone, Debug)]
pub struct MemoryStream {
    scene: TransformHierarchy,
    values: Vec<LocalTransform>,
}

impl MemoryStream {
    pub fn new(scene: TransformHierarchy) -> Self {
        let values = scene.nodes.iter().map(|n| n.local.clone()).collect();
        Self { scene, values }
    }

    pub fn scene(&self) -> &TransformHierarchy {
        &self.scene
    }

    /// Authoring access; edits reach the stream through `sync_scene` or `reset`.
    pub fn scene_mut(&mut self) -> &mut TransformHierarchy {
        &mut self.scene
    }

    pub fn local(&self, id: TransformId) -> Option<&LocalTransform> {
        self.values.get(id.index())
    }

    pub fn id_of(&self, path: &str) -> Option<TransformId> {
        self.scene.id_of(path)
    }

    /// Discard stream values and reload every transform from the scene.
    pub fn reset(&mut self) {
        self.values = self.scene.nodes.iter().map(|n| n.local.clone()).collect();
    }

    /// Write stream values back into the scene.
    pub fn commit(&mut self) {
        for (node, value) in self.scene.nodes.iter_mut().zip(self.values.iter()) {
            node.local = value.clone();
        }
    }

    pub fn into_scene(mut self) -> TransformHierarchy {
        self.commit();
        self.scene
    }
}

impl AnimationStream for MemoryStream {
    fn local_position(&self, id: TransformId) -> [f32; 3] {
        self.values
            .get(id.index())
            .map_or([0.0; 3], |v| v.translation)
    }

    fn set_local_position(&mut self, id: TransformId, value: [f32; 3]) {
        if let Some(v) = self.values.get_mut(id.index()) {
            v.translation = value;
        }
    }

    fn local_rotation(&self, id: TransformId) -> [f32; 4] {
        self.values
            .get(id.index())
            .map_or(QUAT_IDENTITY, |v| v.rotation)
    }

    fn set_local_rotation(&mut self, id: TransformId, value: [f32; 4]) {
        if let Some(v) = self.values.get_mut(id.index()) {
            v.rotation = value;
        }
    }

    fn rotation(&self, id: TransformId) -> [f32; 4] {
        let mut world = self.local_rotation(id);
        let mut cursor = self.scene.parent(id);
        while let Some(parent) = cursor {
            world = quat_mul(self.local_rotation(parent), world);
            cursor = self.scene.parent(parent);
        }
        world
    }

    fn set_rotation(&mut self, id: TransformId, value: [f32; 4]) {
        let local = match self.scene.parent(id) {
            Some(parent) => quat_mul(quat_conjugate(self.rotation(parent)), value),
            None => value,
        };
        self.set_local_rotation(id, local);
    }

    fn sync_scene(&mut self, id: TransformId) {
        if let (Some(scene), Some(v)) = (self.scene.local(id), self.values.get_mut(id.index())) {
            *v = scene.clone();
        }
    }
}

impl BindContext for MemoryStream {
    fn bind(&mut self, reference: &TransformRef) -> Result<TransformId, RigError> {
        self.scene.bind(reference)
    }
}
