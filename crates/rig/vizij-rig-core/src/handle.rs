//! Transform references, bound handles, and the host binding trait.
//!
//! Descriptors hold [`TransformRef`]s (canonical paths such as `"Rig/Arm/Hand"`).
//! At activation a binder asks the host's [`BindContext`] to resolve them into
//! [`TransformId`]s, wrapped in read-only or read-write handles. Handles only
//! carry the id; every access goes through the stream passed in for the tick.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RigError;
use crate::ids::TransformId;
use crate::stream::AnimationStream;

/// Author-time reference to a transform, by canonical path.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformRef(pub String);

impl TransformRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransformRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for TransformRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host side of binding: resolves references into stream ids.
/// Adapters (Bevy, MemoryStream) implement this and pass it into `Rig::activate`.
pub trait BindContext {
    fn bind(&mut self, reference: &TransformRef) -> Result<TransformId, RigError>;
}

/// Handle that may only read from the stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ReadOnlyTransformHandle {
    id: TransformId,
}

impl ReadOnlyTransformHandle {
    pub fn bind(ctx: &mut dyn BindContext, reference: &TransformRef) -> Result<Self, RigError> {
        ctx.bind(reference).map(|id| Self { id })
    }

    #[inline]
    pub fn id(&self) -> TransformId {
        self.id
    }

    #[inline]
    pub fn local_position<S: AnimationStream + ?Sized>(&self, stream: &S) -> [f32; 3] {
        stream.local_position(self.id)
    }

    #[inline]
    pub fn local_rotation<S: AnimationStream + ?Sized>(&self, stream: &S) -> [f32; 4] {
        stream.local_rotation(self.id)
    }

    #[inline]
    pub fn rotation<S: AnimationStream + ?Sized>(&self, stream: &S) -> [f32; 4] {
        stream.rotation(self.id)
    }
}

/// Handle that may read and write the stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ReadWriteTransformHandle {
    id: TransformId,
}

impl ReadWriteTransformHandle {
    pub fn bind(ctx: &mut dyn BindContext, reference: &TransformRef) -> Result<Self, RigError> {
        ctx.bind(reference).map(|id| Self { id })
    }

    #[inline]
    pub fn id(&self) -> TransformId {
        self.id
    }

    #[inline]
    pub fn local_position<S: AnimationStream + ?Sized>(&self, stream: &S) -> [f32; 3] {
        stream.local_position(self.id)
    }

    #[inline]
    pub fn set_local_position<S: AnimationStream + ?Sized>(&self, stream: &mut S, value: [f32; 3]) {
        stream.set_local_position(self.id, value);
    }

    #[inline]
    pub fn local_rotation<S: AnimationStream + ?Sized>(&self, stream: &S) -> [f32; 4] {
        stream.local_rotation(self.id)
    }

    #[inline]
    pub fn set_local_rotation<S: AnimationStream + ?Sized>(&self, stream: &mut S, value: [f32; 4]) {
        stream.set_local_rotation(self.id, value);
    }

    #[inline]
    pub fn rotation<S: AnimationStream + ?Sized>(&self, stream: &S) -> [f32; 4] {
        stream.rotation(self.id)
    }

    #[inline]
    pub fn set_rotation<S: AnimationStream + ?Sized>(&self, stream: &mut S, value: [f32; 4]) {
        stream.set_rotation(self.id, value);
    }
}
