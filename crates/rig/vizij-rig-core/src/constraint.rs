//! Constraint capability traits.
//!
//! A constraint type is three small values:
//! - [`ConstraintData`]: the authored descriptor (references + settings)
//! - [`ConstraintBinder`]: turns a descriptor into a bound job at activation
//! - [`ConstraintJob`]: the per-tick computation against an [`AnimationStream`]
//!
//! [`Constraint`] ties the three together and exposes them to hosts through the
//! object-safe [`RigConstraint`] trait, which is what a `Rig` or registry stores.

use std::any::Any;
use std::fmt;

use crate::error::RigError;
use crate::handle::{BindContext, TransformRef};
use crate::ids::TransformId;
use crate::stream::AnimationStream;

/// Authored descriptor of a constraint.
pub trait ConstraintData: fmt::Debug + Send + Sync {
    /// Whether the descriptor is complete enough to evaluate.
    fn is_valid(&self) -> bool;

    /// Reset every field to its creation value.
    fn set_default_values(&mut self);

    /// References whose scene value must be pushed into the stream before
    /// each evaluation.
    fn sync_scene_to_stream(&self) -> Vec<&TransformRef> {
        Vec::new()
    }
}

/// Per-tick work of a bound constraint.
pub trait ConstraintJob: Send + Sync {
    fn process_root_motion(&mut self, _stream: &mut dyn AnimationStream) {}

    /// Apply the constraint with `weight` in [0, 1].
    fn process_animation(&mut self, stream: &mut dyn AnimationStream, weight: f32);
}

/// Creates and tears down jobs for one constraint type.
pub trait ConstraintBinder: Send + Sync {
    type Data: ConstraintData;
    type Job: ConstraintJob;

    /// Registry name of the constraint type.
    const KIND: &'static str;

    fn create(&self, ctx: &mut dyn BindContext, data: &Self::Data) -> Result<Self::Job, RigError>;

    fn destroy(&self, _job: Self::Job) {}
}

/// Object-safe view of a constraint instance, as stored by hosts.
pub trait RigConstraint: fmt::Debug + Send + Sync {
    fn kind(&self) -> &'static str;
    fn is_valid(&self) -> bool;
    fn is_active(&self) -> bool;

    /// Bind against the host. Replaces any previously bound job.
    fn activate(&mut self, ctx: &mut dyn BindContext) -> Result<(), RigError>;
    fn deactivate(&mut self);

    /// Transforms pulled from the scene before each evaluation (bound ids).
    fn synced_transforms(&self) -> &[TransformId];

    /// Run one tick. Does nothing when not active.
    fn evaluate(&mut self, stream: &mut dyn AnimationStream, weight: f32);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A constraint instance: binder, descriptor and (once active) its job.
pub struct Constraint<B: ConstraintBinder> {
    binder: B,
    data: B::Data,
    job: Option<B::Job>,
    synced: Vec<TransformId>,
}

impl<B: ConstraintBinder> Constraint<B> {
    pub fn new(binder: B, data: B::Data) -> Self {
        Self {
            binder,
            data,
            job: None,
            synced: Vec::new(),
        }
    }

    pub fn data(&self) -> &B::Data {
        &self.data
    }

    /// Edits take effect on the next activation.
    pub fn data_mut(&mut self) -> &mut B::Data {
        &mut self.data
    }

    pub fn job(&self) -> Option<&B::Job> {
        self.job.as_ref()
    }
}

impl<B> Constraint<B>
where
    B: ConstraintBinder + Default,
{
    pub fn from_data(data: B::Data) -> Self {
        Self::new(B::default(), data)
    }
}

impl<B: ConstraintBinder> fmt::Debug for Constraint<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("kind", &B::KIND)
            .field("data", &self.data)
            .field("active", &self.job.is_some())
            .finish()
    }
}

impl<B> RigConstraint for Constraint<B>
where
    B: ConstraintBinder + 'static,
    B::Data: 'static,
    B::Job: 'static,
{
    fn kind(&self) -> &'static str {
        B::KIND
    }

    fn is_valid(&self) -> bool {
        self.data.is_valid()
    }

    fn is_active(&self) -> bool {
        self.job.is_some()
    }

    fn activate(&mut self, ctx: &mut dyn BindContext) -> Result<(), RigError> {
        self.deactivate();
        let synced = self
            .data
            .sync_scene_to_stream()
            .into_iter()
            .map(|r| ctx.bind(r))
            .collect::<Result<Vec<_>, _>>()?;
        let job = self.binder.create(ctx, &self.data)?;
        self.synced = synced;
        self.job = Some(job);
        Ok(())
    }

    fn deactivate(&mut self) {
        if let Some(job) = self.job.take() {
            self.binder.destroy(job);
        }
        self.synced.clear();
    }

    fn synced_transforms(&self) -> &[TransformId] {
        &self.synced
    }

    fn evaluate(&mut self, stream: &mut dyn AnimationStream, weight: f32) {
        if let Some(job) = self.job.as_mut() {
            job.process_root_motion(stream);
            job.process_animation(stream, weight);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
