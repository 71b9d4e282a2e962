//! Vizij Rig Core (engine-agnostic)
//!
//! Rig constraints expressed as a data/binder/job triple. Hosts implement
//! [`BindContext`] and [`AnimationStream`]; the [`Rig`] evaluator and
//! [`MemoryStream`] provide a self-contained host for tests and adapters.

pub mod config;
pub mod constraint;
pub mod constraints;
pub mod error;
pub mod handle;
pub mod ids;
pub mod math;
pub mod registry;
pub mod rig;
pub mod stream;
pub mod weight;

// Re-exports for consumers (adapters)
pub use config::{parse_rig_json, ConstraintConfig, RigConfig};
pub use constraint::{
    Constraint, ConstraintBinder, ConstraintData, ConstraintJob, RigConstraint,
};
pub use constraints::rotation_blend_slider::{
    RotationBlendSliderBinder, RotationBlendSliderConstraint, RotationBlendSliderData,
    RotationBlendSliderJob, ROTATION_BLEND_SLIDER,
};
pub use error::RigError;
pub use handle::{BindContext, ReadOnlyTransformHandle, ReadWriteTransformHandle, TransformRef};
pub use ids::{ConstraintId, TransformId};
pub use math::RotationInterp;
pub use registry::ConstraintRegistry;
pub use rig::Rig;
pub use stream::{AnimationStream, LocalTransform, MemoryStream, TransformHierarchy, TransformNode};
pub use weight::ConstraintWeight;
