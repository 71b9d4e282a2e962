//! Rotation blend driven by a slider.
//!
//! The slider's local Y position, clamped to [0, 1], picks an orientation
//! between `source_a` and `source_b`; the result is blended onto `target` by
//! the constraint weight. Each tick with a positive weight also snaps the
//! slider back onto its track at `(0, t, 0)`.

use serde::{Deserialize, Serialize};

use crate::constraint::{Constraint, ConstraintBinder, ConstraintData, ConstraintJob};
use crate::error::RigError;
use crate::handle::{BindContext, ReadOnlyTransformHandle, ReadWriteTransformHandle, TransformRef};
use crate::math::{clamp01, RotationInterp};
use crate::stream::AnimationStream;

/// Registry name of this constraint type.
pub const ROTATION_BLEND_SLIDER: &str = "rotation_blend_slider";

pub type RotationBlendSliderConstraint = Constraint<RotationBlendSliderBinder>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationBlendSliderData {
    #[serde(default)]
    pub target: Option<TransformRef>,
    #[serde(default)]
    pub source_a: Option<TransformRef>,
    #[serde(default)]
    pub source_b: Option<TransformRef>,
    #[serde(default)]
    pub slider: Option<TransformRef>,
    #[serde(default)]
    pub interpolation: RotationInterp,
}

impl RotationBlendSliderData {
    pub fn new(
        target: impl Into<TransformRef>,
        source_a: impl Into<TransformRef>,
        source_b: impl Into<TransformRef>,
        slider: impl Into<TransformRef>,
    ) -> Self {
        Self {
            target: Some(target.into()),
            source_a: Some(source_a.into()),
            source_b: Some(source_b.into()),
            slider: Some(slider.into()),
            interpolation: RotationInterp::default(),
        }
    }

    pub fn with_interpolation(mut self, interpolation: RotationInterp) -> Self {
        self.interpolation = interpolation;
        self
    }
}

impl ConstraintData for RotationBlendSliderData {
    fn is_valid(&self) -> bool {
        self.target.is_some()
            && self.source_a.is_some()
            && self.source_b.is_some()
            && self.slider.is_some()
    }

    fn set_default_values(&mut self) {
        *self = Self::default();
    }

    fn sync_scene_to_stream(&self) -> Vec<&TransformRef> {
        [&self.source_a, &self.source_b, &self.slider]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct RotationBlendSliderJob {
    pub target: ReadWriteTransformHandle,
    pub source_a: ReadOnlyTransformHandle,
    pub source_b: ReadOnlyTransformHandle,
    pub slider: ReadWriteTransformHandle,
    pub interpolation: RotationInterp,
}

impl ConstraintJob for RotationBlendSliderJob {
    fn process_animation(&mut self, stream: &mut dyn AnimationStream, weight: f32) {
        // NaN counts as zero.
        if weight.is_nan() || weight <= 0.0 {
            return;
        }

        let t = clamp01(self.slider.local_position(&*stream)[1]);
        self.slider.set_local_position(stream, [0.0, t, 0.0]);

        let rot = self.interpolation.interpolate(
            self.source_a.rotation(&*stream),
            self.source_b.rotation(&*stream),
            t,
        );

        let target_rot = self.target.rotation(&*stream);
        self.target
            .set_rotation(stream, self.interpolation.interpolate(target_rot, rot, weight));
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RotationBlendSliderBinder;

fn require<'a>(
    reference: &'a Option<TransformRef>,
    field: &'static str,
) -> Result<&'a TransformRef, RigError> {
    reference.as_ref().ok_or(RigError::MissingReference {
        kind: ROTATION_BLEND_SLIDER.to_string(),
        field,
    })
}

impl ConstraintBinder for RotationBlendSliderBinder {
    type Data = RotationBlendSliderData;
    type Job = RotationBlendSliderJob;

    const KIND: &'static str = ROTATION_BLEND_SLIDER;

    fn create(&self, ctx: &mut dyn BindContext, data: &Self::Data) -> Result<Self::Job, RigError> {
        Ok(RotationBlendSliderJob {
            target: ReadWriteTransformHandle::bind(ctx, require(&data.target, "target")?)?,
            source_a: ReadOnlyTransformHandle::bind(ctx, require(&data.source_a, "source_a")?)?,
            source_b: ReadOnlyTransformHandle::bind(ctx, require(&data.source_b, "source_b")?)?,
            slider: ReadWriteTransformHandle::bind(ctx, require(&data.slider, "slider")?)?,
            interpolation: data.interpolation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> RotationBlendSliderData {
        RotationBlendSliderData::new("Rig/Target", "Rig/A", "Rig/B", "Rig/Slider")
    }

    #[test]
    fn valid_only_when_all_references_set() {
        assert!(full().is_valid());

        let clears: [fn(&mut RotationBlendSliderData); 4] = [
            |d| d.target = None,
            |d| d.source_a = None,
            |d| d.source_b = None,
            |d| d.slider = None,
        ];
        for clear in clears {
            let mut d = full();
            clear(&mut d);
            assert!(!d.is_valid(), "{d:?} should be invalid");
        }
    }

    #[test]
    fn set_default_values_clears_references() {
        let mut d = full().with_interpolation(RotationInterp::Nlerp);
        d.set_default_values();
        assert_eq!(d, RotationBlendSliderData::default());
        assert!(!d.is_valid());
    }

    #[test]
    fn scene_sync_lists_sources_and_slider() {
        let d = full();
        let synced: Vec<&str> = d.sync_scene_to_stream().iter().map(|r| r.path()).collect();
        assert_eq!(synced, vec!["Rig/A", "Rig/B", "Rig/Slider"]);
    }

    #[test]
    fn data_deserializes_with_missing_fields_as_unset() {
        let d: RotationBlendSliderData =
            serde_json::from_str(r#"{ "target": "Rig/Target", "interpolation": "nlerp" }"#)
                .unwrap();
        assert_eq!(d.target, Some(TransformRef::from("Rig/Target")));
        assert_eq!(d.slider, None);
        assert_eq!(d.interpolation, RotationInterp::Nlerp);
        assert!(!d.is_valid());
    }
}
