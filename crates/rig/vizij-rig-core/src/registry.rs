//! Constraint factories keyed by constraint type name.

use hashbrown::HashMap;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::constraint::{Constraint, ConstraintBinder, RigConstraint};
use crate::constraints::rotation_blend_slider::RotationBlendSliderBinder;
use crate::error::RigError;

pub type ConstraintFactory =
    Box<dyn Fn(JsonValue) -> Result<Box<dyn RigConstraint>, RigError> + Send + Sync>;

/// Maps type names (as written in rig JSON) to constraint factories.
#[derive(Default)]
pub struct ConstraintRegistry {
    factories: HashMap<String, ConstraintFactory>,
}

impl ConstraintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every constraint type shipped in this crate.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_binder::<RotationBlendSliderBinder>();
        registry
    }

    /// Register a custom factory, replacing any previous one under `kind`.
    pub fn register(&mut self, kind: impl Into<String>, factory: ConstraintFactory) {
        self.factories.insert(kind.into(), factory);
    }

    /// Register a binder type whose descriptor deserializes from JSON.
    pub fn register_binder<B>(&mut self)
    where
        B: ConstraintBinder + Default + 'static,
        B::Data: DeserializeOwned + 'static,
        B::Job: 'static,
    {
        self.register(
            B::KIND,
            Box::new(|data: JsonValue| -> Result<Box<dyn RigConstraint>, RigError> {
                // Omitted data means "all fields unset".
                let data = if data.is_null() {
                    JsonValue::Object(serde_json::Map::new())
                } else {
                    data
                };
                let data: B::Data =
                    serde_json::from_value(data).map_err(|e| RigError::InvalidData {
                        kind: B::KIND.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(Box::new(Constraint::<B>::from_data(data)))
            }),
        );
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build a constraint of type `kind` from its JSON descriptor.
    pub fn create(&self, kind: &str, data: JsonValue) -> Result<Box<dyn RigConstraint>, RigError> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| RigError::UnknownConstraintType {
                kind: kind.to_string(),
            })?;
        factory(data)
    }
}

impl std::fmt::Debug for ConstraintRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::rotation_blend_slider::{
        RotationBlendSliderConstraint, ROTATION_BLEND_SLIDER,
    };
    use serde_json::json;

    #[test]
    fn builtins_create_rotation_blend_slider() {
        let registry = ConstraintRegistry::with_builtins();
        assert!(registry.contains(ROTATION_BLEND_SLIDER));

        let c = registry
            .create(
                ROTATION_BLEND_SLIDER,
                json!({
                    "target": "Rig/Target",
                    "source_a": "Rig/A",
                    "source_b": "Rig/B",
                    "slider": "Rig/Slider"
                }),
            )
            .unwrap();
        assert_eq!(c.kind(), ROTATION_BLEND_SLIDER);
        assert!(c.is_valid());
        assert!(!c.is_active());
        let concrete = c
            .as_any()
            .downcast_ref::<RotationBlendSliderConstraint>()
            .unwrap();
        assert_eq!(concrete.data().slider.as_ref().unwrap().path(), "Rig/Slider");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let registry = ConstraintRegistry::with_builtins();
        let err = registry.create("two_bone_ik", json!({})).unwrap_err();
        assert_eq!(
            err,
            RigError::UnknownConstraintType {
                kind: "two_bone_ik".into()
            }
        );
    }

    #[test]
    fn malformed_data_is_reported() {
        let registry = ConstraintRegistry::with_builtins();
        let err = registry
            .create(ROTATION_BLEND_SLIDER, json!({ "target": 42 }))
            .unwrap_err();
        assert!(matches!(err, RigError::InvalidData { ref kind, .. } if kind == ROTATION_BLEND_SLIDER));
    }
}
