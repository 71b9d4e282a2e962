//! JSON rig descriptions.
//!
//! ```json
//! {
//!   "name": "arm",
//!   "constraints": [
//!     { "id": "wrist", "type": "rotation_blend_slider", "weight": 1.0,
//!       "data": { "target": "Arm/Hand", "source_a": "Arm/PoseA",
//!                 "source_b": "Arm/PoseB", "slider": "Controls/Wrist" } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::RigError;
use crate::ids::ConstraintId;
use crate::weight::ConstraintWeight;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RigConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub constraints: Vec<ConstraintConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConstraintConfig {
    pub id: ConstraintId,
    /// Registry name of the constraint type.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub weight: ConstraintWeight,
    /// Descriptor handed to the type's factory.
    #[serde(default)]
    pub data: JsonValue,
}

/// Parse a rig description from JSON text.
pub fn parse_rig_json(json: &str) -> Result<RigConfig, RigError> {
    Ok(serde_json::from_str(json)?)
}
