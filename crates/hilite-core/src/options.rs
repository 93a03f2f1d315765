//! Configuration options for hilite markers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::visual::Stroke;

/// Yellow 2 px pen for markers on the current slice.
pub const ACTIVE_STROKE: Stroke = Stroke::new(2.0, [255, 255, 0, 255]);

/// Muted 1 px pen for markers previewing an object off the current slice.
pub const INACTIVE_STROKE: Stroke = Stroke::new(1.0, [160, 160, 96, 200]);

/// Appearance options shared by every marker of a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerOptions {
    /// Space added around a bounding box, in dataset units.
    pub margin: f32,

    /// Half length of each arm of a point cross, in drawing-space pixels.
    ///
    /// Applied after projection, so crosses keep their size under zoom.
    pub cross_half_size: f32,

    /// Pen for [`DepthState::Active`](crate::state::DepthState::Active) markers.
    pub active: Stroke,

    /// Pen for markers above or below their depth range.
    pub inactive: Stroke,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            margin: 1.0,
            cross_half_size: 5.0,
            active: ACTIVE_STROKE,
            inactive: INACTIVE_STROKE,
        }
    }
}

impl MarkerOptions {
    /// Parses options from JSON. Missing fields take their default value.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serializes options to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
