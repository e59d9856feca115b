//! Configuration options for arplace.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ArPlaceError, Result};
use crate::focus::FOCUS_SEARCHING_OFFSET;
use crate::transform::FREEFORM_OFFSET;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Offset along the camera's local Z axis for freeform placement.
    pub freeform_offset: f32,

    /// Offset along the camera's local Z axis of the focus indicator while it searches.
    pub focus_offset: f32,

    /// Whether plane visuals start out visible.
    pub show_planes: bool,

    /// Color of plane visuals.
    pub plane_color: Vec3,

    /// Opacity of plane visuals.
    pub plane_opacity: f32,

    /// Collision category shared by all placed objects.
    pub collision_category: u32,

    /// Whether the focus indicator only locks onto surfaces while tracking is normal.
    pub focus_requires_normal_tracking: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            freeform_offset: FREEFORM_OFFSET,
            focus_offset: FOCUS_SEARCHING_OFFSET,
            show_planes: false,
            plane_color: Vec3::new(0.5, 0.5, 0.5),
            plane_opacity: 0.3,
            collision_category: 1,
            focus_requires_normal_tracking: true,
        }
    }
}

impl Options {
    /// Parses options from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Saves options to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Checks that all values are in range.
    pub fn validate(&self) -> Result<()> {
        if !self.freeform_offset.is_finite() {
            return Err(ArPlaceError::InvalidOption(format!(
                "freeform_offset must be finite, got {}",
                self.freeform_offset
            )));
        }
        if !self.focus_offset.is_finite() {
            return Err(ArPlaceError::InvalidOption(format!(
                "focus_offset must be finite, got {}",
                self.focus_offset
            )));
        }
        if !(0.0..=1.0).contains(&self.plane_opacity) {
            return Err(ArPlaceError::InvalidOption(format!(
                "plane_opacity must be within [0, 1], got {}",
                self.plane_opacity
            )));
        }
        if self.collision_category == 0 {
            return Err(ArPlaceError::InvalidOption(
                "collision_category must have at least one bit set".to_string(),
            ));
        }
        Ok(())
    }
}
