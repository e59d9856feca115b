//! Visualization of detected planes.
//!
//! Every plane anchor gets one [`PlaneVisual`], a flat translucent quad
//! matching the anchor's detected extent. The quad lies in the anchor's local
//! XZ plane; the anchor transform carries it to world space for both
//! horizontal and vertical planes.

use std::collections::BTreeMap;

use glam::{Mat4, Vec2, Vec3};

use crate::anchor::{AnchorId, PlaneAnchor};
use crate::hit_test::PlaneAlignment;

/// A visualization quad bound to one plane anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneVisual {
    /// Anchor this visual belongs to.
    anchor: AnchorId,
    /// World transform of the anchor.
    anchor_transform: Mat4,
    /// Center of the extent in the anchor's local frame.
    center: Vec3,
    /// Width and depth of the extent.
    extent: Vec2,
    /// Alignment of the underlying plane.
    alignment: PlaneAlignment,
    /// Whether the quad is drawn.
    visible: bool,
    /// Color of the quad.
    color: Vec3,
    /// Opacity of the quad (0.0 = transparent, 1.0 = opaque).
    opacity: f32,
}

impl PlaneVisual {
    /// Creates a visual for a plane anchor.
    pub fn new(anchor: AnchorId, anchor_transform: Mat4, plane: &PlaneAnchor) -> Self {
        Self {
            anchor,
            anchor_transform,
            center: plane.center,
            extent: plane.extent,
            alignment: plane.alignment,
            visible: false,
            color: Vec3::new(0.5, 0.5, 0.5),
            opacity: 0.3,
        }
    }

    /// Returns the anchor this visual belongs to.
    pub fn anchor(&self) -> AnchorId {
        self.anchor
    }

    /// Returns the center of the extent in the anchor's local frame.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Returns the width and depth of the extent.
    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    /// Returns the alignment of the underlying plane.
    pub fn alignment(&self) -> PlaneAlignment {
        self.alignment
    }

    /// Returns the world transform of the anchor.
    pub fn anchor_transform(&self) -> Mat4 {
        self.anchor_transform
    }

    /// Re-syncs position and extent from an updated anchor.
    pub fn sync(&mut self, anchor_transform: Mat4, plane: &PlaneAnchor) {
        self.anchor_transform = anchor_transform;
        self.center = plane.center;
        self.extent = plane.extent;
        self.alignment = plane.alignment;
    }

    /// Returns whether the quad is drawn.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Sets whether the quad is drawn.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Returns the color of the quad.
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Sets the color of the quad.
    pub fn set_color(&mut self, color: Vec3) {
        self.color = color;
    }

    /// Returns the opacity of the quad.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Sets the opacity of the quad.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Model matrix mapping the unit quad (XZ, centered at the origin) onto the extent.
    pub fn model_matrix(&self) -> Mat4 {
        self.anchor_transform
            * Mat4::from_translation(self.center)
            * Mat4::from_scale(Vec3::new(self.extent.x, 1.0, self.extent.y))
    }

    /// Returns the world-space center of the quad.
    pub fn world_center(&self) -> Vec3 {
        self.anchor_transform.transform_point3(self.center)
    }
}

/// GPU-compatible plane visual uniforms.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlaneVisualUniforms {
    /// Model matrix of the quad.
    pub model: [[f32; 4]; 4],
    /// Color of the quad.
    pub color: [f32; 3],
    /// Opacity, zero when hidden.
    pub opacity: f32,
}

impl From<&PlaneVisual> for PlaneVisualUniforms {
    fn from(visual: &PlaneVisual) -> Self {
        Self {
            model: visual.model_matrix().to_cols_array_2d(),
            color: visual.color.to_array(),
            opacity: if visual.visible { visual.opacity } else { 0.0 },
        }
    }
}

/// Registry of plane visuals keyed by anchor.
#[derive(Debug, Default)]
pub struct PlaneVisuals {
    visuals: BTreeMap<AnchorId, PlaneVisual>,
}

impl PlaneVisuals {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or re-syncs the visual for a plane anchor and returns it.
    pub fn upsert(&mut self, anchor: AnchorId, transform: Mat4, plane: &PlaneAnchor) -> &PlaneVisual {
        self.visuals
            .entry(anchor)
            .and_modify(|visual| visual.sync(transform, plane))
            .or_insert_with(|| PlaneVisual::new(anchor, transform, plane))
    }

    /// Gets the visual for an anchor.
    pub fn get(&self, anchor: AnchorId) -> Option<&PlaneVisual> {
        self.visuals.get(&anchor)
    }

    /// Gets the visual for an anchor mutably.
    pub fn get_mut(&mut self, anchor: AnchorId) -> Option<&mut PlaneVisual> {
        self.visuals.get_mut(&anchor)
    }

    /// Removes the visual for an anchor.
    pub fn remove(&mut self, anchor: AnchorId) -> Option<PlaneVisual> {
        self.visuals.remove(&anchor)
    }

    /// Removes all visuals and returns their anchors.
    pub fn clear(&mut self) -> Vec<AnchorId> {
        let anchors = self.visuals.keys().copied().collect();
        self.visuals.clear();
        anchors
    }

    /// Iterates over all visuals in anchor order.
    pub fn iter(&self) -> impl Iterator<Item = &PlaneVisual> {
        self.visuals.values()
    }

    /// Iterates mutably over all visuals in anchor order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PlaneVisual> {
        self.visuals.values_mut()
    }

    /// Returns the number of visuals.
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    /// Returns true if there are no visuals.
    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor(extent: Vec2) -> PlaneAnchor {
        PlaneAnchor {
            center: Vec3::new(0.1, 0.0, -0.2),
            extent,
            alignment: PlaneAlignment::Horizontal,
        }
    }

    #[test]
    fn test_plane_visual_creation() {
        let visual = PlaneVisual::new(AnchorId(7), Mat4::IDENTITY, &floor(Vec2::new(1.0, 2.0)));
        assert_eq!(visual.anchor(), AnchorId(7));
        assert_eq!(visual.extent(), Vec2::new(1.0, 2.0));
        assert_eq!(visual.alignment(), PlaneAlignment::Horizontal);
        assert!(!visual.is_visible());
    }

    #[test]
    fn test_upsert_resyncs_existing_visual() {
        let mut visuals = PlaneVisuals::new();
        visuals.upsert(AnchorId(1), Mat4::IDENTITY, &floor(Vec2::new(1.0, 1.0)));
        visuals.get_mut(AnchorId(1)).unwrap().set_visible(true);

        let moved = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0));
        let visual = visuals.upsert(AnchorId(1), moved, &floor(Vec2::new(3.0, 2.0)));
        assert_eq!(visual.extent(), Vec2::new(3.0, 2.0));
        assert!((visual.world_center() - Vec3::new(0.1, -1.0, -0.2)).length() < 1e-6);
        // Visibility survives a resync
        assert!(visual.is_visible());
        assert_eq!(visuals.len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut visuals = PlaneVisuals::new();
        visuals.upsert(AnchorId(2), Mat4::IDENTITY, &floor(Vec2::ONE));
        visuals.upsert(AnchorId(1), Mat4::IDENTITY, &floor(Vec2::ONE));
        assert!(visuals.remove(AnchorId(2)).is_some());
        assert!(visuals.remove(AnchorId(2)).is_none());
        visuals.upsert(AnchorId(3), Mat4::IDENTITY, &floor(Vec2::ONE));
        assert_eq!(visuals.clear(), vec![AnchorId(1), AnchorId(3)]);
        assert!(visuals.is_empty());
    }

    #[test]
    fn test_uniforms() {
        let mut visual = PlaneVisual::new(AnchorId(1), Mat4::IDENTITY, &floor(Vec2::new(2.0, 4.0)));
        let hidden = PlaneVisualUniforms::from(&visual);
        assert_eq!(hidden.opacity, 0.0);

        visual.set_visible(true);
        visual.set_opacity(1.5);
        let uniforms = PlaneVisualUniforms::from(&visual);
        assert_eq!(uniforms.opacity, 1.0);
        assert_eq!(uniforms.color, [0.5, 0.5, 0.5]);
        assert_eq!(uniforms.model[0][0], 2.0);
        assert_eq!(uniforms.model[2][2], 4.0);
        assert_eq!(uniforms.model[3], [0.1, 0.0, -0.2, 1.0]);
    }
}
