//! Anchors reported by the tracking backend.

use glam::{Mat4, Vec2, Vec3};

use crate::hit_test::PlaneAlignment;

/// Identity of an anchor, stable for the anchor's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub u64);

/// A detected flat surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneAnchor {
    /// Center of the detected extent, in the anchor's local frame.
    pub center: Vec3,
    /// Width (local X) and depth (local Z) of the detected extent.
    pub extent: Vec2,
    /// Whether the plane is a floor-like or wall-like surface.
    pub alignment: PlaneAlignment,
}

/// A recognized reference image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnchor {
    /// Name of the reference image in the host's catalog.
    pub name: String,
    /// Physical size of the image in world units.
    pub physical_size: Vec2,
}

/// What an anchor describes.
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorKind {
    /// A detected plane.
    Plane(PlaneAnchor),
    /// A recognized image.
    Image(ImageAnchor),
}

/// An anchor as delivered by add/update callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    /// Stable identity.
    pub id: AnchorId,
    /// World transform of the anchor.
    pub transform: Mat4,
    /// Plane or image payload.
    pub kind: AnchorKind,
}

impl Anchor {
    /// Creates a plane anchor.
    pub fn plane(id: AnchorId, transform: Mat4, plane: PlaneAnchor) -> Self {
        Self {
            id,
            transform,
            kind: AnchorKind::Plane(plane),
        }
    }

    /// Creates an image anchor.
    pub fn image(id: AnchorId, transform: Mat4, image: ImageAnchor) -> Self {
        Self {
            id,
            transform,
            kind: AnchorKind::Image(image),
        }
    }
}
