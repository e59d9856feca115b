//! Hit-test result types.
//!
//! A hit test projects a screen point into the tracked scene. The tracking
//! backend answers with a ranked list of [`HitCandidate`]s, one per surface
//! the ray crosses.

use glam::{Mat4, Vec3};

/// The kind of surface a hit candidate was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitKind {
    /// Geometry of a plane anchor the tracker has already reconstructed.
    ExistingPlaneGeometry,
    /// A horizontal plane estimated from feature points.
    EstimatedHorizontalPlane,
    /// A vertical plane estimated from feature points.
    EstimatedVerticalPlane,
}

impl HitKind {
    /// All hit kinds, in the order trackers usually rank them.
    pub const ALL: [HitKind; 3] = [
        HitKind::ExistingPlaneGeometry,
        HitKind::EstimatedHorizontalPlane,
        HitKind::EstimatedVerticalPlane,
    ];

    /// Returns whether this kind comes from plane estimation rather than tracked geometry.
    #[must_use]
    pub fn is_estimated(self) -> bool {
        !matches!(self, HitKind::ExistingPlaneGeometry)
    }
}

/// Orientation class of a detected plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneAlignment {
    /// Floors, tables.
    Horizontal,
    /// Walls.
    Vertical,
}

/// A set of allowed plane alignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AlignmentSet {
    /// Horizontal planes are allowed.
    pub horizontal: bool,
    /// Vertical planes are allowed.
    pub vertical: bool,
}

impl AlignmentSet {
    /// No alignment allowed.
    pub const NONE: Self = Self {
        horizontal: false,
        vertical: false,
    };
    /// Horizontal planes only.
    pub const HORIZONTAL: Self = Self {
        horizontal: true,
        vertical: false,
    };
    /// Vertical planes only.
    pub const VERTICAL: Self = Self {
        horizontal: false,
        vertical: true,
    };
    /// Both alignments.
    pub const ANY: Self = Self {
        horizontal: true,
        vertical: true,
    };

    /// Returns whether the given alignment is in the set.
    #[must_use]
    pub fn contains(self, alignment: PlaneAlignment) -> bool {
        match alignment {
            PlaneAlignment::Horizontal => self.horizontal,
            PlaneAlignment::Vertical => self.vertical,
        }
    }

    /// Returns true if no alignment is allowed.
    #[must_use]
    pub fn is_empty(self) -> bool {
        !self.horizontal && !self.vertical
    }
}

impl From<PlaneAlignment> for AlignmentSet {
    fn from(alignment: PlaneAlignment) -> Self {
        match alignment {
            PlaneAlignment::Horizontal => Self::HORIZONTAL,
            PlaneAlignment::Vertical => Self::VERTICAL,
        }
    }
}

/// A single surface intersection returned by a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitCandidate {
    /// Where this candidate came from.
    pub kind: HitKind,
    /// World transform of the intersection point.
    pub world_transform: Mat4,
    /// Distance from the ray origin (the camera) to the intersection.
    pub distance: f32,
    /// Alignment of the underlying plane. Only known for existing geometry.
    pub plane_alignment: Option<PlaneAlignment>,
}

impl HitCandidate {
    /// Creates a candidate on existing tracked plane geometry.
    #[must_use]
    pub fn existing(world_transform: Mat4, distance: f32, alignment: PlaneAlignment) -> Self {
        Self {
            kind: HitKind::ExistingPlaneGeometry,
            world_transform,
            distance,
            plane_alignment: Some(alignment),
        }
    }

    /// Creates a candidate on an estimated horizontal plane.
    #[must_use]
    pub fn estimated_horizontal(world_transform: Mat4, distance: f32) -> Self {
        Self {
            kind: HitKind::EstimatedHorizontalPlane,
            world_transform,
            distance,
            plane_alignment: None,
        }
    }

    /// Creates a candidate on an estimated vertical plane.
    #[must_use]
    pub fn estimated_vertical(world_transform: Mat4, distance: f32) -> Self {
        Self {
            kind: HitKind::EstimatedVerticalPlane,
            world_transform,
            distance,
            plane_alignment: None,
        }
    }

    /// Returns the world position of the intersection.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.world_transform.w_axis.truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_set_contains() {
        assert!(AlignmentSet::ANY.contains(PlaneAlignment::Horizontal));
        assert!(AlignmentSet::ANY.contains(PlaneAlignment::Vertical));
        assert!(!AlignmentSet::HORIZONTAL.contains(PlaneAlignment::Vertical));
        assert!(!AlignmentSet::VERTICAL.contains(PlaneAlignment::Horizontal));
        assert!(AlignmentSet::NONE.is_empty());
        assert_eq!(AlignmentSet::default(), AlignmentSet::NONE);
    }

    #[test]
    fn test_candidate_position() {
        let hit = HitCandidate::estimated_horizontal(
            Mat4::from_translation(Vec3::new(0.5, -1.0, -2.0)),
            2.3,
        );
        assert_eq!(hit.position(), Vec3::new(0.5, -1.0, -2.0));
        assert!(hit.kind.is_estimated());
        assert!(hit.plane_alignment.is_none());
    }
}
