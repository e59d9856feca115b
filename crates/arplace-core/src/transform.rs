//! Transform utilities for placement.
//!
//! Transforms are plain [`Mat4`] values. These helpers split them into
//! translation and orientation, build scale-only matrices, and push a point
//! out along a camera's viewing axis.

use glam::{Mat4, Quat, Vec3};

/// Distance in front of the camera used for freeform placement.
///
/// Negative because the camera looks down its local -Z axis.
pub const FREEFORM_OFFSET: f32 = -0.2;

/// Splits a transform into its translation and orientation.
///
/// The orientation is taken from the upper 3x3 block with scale divided out.
/// Scale-only, zero-scale, or otherwise degenerate matrices yield
/// [`Quat::IDENTITY`] rather than a non-finite quaternion.
#[must_use]
pub fn decompose(transform: Mat4) -> (Vec3, Quat) {
    let translation = transform.w_axis.truncate();
    let (scale, rotation, _) = transform.to_scale_rotation_translation();

    let orientation = if scale.cmpeq(Vec3::ZERO).any() || !rotation.is_finite() {
        Quat::IDENTITY
    } else {
        rotation.normalize()
    };

    (translation, orientation)
}

/// Builds a transform `forward_offset` units along the local Z axis of `camera_pose`.
///
/// The offset is applied in the camera's frame and then carried into world
/// space, so the result always sits along the camera's current facing.
#[must_use]
pub fn compose_offset(camera_pose: Mat4, forward_offset: f32) -> Mat4 {
    let local = Mat4::from_translation(Vec3::new(0.0, 0.0, forward_offset));
    camera_pose * local
}

/// Builds a diagonal scale-only transform.
#[must_use]
pub fn uniform_scale(factor: f32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(factor))
}

/// Keeps only the translation of a transform.
///
/// Plane placement uses this so objects stay upright regardless of how the
/// surface hit is oriented.
#[must_use]
pub fn translation_only(transform: Mat4) -> Mat4 {
    Mat4::from_translation(transform.w_axis.truncate())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_offset_identity_camera() {
        let t = compose_offset(Mat4::IDENTITY, FREEFORM_OFFSET);
        let (translation, orientation) = decompose(t);
        assert!((translation - Vec3::new(0.0, 0.0, -0.2)).length() < 1e-6);
        assert!(orientation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn test_compose_offset_follows_camera_facing() {
        // Camera at (1, 2, 3) turned 90 degrees to the left around +Y.
        let camera = Mat4::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let t = compose_offset(camera, -1.0);
        let (translation, _) = decompose(t);
        // Local -Z rotated by +90 degrees about Y points along world -X.
        assert!((translation - Vec3::new(0.0, 2.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_decompose_uniform_scale() {
        let (translation, orientation) = decompose(uniform_scale(2.0));
        assert_eq!(translation, Vec3::ZERO);
        assert!(orientation.is_finite());
        assert!(orientation.is_normalized());
        assert!(orientation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn test_decompose_zero_scale_is_defined() {
        let (translation, orientation) = decompose(uniform_scale(0.0));
        assert_eq!(translation, Vec3::ZERO);
        assert_eq!(orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_decompose_rotation_roundtrip() {
        let rotation = Quat::from_rotation_x(0.7) * Quat::from_rotation_z(-0.3);
        let m = Mat4::from_scale_rotation_translation(Vec3::splat(1.5), rotation, Vec3::X);
        let (translation, orientation) = decompose(m);
        assert!((translation - Vec3::X).length() < 1e-6);
        // q and -q describe the same rotation
        assert!(orientation.dot(rotation).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn test_translation_only() {
        let m = Mat4::from_rotation_translation(Quat::from_rotation_y(1.0), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(translation_only(m), Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0)));
    }
}
