//! Interface to the external tracking system.
//!
//! arplace does not track anything itself. A host wires its AR framework up
//! through the [`Tracker`] trait and acts on the [`TrackingCommand`]s the
//! session hands back.

use glam::{Mat4, Vec2};

use crate::hit_test::{HitCandidate, HitKind};

/// Why tracking is currently limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitedReason {
    /// The session has just started.
    Initializing,
    /// The device is moving too fast.
    ExcessiveMotion,
    /// The camera sees too little texture.
    InsufficientFeatures,
    /// Tracking is recovering after an interruption.
    Relocalizing,
}

/// Camera tracking quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingQuality {
    /// Tracking is not available.
    NotAvailable,
    /// Tracking works but results may be unreliable.
    Limited(LimitedReason),
    /// Tracking is reliable.
    Normal,
}

impl TrackingQuality {
    /// Returns true when tracking is reliable.
    #[must_use]
    pub fn is_normal(self) -> bool {
        matches!(self, TrackingQuality::Normal)
    }
}

/// Source of camera pose and hit-test results.
pub trait Tracker {
    /// Current camera pose, or `None` until tracking has converged.
    fn camera_pose(&self) -> Option<Mat4>;

    /// Current tracking quality.
    fn tracking_quality(&self) -> TrackingQuality;

    /// Projects a screen point into the scene.
    ///
    /// Only candidates whose kind is in `kinds` are returned. The order is the
    /// tracker's priority order.
    fn hit_test(&self, point: Vec2, kinds: &[HitKind]) -> Vec<HitCandidate>;
}

/// Instruction for the host to (re)configure its tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingCommand {
    /// Re-run the current session with new options, keeping anchors.
    Reconfigure {
        /// Whether reference-image detection should be enabled.
        image_detection: bool,
    },
    /// Restart tracking from scratch, discarding all anchors.
    Reset {
        /// Whether reference-image detection should be enabled.
        image_detection: bool,
    },
}
