//! arplace: surface-hit resolution and object placement for AR scenes.
//!
//! arplace decides where objects go in a camera-tracked scene. It consumes
//! what an AR framework produces (camera pose, tracking quality, hit-test
//! candidates, plane and image anchors, physics contacts) and answers with
//! placement transforms and scene-graph edits.
//!
//! # Quick Start
//!
//! ```
//! use arplace::headless::{floor_plane, HeadlessScene, HeadlessTracker};
//! use arplace::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut scene = HeadlessScene::new();
//!     let focus = scene.create_node();
//!     let cube = scene.create_node();
//!
//!     let viewport = Vec2::new(400.0, 800.0);
//!     let mut tracker = HeadlessTracker::new(viewport);
//!     tracker.camera_pose = Some(Mat4::from_translation(Vec3::new(0.0, 1.5, 2.0)));
//!
//!     let mut session = Session::new(Options::default(), focus)?;
//!     session.set_viewport(viewport);
//!     session.select_object(ShapeTemplate::new("cube", cube));
//!     session.set_placement_mode(&mut scene, PlacementMode::PlaneAnchored);
//!
//!     // The tracker found the floor
//!     let floor = tracker.detect_plane(Mat4::IDENTITY, floor_plane(Vec2::splat(10.0)));
//!     session.on_anchor_added(&mut scene, &floor);
//!
//!     // Touch the lower half of the screen to drop a cube on the floor
//!     let slot = session.on_touch_began(&tracker, &mut scene, Vec2::new(200.0, 700.0));
//!     session.on_touch_ended();
//!     assert!(slot.is_some());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`resolve`] picks one surface out of a ranked list of hit candidates
//! - [`PlacementEngine`] places, drags, undoes, and collision-removes objects
//! - [`FocusIndicator`] reports whether a surface is ready under the screen center
//! - [`Session`] wires those to UI operations and host callbacks
//!
//! Hosts plug in their AR framework through [`Tracker`] and [`Scene`];
//! [`headless`] has in-memory versions of both.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod headless;
mod session;

pub use session::Session;

// Re-export core types
pub use arplace_core::{
    anchor::{Anchor, AnchorId, AnchorKind, ImageAnchor, PlaneAnchor},
    error::{ArPlaceError, Result},
    focus::{FocusIndicator, FocusState, FOCUS_SEARCHING_OFFSET},
    hit_test::{AlignmentSet, HitCandidate, HitKind, PlaneAlignment},
    options::Options,
    placement::{placement_transform, PlacementEngine, PlacementMode, ShapeTemplate},
    plane_visual::{PlaneVisual, PlaneVisualUniforms, PlaneVisuals},
    registry::{PlacedObject, PlacedObjects, SlotIndex},
    resolver::resolve,
    scene::{CollisionShape, NodeId, Parent, PhysicsBody, Scene},
    state::Context,
    tracking::{LimitedReason, Tracker, TrackingCommand, TrackingQuality},
    transform::{compose_offset, decompose, uniform_scale, FREEFORM_OFFSET},
    Mat4, Quat, Vec2, Vec3,
};

/// Initializes logging from `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored, as is an already
/// installed logger.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::info!("arplace logging initialized");
    }
}
