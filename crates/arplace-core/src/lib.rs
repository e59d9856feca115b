//! Core engine for arplace.
//!
//! This crate turns screen touches and camera poses into placement transforms
//! for an augmented-reality scene:
//! - [`resolve`] picks the best surface out of a ranked list of hit-test candidates
//! - [`PlacementEngine`] places, drags, undoes, and collision-removes objects
//! - [`FocusIndicator`] tracks whether a surface is ready under the screen center
//! - [`Context`] holds the per-session state the UI layer acts on
//!
//! Tracking, rendering, and physics stay outside; they are reached through the
//! [`Tracker`] and [`Scene`] traits.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Accessors and constructors don't need must_use
#![allow(clippy::must_use_candidate)]
// Option<Option<_>> drag state is intentional
#![allow(clippy::option_option)]

pub mod anchor;
pub mod error;
pub mod focus;
pub mod hit_test;
pub mod options;
pub mod placement;
pub mod plane_visual;
pub mod registry;
pub mod resolver;
pub mod scene;
pub mod state;
pub mod tracking;
pub mod transform;

pub use anchor::{Anchor, AnchorId, AnchorKind, ImageAnchor, PlaneAnchor};
pub use error::{ArPlaceError, Result};
pub use focus::{FocusIndicator, FocusState, FOCUS_SEARCHING_OFFSET};
pub use hit_test::{AlignmentSet, HitCandidate, HitKind, PlaneAlignment};
pub use options::Options;
pub use placement::{placement_transform, PlacementEngine, PlacementMode, ShapeTemplate};
pub use plane_visual::{PlaneVisual, PlaneVisualUniforms, PlaneVisuals};
pub use registry::{PlacedObject, PlacedObjects, SlotIndex};
pub use resolver::resolve;
pub use scene::{CollisionShape, NodeId, Parent, PhysicsBody, Scene};
pub use state::Context;
pub use tracking::{LimitedReason, Tracker, TrackingCommand, TrackingQuality};
pub use transform::{compose_offset, decompose, uniform_scale, FREEFORM_OFFSET};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};
