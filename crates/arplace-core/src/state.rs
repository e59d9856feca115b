//! Application state shared by the placement components.
//!
//! One [`Context`] holds everything the UI layer can change (selected shape,
//! placement mode, plane visibility) together with the registries those
//! choices act on. It is owned by the session and passed down explicitly.

use glam::Vec2;

use crate::focus::FocusIndicator;
use crate::options::Options;
use crate::placement::{PlacementEngine, PlacementMode, ShapeTemplate};
use crate::plane_visual::PlaneVisuals;
use crate::scene::NodeId;

/// All placement state for one AR session.
#[derive(Debug)]
pub struct Context {
    /// Session options.
    pub options: Options,

    /// Current placement mode.
    pub mode: PlacementMode,

    /// Shape placed by the next touch or image anchor.
    pub selected: Option<ShapeTemplate>,

    /// Whether plane visuals are drawn.
    pub show_planes: bool,

    /// Placed objects and drag state.
    pub placement: PlacementEngine,

    /// One visual per detected plane.
    pub planes: PlaneVisuals,

    /// The focus indicator.
    pub focus: FocusIndicator,

    /// Size of the viewport in screen points.
    pub viewport: Vec2,
}

impl Context {
    /// Creates a context with an empty scene.
    pub fn new(options: Options, focus_node: NodeId) -> Self {
        Self {
            mode: PlacementMode::default(),
            selected: None,
            show_planes: options.show_planes,
            placement: PlacementEngine::new(options.freeform_offset, options.collision_category),
            planes: PlaneVisuals::new(),
            focus: FocusIndicator::new(focus_node, options.focus_offset),
            viewport: Vec2::ZERO,
            options,
        }
    }

    /// Center of the viewport, where the focus indicator probes for surfaces.
    ///
    /// `None` until the host reports a viewport with a positive size.
    pub fn screen_center(&self) -> Option<Vec2> {
        (self.viewport.x > 0.0 && self.viewport.y > 0.0).then(|| self.viewport * 0.5)
    }

    /// Whether tracking should run reference-image detection.
    pub fn image_detection(&self) -> bool {
        self.mode.needs_image_detection()
    }
}
