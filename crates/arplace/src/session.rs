//! The placement session.
//!
//! A [`Session`] is what a host application talks to. The UI layer calls the
//! selection, mode, plane-visibility, undo, and reset operations; the AR
//! framework forwards touches, frame ticks, anchor updates, and physics
//! contacts. Every call runs to completion before returning.
//!
//! # Example
//!
//! ```
//! use arplace::headless::{HeadlessScene, HeadlessTracker};
//! use arplace::*;
//!
//! let mut scene = HeadlessScene::new();
//! let focus_node = scene.create_node();
//! let cube_node = scene.create_node();
//! let tracker = HeadlessTracker::new(Vec2::new(400.0, 800.0));
//!
//! let mut session = Session::new(Options::default(), focus_node)?;
//! session.select_object(ShapeTemplate::new("cube", cube_node));
//! let slot = session.on_touch_began(&tracker, &mut scene, Vec2::new(200.0, 400.0));
//! assert_eq!(slot, Some(SlotIndex(0)));
//! session.on_touch_ended();
//! # Ok::<(), ArPlaceError>(())
//! ```

use arplace_core::{
    Anchor, AnchorId, AnchorKind, Context, FocusState, Mat4, NodeId, Options, PlacementMode,
    Scene, ShapeTemplate, SlotIndex, Tracker, TrackingCommand, Vec2,
};

/// Placement state of one AR session plus the operations that drive it.
#[derive(Debug)]
pub struct Session {
    ctx: Context,
    viewport_warned: bool,
}

impl Session {
    /// Creates a session. `focus_node` is the host node used as the focus indicator.
    pub fn new(options: Options, focus_node: NodeId) -> arplace_core::Result<Self> {
        options.validate()?;
        log::info!("arplace session created");
        Ok(Self {
            ctx: Context::new(options, focus_node),
            viewport_warned: false,
        })
    }

    /// Returns the session state.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Tells the session the viewport size in screen points.
    ///
    /// The focus indicator does not probe for surfaces until this is called
    /// with a positive size.
    pub fn set_viewport(&mut self, size: Vec2) {
        self.ctx.viewport = size;
        self.viewport_warned = false;
    }

    // ========================================================================
    // UI operations
    // ========================================================================

    /// Selects the shape placed by subsequent touches and image anchors.
    pub fn select_object(&mut self, template: ShapeTemplate) {
        log::info!("selected '{}'", template.name);
        self.ctx.selected = Some(template);
    }

    /// Returns the selected shape.
    pub fn selected_object(&self) -> Option<&ShapeTemplate> {
        self.ctx.selected.as_ref()
    }

    /// Returns the current placement mode.
    pub fn placement_mode(&self) -> PlacementMode {
        self.ctx.mode
    }

    /// Switches the placement mode.
    ///
    /// Returns the tracking reconfiguration the host must apply, or `None`
    /// if the mode did not change. Placed objects are left alone.
    pub fn set_placement_mode(
        &mut self,
        scene: &mut dyn Scene,
        mode: PlacementMode,
    ) -> Option<TrackingCommand> {
        if self.ctx.mode == mode {
            return None;
        }
        log::info!("placement mode {:?} -> {:?}", self.ctx.mode, mode);
        self.ctx.mode = mode;
        self.ctx.placement.end_drag();
        if mode != PlacementMode::PlaneAnchored {
            self.ctx.focus.hide(scene);
        }
        Some(TrackingCommand::Reconfigure {
            image_detection: self.ctx.image_detection(),
        })
    }

    /// Shows or hides all plane visuals. Returns the new visibility.
    pub fn toggle_show_planes(&mut self, scene: &mut dyn Scene) -> bool {
        self.ctx.show_planes = !self.ctx.show_planes;
        let show = self.ctx.show_planes;
        for visual in self.ctx.planes.iter_mut() {
            visual.set_visible(show);
            scene.sync_plane_visual(visual);
        }
        log::debug!("plane visuals {}", if show { "shown" } else { "hidden" });
        show
    }

    /// Removes the most recently placed object still in the scene.
    ///
    /// Returns the vacated slot, or `None` if nothing was placed.
    pub fn undo(&mut self, scene: &mut dyn Scene) -> Option<SlotIndex> {
        self.ctx.placement.undo(scene)
    }

    /// Removes every placed object and plane visual and restarts tracking.
    ///
    /// The selected shape and placement mode are kept.
    pub fn reset_scene(&mut self, scene: &mut dyn Scene) -> TrackingCommand {
        let removed = self.ctx.placement.clear(scene);
        for anchor in self.ctx.planes.clear() {
            scene.remove_plane_visual(anchor);
        }
        self.ctx.focus.reset(scene);
        log::info!("scene reset, {} placed objects removed", removed.len());
        TrackingCommand::Reset {
            image_detection: self.ctx.image_detection(),
        }
    }

    // ========================================================================
    // Host callbacks
    // ========================================================================

    /// Handles the start of a touch. A new object is placed if the mode finds a spot.
    pub fn on_touch_began(
        &mut self,
        tracker: &dyn Tracker,
        scene: &mut dyn Scene,
        point: Vec2,
    ) -> Option<SlotIndex> {
        self.ctx.placement.begin_drag();
        self.place_at(tracker, scene, point)
    }

    /// Handles a moving touch by repositioning the object this touch placed.
    ///
    /// If the touch has not placed anything yet, tries to place now.
    pub fn on_touch_moved(
        &mut self,
        tracker: &dyn Tracker,
        scene: &mut dyn Scene,
        point: Vec2,
    ) -> Option<SlotIndex> {
        if !self.ctx.placement.is_dragging() {
            return None;
        }
        self.place_at(tracker, scene, point)
    }

    /// Handles the end of a touch.
    pub fn on_touch_ended(&mut self) {
        self.ctx.placement.end_drag();
    }

    fn place_at(
        &mut self,
        tracker: &dyn Tracker,
        scene: &mut dyn Scene,
        point: Vec2,
    ) -> Option<SlotIndex> {
        let Some(template) = self.ctx.selected.as_ref() else {
            log::warn!("touch ignored: no object selected");
            return None;
        };
        self.ctx
            .placement
            .place(self.ctx.mode, template, tracker, scene, Some(point))
    }

    /// Runs the per-frame update.
    ///
    /// In plane-anchored mode this advances the focus indicator and returns its
    /// state. In other modes the indicator stays hidden and `None` is returned.
    /// Without a viewport the indicator stays in [`FocusState::Initializing`].
    pub fn on_frame(&mut self, tracker: &dyn Tracker, scene: &mut dyn Scene) -> Option<FocusState> {
        if self.ctx.mode != PlacementMode::PlaneAnchored {
            self.ctx.focus.hide(scene);
            return None;
        }
        let center = self.ctx.screen_center();
        if center.is_none() && !self.viewport_warned {
            log::warn!("focus indicator idle: viewport size {} is not set", self.ctx.viewport);
            self.viewport_warned = true;
        }
        let require_normal = self.ctx.options.focus_requires_normal_tracking;
        Some(*self.ctx.focus.update(tracker, scene, center, require_normal))
    }

    /// Handles a newly detected anchor.
    ///
    /// Plane anchors get a visual. Image anchors receive the selected shape
    /// when in image-anchored mode; the new slot is returned.
    pub fn on_anchor_added(&mut self, scene: &mut dyn Scene, anchor: &Anchor) -> Option<SlotIndex> {
        match &anchor.kind {
            AnchorKind::Plane(_) => {
                self.sync_plane(scene, anchor);
                None
            }
            AnchorKind::Image(image) => {
                if self.ctx.mode != PlacementMode::ImageAnchored {
                    log::debug!("image '{}' detected outside image mode", image.name);
                    return None;
                }
                let Some(template) = self.ctx.selected.as_ref() else {
                    log::warn!("image '{}' detected but no object selected", image.name);
                    return None;
                };
                Some(self.ctx.placement.place_on_anchor(template, scene, anchor.id))
            }
        }
    }

    /// Handles an anchor update by re-syncing its plane visual.
    pub fn on_anchor_updated(&mut self, scene: &mut dyn Scene, anchor: &Anchor) {
        match &anchor.kind {
            AnchorKind::Plane(_) => self.sync_plane(scene, anchor),
            AnchorKind::Image(_) => {}
        }
    }

    /// Handles a removed anchor by dropping its plane visual.
    pub fn on_anchor_removed(&mut self, scene: &mut dyn Scene, anchor: AnchorId) {
        if self.ctx.planes.remove(anchor).is_some() {
            scene.remove_plane_visual(anchor);
        }
    }

    fn sync_plane(&mut self, scene: &mut dyn Scene, anchor: &Anchor) {
        let AnchorKind::Plane(plane) = &anchor.kind else {
            return;
        };
        self.ctx.planes.upsert(anchor.id, anchor.transform, plane);
        let (show, color, opacity) = (
            self.ctx.show_planes,
            self.ctx.options.plane_color,
            self.ctx.options.plane_opacity,
        );
        if let Some(visual) = self.ctx.planes.get_mut(anchor.id) {
            visual.set_visible(show);
            visual.set_color(color);
            visual.set_opacity(opacity);
            scene.sync_plane_visual(visual);
        }
    }

    /// Handles a contact between the objects in two slots.
    ///
    /// The object in the higher slot is removed; the returned slot is `None` if
    /// it had already been removed.
    ///
    /// # Panics
    ///
    /// Panics if either slot was never assigned. That means the physics world
    /// refers to objects this session never placed.
    pub fn on_contact(&mut self, scene: &mut dyn Scene, a: SlotIndex, b: SlotIndex) -> Option<SlotIndex> {
        self.ctx
            .placement
            .remove_contact(scene, a, b)
            .unwrap_or_else(|err| panic!("placed-object registry out of sync: {err}"))
    }

    /// Handles a contact reported by scene node.
    ///
    /// Contacts involving nodes that are not (or no longer) placed objects are ignored.
    pub fn on_node_contact(&mut self, scene: &mut dyn Scene, a: NodeId, b: NodeId) -> Option<SlotIndex> {
        let objects = self.ctx.placement.objects();
        let (Some(a), Some(b)) = (objects.slot_of(a), objects.slot_of(b)) else {
            log::debug!("contact between {a:?} and {b:?} ignored");
            return None;
        };
        self.on_contact(scene, a, b)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns the slot and transform of every placed object, in slot order.
    pub fn placed_transforms(&self) -> Vec<(SlotIndex, Mat4)> {
        self.ctx
            .placement
            .objects()
            .iter()
            .map(|object| (object.index, object.transform))
            .collect()
    }

    /// Returns the number of objects currently placed.
    pub fn placed_count(&self) -> usize {
        self.ctx.placement.objects().occupied()
    }
}
