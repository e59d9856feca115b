//! Placement engine.
//!
//! Turns a touch (or the camera's forward ray) into a placement transform,
//! and keeps the scene, the physics world, and the slot registry in step
//! when objects are placed, dragged, undone, or removed by collisions.

use glam::{Mat4, Vec2};

use crate::anchor::AnchorId;
use crate::error::Result;
use crate::hit_test::{AlignmentSet, HitKind};
use crate::registry::{PlacedObject, PlacedObjects, SlotIndex};
use crate::resolver::resolve;
use crate::scene::{CollisionShape, NodeId, Parent, PhysicsBody, Scene};
use crate::tracking::Tracker;
use crate::transform::{compose_offset, translation_only};

/// How touches place objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementMode {
    /// In front of the camera, ignoring surfaces.
    #[default]
    Freeform,
    /// On tracked plane geometry under the touch.
    PlaneAnchored,
    /// On recognized reference images; touches are ignored.
    ImageAnchored,
}

impl PlacementMode {
    /// Returns whether tracking must run reference-image detection in this mode.
    #[must_use]
    pub fn needs_image_detection(self) -> bool {
        matches!(self, PlacementMode::ImageAnchored)
    }
}

/// A shape the user can select and place.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeTemplate {
    /// Display name.
    pub name: String,
    /// Template node that placed objects are cloned from.
    pub node: NodeId,
    /// Plane alignments the shape may be placed on.
    pub allowed_alignments: AlignmentSet,
    /// Collision shape approximation.
    pub collision: CollisionShape,
}

impl ShapeTemplate {
    /// Creates a template placeable on any plane with a geometry collision shape.
    pub fn new(name: impl Into<String>, node: NodeId) -> Self {
        Self {
            name: name.into(),
            node,
            allowed_alignments: AlignmentSet::ANY,
            collision: CollisionShape::Geometry,
        }
    }

    /// Sets the allowed plane alignments.
    #[must_use]
    pub fn with_alignments(mut self, alignments: AlignmentSet) -> Self {
        self.allowed_alignments = alignments;
        self
    }

    /// Sets the collision shape approximation.
    #[must_use]
    pub fn with_collision(mut self, collision: CollisionShape) -> Self {
        self.collision = collision;
        self
    }
}

/// Computes where a touch would place an object, without touching the scene.
///
/// - Freeform: `freeform_offset` along the camera's Z axis; nothing without a camera pose.
/// - Plane anchored: the translation of the resolved existing-geometry hit under
///   `point`; nothing without a point or a hit.
/// - Image anchored: always nothing, placement is driven by anchor callbacks.
pub fn placement_transform(
    mode: PlacementMode,
    tracker: &dyn Tracker,
    point: Option<Vec2>,
    allowed: AlignmentSet,
    freeform_offset: f32,
) -> Option<Mat4> {
    match mode {
        PlacementMode::Freeform => tracker
            .camera_pose()
            .map(|pose| compose_offset(pose, freeform_offset)),
        PlacementMode::PlaneAnchored => {
            let hits = tracker.hit_test(point?, &[HitKind::ExistingPlaneGeometry]);
            resolve(&hits, allowed).map(|hit| translation_only(hit.world_transform))
        }
        PlacementMode::ImageAnchored => None,
    }
}

/// Owns the placed objects and the state of an ongoing drag.
#[derive(Debug)]
pub struct PlacementEngine {
    objects: PlacedObjects,
    /// `Some` while a touch is down; holds the slot created by that touch, once any.
    drag: Option<Option<SlotIndex>>,
    freeform_offset: f32,
    collision_category: u32,
}

impl PlacementEngine {
    /// Creates an engine with an empty registry.
    pub fn new(freeform_offset: f32, collision_category: u32) -> Self {
        Self {
            objects: PlacedObjects::new(),
            drag: None,
            freeform_offset,
            collision_category,
        }
    }

    /// Returns the placed-object registry.
    pub fn objects(&self) -> &PlacedObjects {
        &self.objects
    }

    /// Returns whether a touch is currently down.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Starts a new drag. The next placement spawns a fresh object.
    pub fn begin_drag(&mut self) {
        self.drag = Some(None);
    }

    /// Ends the current drag. Objects already placed stay where they are.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Places `template` for a touch at `point`, or moves the object this drag created.
    ///
    /// Returns the slot that was placed or moved, or `None` when the mode found
    /// nowhere to put the object, or the drag's object has since been removed.
    pub fn place(
        &mut self,
        mode: PlacementMode,
        template: &ShapeTemplate,
        tracker: &dyn Tracker,
        scene: &mut dyn Scene,
        point: Option<Vec2>,
    ) -> Option<SlotIndex> {
        let transform = placement_transform(
            mode,
            tracker,
            point,
            template.allowed_alignments,
            self.freeform_offset,
        )?;

        match self.drag {
            Some(Some(index)) => {
                let object = self.objects.get(index)?;
                scene.set_transform(object.node, transform);
                self.objects.set_transform(index, transform);
                log::debug!("moved slot {} to {:?}", index.0, transform.w_axis.truncate());
                Some(index)
            }
            _ => {
                let index = self.spawn(template, scene, transform, Parent::Root);
                if let Some(drag) = self.drag.as_mut() {
                    *drag = Some(index);
                }
                Some(index)
            }
        }
    }

    /// Places `template` on an image anchor, at the anchor's origin.
    pub fn place_on_anchor(
        &mut self,
        template: &ShapeTemplate,
        scene: &mut dyn Scene,
        anchor: AnchorId,
    ) -> SlotIndex {
        self.spawn(template, scene, Mat4::IDENTITY, Parent::Anchor(anchor))
    }

    fn spawn(
        &mut self,
        template: &ShapeTemplate,
        scene: &mut dyn Scene,
        transform: Mat4,
        parent: Parent,
    ) -> SlotIndex {
        let node = scene.clone_node(template.node);
        scene.set_transform(node, transform);
        scene.attach_physics_body(
            node,
            PhysicsBody::placed_object(template.collision, self.collision_category),
        );
        scene.attach(node, parent);
        let index = self.objects.insert(node, template.node, transform, parent);
        log::info!("placed '{}' in slot {} under {:?}", template.name, index.0, parent);
        index
    }

    /// Removes the most recently placed object that is still in the scene.
    pub fn undo(&mut self, scene: &mut dyn Scene) -> Option<SlotIndex> {
        let object = self.objects.remove_last()?;
        scene.detach(object.node);
        log::info!("undo removed slot {}", object.index.0);
        Some(object.index)
    }

    /// Handles a contact between two placed objects by removing the one in the higher slot.
    ///
    /// Returns the removed slot, or `Ok(None)` if it was already gone.
    pub fn remove_contact(
        &mut self,
        scene: &mut dyn Scene,
        a: SlotIndex,
        b: SlotIndex,
    ) -> Result<Option<SlotIndex>> {
        let removed = self.objects.remove_contact(a, b)?;
        Ok(removed.map(|object| {
            scene.detach(object.node);
            log::info!(
                "contact between slots {} and {} removed slot {}",
                a.0,
                b.0,
                object.index.0
            );
            object.index
        }))
    }

    /// Detaches every placed object and empties the registry.
    pub fn clear(&mut self, scene: &mut dyn Scene) -> Vec<PlacedObject> {
        self.drag = None;
        let removed = self.objects.clear();
        for object in &removed {
            scene.detach(object.node);
        }
        removed
    }
}
