//! Interface to the external scene graph and physics world.

use glam::Mat4;

use crate::anchor::AnchorId;
use crate::plane_visual::PlaneVisual;

/// Handle to a node in the host's scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Where a node hangs in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// The scene root (world space).
    Root,
    /// The camera node; children stay fixed relative to the view.
    Camera,
    /// The node the host keeps for an anchor.
    Anchor(AnchorId),
}

/// How a placed object's collision shape is approximated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionShape {
    /// A shape built from the node's own geometry.
    #[default]
    Geometry,
    /// The node's bounding box.
    BoundingBox,
}

/// Physics body attached to every placed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    /// Shape approximation.
    pub shape: CollisionShape,
    /// Whether gravity acts on the body.
    pub affected_by_gravity: bool,
    /// Category bits of this body.
    pub category_mask: u32,
    /// Categories this body reports contacts with.
    pub contact_mask: u32,
}

impl PhysicsBody {
    /// A gravity-free body that reports contacts with its own category.
    #[must_use]
    pub fn placed_object(shape: CollisionShape, category: u32) -> Self {
        Self {
            shape,
            affected_by_gravity: false,
            category_mask: category,
            contact_mask: category,
        }
    }
}

/// Scene graph and physics operations the engine needs from its host.
pub trait Scene {
    /// Clones a template node and returns the new node.
    fn clone_node(&mut self, template: NodeId) -> NodeId;

    /// Attaches a node under the given parent, detaching it from any previous parent.
    fn attach(&mut self, node: NodeId, parent: Parent);

    /// Detaches a node from the scene.
    fn detach(&mut self, node: NodeId);

    /// Sets a node's transform relative to its parent.
    fn set_transform(&mut self, node: NodeId, transform: Mat4);

    /// Shows or hides a node.
    fn set_visible(&mut self, node: NodeId, visible: bool);

    /// Attaches a physics body to a node.
    fn attach_physics_body(&mut self, node: NodeId, body: PhysicsBody);

    /// Creates or updates the node that draws a plane visual.
    fn sync_plane_visual(&mut self, visual: &PlaneVisual);

    /// Removes the node that draws the visual for a plane anchor.
    fn remove_plane_visual(&mut self, anchor: AnchorId);
}
