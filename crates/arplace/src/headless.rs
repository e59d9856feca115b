//! In-memory tracking and scene backends.
//!
//! [`HeadlessTracker`] answers hit tests by casting a pinhole-camera ray
//! against the planes it has been told about. [`HeadlessScene`] records what
//! the session does to the scene graph. Together they drive integration tests
//! and the demo without an AR framework or a GPU.

use std::collections::BTreeMap;

use arplace_core::{
    Anchor, AnchorId, HitCandidate, HitKind, ImageAnchor, Mat4, NodeId, Parent, PhysicsBody,
    PlaneAlignment, PlaneAnchor, PlaneVisual, PlaneVisualUniforms, Scene, Tracker, TrackingQuality, Vec2, Vec3,
};

/// A scripted tracker with a pinhole camera and a set of planes.
#[derive(Debug, Clone)]
pub struct HeadlessTracker {
    /// Camera pose, `None` while "not converged".
    pub camera_pose: Option<Mat4>,
    /// Reported tracking quality.
    pub quality: TrackingQuality,
    /// Viewport size in screen points.
    pub viewport: Vec2,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Height of an estimated, unbounded floor plane.
    pub estimated_floor: Option<f32>,
    /// Origin and normal of an estimated, unbounded wall plane.
    pub estimated_wall: Option<(Vec3, Vec3)>,
    planes: BTreeMap<AnchorId, (Mat4, PlaneAnchor)>,
    next_anchor: u64,
}

impl HeadlessTracker {
    /// Creates a tracker at the origin looking down -Z with normal tracking.
    pub fn new(viewport: Vec2) -> Self {
        Self {
            camera_pose: Some(Mat4::IDENTITY),
            quality: TrackingQuality::Normal,
            viewport,
            fov_y: 60f32.to_radians(),
            estimated_floor: None,
            estimated_wall: None,
            planes: BTreeMap::new(),
            next_anchor: 0,
        }
    }

    fn next_id(&mut self) -> AnchorId {
        self.next_anchor += 1;
        AnchorId(self.next_anchor)
    }

    /// Detects a plane and returns the anchor to report to the session.
    pub fn detect_plane(&mut self, transform: Mat4, plane: PlaneAnchor) -> Anchor {
        let id = self.next_id();
        self.planes.insert(id, (transform, plane));
        Anchor::plane(id, transform, plane)
    }

    /// Grows or moves a detected plane and returns the updated anchor.
    pub fn update_plane(&mut self, id: AnchorId, transform: Mat4, plane: PlaneAnchor) -> Anchor {
        self.planes.insert(id, (transform, plane));
        Anchor::plane(id, transform, plane)
    }

    /// Forgets a detected plane.
    pub fn remove_plane(&mut self, id: AnchorId) {
        self.planes.remove(&id);
    }

    /// Recognizes a reference image and returns its anchor.
    pub fn detect_image(&mut self, transform: Mat4, name: impl Into<String>, physical_size: Vec2) -> Anchor {
        let id = self.next_id();
        Anchor::image(
            id,
            transform,
            ImageAnchor {
                name: name.into(),
                physical_size,
            },
        )
    }

    /// Forgets all planes, as a tracking reset would.
    pub fn reset(&mut self) {
        self.planes.clear();
    }

    /// Casts a ray from the camera through a screen point.
    ///
    /// Screen coordinates have their origin at the top-left corner.
    pub fn screen_ray(&self, point: Vec2) -> Option<(Vec3, Vec3)> {
        let pose = self.camera_pose?;
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }

        let half = self.viewport * 0.5;
        let ndc_x = (point.x / half.x) - 1.0;
        let ndc_y = 1.0 - (point.y / half.y);
        let tan_half = (self.fov_y * 0.5).tan();
        let aspect = self.viewport.x / self.viewport.y;

        let local_dir = Vec3::new(ndc_x * tan_half * aspect, ndc_y * tan_half, -1.0);
        let origin = pose.w_axis.truncate();
        let dir = pose.transform_vector3(local_dir).normalize_or_zero();
        if dir.length_squared() < 1e-12 {
            return None;
        }
        Some((origin, dir))
    }
}

/// Distance along the ray to an unbounded plane, if it is hit in front of the origin.
fn ray_plane(origin: Vec3, dir: Vec3, plane_origin: Vec3, normal: Vec3) -> Option<f32> {
    let denom = normal.dot(dir);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (plane_origin - origin).dot(normal) / denom;
    if t > 0.0 {
        Some(t)
    } else {
        None
    }
}

impl Tracker for HeadlessTracker {
    fn camera_pose(&self) -> Option<Mat4> {
        self.camera_pose
    }

    fn tracking_quality(&self) -> TrackingQuality {
        self.quality
    }

    fn hit_test(&self, point: Vec2, kinds: &[HitKind]) -> Vec<HitCandidate> {
        let Some((origin, dir)) = self.screen_ray(point) else {
            return Vec::new();
        };

        let mut existing = Vec::new();
        if kinds.contains(&HitKind::ExistingPlaneGeometry) {
            for (transform, plane) in self.planes.values() {
                // Planes lie in the anchor's local XZ plane
                let normal = transform.transform_vector3(Vec3::Y).normalize();
                let plane_origin = transform.w_axis.truncate();
                let Some(t) = ray_plane(origin, dir, plane_origin, normal) else {
                    continue;
                };
                let hit = origin + dir * t;
                let local = transform.inverse().transform_point3(hit) - plane.center;
                if local.x.abs() <= plane.extent.x * 0.5 && local.z.abs() <= plane.extent.y * 0.5 {
                    let (_, rotation, _) = transform.to_scale_rotation_translation();
                    existing.push(HitCandidate::existing(
                        Mat4::from_rotation_translation(rotation, hit),
                        t,
                        plane.alignment,
                    ));
                }
            }
        }

        let mut estimated = Vec::new();
        if kinds.contains(&HitKind::EstimatedHorizontalPlane) {
            if let Some(height) = self.estimated_floor {
                if let Some(t) = ray_plane(origin, dir, Vec3::new(0.0, height, 0.0), Vec3::Y) {
                    let hit = origin + dir * t;
                    estimated.push(HitCandidate::estimated_horizontal(Mat4::from_translation(hit), t));
                }
            }
        }
        if kinds.contains(&HitKind::EstimatedVerticalPlane) {
            if let Some((wall_origin, normal)) = self.estimated_wall {
                if let Some(t) = ray_plane(origin, dir, wall_origin, normal.normalize()) {
                    let hit = origin + dir * t;
                    estimated.push(HitCandidate::estimated_vertical(Mat4::from_translation(hit), t));
                }
            }
        }

        existing.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        estimated.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        existing.extend(estimated);
        existing
    }
}

/// A node recorded by [`HeadlessScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessNode {
    /// Node this one was cloned from.
    pub template: Option<NodeId>,
    /// Current parent, `None` when detached.
    pub parent: Option<Parent>,
    /// Transform relative to the parent.
    pub transform: Mat4,
    /// Visibility flag.
    pub visible: bool,
    /// Physics body, if one was attached.
    pub body: Option<PhysicsBody>,
}

impl Default for HeadlessNode {
    fn default() -> Self {
        Self {
            template: None,
            parent: None,
            transform: Mat4::IDENTITY,
            visible: true,
            body: None,
        }
    }
}

/// A scene graph that only records state.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    nodes: BTreeMap<NodeId, HeadlessNode>,
    plane_visuals: BTreeMap<AnchorId, PlaneVisual>,
    /// Uniform bytes as a renderer would upload them.
    plane_uniforms: BTreeMap<AnchorId, Vec<u8>>,
    next_node: u64,
}

impl HeadlessScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached node, e.g. a template or the focus indicator.
    pub fn create_node(&mut self) -> NodeId {
        self.next_node += 1;
        let id = NodeId(self.next_node);
        self.nodes.insert(id, HeadlessNode::default());
        id
    }

    /// Gets a node.
    pub fn node(&self, id: NodeId) -> Option<&HeadlessNode> {
        self.nodes.get(&id)
    }

    /// Iterates over nodes that are currently attached.
    pub fn attached_nodes(&self) -> impl Iterator<Item = (NodeId, &HeadlessNode)> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.parent.is_some())
            .map(|(id, node)| (*id, node))
    }

    /// Gets the synced visual for a plane anchor.
    pub fn plane_visual(&self, anchor: AnchorId) -> Option<&PlaneVisual> {
        self.plane_visuals.get(&anchor)
    }

    /// Decodes the uniform buffer last uploaded for a plane anchor.
    pub fn plane_uniforms(&self, anchor: AnchorId) -> Option<PlaneVisualUniforms> {
        self.plane_uniforms
            .get(&anchor)
            .map(|bytes| bytemuck::pod_read_unaligned(bytes))
    }

    /// Returns the number of plane visuals in the scene.
    pub fn plane_visual_count(&self) -> usize {
        self.plane_visuals.len()
    }

    /// Finds pairs of root-attached physics bodies closer than `radius`.
    ///
    /// Each pair is reported once, lower node first, mimicking a physics
    /// world's contact callback.
    pub fn contacts(&self, radius: f32) -> Vec<(NodeId, NodeId)> {
        let bodies: Vec<(NodeId, Vec3)> = self
            .attached_nodes()
            .filter(|(_, node)| node.parent == Some(Parent::Root) && node.body.is_some())
            .map(|(id, node)| (id, node.transform.w_axis.truncate()))
            .collect();

        let mut pairs = Vec::new();
        for (i, (a, pa)) in bodies.iter().enumerate() {
            for (b, pb) in &bodies[i + 1..] {
                if pa.distance(*pb) < radius {
                    pairs.push((*a, *b));
                }
            }
        }
        pairs
    }

    fn node_mut(&mut self, id: NodeId) -> &mut HeadlessNode {
        self.nodes.entry(id).or_default()
    }
}

impl Scene for HeadlessScene {
    fn clone_node(&mut self, template: NodeId) -> NodeId {
        let id = self.create_node();
        self.node_mut(id).template = Some(template);
        id
    }

    fn attach(&mut self, node: NodeId, parent: Parent) {
        self.node_mut(node).parent = Some(parent);
    }

    fn detach(&mut self, node: NodeId) {
        self.node_mut(node).parent = None;
    }

    fn set_transform(&mut self, node: NodeId, transform: Mat4) {
        self.node_mut(node).transform = transform;
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        self.node_mut(node).visible = visible;
    }

    fn attach_physics_body(&mut self, node: NodeId, body: PhysicsBody) {
        self.node_mut(node).body = Some(body);
    }

    fn sync_plane_visual(&mut self, visual: &PlaneVisual) {
        let uniforms = PlaneVisualUniforms::from(visual);
        self.plane_uniforms
            .insert(visual.anchor(), bytemuck::bytes_of(&uniforms).to_vec());
        self.plane_visuals.insert(visual.anchor(), visual.clone());
    }

    fn remove_plane_visual(&mut self, anchor: AnchorId) {
        self.plane_visuals.remove(&anchor);
        self.plane_uniforms.remove(&anchor);
    }
}

/// A horizontal plane anchor of the given size centered on its anchor.
pub fn floor_plane(extent: Vec2) -> PlaneAnchor {
    PlaneAnchor {
        center: Vec3::ZERO,
        extent,
        alignment: PlaneAlignment::Horizontal,
    }
}
