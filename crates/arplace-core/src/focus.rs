//! Focus indicator state machine.
//!
//! The focus indicator marks where an object would land if the user touched
//! the center of the screen now. While no reliable surface is found it hangs
//! off the camera ("searching"); once one is found it moves into the world
//! onto that surface.

use glam::{Mat4, Quat, Vec2};

use crate::hit_test::{AlignmentSet, HitCandidate, HitKind};
use crate::resolver::resolve;
use crate::scene::{NodeId, Parent, Scene};
use crate::tracking::Tracker;
use crate::transform::compose_offset;

/// Default standoff of the searching indicator along the camera's Z axis.
pub const FOCUS_SEARCHING_OFFSET: f32 = -0.5;

/// Current state of the focus indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusState {
    /// No reliable surface under the screen center.
    Initializing,
    /// A surface was found.
    Detecting {
        /// The resolved hit under the screen center.
        hit: HitCandidate,
        /// Camera pose at the time of the hit.
        camera_pose: Mat4,
    },
}

/// The on-screen marker and its state.
#[derive(Debug)]
pub struct FocusIndicator {
    node: NodeId,
    state: FocusState,
    parent: Option<Parent>,
    visible: bool,
    searching_offset: f32,
}

impl FocusIndicator {
    /// Creates an indicator driving the given scene node.
    ///
    /// While searching, the node sits `searching_offset` along the camera's Z axis.
    pub fn new(node: NodeId, searching_offset: f32) -> Self {
        Self {
            node,
            state: FocusState::Initializing,
            parent: None,
            visible: false,
            searching_offset,
        }
    }

    /// Returns the indicator's scene node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Returns the current state.
    pub fn state(&self) -> &FocusState {
        &self.state
    }

    /// Returns where the node is currently attached.
    pub fn parent(&self) -> Option<Parent> {
        self.parent
    }

    /// Returns whether the node is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hides the node. The state is kept until the next update.
    pub fn hide(&mut self, scene: &mut dyn Scene) {
        if self.visible {
            scene.set_visible(self.node, false);
            self.visible = false;
        }
    }

    /// Forgets the current state and detaches the node.
    pub fn reset(&mut self, scene: &mut dyn Scene) {
        self.hide(scene);
        if self.parent.take().is_some() {
            scene.detach(self.node);
        }
        self.state = FocusState::Initializing;
    }

    /// Runs one tick of the state machine.
    ///
    /// With normal tracking (unless `require_normal_tracking` is false), a
    /// camera pose, and a resolved hit at `screen_center`, the indicator
    /// enters [`FocusState::Detecting`] under the scene root. Anything else,
    /// including an unknown screen center, puts it back into
    /// [`FocusState::Initializing`] under the camera.
    pub fn update(
        &mut self,
        tracker: &dyn Tracker,
        scene: &mut dyn Scene,
        screen_center: Option<Vec2>,
        require_normal_tracking: bool,
    ) -> &FocusState {
        let tracking_ok = !require_normal_tracking || tracker.tracking_quality().is_normal();
        let detected = match screen_center {
            Some(center) if tracking_ok => tracker.camera_pose().and_then(|camera_pose| {
                let hits = tracker.hit_test(center, &HitKind::ALL);
                resolve(&hits, AlignmentSet::ANY).map(|hit| (hit, camera_pose))
            }),
            _ => None,
        };

        let next = match detected {
            Some((hit, camera_pose)) => FocusState::Detecting { hit, camera_pose },
            None => FocusState::Initializing,
        };
        if std::mem::discriminant(&next) != std::mem::discriminant(&self.state) {
            log::debug!("focus indicator: {} -> {}", kind(&self.state), kind(&next));
        }
        self.state = next;

        let (parent, transform) = match &self.state {
            FocusState::Detecting { hit, camera_pose } => {
                (Parent::Root, facing_camera(hit.world_transform, *camera_pose))
            }
            FocusState::Initializing => (
                Parent::Camera,
                compose_offset(Mat4::IDENTITY, self.searching_offset),
            ),
        };
        if self.parent != Some(parent) {
            scene.attach(self.node, parent);
            self.parent = Some(parent);
        }
        scene.set_transform(self.node, transform);
        if !self.visible {
            scene.set_visible(self.node, true);
            self.visible = true;
        }

        &self.state
    }
}

fn kind(state: &FocusState) -> &'static str {
    match state {
        FocusState::Initializing => "initializing",
        FocusState::Detecting { .. } => "detecting",
    }
}

/// Positions the marker at the hit, turned about world Y to face the way the camera looks.
fn facing_camera(hit: Mat4, camera_pose: Mat4) -> Mat4 {
    let forward = -camera_pose.z_axis.truncate();
    let yaw = if forward.x.abs() + forward.z.abs() < 1e-6 {
        0.0
    } else {
        (-forward.x).atan2(-forward.z)
    };
    Mat4::from_rotation_translation(Quat::from_rotation_y(yaw), hit.w_axis.truncate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::AnchorId;
    use crate::hit_test::PlaneAlignment;
    use crate::plane_visual::PlaneVisual;
    use crate::scene::PhysicsBody;
    use crate::tracking::{LimitedReason, TrackingQuality};
    use glam::Vec3;

    struct FixedTracker {
        pose: Option<Mat4>,
        quality: TrackingQuality,
        hits: Vec<HitCandidate>,
    }

    impl Tracker for FixedTracker {
        fn camera_pose(&self) -> Option<Mat4> {
            self.pose
        }

        fn tracking_quality(&self) -> TrackingQuality {
            self.quality
        }

        fn hit_test(&self, _point: Vec2, kinds: &[HitKind]) -> Vec<HitCandidate> {
            self.hits
                .iter()
                .filter(|hit| kinds.contains(&hit.kind))
                .copied()
                .collect()
        }
    }

    #[derive(Default)]
    struct RecordingScene {
        attach_calls: Vec<Parent>,
        transform: Option<Mat4>,
        visible: bool,
    }

    impl Scene for RecordingScene {
        fn clone_node(&mut self, template: NodeId) -> NodeId {
            template
        }
        fn attach(&mut self, _node: NodeId, parent: Parent) {
            self.attach_calls.push(parent);
        }
        fn detach(&mut self, _node: NodeId) {}
        fn set_transform(&mut self, _node: NodeId, transform: Mat4) {
            self.transform = Some(transform);
        }
        fn set_visible(&mut self, _node: NodeId, visible: bool) {
            self.visible = visible;
        }
        fn attach_physics_body(&mut self, _node: NodeId, _body: PhysicsBody) {}
        fn sync_plane_visual(&mut self, _visual: &PlaneVisual) {}
        fn remove_plane_visual(&mut self, _anchor: AnchorId) {}
    }

    fn floor_hit() -> HitCandidate {
        HitCandidate::existing(
            Mat4::from_translation(Vec3::new(0.0, -1.0, -1.5)),
            1.8,
            PlaneAlignment::Horizontal,
        )
    }

    #[test]
    fn test_detecting_with_normal_tracking() {
        let tracker = FixedTracker {
            pose: Some(Mat4::IDENTITY),
            quality: TrackingQuality::Normal,
            hits: vec![floor_hit()],
        };
        let mut scene = RecordingScene::default();
        let mut focus = FocusIndicator::new(NodeId(5), FOCUS_SEARCHING_OFFSET);

        let state = *focus.update(&tracker, &mut scene, Some(Vec2::new(200.0, 400.0)), true);
        assert!(matches!(state, FocusState::Detecting { hit, .. } if hit == floor_hit()));
        assert_eq!(focus.parent(), Some(Parent::Root));
        assert!(scene.visible);
        let placed = scene.transform.unwrap();
        assert!((placed.w_axis.truncate() - Vec3::new(0.0, -1.0, -1.5)).length() < 1e-6);
    }

    #[test]
    fn test_limited_tracking_stays_initializing() {
        let tracker = FixedTracker {
            pose: Some(Mat4::IDENTITY),
            quality: TrackingQuality::Limited(LimitedReason::ExcessiveMotion),
            hits: vec![floor_hit()],
        };
        let mut scene = RecordingScene::default();
        let mut focus = FocusIndicator::new(NodeId(5), FOCUS_SEARCHING_OFFSET);

        assert_eq!(*focus.update(&tracker, &mut scene, Some(Vec2::ZERO), true), FocusState::Initializing);
        assert_eq!(focus.parent(), Some(Parent::Camera));
        let local = scene.transform.unwrap();
        assert!((local.w_axis.truncate() - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-6);

        // Without the tracking requirement the same frame detects
        let state = focus.update(&tracker, &mut scene, Some(Vec2::ZERO), false);
        assert!(matches!(state, FocusState::Detecting { .. }));
    }

    #[test]
    fn test_no_hit_or_no_pose_is_initializing() {
        let mut tracker = FixedTracker {
            pose: Some(Mat4::IDENTITY),
            quality: TrackingQuality::Normal,
            hits: vec![],
        };
        let mut scene = RecordingScene::default();
        let mut focus = FocusIndicator::new(NodeId(5), FOCUS_SEARCHING_OFFSET);
        assert_eq!(*focus.update(&tracker, &mut scene, Some(Vec2::ZERO), true), FocusState::Initializing);

        tracker.pose = None;
        tracker.hits = vec![floor_hit()];
        assert_eq!(*focus.update(&tracker, &mut scene, Some(Vec2::ZERO), true), FocusState::Initializing);
    }

    #[test]
    fn test_unknown_screen_center_skips_hit_test() {
        let tracker = FixedTracker {
            pose: Some(Mat4::IDENTITY),
            quality: TrackingQuality::Normal,
            hits: vec![floor_hit()],
        };
        let mut scene = RecordingScene::default();
        let mut focus = FocusIndicator::new(NodeId(5), FOCUS_SEARCHING_OFFSET);
        assert_eq!(*focus.update(&tracker, &mut scene, None, true), FocusState::Initializing);
        assert_eq!(focus.parent(), Some(Parent::Camera));
    }

    #[test]
    fn test_reparents_only_on_transition() {
        let mut tracker = FixedTracker {
            pose: Some(Mat4::IDENTITY),
            quality: TrackingQuality::Normal,
            hits: vec![],
        };
        let mut scene = RecordingScene::default();
        let mut focus = FocusIndicator::new(NodeId(5), FOCUS_SEARCHING_OFFSET);

        focus.update(&tracker, &mut scene, Some(Vec2::ZERO), true);
        focus.update(&tracker, &mut scene, Some(Vec2::ZERO), true);
        tracker.hits = vec![floor_hit()];
        focus.update(&tracker, &mut scene, Some(Vec2::ZERO), true);
        focus.update(&tracker, &mut scene, Some(Vec2::ZERO), true);
        tracker.quality = TrackingQuality::NotAvailable;
        focus.update(&tracker, &mut scene, Some(Vec2::ZERO), true);

        assert_eq!(scene.attach_calls, vec![Parent::Camera, Parent::Root, Parent::Camera]);
    }

    #[test]
    fn test_facing_camera_yaw() {
        let camera = Mat4::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::ZERO,
        );
        let m = facing_camera(Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)), camera);
        let (_, rotation, translation) = m.to_scale_rotation_translation();
        assert_eq!(translation, Vec3::new(1.0, 0.0, 0.0));
        assert!(rotation.dot(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)).abs() > 1.0 - 1e-5);

        // Looking straight down keeps a zero yaw
        let down = Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2);
        let m = facing_camera(Mat4::IDENTITY, down);
        assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }
}
