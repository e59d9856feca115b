//! Demo session driven by the headless tracker and scene.
//!
//! Walks through the three placement modes, a physics contact, undo, and a
//! scene reset. Run with `RUST_LOG=debug` to see every transition.

use arplace::headless::{floor_plane, HeadlessScene, HeadlessTracker};
use arplace::*;

fn main() -> Result<()> {
    init_logging();

    let viewport = Vec2::new(390.0, 844.0);
    let center = viewport * 0.5;

    let mut scene = HeadlessScene::new();
    let focus = scene.create_node();
    let cube = ShapeTemplate::new("cube", scene.create_node());
    let picture = ShapeTemplate::new("picture", scene.create_node())
        .with_alignments(AlignmentSet::VERTICAL)
        .with_collision(CollisionShape::BoundingBox);

    let mut tracker = HeadlessTracker::new(viewport);
    let mut session = Session::new(Options::default(), focus)?;
    session.set_viewport(viewport);
    session.select_object(cube.clone());

    // Freeform: two taps without moving the camera stack two cubes on top of each other
    for _ in 0..2 {
        session.on_touch_began(&tracker, &mut scene, center);
        session.on_touch_ended();
    }
    for (a, b) in scene.contacts(0.05) {
        if let Some(slot) = session.on_node_contact(&mut scene, a, b) {
            log::info!("collision removed slot {}", slot.0);
        }
    }

    // Plane mode: the focus indicator searches until a surface shows up
    session.set_placement_mode(&mut scene, PlacementMode::PlaneAnchored);
    tracker.camera_pose = Some(Mat4::from_rotation_translation(
        Quat::from_rotation_x(-0.6),
        Vec3::new(0.0, 1.4, 0.0),
    ));
    log::info!("focus: {:?}", session.on_frame(&tracker, &mut scene));

    tracker.estimated_floor = Some(0.0);
    log::info!("focus: {:?}", session.on_frame(&tracker, &mut scene));

    let floor = tracker.detect_plane(Mat4::IDENTITY, floor_plane(Vec2::splat(3.0)));
    session.on_anchor_added(&mut scene, &floor);
    session.toggle_show_planes(&mut scene);

    // Drag a cube across the floor
    session.on_touch_began(&tracker, &mut scene, center);
    for step in 1..=5u8 {
        let point = center + Vec2::new(f32::from(step) * 20.0, 0.0);
        session.on_touch_moved(&tracker, &mut scene, point);
    }
    session.on_touch_ended();

    // Pictures want walls; the floor is not good enough for existing-geometry placement
    session.select_object(picture);
    if session.on_touch_began(&tracker, &mut scene, center).is_none() {
        log::info!("no wall under the touch for the picture");
    }
    session.on_touch_ended();

    // Image mode: a recognized poster gets the cube
    session.select_object(cube);
    if let Some(command) = session.set_placement_mode(&mut scene, PlacementMode::ImageAnchored) {
        log::info!("tracking: {command:?}");
    }
    let poster = tracker.detect_image(
        Mat4::from_translation(Vec3::new(0.5, 1.2, -2.0)),
        "poster",
        Vec2::new(0.3, 0.42),
    );
    session.on_anchor_added(&mut scene, &poster);

    for (slot, transform) in session.placed_transforms() {
        let (translation, _) = decompose(transform);
        log::info!("slot {}: {translation}", slot.0);
    }

    while let Some(slot) = session.undo(&mut scene) {
        log::info!("undid slot {}", slot.0);
    }

    let command = session.reset_scene(&mut scene);
    tracker.reset();
    log::info!("tracking: {command:?}");

    Ok(())
}
