//! Companion follower behavior: target derivation, convergence, settling.

mod common;

use approx::assert_relative_eq;
use common::{flat_floor, planar_distance, settled_sim, DT};
use nalgebra::Vector3;
use waywalk_core::constants::{EYE_HEIGHT, FOLLOW_DEADZONE, FOLLOW_DISTANCE};
use waywalk_core::input::FrameInput;
use waywalk_core::sim::SimulationConfig;

#[test]
fn companion_converges_monotonically_then_settles() {
    let mut sim = settled_sim(flat_floor(), SimulationConfig::default());

    // Put the player far away; the companion chases the point behind it.
    sim.request_teleport(Vector3::new(10.0, 0.0, 10.0));
    let player = sim.player_pose().unwrap();
    let target = Vector3::new(
        player.position.x,
        player.position.y - EYE_HEIGHT,
        player.position.z + FOLLOW_DISTANCE,
    );

    let idle = FrameInput::default();
    let mut last = planar_distance(sim.companion_pose().unwrap().position, target);
    assert!(last > FOLLOW_DISTANCE, "companion started too close: {last}");

    let mut settled_frames = 0;
    for _ in 0..2000 {
        sim.step(&idle, DT);
        let distance = planar_distance(sim.companion_pose().unwrap().position, target);
        assert!(
            distance <= last + 1.0e-4,
            "distance increased: {last} -> {distance}"
        );
        last = distance;
        if distance <= FOLLOW_DEADZONE {
            settled_frames += 1;
            if settled_frames > 5 {
                break;
            }
        }
    }
    assert!(
        last <= FOLLOW_DEADZONE,
        "companion never reached the target point: {last}"
    );

    // Settled: horizontal movement stops.
    let before = sim.companion_pose().unwrap().position;
    sim.step(&idle, DT);
    let after = sim.companion_pose().unwrap().position;
    assert_relative_eq!(planar_distance(before, after), 0.0, epsilon = 1.0e-5);
}

#[test]
fn companion_rests_on_the_ground() {
    let mut sim = settled_sim(flat_floor(), SimulationConfig::default());

    let idle = FrameInput::default();
    for _ in 0..100 {
        sim.step(&idle, DT);
    }

    // Companion capsule (half height 0.3 + radius 0.3) settles with its feet
    // near the floor at y = 0.
    let pose = sim.companion_pose().unwrap();
    assert!(
        pose.position.y > 0.4 && pose.position.y < 0.9,
        "companion floating or sunk: {pose:?}"
    );
}

#[test]
fn companion_faces_its_direction_of_travel() {
    let mut sim = settled_sim(flat_floor(), SimulationConfig::default());

    // Drag the player toward -X; the chase direction is then -X too.
    sim.request_teleport(Vector3::new(-20.0, 0.0, 0.0));
    let idle = FrameInput::default();
    for _ in 0..10 {
        sim.step(&idle, DT);
    }

    // Moving toward -X is yaw = +90 degrees in the direction convention.
    let yaw = sim.companion_pose().unwrap().yaw;
    assert!((yaw - std::f32::consts::FRAC_PI_2).abs() < 0.3, "yaw = {yaw}");
}

#[test]
fn companion_and_player_occupy_separate_collision_groups() {
    use waywalk_core::world::{CharacterKind, COMPANION_GROUP, PLAYER_GROUP, STATIC_GROUP};

    let player = CharacterKind::Player.interaction_groups();
    let companion = CharacterKind::Companion.interaction_groups();

    // Both filter statics only; neither filters the other's membership.
    assert_eq!(player.filter, STATIC_GROUP);
    assert_eq!(companion.filter, STATIC_GROUP);
    assert_eq!(player.memberships, PLAYER_GROUP);
    assert_eq!(companion.memberships, COMPANION_GROUP);
    assert!(!player.test(companion));
}
