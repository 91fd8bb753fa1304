//! Shared fixtures for the integration tests: a flat test scene and input
//! snapshot helpers.
#![allow(dead_code)]

use nalgebra::{Matrix4, UnitQuaternion, Vector3};
use waywalk_core::input::{FrameInput, HeadPose, StickAxes};
use waywalk_core::sim::{Simulation, SimulationConfig};
use waywalk_core::world::{StaticColliderDef, StaticShapeDef};

/// Frame length used by most tests.
pub const DT: f32 = 0.05;

/// A large flat floor with its top surface at y = 0.
pub fn flat_floor() -> Vec<StaticColliderDef> {
    vec![StaticColliderDef {
        id: 1,
        translation: Vector3::new(0.0, -0.5, 0.0),
        rotation: UnitQuaternion::identity(),
        shape: StaticShapeDef::Cuboid {
            half_extents: Vector3::new(50.0, 0.5, 50.0),
        },
    }]
}

/// The flat floor plus a thin, tall wall crossing the -Z walking path at
/// z = -3 (faces at z = -2.9 and z = -3.1).
pub fn floor_with_wall() -> Vec<StaticColliderDef> {
    let mut defs = flat_floor();
    defs.push(StaticColliderDef {
        id: 2,
        translation: Vector3::new(0.0, 2.0, -3.0),
        rotation: UnitQuaternion::identity(),
        shape: StaticShapeDef::Cuboid {
            half_extents: Vector3::new(10.0, 2.0, 0.1),
        },
    });
    defs
}

/// Spawn a simulation over the given statics, slightly above the floor, and
/// run a few idle frames so the player settles onto the ground.
pub fn settled_sim(statics: Vec<StaticColliderDef>, config: SimulationConfig) -> Simulation {
    let mut sim = Simulation::new(statics, Vector3::new(0.0, 1.0, 0.0), config);
    let idle = FrameInput::default();
    for _ in 0..40 {
        sim.step(&idle, DT);
    }
    assert!(
        sim.player_state().grounded,
        "player failed to settle onto the test floor"
    );
    sim
}

/// Input snapshot with only the keyboard forward intent held.
pub fn forward_input() -> FrameInput {
    let mut input = FrameInput::default();
    input.buttons.forward = true;
    input
}

/// Head pose whose forward-facing yaw is `yaw` (pure rotation about +Y).
pub fn head_pose_with_yaw(yaw: f32) -> HeadPose {
    let mut m = Matrix4::identity();
    m[(0, 0)] = yaw.cos();
    m[(0, 2)] = yaw.sin();
    m[(2, 0)] = -yaw.sin();
    m[(2, 2)] = yaw.cos();
    HeadPose { matrix: m }
}

/// Immersive snapshot: left stick pushed fully forward, head facing `yaw`.
pub fn immersive_stick_forward(yaw: f32) -> FrameInput {
    FrameInput {
        left_stick: StickAxes {
            x_axis: 0.0,
            y_axis: -1.0,
        },
        head_pose: Some(head_pose_with_yaw(yaw)),
        immersive: true,
        ..FrameInput::default()
    }
}

/// Planar (XZ) distance between two positions.
pub fn planar_distance(a: Vector3<f32>, b: Vector3<f32>) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}
