//! Per-frame simulation orchestration.
//!
//! Single-threaded cooperative scheduling: everything runs on the frame
//! callback with a variable, clamped timestep. Within one frame the order is
//! fixed: sample input, update the player, then the companion (which reads
//! the player's already-updated position/yaw, no one-frame lag). Teleports
//! apply immediately at the entry point.
//!
//! The render layer mirrors body transforms from [`Simulation::player_pose`]
//! and [`Simulation::companion_pose`]; it is otherwise outside this crate.

use nalgebra::Vector3;

use crate::companion::{CompanionConfig, CompanionFollower};
use crate::constants::{
    COMPANION_CAPSULE_HALF_HEIGHT, COMPANION_CAPSULE_RADIUS, MAX_FRAME_DT_S,
    PLAYER_CAPSULE_HALF_HEIGHT, PLAYER_CAPSULE_RADIUS,
};
use crate::controller::{CharacterControllerConfig, ShapeCastController};
use crate::error::WorldError;
use crate::input::{FrameInput, InputAggregator};
use crate::locomotion::{LocomotionConfig, LocomotionState};
use crate::teleport::{TeleportRequest, TeleportResolver};
use crate::world::{CharacterKind, CharacterSpawn, SceneWorld, StaticColliderDef};

/// Top-level tuning for one simulation instance.
#[derive(Clone, Copy, Debug)]
pub struct SimulationConfig {
    pub locomotion: LocomotionConfig,
    pub player_controller: CharacterControllerConfig,
    pub companion_controller: CharacterControllerConfig,
    pub companion: CompanionConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            locomotion: LocomotionConfig::default(),
            player_controller: CharacterControllerConfig::player(),
            companion_controller: CharacterControllerConfig::companion(),
            companion: CompanionConfig::default(),
        }
    }
}

/// World-space pose exposed to the render layer.
#[derive(Clone, Copy, Debug)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub yaw: f32,
    /// Visual scale; 1.0 for the companion.
    pub scale: f32,
}

/// The locomotion core: physics world, player rig, companion.
pub struct Simulation {
    world: SceneWorld,
    aggregator: InputAggregator,
    config: SimulationConfig,
    player_state: LocomotionState,
    player_caster: ShapeCastController,
    companion: CompanionFollower,
    released: bool,
}

impl Simulation {
    /// Build the world from the scene's static colliders and spawn the player
    /// (body center at `spawn_position`) with the companion at its rest point
    /// behind the spawn.
    pub fn new(
        statics: Vec<StaticColliderDef>,
        spawn_position: Vector3<f32>,
        config: SimulationConfig,
    ) -> Self {
        let mut world = SceneWorld::build(statics);

        let player_handles = world.spawn_character(CharacterSpawn {
            kind: CharacterKind::Player,
            position: spawn_position,
            radius: PLAYER_CAPSULE_RADIUS,
            half_height: PLAYER_CAPSULE_HALF_HEIGHT,
        });
        let player_caster = ShapeCastController::new(
            &config.player_controller,
            CharacterKind::Player,
            player_handles,
        );
        let player_state = LocomotionState::default();

        // Companion rest point behind the spawn facing (yaw 0).
        let companion_spawn = Vector3::new(
            spawn_position.x,
            spawn_position.y,
            spawn_position.z + config.companion.follow_distance,
        );
        let companion_handles = world.spawn_character(CharacterSpawn {
            kind: CharacterKind::Companion,
            position: companion_spawn,
            radius: COMPANION_CAPSULE_RADIUS,
            half_height: COMPANION_CAPSULE_HALF_HEIGHT,
        });
        let companion = CompanionFollower::new(
            ShapeCastController::new(
                &config.companion_controller,
                CharacterKind::Companion,
                companion_handles,
            ),
            config.companion,
        );

        Self {
            world,
            aggregator: InputAggregator,
            config,
            player_state,
            player_caster,
            companion,
            released: false,
        }
    }

    /// Advance one displayed frame.
    ///
    /// `dt` is the elapsed wall time since the previous frame; it is clamped
    /// so a stalled tab cannot produce one tunnel-sized step.
    pub fn step(&mut self, input: &FrameInput, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT_S);
        if dt <= 0.0 || self.released {
            return;
        }

        let intent = self.aggregator.sample(input, self.player_state.yaw);
        self.player_state.step(
            &mut self.world,
            &self.player_caster,
            &self.config.locomotion,
            &intent,
            dt,
        );

        // Companion reads this frame's player pose; no lag.
        if let Some(player_position) = self
            .world
            .body_translation(self.player_caster.handles().body)
        {
            let target = self
                .companion
                .target_point(player_position, self.player_state.yaw);
            self.companion.update(&mut self.world, target, dt);
        }
    }

    /// Teleport entry point for the scene/XR layer.
    ///
    /// Applies immediately; safe at any point of the frame. An unknown body
    /// (post-teardown call) is logged and dropped rather than surfaced.
    pub fn request_teleport(&mut self, target: Vector3<f32>) {
        let request = TeleportRequest { target };
        if let Err(err) = TeleportResolver::apply(
            &mut self.world,
            self.player_caster.handles(),
            &mut self.player_state,
            request,
        ) {
            log::warn!("teleport dropped: {err}");
        }
    }

    /// Player pose for the render layer.
    pub fn player_pose(&self) -> Option<Pose> {
        let position = self
            .world
            .body_translation(self.player_caster.handles().body)?;
        Some(Pose {
            position,
            yaw: self.player_state.yaw,
            scale: self.player_state.scale,
        })
    }

    /// Companion pose for the render layer.
    pub fn companion_pose(&self) -> Option<Pose> {
        let position = self
            .world
            .body_translation(self.companion.caster().handles().body)?;
        Some(Pose {
            position,
            yaw: self.companion.yaw(),
            scale: 1.0,
        })
    }

    /// Current logical player state (read-only).
    pub fn player_state(&self) -> &LocomotionState {
        &self.player_state
    }

    /// Handles of the player's body/collider.
    pub fn player_handles(&self) -> crate::world::CharacterHandles {
        self.player_caster.handles()
    }

    /// Handles of the companion's body/collider.
    pub fn companion_handles(&self) -> crate::world::CharacterHandles {
        self.companion.caster().handles()
    }

    /// The physics world (read-only, for inspection).
    pub fn world(&self) -> &SceneWorld {
        &self.world
    }

    /// Release both characters from the world.
    ///
    /// Call on session end / component unmount so no controller outlives the
    /// world it queries. Subsequent `step` calls become no-ops. Idempotent.
    pub fn teardown(&mut self) -> Result<(), WorldError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.world.remove_character(self.player_caster.handles())?;
        self.world
            .remove_character(self.companion.caster().handles())?;
        log::info!("simulation released its character bodies");
        Ok(())
    }
}
