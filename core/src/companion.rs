//! Companion follower.
//!
//! A second, independent instance of the locomotion pattern: its own body,
//! collider, and [`ShapeCastController`], chasing a target point derived from
//! the player's position and facing. It has no stamina, jump, or scale
//! handling; it just follows and avoids the environment.
//!
//! Collision policy: the companion's collider lives in its own group and only
//! interacts with statics, so it neither pushes nor gets pushed by the player
//! while both still collide with the scene.

use nalgebra::{Vector2, Vector3};

use crate::constants::{
    EYE_HEIGHT, FOLLOW_DEADZONE, FOLLOW_DISTANCE, FOLLOW_MAX_SPEED_MULTIPLIER, FOLLOW_RAMP_GAIN,
    FOLLOW_SPEED_MPS, GRAVITY_MPS2, TERMINAL_FALL_SPEED_MPS, YAW_EPS,
};
use crate::controller::ShapeCastController;
use crate::world::SceneWorld;

/// Companion follow tuning.
#[derive(Clone, Copy, Debug)]
pub struct CompanionConfig {
    /// Rest distance behind the player (meters).
    pub follow_distance: f32,
    /// Base chase speed (m/s); the ramp multiplies this.
    pub follow_speed: f32,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            follow_distance: FOLLOW_DISTANCE,
            follow_speed: FOLLOW_SPEED_MPS,
        }
    }
}

/// The companion's logical state. Vertical motion is governed by gravity and
/// ground contact, independent of the planar chase.
pub struct CompanionFollower {
    caster: ShapeCastController,
    config: CompanionConfig,
    vertical_velocity: f32,
    grounded: bool,
    /// Facing derived from planar motion, for the render layer.
    yaw: f32,
}

impl CompanionFollower {
    pub fn new(caster: ShapeCastController, config: CompanionConfig) -> Self {
        Self {
            caster,
            config,
            vertical_velocity: 0.0,
            grounded: false,
            yaw: 0.0,
        }
    }

    /// The controller (and thus body/collider handles) this follower owns.
    pub fn caster(&self) -> &ShapeCastController {
        &self.caster
    }

    /// Facing yaw derived from the last planar movement.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Target point for this frame: the player position offset by the follow
    /// distance opposite the player's facing yaw, at ground level.
    pub fn target_point(&self, player_position: Vector3<f32>, player_yaw: f32) -> Vector3<f32> {
        Vector3::new(
            player_position.x + player_yaw.sin() * self.config.follow_distance,
            player_position.y - EYE_HEIGHT,
            player_position.z + player_yaw.cos() * self.config.follow_distance,
        )
    }

    /// Advance one frame toward `target`.
    ///
    /// Attraction is XZ-only with a quadratic catch-up ramp, clamped so one
    /// step never overshoots the target; inside the dead-zone the companion
    /// holds still. Gravity and ground support run regardless.
    pub fn update(&mut self, world: &mut SceneWorld, target: Vector3<f32>, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let Some(position) = world.body_translation(self.caster.handles().body) else {
            return;
        };

        let to_target = Vector2::new(target.x - position.x, target.z - position.z);
        let distance = to_target.norm();

        let planar_step = if distance <= FOLLOW_DEADZONE {
            Vector2::zeros()
        } else {
            let ramp = 1.0
                + (distance / self.config.follow_distance).powi(2) * FOLLOW_RAMP_GAIN;
            let speed = self.config.follow_speed * ramp.min(FOLLOW_MAX_SPEED_MULTIPLIER);
            let step = (speed * dt).min(distance);
            to_target * (step / distance)
        };

        self.vertical_velocity =
            (self.vertical_velocity + GRAVITY_MPS2 * dt).max(TERMINAL_FALL_SPEED_MPS);

        let desired = Vector3::new(
            planar_step.x,
            self.vertical_velocity * dt,
            planar_step.y,
        );

        let Some(resolved) = self.caster.resolve_movement(world, desired, dt) else {
            return;
        };

        if let Some(yaw) = yaw_from_planar(planar_step) {
            self.yaw = yaw;
        }

        let Some(body) = world.body_mut(self.caster.handles().body) else {
            return;
        };
        let new_translation = body.translation() + resolved.translation;
        body.set_translation(new_translation, true);
        body.set_linvel(resolved.translation / dt, true);

        self.grounded = resolved.grounded;
        if self.grounded && self.vertical_velocity <= 0.0 {
            self.vertical_velocity = 0.0;
        }
    }
}

/// Yaw-only facing from a planar delta, `None` when the motion is too small
/// to define one.
fn yaw_from_planar(delta: Vector2<f32>) -> Option<f32> {
    if delta.norm_squared() > YAW_EPS {
        Some((-delta.x).atan2(-delta.y))
    } else {
        None
    }
}
