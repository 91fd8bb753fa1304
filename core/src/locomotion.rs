//! Player locomotion state machine.
//!
//! Owns the logical movement state of the avatar (yaw, scale, vertical
//! velocity, grounded/jumping flags, stamina) and advances it once per frame
//! from an [`InputIntent`](crate::input::InputIntent), delegating collision
//! resolution to the entity's [`ShapeCastController`].
//!
//! Ordering within one frame (load-bearing, see the tests):
//! 1. rotation, then movement direction (movement uses the just-updated yaw);
//! 2. gravity integration, then jump start, then the collision cast;
//! 3. the landing clamp runs after the cast, same frame.
//!
//! The physics body is kinematic-velocity: the corrected displacement is
//! written back as both the new translation and the frame's linear velocity.
//! Nothing here panics; a stale collider degrades to a frame where only the
//! logical state (yaw, scale, stamina) advances.

use nalgebra::Vector3;

use crate::constants::{
    AIR_CONTROL_MULTIPLIER, GRAVITY_MPS2, JUMP_VELOCITY_MPS, KEYBOARD_TURN_RATE, MAX_SCALE,
    MAX_STAMINA, MAX_WALKING_SPEED_MPS, MIN_SCALE, SCALE_RATE_PER_S, STAMINA_DRAIN_PER_S,
    STAMINA_EXHAUSTED_FLOOR, STAMINA_LOW_SPEED_FACTOR, STAMINA_LOW_THRESHOLD,
    STAMINA_MID_SPEED_FACTOR, STAMINA_MID_THRESHOLD, STAMINA_REGEN_PER_S,
    TERMINAL_FALL_SPEED_MPS, XR_TURN_RATE,
};
use crate::controller::ShapeCastController;
use crate::input::InputIntent;
use crate::world::SceneWorld;

/// Locomotion policy flags and tunables.
#[derive(Clone, Copy, Debug)]
pub struct LocomotionConfig {
    /// Gate movement speed on the stamina pool.
    pub stamina_enabled: bool,
    /// When false (default), squeeze/no-clip only applies while the forward
    /// intent is held; when true it applies to any movement direction.
    pub squeeze_any_direction: bool,
    /// Base walking speed (m/s).
    pub max_walking_speed: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            stamina_enabled: true,
            squeeze_any_direction: false,
            max_walking_speed: MAX_WALKING_SPEED_MPS,
        }
    }
}

/// The avatar's logical movement state.
///
/// Yaw is unbounded on purpose: every consumer goes through sin/cos, so
/// normalizing would only add a discontinuity.
#[derive(Clone, Copy, Debug)]
pub struct LocomotionState {
    pub yaw: f32,
    pub scale: f32,
    pub vertical_velocity: f32,
    pub grounded: bool,
    pub jumping: bool,
    pub stamina: f32,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            scale: 1.0,
            vertical_velocity: 0.0,
            grounded: false,
            jumping: false,
            stamina: MAX_STAMINA,
        }
    }
}

impl LocomotionState {
    /// Advance one frame.
    ///
    /// Consumes the frame's intent, updates logical state, resolves the
    /// desired displacement against the scene, and writes the corrected
    /// translation/velocity to the entity's body.
    pub fn step(
        &mut self,
        world: &mut SceneWorld,
        caster: &ShapeCastController,
        config: &LocomotionConfig,
        intent: &InputIntent,
        dt: f32,
    ) {
        if dt <= 0.0 {
            return;
        }

        // 1) Rotation first; movement below uses the updated yaw.
        self.yaw += rotation_delta(intent, dt);

        // 2) Stamina-gated speed for this frame.
        let speed = if config.stamina_enabled {
            speed_for_stamina(config.max_walking_speed, self.stamina)
        } else {
            config.max_walking_speed
        };

        // 3) Planar intent: keyboard relative to body yaw, analog relative to
        //    the intent's resolved analog yaw.
        let planar = planar_movement(intent, self.yaw, speed);

        // 4) Grow/shrink as a linear ramp, clamped. The collider stays fixed;
        //    only the visual scale changes.
        self.scale = updated_scale(self.scale, intent, dt);

        // 5) Stamina drains while moving, regenerates while idle.
        let moving = planar.x != 0.0 || planar.y != 0.0;
        self.stamina = updated_stamina(self.stamina, moving, dt);

        // 6) Gravity integrates unconditionally, before the grounded check.
        self.vertical_velocity =
            (self.vertical_velocity + GRAVITY_MPS2 * dt).max(TERMINAL_FALL_SPEED_MPS);

        // 7) Jump start needs ground support confirmed by a probe cast, not
        //    just last frame's flag. Airborne jump intents change nothing.
        if intent.jump && !self.jumping && caster.probe_ground(world, dt) {
            self.vertical_velocity = JUMP_VELOCITY_MPS;
            self.jumping = true;
            self.grounded = false;
        }

        // 8) Assemble the frame displacement; planar control is reduced while
        //    airborne.
        let air_control = if self.grounded {
            1.0
        } else {
            AIR_CONTROL_MULTIPLIER
        };
        let desired = Vector3::new(
            planar.x * air_control * dt,
            self.vertical_velocity * dt,
            planar.y * air_control * dt,
        );

        // 9) Collision resolution. A stale handle skips the physics portion;
        //    the logical state above has already advanced.
        let Some(resolved) = caster.resolve_movement(world, desired, dt) else {
            return;
        };

        // Squeeze/no-clip: keep the collision-resolved Y (ground and stairs
        // still work) but apply the desired X/Z directly so thin obstacles
        // can be passed through.
        let squeezing = intent.squeeze && (config.squeeze_any_direction || intent.forward);
        let applied = if squeezing {
            Vector3::new(desired.x, resolved.translation.y, desired.z)
        } else {
            resolved.translation
        };

        let Some(body) = world.body_mut(caster.handles().body) else {
            return;
        };
        let new_translation = body.translation() + applied;
        body.set_translation(new_translation, true);
        body.set_linvel(applied / dt, true);

        // 10) Landing clamp, after the cast: grounded with non-positive
        //     vertical velocity resets the jump state.
        self.grounded = resolved.grounded;
        if self.grounded && self.vertical_velocity <= 0.0 {
            self.vertical_velocity = 0.0;
            self.jumping = false;
        }
    }
}

/// Yaw delta for this frame from keyboard rotate intents plus the scaled
/// thumbstick turn axis. Positive yaw turns left; a rightward stick value
/// therefore subtracts.
fn rotation_delta(intent: &InputIntent, dt: f32) -> f32 {
    let mut delta = 0.0;
    if intent.rotate_left {
        delta += KEYBOARD_TURN_RATE * dt;
    }
    if intent.rotate_right {
        delta -= KEYBOARD_TURN_RATE * dt;
    }
    delta - intent.xr_yaw * XR_TURN_RATE * dt
}

/// Movement speed for the current stamina pool.
///
/// Bands: exhausted (< 5 units) stops movement entirely; under 30 units walks
/// at 30% speed; under 60 at 70% speed; otherwise full speed. Exactly at a
/// threshold counts as the faster band.
pub fn speed_for_stamina(base_speed: f32, stamina: f32) -> f32 {
    if stamina < STAMINA_EXHAUSTED_FLOOR {
        0.0
    } else if stamina < STAMINA_LOW_THRESHOLD {
        base_speed * STAMINA_LOW_SPEED_FACTOR
    } else if stamina < STAMINA_MID_THRESHOLD {
        base_speed * STAMINA_MID_SPEED_FACTOR
    } else {
        base_speed
    }
}

/// Planar (XZ) velocity from the frame's intent.
///
/// Keyboard directions use the body yaw; analog axes use the resolved analog
/// yaw. Direction convention: forward(yaw) = (-sin yaw, -cos yaw).
fn planar_movement(intent: &InputIntent, body_yaw: f32, speed: f32) -> nalgebra::Vector2<f32> {
    let mut x = 0.0;
    let mut z = 0.0;

    let (sin_b, cos_b) = (body_yaw.sin(), body_yaw.cos());
    if intent.forward {
        x += -sin_b;
        z += -cos_b;
    }
    if intent.back {
        x += sin_b;
        z += cos_b;
    }
    if intent.left {
        x += -cos_b;
        z += sin_b;
    }
    if intent.right {
        x += cos_b;
        z += -sin_b;
    }

    let (sin_a, cos_a) = (intent.analog_yaw.sin(), intent.analog_yaw.cos());
    // forward basis scaled by the forward-positive stick axis…
    x += -sin_a * intent.xr_move_z;
    z += -cos_a * intent.xr_move_z;
    // …and the right basis scaled by the strafe axis.
    x += cos_a * intent.xr_move_x;
    z += -sin_a * intent.xr_move_x;

    nalgebra::Vector2::new(x * speed, z * speed)
}

/// Scale after applying this frame's grow/shrink intent, clamped.
fn updated_scale(scale: f32, intent: &InputIntent, dt: f32) -> f32 {
    let mut next = scale;
    if intent.grow || intent.xr_grow {
        next += SCALE_RATE_PER_S * dt;
    }
    if intent.shrink || intent.xr_shrink {
        next -= SCALE_RATE_PER_S * dt;
    }
    next.clamp(MIN_SCALE, MAX_SCALE)
}

/// Stamina after this frame, clamped to the pool.
fn updated_stamina(stamina: f32, moving: bool, dt: f32) -> f32 {
    let next = if moving {
        stamina - STAMINA_DRAIN_PER_S * dt
    } else {
        stamina + STAMINA_REGEN_PER_S * dt
    };
    next.clamp(0.0, MAX_STAMINA)
}
