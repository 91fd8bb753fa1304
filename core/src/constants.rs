/*!
Locomotion tuning constants.

These centralize the parameters used by the input aggregator, the locomotion
state machine, the companion follower, and the kinematic controller configs.
Keeping them together makes tuning easier and keeps behavior consistent
between the player and companion paths.

Notes
- Distances are in meters, time in seconds, angles in radians unless a name
  says otherwise.
- Per-entity overrides live in the config structs; these are the defaults.
*/

/// Gravity acceleration (m/s^2, negative = downward).
pub const GRAVITY_MPS2: f32 = -9.81;

/// Terminal fall speed (m/s, negative = downward). Vertical velocity never
/// integrates past this, which keeps long falls stable.
pub const TERMINAL_FALL_SPEED_MPS: f32 = -50.0;

/// Upward velocity applied at jump start (m/s).
pub const JUMP_VELOCITY_MPS: f32 = 3.0;

/// Base walking speed (m/s).
pub const MAX_WALKING_SPEED_MPS: f32 = 5.0;

/// Planar control multiplier while airborne.
///
/// Convention:
/// - 1.0 = full ground control in air (arcade / very floaty)
/// - 0.0 = no air control
pub const AIR_CONTROL_MULTIPLIER: f32 = 0.4;

/// Keyboard turn rate (rad/s) for the rotate-left/rotate-right intents.
pub const KEYBOARD_TURN_RATE: f32 = 2.0;

/// Thumbstick turn rate (rad/s) applied to the deadzone-filtered yaw axis.
pub const XR_TURN_RATE: f32 = 2.0;

/// Analog axes below this magnitude are treated as exactly zero.
pub const THUMBSTICK_DEADZONE: f32 = 0.1;

/// Avatar visual scale bounds and linear grow/shrink rate (scale units/s).
///
/// The capsule collider intentionally does NOT resize with the visual scale;
/// only the rendered mesh scales.
pub const MIN_SCALE: f32 = 0.3;
pub const MAX_SCALE: f32 = 3.0;
pub const SCALE_RATE_PER_S: f32 = 0.6;

/// Stamina pool and flow rates (units, units/s).
pub const MAX_STAMINA: f32 = 100.0;
pub const STAMINA_DRAIN_PER_S: f32 = 8.0;
pub const STAMINA_REGEN_PER_S: f32 = 4.0;

/// Below this absolute stamina the avatar cannot move at all.
pub const STAMINA_EXHAUSTED_FLOOR: f32 = 5.0;

/// Speed bands as the pool drops: under the low threshold (30% of max) walk
/// at 30% speed, under the mid threshold (60%) at 70% speed, otherwise full.
/// Thresholds are absolute values so stamina exactly at a boundary lands in
/// the faster band.
pub const STAMINA_LOW_THRESHOLD: f32 = 30.0;
pub const STAMINA_MID_THRESHOLD: f32 = 60.0;
pub const STAMINA_LOW_SPEED_FACTOR: f32 = 0.3;
pub const STAMINA_MID_SPEED_FACTOR: f32 = 0.7;

/// Player capsule dimensions (meters). `PLAYER_HALF_HEIGHT` is the distance
/// from the capsule center to the feet (cap half-height plus radius); teleports
/// and spawns offset target surface positions by this amount.
pub const PLAYER_CAPSULE_RADIUS: f32 = 0.25;
pub const PLAYER_CAPSULE_HALF_HEIGHT: f32 = 0.65;
pub const PLAYER_HALF_HEIGHT: f32 = PLAYER_CAPSULE_HALF_HEIGHT + PLAYER_CAPSULE_RADIUS;

/// Vertical distance from the player body center to the eyes. The companion's
/// ground-level target point subtracts this from the player position.
pub const EYE_HEIGHT: f32 = 0.7;

/// Companion capsule dimensions (meters).
pub const COMPANION_CAPSULE_RADIUS: f32 = 0.3;
pub const COMPANION_CAPSULE_HALF_HEIGHT: f32 = 0.3;

/// Companion follow behavior: rest distance behind the player, base chase
/// speed, quadratic catch-up ramp, and its clamp.
pub const FOLLOW_DISTANCE: f32 = 2.0;
pub const FOLLOW_SPEED_MPS: f32 = 3.0;
pub const FOLLOW_RAMP_GAIN: f32 = 5.0;
pub const FOLLOW_MAX_SPEED_MULTIPLIER: f32 = 8.0;

/// Below this planar distance to the target point the companion holds still.
/// Prevents jitter when settled.
pub const FOLLOW_DEADZONE: f32 = 0.05;

/// Downward cast magnitude (m/s) used by the pure ground probe. Small enough
/// not to move the capsule, large enough to latch snap-to-ground.
pub const GROUND_PROBE_BIAS_MPS: f32 = 0.125;

/// Max dt (seconds) for a single simulation frame.
///
/// Keeps movement reasonable after tab-switch or GC stalls instead of letting
/// one huge step tunnel through geometry.
pub const MAX_FRAME_DT_S: f32 = 0.1;

/// Minimum planar motion required to update the companion's facing yaw.
pub const YAW_EPS: f32 = 1.0e-6;
