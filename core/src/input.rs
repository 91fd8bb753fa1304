//! Per-frame input aggregation.
//!
//! Merges discrete keyboard/button states, continuous XR thumbstick axes,
//! and (in immersive mode) head-orientation-derived yaw into one normalized
//! [`InputIntent`]. The locomotion state machine consumes
//! the intent and never branches on modality itself.
//!
//! Yaw-basis policy (deliberate asymmetry, applied here once):
//! - keyboard movement is body-relative (logical player yaw);
//! - analog-stick movement is gaze-relative in immersive mode (head yaw), and
//!   falls back to the logical yaw outside immersive mode or when the head
//!   pose is degenerate.

use nalgebra::Matrix4;

use crate::constants::THUMBSTICK_DEADZONE;

/// Named boolean control states, sampled once per frame by the host layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonStates {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub grow: bool,
    pub shrink: bool,
    pub jump: bool,
    pub squeeze: bool,
}

/// One thumbstick's raw axes, range [-1, 1] per axis.
#[derive(Clone, Copy, Debug, Default)]
pub struct StickAxes {
    pub x_axis: f32,
    pub y_axis: f32,
}

/// XR controller button states consumed by the core.
#[derive(Clone, Copy, Debug, Default)]
pub struct XrButtons {
    pub grow: bool,
    pub shrink: bool,
}

/// Head pose sampled from the immersive session's view.
///
/// Wraps the head's world matrix; the only derived quantity the core needs is
/// the forward-facing yaw.
#[derive(Clone, Copy, Debug)]
pub struct HeadPose {
    pub matrix: Matrix4<f32>,
}

impl HeadPose {
    /// Forward-facing yaw derived from the matrix's −Z basis vector projected
    /// to the horizontal plane.
    ///
    /// Returns `None` for degenerate data: non-finite components, or a gaze
    /// pointing straight up/down (no horizontal component to project).
    pub fn yaw(&self) -> Option<f32> {
        // Basis Z column; forward is its negation.
        let fx = -self.matrix[(0, 2)];
        let fz = -self.matrix[(2, 2)];
        if !fx.is_finite() || !fz.is_finite() {
            return None;
        }
        if fx * fx + fz * fz < 1.0e-8 {
            return None;
        }
        // Movement convention: direction(yaw) = (-sin yaw, -cos yaw).
        Some((-fx).atan2(-fz))
    }
}

/// Raw device snapshot for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub buttons: ButtonStates,
    /// Left-hand thumbstick: planar movement.
    pub left_stick: StickAxes,
    /// Right-hand thumbstick: X axis turns the avatar.
    pub right_stick: StickAxes,
    pub xr_buttons: XrButtons,
    /// Head pose, present while an immersive session is active.
    pub head_pose: Option<HeadPose>,
    /// Whether an immersive session is active this frame.
    pub immersive: bool,
}

/// Ephemeral per-frame intent. Recomputed every frame from raw device state,
/// never persisted.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub grow: bool,
    pub shrink: bool,
    pub jump: bool,
    /// No-clip modifier. Suppressed while immersive (desktop-only aid).
    pub squeeze: bool,

    /// Deadzone-filtered strafe axis, positive right.
    pub xr_move_x: f32,
    /// Deadzone-filtered movement axis, positive forward.
    pub xr_move_z: f32,
    /// Deadzone-filtered turn axis, positive right.
    pub xr_yaw: f32,
    pub xr_grow: bool,
    pub xr_shrink: bool,

    /// Yaw basis for the analog movement axes, resolved per the module
    /// policy. Keyboard movement always uses the logical yaw instead.
    pub analog_yaw: f32,
}

/// Treat analog values inside the deadzone as exactly zero.
pub fn apply_deadzone(value: f32) -> f32 {
    if value.abs() <= THUMBSTICK_DEADZONE {
        0.0
    } else {
        value
    }
}

/// Stateless per-frame sampler.
///
/// `sample` is side-effect-free: it reads the snapshot, mutates nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputAggregator;

impl InputAggregator {
    /// Merge the frame's raw device snapshot into a single intent.
    ///
    /// `logical_yaw` is the player's current body yaw; it is the analog yaw
    /// basis whenever the head pose does not apply.
    pub fn sample(&self, input: &FrameInput, logical_yaw: f32) -> InputIntent {
        let b = input.buttons;

        let analog_yaw = if input.immersive {
            match input.head_pose.and_then(|pose| pose.yaw()) {
                Some(head_yaw) => head_yaw,
                None => {
                    log::debug!("head pose unavailable; analog movement falls back to body yaw");
                    logical_yaw
                }
            }
        } else {
            logical_yaw
        };

        InputIntent {
            forward: b.forward,
            back: b.back,
            left: b.left,
            right: b.right,
            rotate_left: b.rotate_left,
            rotate_right: b.rotate_right,
            grow: b.grow,
            shrink: b.shrink,
            jump: b.jump,
            squeeze: b.squeeze && !input.immersive,

            xr_move_x: apply_deadzone(input.left_stick.x_axis),
            // Stick up is negative on the device; intent is forward-positive.
            xr_move_z: -apply_deadzone(input.left_stick.y_axis),
            xr_yaw: apply_deadzone(input.right_stick.x_axis),
            xr_grow: input.xr_buttons.grow,
            xr_shrink: input.xr_buttons.shrink,

            analog_yaw,
        }
    }
}
