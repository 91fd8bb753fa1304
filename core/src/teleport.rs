//! Teleport resolution.
//!
//! A teleport is an instantaneous cut: the player body lands at the target
//! with its feet on the surface, all velocity zeroed and the jump state
//! cleared, atomically. The simulation applies requests immediately at the
//! entry point; because the frame loop is single-threaded, a request fired
//! after the locomotion write trivially wins the frame, and one fired between
//! frames is simply where the next locomotion update starts.

use nalgebra::Vector3;

use crate::constants::PLAYER_HALF_HEIGHT;
use crate::error::WorldError;
use crate::locomotion::LocomotionState;
use crate::world::{SceneWorld, CharacterHandles};

/// One-shot teleport target, consumed exactly once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleportRequest {
    /// Target surface position (world space); the body center is placed a
    /// half-height above it.
    pub target: Vector3<f32>,
}

/// Stateless teleport application.
pub struct TeleportResolver;

impl TeleportResolver {
    /// Atomically reposition the player body and reset its motion state.
    ///
    /// Sets translation to the target offset by the fixed half-height, zeroes
    /// linear velocity, resets vertical velocity, and clears the jump flag.
    /// No interpolation.
    pub fn apply(
        world: &mut SceneWorld,
        handles: CharacterHandles,
        state: &mut LocomotionState,
        request: TeleportRequest,
    ) -> Result<(), WorldError> {
        let body = world.body_mut(handles.body).ok_or(WorldError::UnknownBody)?;

        let landing = request.target + Vector3::new(0.0, PLAYER_HALF_HEIGHT, 0.0);
        body.set_translation(landing, true);
        body.set_linvel(Vector3::zeros(), true);

        state.vertical_velocity = 0.0;
        state.jumping = false;
        state.grounded = true;

        log::debug!(
            "teleported player to ({:.2}, {:.2}, {:.2})",
            landing.x,
            landing.y,
            landing.z
        );
        Ok(())
    }
}
