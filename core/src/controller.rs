//! Shape-cast movement resolution via Rapier's kinematic character controller.
//!
//! Each locomoting entity owns one [`ShapeCastController`]: a configured
//! `KinematicCharacterController` plus the entity's body/collider handles and
//! its query filter. Controllers are never shared between entities so
//! simultaneous queries cannot cross-talk.
//!
//! The controller only computes corrected movement; it never mutates the
//! body. Callers apply the result.

use nalgebra::Vector3;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::{InteractionGroups, InteractionTestMode, QueryFilter};

use crate::constants::GROUND_PROBE_BIAS_MPS;
use crate::world::{CharacterHandles, CharacterKind, SceneWorld, STATIC_GROUP};

/// Immutable per-entity controller tuning.
///
/// One instance per locomoting entity; the companion uses more permissive
/// slope/step tolerances than the player so it does not get stuck on stairs.
#[derive(Clone, Copy, Debug)]
pub struct CharacterControllerConfig {
    /// Small gap preserved between the character and its surroundings
    /// (meters). Keep small but non-zero for numerical stability.
    pub offset: f32,
    /// Maximum climbable slope angle (degrees).
    pub max_slope_climb_deg: f32,
    /// Minimum slope angle (degrees) before automatic sliding starts.
    pub min_slope_slide_deg: f32,
    /// Autostep maximum height (meters).
    pub autostep_max_height: f32,
    /// Autostep minimum width (meters).
    pub autostep_min_width: f32,
    /// Whether autostep considers dynamic bodies as steppable.
    pub autostep_include_dynamic: bool,
    /// Max downward snap distance when airborne-but-near-surface (meters).
    pub snap_to_ground: f32,
}

impl CharacterControllerConfig {
    /// Player defaults: conservative slopes, ankle-height steps.
    pub const fn player() -> Self {
        Self {
            offset: 0.05,
            max_slope_climb_deg: 45.0,
            min_slope_slide_deg: 50.0,
            autostep_max_height: 0.3,
            autostep_min_width: 0.1,
            autostep_include_dynamic: false,
            snap_to_ground: 0.3,
        }
    }

    /// Companion defaults: better stair climbing so it can follow anywhere
    /// the player walks.
    pub const fn companion() -> Self {
        Self {
            offset: 0.05,
            max_slope_climb_deg: 60.0,
            min_slope_slide_deg: 65.0,
            autostep_max_height: 0.5,
            autostep_min_width: 0.05,
            autostep_include_dynamic: false,
            snap_to_ground: 0.5,
        }
    }

    fn build(&self) -> KinematicCharacterController {
        KinematicCharacterController {
            offset: CharacterLength::Absolute(self.offset),
            max_slope_climb_angle: self.max_slope_climb_deg.to_radians(),
            min_slope_slide_angle: self.min_slope_slide_deg.to_radians(),
            autostep: Some(CharacterAutostep {
                max_height: CharacterLength::Absolute(self.autostep_max_height),
                min_width: CharacterLength::Absolute(self.autostep_min_width),
                include_dynamic_bodies: self.autostep_include_dynamic,
            }),
            snap_to_ground: Some(CharacterLength::Absolute(self.snap_to_ground)),
            ..KinematicCharacterController::default()
        }
    }
}

/// Collision-corrected result of one movement resolution.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedMovement {
    /// Maximal collision-free displacement toward the desired one.
    pub translation: Vector3<f32>,
    /// Whether the character has ground support after the move.
    pub grounded: bool,
}

/// Per-entity shape-cast resolver.
pub struct ShapeCastController {
    controller: KinematicCharacterController,
    handles: CharacterHandles,
    kind: CharacterKind,
}

impl ShapeCastController {
    pub fn new(
        config: &CharacterControllerConfig,
        kind: CharacterKind,
        handles: CharacterHandles,
    ) -> Self {
        Self {
            controller: config.build(),
            handles,
            kind,
        }
    }

    /// Handles of the body/collider this controller moves.
    pub fn handles(&self) -> CharacterHandles {
        self.handles
    }

    /// Resolve a desired displacement against the static scene.
    ///
    /// Returns the corrected displacement plus grounded flag, or `None` when
    /// the collider or body handle is stale; the caller skips the physics
    /// portion of its update for this frame and retries next frame.
    ///
    /// The desired displacement may be a zero vector; that performs a pure
    /// contact/ground query without moving the capsule.
    pub fn resolve_movement(
        &self,
        world: &SceneWorld,
        desired: Vector3<f32>,
        dt: f32,
    ) -> Option<ResolvedMovement> {
        let Some(collider) = world.collider(self.handles.collider) else {
            log::warn!("{:?} collider handle is stale; skipping movement", self.kind);
            return None;
        };
        let body = world.body(self.handles.body)?;

        // Query only static geometry; the other character is deliberately
        // invisible to this cast (non-interacting groups).
        let filter = QueryFilter::default()
            .exclude_rigid_body(self.handles.body)
            .groups(InteractionGroups::new(
                self.kind.group(),
                STATIC_GROUP,
                InteractionTestMode::And,
            ));
        let query_pipeline = world.query_pipeline(filter);

        let corrected = self.controller.move_shape(
            dt,
            &query_pipeline,
            collider.shape(),
            body.position(),
            desired,
            |_| {},
        );

        Some(ResolvedMovement {
            translation: corrected.translation,
            grounded: corrected.grounded,
        })
    }

    /// Ground probe used by jump-start detection.
    ///
    /// Casts with a tiny downward bias (no planar intent) so snap-to-ground
    /// can latch; the probe result is discarded except for the grounded flag.
    pub fn probe_ground(&self, world: &SceneWorld, dt: f32) -> bool {
        let bias = Vector3::new(0.0, -GROUND_PROBE_BIAS_MPS * dt, 0.0);
        self.resolve_movement(world, bias, dt)
            .map(|r| r.grounded)
            .unwrap_or(false)
    }
}
