//! Physics world wrapper: static scene geometry plus the locomoting characters.
//!
//! This builds an in-memory Rapier scene from a set of static collider
//! definitions (typically sourced from the imported glTF scene) and hosts the
//! kinematic-velocity bodies of the player and companion.
//!
//! Design notes
//! - Statics are immutable after construction. We sort definitions by `id`
//!   before insertion so identical inputs build identical worlds.
//! - Characters are kinematic-velocity bodies: their motion is driven by the
//!   velocity/translation the locomotion code writes each frame, never by
//!   impulses.
//! - The world is query-focused: it prepares enough Rapier state to run shape
//!   casts and the `KinematicCharacterController`; it does not step a dynamics
//!   simulation.
//! - Collision groups partition the scene so the player and companion both
//!   collide with statics but never with each other.

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use rapier3d::prelude::{
    BroadPhaseBvh, Collider, ColliderBuilder, ColliderHandle, ColliderSet, Group,
    IntegrationParameters, InteractionGroups, InteractionTestMode, NarrowPhase, QueryFilter,
    QueryPipeline, RigidBody, RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
};

use crate::error::WorldError;

/// Group occupied by static scene geometry.
pub const STATIC_GROUP: Group = Group::GROUP_1;
/// Group occupied by the player capsule.
pub const PLAYER_GROUP: Group = Group::GROUP_2;
/// Group occupied by the companion capsule.
pub const COMPANION_GROUP: Group = Group::GROUP_3;

/// Canonical, renderer-agnostic definition of an immutable scene collider.
///
/// The scene-loading layer maps imported meshes to these, then calls
/// [`SceneWorld::build`].
///
/// Conventions
/// - Units are meters; rotation is a unit quaternion.
/// - `id` fixes insertion order so rebuilt worlds are deterministic.
#[derive(Clone, Debug)]
pub struct StaticColliderDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vector3<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    /// Collider shape parameters.
    pub shape: StaticShapeDef,
}

/// Supported static collider shapes.
///
/// Keep this intentionally small and deterministic. Extend as needed.
#[derive(Clone, Debug)]
pub enum StaticShapeDef {
    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vector3<f32> },

    /// Sphere/ball (meters).
    Ball { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },
}

/// Which locomoting entity a character body belongs to.
///
/// Determines the collision group: both kinds interact with [`STATIC_GROUP`]
/// only, so the companion neither pushes nor gets pushed by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharacterKind {
    Player,
    Companion,
}

impl CharacterKind {
    /// Collision group this kind occupies.
    pub const fn group(self) -> Group {
        match self {
            Self::Player => PLAYER_GROUP,
            Self::Companion => COMPANION_GROUP,
        }
    }

    /// Interaction groups for the character's collider: member of its own
    /// group, filtered to statics only.
    pub fn interaction_groups(self) -> InteractionGroups {
        InteractionGroups::new(self.group(), STATIC_GROUP, InteractionTestMode::And)
    }
}

/// Spawn parameters for one character capsule.
#[derive(Clone, Copy, Debug)]
pub struct CharacterSpawn {
    pub kind: CharacterKind,
    /// Initial capsule-center position (world space).
    pub position: Vector3<f32>,
    /// Capsule radius (meters).
    pub radius: f32,
    /// Capsule cap half-height (meters).
    pub half_height: f32,
}

/// Handles of a spawned character's body and collider.
#[derive(Clone, Copy, Debug)]
pub struct CharacterHandles {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// In-memory Rapier structures for scene queries and character control.
///
/// Statics are fixed bodies; characters are kinematic-velocity bodies. The
/// broad phase is refreshed whenever colliders are inserted so shape casts
/// see the full static set.
pub struct SceneWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl SceneWorld {
    /// Build a world from a list of static collider definitions.
    ///
    /// The input is sorted by `id` before insertion; NaN/invalid values should
    /// be filtered by the scene-loading layer.
    pub fn build(mut defs: Vec<StaticColliderDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut world = Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::default(),
        };

        let mut modified = Vec::with_capacity(defs.len());
        for def in defs {
            let iso = Isometry3::from_parts(Translation3::from(def.translation), def.rotation);
            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = world.bodies.insert(rb);

            let collider = collider_from_def(&def);
            let co_handle =
                world
                    .colliders
                    .insert_with_parent(collider, rb_handle, &mut world.bodies);
            modified.push(co_handle);
        }

        world.sync_broad_phase(&modified);
        world
    }

    /// Insert a character as a kinematic-velocity body with a Y-capsule
    /// collider in its kind's collision group.
    pub fn spawn_character(&mut self, spawn: CharacterSpawn) -> CharacterHandles {
        let rb = RigidBodyBuilder::kinematic_velocity_based()
            .translation(spawn.position)
            .build();
        let body = self.bodies.insert(rb);

        let collider = ColliderBuilder::capsule_y(spawn.half_height, spawn.radius)
            .collision_groups(spawn.kind.interaction_groups())
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        self.sync_broad_phase(&[collider]);

        log::info!(
            "spawned {:?} character at ({:.2}, {:.2}, {:.2})",
            spawn.kind,
            spawn.position.x,
            spawn.position.y,
            spawn.position.z
        );

        CharacterHandles { body, collider }
    }

    /// Release a character's body and collider.
    ///
    /// Must be called on session teardown so no controller outlives the world
    /// it queries. Removing an already-removed character is an error.
    pub fn remove_character(&mut self, handles: CharacterHandles) -> Result<(), WorldError> {
        if !self.colliders.contains(handles.collider) {
            return Err(WorldError::UnknownCollider);
        }
        if !self.bodies.contains(handles.body) {
            return Err(WorldError::UnknownBody);
        }

        // Removing the body removes its attached colliders as well. We never
        // step a dynamics pipeline, so the island/joint sets are empty
        // scratch structures.
        let mut island_manager = rapier3d::prelude::IslandManager::new();
        let mut impulse_joints = rapier3d::prelude::ImpulseJointSet::new();
        let mut multibody_joints = rapier3d::prelude::MultibodyJointSet::new();
        self.bodies.remove(
            handles.body,
            &mut island_manager,
            &mut self.colliders,
            &mut impulse_joints,
            &mut multibody_joints,
            true,
        );

        // Drop the collider from broad-phase coverage so later queries never
        // chase a dead handle.
        let mut events = Vec::new();
        self.broad_phase.update(
            &IntegrationParameters::default(),
            &self.colliders,
            &self.bodies,
            &[],
            &[handles.collider],
            &mut events,
        );
        Ok(())
    }

    /// Create a borrowed `QueryPipeline` view suitable for shape casts and the
    /// kinematic character controller.
    ///
    /// Provide a `QueryFilter` that scopes the query to the groups the caller
    /// may collide with and excludes the caller's own body.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    /// Shared borrow of a rigid body, if the handle is live.
    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    /// Exclusive borrow of a rigid body, if the handle is live.
    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Shared borrow of a collider, if the handle is live.
    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    /// World-space position of a body, if the handle is live.
    pub fn body_translation(&self, handle: RigidBodyHandle) -> Option<Vector3<f32>> {
        self.bodies.get(handle).map(|b| *b.translation())
    }

    /// Rebuild broad-phase coverage for the given colliders.
    fn sync_broad_phase(&mut self, modified: &[ColliderHandle]) {
        let mut events = Vec::new();
        self.broad_phase.update(
            &IntegrationParameters::default(),
            &self.colliders,
            &self.bodies,
            modified,
            &[],
            &mut events,
        );
    }
}

/// Build a Rapier collider from a `StaticColliderDef`.
///
/// The pose stored on the fixed rigid body is the collider parent transform,
/// so the collider is created with an identity local transform.
fn collider_from_def(def: &StaticColliderDef) -> Collider {
    let groups = InteractionGroups::new(STATIC_GROUP, Group::ALL, InteractionTestMode::And);
    match &def.shape {
        StaticShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
                .collision_groups(groups)
                .build()
        }

        StaticShapeDef::Ball { radius } => {
            ColliderBuilder::ball(*radius).collision_groups(groups).build()
        }

        StaticShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius)
            .collision_groups(groups)
            .build(),
    }
}
