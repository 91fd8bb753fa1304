//! Character locomotion and physics-integration core for the waywalk XR
//! walkthrough.
//!
//! This crate is the per-frame control loop that fuses keyboard input, XR
//! controller input, and head tracking into stable, collision-respecting
//! movement for the player avatar and its companion, against a Rapier query
//! world built from the imported scene's static geometry.
//!
//! Out of scope (external collaborators): rendering and scene-graph mirroring,
//! glTF loading, visual-impairment overlays, audio. They consume this crate
//! through [`sim::Simulation`]: feed a [`input::FrameInput`] snapshot plus a
//! delta time each displayed frame, read back poses, and forward teleport
//! selections to [`sim::Simulation::request_teleport`].

pub mod companion;
pub mod constants;
pub mod controller;
pub mod error;
pub mod input;
pub mod locomotion;
pub mod sim;
pub mod teleport;
pub mod world;

pub use companion::{CompanionConfig, CompanionFollower};
pub use controller::{CharacterControllerConfig, ResolvedMovement, ShapeCastController};
pub use error::WorldError;
pub use input::{
    ButtonStates, FrameInput, HeadPose, InputAggregator, InputIntent, StickAxes, XrButtons,
};
pub use locomotion::{LocomotionConfig, LocomotionState};
pub use sim::{Pose, Simulation, SimulationConfig};
pub use teleport::{TeleportRequest, TeleportResolver};
pub use world::{
    CharacterHandles, CharacterKind, CharacterSpawn, SceneWorld, StaticColliderDef, StaticShapeDef,
};
