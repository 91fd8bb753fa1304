//! Errors surfaced by the world-registration surface.
//!
//! Per-frame recoverable conditions (stale collider at query time, missing
//! head pose) are `Option`-shaped and handled locally by skipping the affected
//! sub-step; these errors are reserved for API misuse that the caller should
//! hear about, like releasing a character twice.

use thiserror::Error;

/// Failures from world registration and teleport application.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// The rigid-body handle does not exist in this world (already removed,
    /// or it belongs to another world).
    #[error("unknown rigid-body handle")]
    UnknownBody,

    /// The collider handle does not exist in this world.
    #[error("unknown collider handle")]
    UnknownCollider,
}
