//! ECS systems that operate on the target world each tick.
//!
//! Systems are pure functions over `&mut World` (or `&World` for read-only).
//! They do not own state; all state lives in components.

pub mod cleanup;
pub mod movement;
pub mod snapshot;
