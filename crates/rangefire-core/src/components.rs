//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in the simulation crate, not components.

use serde::{Deserialize, Serialize};

use crate::enums::TargetKind;

/// Gameplay identity of a target entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Unique for the lifetime of a match; what the renderer refers to.
    pub id: u32,
    pub kind: TargetKind,
    /// Always > 0 while the entity exists.
    pub health: i32,
}

/// Target movement state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// +1.0 or -1.0; flips at the lateral bound.
    pub side_direction: f64,
    /// Current lateral speed (units/s), possibly slow-mo scaled.
    pub side_speed: f64,
    /// Current approach speed (units/s), possibly slow-mo scaled.
    pub forward_speed: f64,
    /// Unmodified lateral speed, restored when slow-mo ends.
    pub base_side_speed: f64,
    /// Unmodified approach speed, restored when slow-mo ends.
    pub base_forward_speed: f64,
}
