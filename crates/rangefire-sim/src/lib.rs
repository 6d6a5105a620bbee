//! Gameplay simulation for RANGEFIRE.
//!
//! Owns the target world, the weapon state machine, scoring and the match
//! state machine, driven at a fixed tick rate, and produces `MatchSnapshot`s
//! for the render and HUD collaborators.

pub mod engine;
pub mod hit_resolver;
pub mod powerup;
pub mod query;
pub mod session;
pub mod systems;
pub mod targets;
pub mod timers;
pub mod weapon;
pub mod world_setup;

pub use engine::{MatchConfig, SimulationEngine};
pub use query::{HitQuery, NoHits, PelletRay, ScriptedHits, SphereCaster};
pub use rangefire_core as core;
