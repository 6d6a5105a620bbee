//! Snapshot system: reads the target world and assembles a MatchSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use rangefire_core::components::Target;
use rangefire_core::enums::{GameOverReason, MatchPhase};
use rangefire_core::events::GameEvent;
use rangefire_core::state::*;
use rangefire_core::types::{Position, SimTime};

use crate::world_setup::target_color;

/// Build the render view of every live target, ordered by id.
pub fn build_targets(world: &World, target_size: f64) -> Vec<TargetView> {
    let mut targets: Vec<TargetView> = world
        .query::<(&Target, &Position)>()
        .iter()
        .map(|(_, (target, pos))| TargetView {
            id: target.id,
            kind: target.kind,
            position: *pos,
            health: target.health,
            color: target_color(target.kind),
            size: target_size,
        })
        .collect();
    targets.sort_by_key(|t| t.id);
    targets
}

/// Assemble the full snapshot from the per-component views.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    time: &SimTime,
    phase: MatchPhase,
    game_over_reason: Option<GameOverReason>,
    targets: Vec<TargetView>,
    weapon: WeaponView,
    score: ScoreView,
    powerup: PowerupView,
    events: Vec<GameEvent>,
    summary: Option<MatchSummary>,
) -> MatchSnapshot {
    MatchSnapshot {
        time: *time,
        phase,
        game_over_reason,
        targets,
        weapon,
        score,
        powerup,
        events,
        summary,
    }
}
