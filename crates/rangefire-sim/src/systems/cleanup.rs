//! Cleanup system: removes targets that crossed the escape boundary.

use hecs::{Entity, World};

use rangefire_core::components::Target;
use rangefire_core::constants::ESCAPE_DEPTH;
use rangefire_core::enums::TargetKind;
use rangefire_core::types::Position;

/// A target that reached the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escape {
    pub target_id: u32,
    pub kind: TargetKind,
}

/// Despawn every target past the escape depth and report them in id order.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) -> Vec<Escape> {
    despawn_buffer.clear();
    let mut escapes = Vec::new();

    for (entity, (target, pos)) in world.query_mut::<(&Target, &Position)>() {
        if pos.z > ESCAPE_DEPTH {
            despawn_buffer.push(entity);
            escapes.push(Escape {
                target_id: target.id,
                kind: target.kind,
            });
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }

    escapes.sort_by_key(|e| e.target_id);
    escapes
}
