//! Entity spawn factories for target entities.
//!
//! Draws the target type, places it behind the play area and builds the
//! component bundle.

use hecs::World;
use rand::Rng;

use rangefire_core::components::{Motion, Target};
use rangefire_core::constants::*;
use rangefire_core::enums::{PowerupKind, TargetKind};
use rangefire_core::types::Position;

/// Baseline target speeds (units/s) from the difficulty settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSpeeds {
    pub lateral: f64,
    pub forward: f64,
}

/// Weighted type draw. Checked in order: powerup (only when none is
/// active), penalty, heavy, else normal.
pub fn roll_target_kind(rng: &mut impl Rng, powerup_blocked: bool) -> TargetKind {
    let roll: f64 = rng.gen();
    if roll < SPAWN_POWERUP_THRESHOLD && !powerup_blocked {
        let sub: f64 = rng.gen();
        let kind = if sub < 0.33 {
            PowerupKind::SlowMo
        } else if sub < 0.66 {
            PowerupKind::InfiniteAmmo
        } else {
            PowerupKind::DoublePoints
        };
        return TargetKind::Powerup(kind);
    }
    if roll < SPAWN_PENALTY_THRESHOLD {
        TargetKind::Penalty
    } else if roll < SPAWN_HEAVY_THRESHOLD {
        TargetKind::Heavy
    } else {
        TargetKind::Normal
    }
}

/// Starting health for a target type.
pub fn target_health(kind: TargetKind) -> i32 {
    match kind {
        TargetKind::Normal => NORMAL_TARGET_HEALTH,
        TargetKind::Heavy => HEAVY_TARGET_HEALTH,
        TargetKind::Penalty => PENALTY_TARGET_HEALTH,
        TargetKind::Powerup(_) => POWERUP_TARGET_HEALTH,
    }
}

/// Render tint (0xRRGGBB).
pub fn target_color(kind: TargetKind) -> u32 {
    match kind {
        TargetKind::Normal => 0xFFFFFF,
        TargetKind::Heavy => 0xADD8E6,
        TargetKind::Penalty => 0xFF0000,
        TargetKind::Powerup(_) => 0xFFFF00,
    }
}

/// Random placement behind the play area.
pub fn spawn_position(rng: &mut impl Rng) -> Position {
    let x = (rng.gen::<f64>() - 0.5) * SPAWN_LATERAL_SPREAD;
    let y = SPAWN_HEIGHT_MIN + rng.gen::<f64>() * SPAWN_HEIGHT_RANGE;
    let z = SPAWN_DEPTH_NEAR - rng.gen::<f64>() * SPAWN_DEPTH_RANGE;
    Position::new(x, y, z)
}

/// Spawn one target entity. `speed_factor` pre-scales the current speeds
/// (slow-mo) while the baselines keep the unmodified values.
pub fn spawn_target(
    world: &mut World,
    rng: &mut impl Rng,
    id: u32,
    kind: TargetKind,
    speeds: TargetSpeeds,
    speed_factor: f64,
) -> hecs::Entity {
    let position = spawn_position(rng);
    let side_direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

    let motion = Motion {
        side_direction,
        side_speed: speeds.lateral * speed_factor,
        forward_speed: speeds.forward * speed_factor,
        base_side_speed: speeds.lateral,
        base_forward_speed: speeds.forward,
    };

    world.spawn((
        Target {
            id,
            kind,
            health: target_health(kind),
        },
        position,
        motion,
    ))
}
