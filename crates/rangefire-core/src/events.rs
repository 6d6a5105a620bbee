//! Events emitted by the simulation for the audio and HUD collaborators.
//!
//! Fire-and-forget: the simulation never waits on their handling.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::state::MatchSummary;

/// Gameplay event drained into every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A shot left the barrel.
    ShotFired { weapon: WeaponType },
    /// Trigger pulled on an empty magazine.
    DryFire { weapon: WeaponType },
    /// An intent was rejected.
    FireDenied { reason: DenyReason },
    /// A pellet damaged a normal or heavy target. Precedes `Kill` on the
    /// killing blow, with `remaining_health` 0.
    Hit {
        target_id: u32,
        damage: i32,
        remaining_health: i32,
    },
    /// A whole shot hit nothing.
    Miss,
    /// A normal or heavy target was destroyed by damage.
    Kill {
        target_id: u32,
        kind: TargetKind,
        points: i64,
    },
    /// A penalty or powerup target was shot and removed.
    TargetDestroyed { target_id: u32, kind: TargetKind },
    /// Combo crossed the display threshold.
    Combo { combo: u32 },
    PowerupActivated { kind: PowerupKind },
    PowerupDeactivated { kind: PowerupKind },
    ReloadStart { weapon: WeaponType },
    ReloadComplete { weapon: WeaponType },
    WeaponSwitched { weapon: WeaponType },
    ZoomChanged { zoomed: bool },
    /// Score moved by `delta` (already clamped), now at `score`.
    ScoreChanged { delta: i64, score: i64 },
    TargetSpawned { target_id: u32, kind: TargetKind },
    /// A target reached the escape boundary.
    TargetEscaped { target_id: u32, kind: TargetKind },
    Paused,
    Resumed,
    /// Emitted exactly once per match.
    MatchEnded {
        reason: GameOverReason,
        summary: MatchSummary,
    },
}
