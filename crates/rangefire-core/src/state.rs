//! Match state snapshot: the complete visible state handed to the
//! render/HUD collaborators after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Position, SimTime};

/// Complete match state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub time: SimTime,
    pub phase: MatchPhase,
    pub game_over_reason: Option<GameOverReason>,
    pub targets: Vec<TargetView>,
    pub weapon: WeaponView,
    pub score: ScoreView,
    pub powerup: PowerupView,
    /// Events raised since the previous snapshot, in order.
    pub events: Vec<GameEvent>,
    /// Final result, present once the match is over.
    pub summary: Option<MatchSummary>,
}

/// A live target as seen by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub id: u32,
    pub kind: TargetKind,
    pub position: Position,
    pub health: i32,
    /// Tint as 0xRRGGBB.
    pub color: u32,
    /// Approximate diameter, used for sprite scale and hit radius.
    pub size: f64,
}

/// Equipped weapon status for the HUD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponView {
    pub weapon: WeaponType,
    pub ammo: u32,
    pub max_ammo: u32,
    pub status: WeaponStatus,
    /// Drives field of view and aim sensitivity in the renderer.
    pub is_zoomed: bool,
    pub trigger_held: bool,
    pub recoil_pitch: f64,
    pub recoil_yaw: f64,
}

/// Running score for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: i64,
    pub combo: u32,
    pub best_combo: u32,
    pub total_shots: u32,
    pub total_hits: u32,
    pub total_misses: u32,
    pub max_misses: u32,
    pub remaining_secs: u32,
    pub winning_score: i64,
}

/// Active powerup, if any.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerupView {
    pub active: Option<PowerupKind>,
    pub remaining_ms: f64,
}

/// Final result handed to the leaderboard collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub reason: GameOverReason,
    pub score: i64,
    /// Rounded to the nearest whole percent; 0 when no shots were fired.
    pub accuracy_percent: u32,
    pub total_hits: u32,
    pub best_combo: u32,
}
