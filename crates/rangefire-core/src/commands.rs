//! Player intents delivered by the input collaborator.
//!
//! Intents arrive already debounced and are queued for processing at the
//! next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Weapon ---
    /// Trigger pressed. Fires once; automatic weapons keep firing while held.
    FireStart,
    /// Trigger released.
    FireStop,
    /// Manual reload.
    Reload,
    /// Equip a different weapon.
    SwitchWeapon { weapon: WeaponType },
    /// Scope in/out (sniper only).
    ToggleZoom,

    // --- Match control ---
    /// Start a new match (from setup, or restart after game over).
    StartMatch,
    /// Flip between running and paused.
    TogglePause,
    /// Pause the match.
    Pause,
    /// Resume a paused match.
    Resume,
}
