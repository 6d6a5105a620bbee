//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Selectable weapon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    #[default]
    Pistol,
    Rifle,
    Shotgun,
    /// The only weapon with a zoom scope.
    Sniper,
}

impl WeaponType {
    pub const ALL: [WeaponType; 4] = [
        WeaponType::Pistol,
        WeaponType::Rifle,
        WeaponType::Shotgun,
        WeaponType::Sniper,
    ];

    /// Position in the catalog (0-based).
    pub fn index(self) -> usize {
        match self {
            WeaponType::Pistol => 0,
            WeaponType::Rifle => 1,
            WeaponType::Shotgun => 2,
            WeaponType::Sniper => 3,
        }
    }

    /// Weapon bound to quick-switch slot `n` (1-based, as on the number row).
    pub fn from_slot(n: u8) -> Option<WeaponType> {
        match n {
            1..=4 => Some(Self::ALL[(n - 1) as usize]),
            _ => None,
        }
    }
}

/// Timed global modifier dropped by powerup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Halves every target's speed.
    SlowMo,
    /// Firing does not consume ammo.
    InfiniteAmmo,
    /// Score gains are doubled.
    DoublePoints,
}

/// Target type, fixed at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Normal,
    Heavy,
    /// Shooting it gives nothing; letting it escape costs nothing.
    Penalty,
    Powerup(PowerupKind),
}

/// Top-level match state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    #[default]
    Setup,
    Running,
    Paused,
    /// Terminal for the current session.
    GameOver,
}

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    Time,
    Misses,
    Win,
}

/// Difficulty preset name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// How kills and powerups convert to points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringPolicy {
    /// Per-kind base points scaled by the combo multiplier.
    #[default]
    Combo,
    /// Difficulty's flat points per kill, no combo system.
    Flat,
}

/// Firing state of the equipped weapon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponStatus {
    #[default]
    Ready,
    /// Post-shot fire-rate interval.
    Cooldown,
    Reloading,
}

/// Why an intent was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenyReason {
    Reloading,
    Cooldown,
    MagazineFull,
    NotScoped,
}
