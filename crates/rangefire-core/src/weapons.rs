//! Static weapon parameters.
//!
//! The catalog is built once at startup and never mutated during a match.

use serde::{Deserialize, Serialize};

use crate::enums::WeaponType;
use crate::error::ConfigError;

/// Immutable per-weapon parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    pub max_ammo: u32,
    /// Damage per pellet.
    pub damage: i32,
    /// Minimum interval between shots (ms).
    pub fire_rate_ms: u32,
    pub reload_time_ms: u32,
    #[serde(default = "default_pellets")]
    pub pellet_count: u32,
    /// Random aim offset range per pellet.
    #[serde(default)]
    pub spread_radius: f64,
    pub recoil: f64,
    /// Per-tick geometric decay factor of accumulated recoil.
    pub recoil_recovery: f64,
    /// Keeps firing while the trigger is held.
    #[serde(default)]
    pub automatic: bool,
}

fn default_pellets() -> u32 {
    1
}

/// Weapon lookup keyed by `WeaponType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponCatalog {
    specs: [WeaponSpec; 4],
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl WeaponCatalog {
    /// The stock arsenal.
    pub fn standard() -> Self {
        Self {
            specs: [
                WeaponSpec {
                    name: "Pistol".into(),
                    max_ammo: 12,
                    damage: 10,
                    fire_rate_ms: 300,
                    reload_time_ms: 1200,
                    pellet_count: 1,
                    spread_radius: 0.0,
                    recoil: 0.02,
                    recoil_recovery: 0.8,
                    automatic: false,
                },
                WeaponSpec {
                    name: "Rifle".into(),
                    max_ammo: 30,
                    damage: 8,
                    fire_rate_ms: 150,
                    reload_time_ms: 2000,
                    pellet_count: 1,
                    spread_radius: 0.0,
                    recoil: 0.015,
                    recoil_recovery: 0.85,
                    automatic: true,
                },
                WeaponSpec {
                    name: "Shotgun".into(),
                    max_ammo: 8,
                    damage: 25,
                    fire_rate_ms: 800,
                    reload_time_ms: 2500,
                    pellet_count: 5,
                    spread_radius: 0.05,
                    recoil: 0.06,
                    recoil_recovery: 0.7,
                    automatic: false,
                },
                WeaponSpec {
                    name: "Sniper".into(),
                    max_ammo: 5,
                    damage: 50,
                    fire_rate_ms: 1200,
                    reload_time_ms: 3000,
                    pellet_count: 1,
                    spread_radius: 0.0,
                    recoil: 0.1,
                    recoil_recovery: 0.6,
                    automatic: false,
                },
            ],
        }
    }

    /// Stock arsenal with recoil disabled (kick always zero).
    pub fn without_recoil() -> Self {
        let mut catalog = Self::standard();
        for spec in &mut catalog.specs {
            spec.recoil = 0.0;
        }
        catalog
    }

    pub fn get(&self, weapon: WeaponType) -> &WeaponSpec {
        &self.specs[weapon.index()]
    }

    /// Replace one entry (custom loadouts, tests).
    pub fn with_spec(mut self, weapon: WeaponType, spec: WeaponSpec) -> Self {
        self.specs[weapon.index()] = spec;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for spec in &self.specs {
            if spec.max_ammo == 0 {
                return Err(invalid("max_ammo", "must be > 0"));
            }
            if spec.damage <= 0 {
                return Err(invalid("damage", "must be > 0"));
            }
            if spec.reload_time_ms == 0 {
                return Err(invalid("reload_time_ms", "must be > 0"));
            }
            if spec.pellet_count == 0 {
                return Err(invalid("pellet_count", "must be >= 1"));
            }
            if spec.spread_radius < 0.0 || spec.recoil < 0.0 {
                return Err(invalid("spread_radius/recoil", "must be >= 0"));
            }
            if spec.recoil_recovery <= 0.0 || spec.recoil_recovery >= 1.0 {
                return Err(invalid("recoil_recovery", "must be in (0, 1)"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidField { field, reason }
}
