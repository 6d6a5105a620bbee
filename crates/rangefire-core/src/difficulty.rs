//! Difficulty presets, loaded before match start and read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::enums::Difficulty;
use crate::error::ConfigError;

/// Per-match tuning supplied by the setup screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Approximate target diameter.
    pub target_size: f64,
    /// Delay before an escaped target is replaced (ms).
    pub spawn_delay_ms: u32,
    /// Baseline lateral speed (units/s).
    pub lateral_speed: f64,
    /// Baseline approach speed (units/s).
    pub forward_speed: f64,
    pub match_duration_secs: u32,
    /// Points per kill under the flat scoring policy.
    pub points_per_kill: i64,
    pub max_misses: u32,
    pub winning_score: i64,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self::preset(Difficulty::Normal)
    }
}

impl DifficultySettings {
    pub fn preset(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                target_size: 1.5,
                spawn_delay_ms: 900,
                lateral_speed: 0.06,
                forward_speed: 0.6,
                match_duration_secs: 90,
                points_per_kill: 5,
                max_misses: 10,
                winning_score: 1000,
            },
            Difficulty::Normal => Self {
                target_size: 1.2,
                spawn_delay_ms: 700,
                lateral_speed: 0.09,
                forward_speed: 0.9,
                match_duration_secs: 60,
                points_per_kill: 10,
                max_misses: 7,
                winning_score: 2000,
            },
            Difficulty::Hard => Self {
                target_size: 0.9,
                spawn_delay_ms: 500,
                lateral_speed: 0.12,
                forward_speed: 1.5,
                match_duration_secs: 45,
                points_per_kill: 15,
                max_misses: 3,
                winning_score: 10_000,
            },
        }
    }

    /// Look up a preset by its lowercase name.
    pub fn named(name: &str) -> Result<Self, ConfigError> {
        let difficulty = match name.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "normal" => Difficulty::Normal,
            "hard" => Difficulty::Hard,
            _ => {
                return Err(ConfigError::UnknownDifficulty {
                    name: name.to_string(),
                })
            }
        };
        Ok(Self::preset(difficulty))
    }

    /// Decode and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_size.is_nan() || self.target_size <= 0.0 {
            return Err(invalid("target_size", "must be > 0"));
        }
        if self.lateral_speed < 0.0 {
            return Err(invalid("lateral_speed", "must be >= 0"));
        }
        if self.forward_speed.is_nan() || self.forward_speed <= 0.0 {
            return Err(invalid("forward_speed", "must be > 0"));
        }
        if self.match_duration_secs == 0 {
            return Err(invalid("match_duration_secs", "must be > 0"));
        }
        if self.max_misses == 0 {
            return Err(invalid("max_misses", "must be > 0"));
        }
        if self.winning_score <= 0 {
            return Err(invalid("winning_score", "must be > 0"));
        }
        if self.points_per_kill < 0 {
            return Err(invalid("points_per_kill", "must be >= 0"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidField { field, reason }
}
