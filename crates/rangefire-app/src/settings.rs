//! Host settings read from `RANGEFIRE_*` environment variables.
//!
//! Every variable is optional. Malformed values are logged and replaced by
//! the default.

use std::env;
use std::fs;
use std::path::PathBuf;

use tracing::warn;

use rangefire_core::difficulty::DifficultySettings;
use rangefire_core::enums::ScoringPolicy;
use rangefire_sim::engine::MatchConfig;

pub const DIFFICULTY_VAR: &str = "RANGEFIRE_DIFFICULTY";
pub const SEED_VAR: &str = "RANGEFIRE_SEED";
pub const TIME_SCALE_VAR: &str = "RANGEFIRE_TIME_SCALE";
pub const PLAYER_VAR: &str = "RANGEFIRE_PLAYER";
pub const LEADERBOARD_VAR: &str = "RANGEFIRE_LEADERBOARD";
pub const SCORING_VAR: &str = "RANGEFIRE_SCORING";

const DEFAULT_LEADERBOARD_PATH: &str = "rangefire-leaderboard.json";
const DEFAULT_PLAYER_NAME: &str = "Player";

#[derive(Debug, Clone)]
pub struct Settings {
    pub difficulty: DifficultySettings,
    pub seed: u64,
    /// 1.0 is real time; 0 runs unpaced.
    pub time_scale: f64,
    pub player_name: String,
    pub leaderboard_path: PathBuf,
    pub scoring: ScoringPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        let config = MatchConfig::default();
        Self {
            difficulty: config.difficulty,
            seed: config.seed,
            time_scale: 1.0,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            leaderboard_path: PathBuf::from(DEFAULT_LEADERBOARD_PATH),
            scoring: config.scoring,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from any name-to-value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(value) = lookup(DIFFICULTY_VAR) {
            if let Some(difficulty) = parse_difficulty(&value) {
                settings.difficulty = difficulty;
            }
        }
        if let Some(value) = lookup(SEED_VAR) {
            match value.trim().parse::<u64>() {
                Ok(seed) => settings.seed = seed,
                Err(_) => warn!(var = SEED_VAR, %value, "invalid seed, using default"),
            }
        }
        if let Some(value) = lookup(TIME_SCALE_VAR) {
            match value.trim().parse::<f64>() {
                Ok(scale) if scale.is_finite() && scale >= 0.0 => settings.time_scale = scale,
                _ => warn!(var = TIME_SCALE_VAR, %value, "invalid time scale, using default"),
            }
        }
        if let Some(value) = lookup(PLAYER_VAR).filter(|v| !v.trim().is_empty()) {
            settings.player_name = value.trim().to_string();
        }
        if let Some(value) = lookup(LEADERBOARD_VAR).filter(|v| !v.trim().is_empty()) {
            settings.leaderboard_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(SCORING_VAR) {
            match value.trim().to_ascii_lowercase().as_str() {
                "combo" => settings.scoring = ScoringPolicy::Combo,
                "flat" => settings.scoring = ScoringPolicy::Flat,
                _ => warn!(var = SCORING_VAR, %value, "unknown scoring policy, using default"),
            }
        }

        settings
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            seed: self.seed,
            difficulty: self.difficulty.clone(),
            scoring: self.scoring,
            ..Default::default()
        }
    }
}

/// A preset name, or a path to a JSON settings file.
fn parse_difficulty(value: &str) -> Option<DifficultySettings> {
    let value = value.trim();
    if value.ends_with(".json") {
        let json = match fs::read_to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(path = value, error = %e, "cannot read difficulty file, using default");
                return None;
            }
        };
        return DifficultySettings::from_json(&json)
            .map_err(|e| warn!(path = value, error = %e, "bad difficulty file, using default"))
            .ok();
    }
    DifficultySettings::named(value)
        .map_err(|e| warn!(error = %e, "using default difficulty"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use rangefire_core::enums::Difficulty;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.difficulty, DifficultySettings::preset(Difficulty::Normal));
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.time_scale, 1.0);
        assert_eq!(settings.player_name, "Player");
        assert_eq!(settings.scoring, ScoringPolicy::Combo);
    }

    #[test]
    fn test_reads_all_vars() {
        let settings = Settings::from_lookup(lookup(&[
            (DIFFICULTY_VAR, "hard"),
            (SEED_VAR, "7"),
            (TIME_SCALE_VAR, "0"),
            (PLAYER_VAR, " Ace "),
            (LEADERBOARD_VAR, "/tmp/board.json"),
            (SCORING_VAR, "FLAT"),
        ]));
        assert_eq!(settings.difficulty, DifficultySettings::preset(Difficulty::Hard));
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.time_scale, 0.0);
        assert_eq!(settings.player_name, "Ace");
        assert_eq!(settings.leaderboard_path, PathBuf::from("/tmp/board.json"));
        assert_eq!(settings.scoring, ScoringPolicy::Flat);

        let config = settings.match_config();
        assert_eq!(config.seed, 7);
        assert_eq!(config.scoring, ScoringPolicy::Flat);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let settings = Settings::from_lookup(lookup(&[
            (DIFFICULTY_VAR, "nightmare"),
            (SEED_VAR, "-1"),
            (TIME_SCALE_VAR, "fast"),
            (SCORING_VAR, "bonus"),
        ]));
        let default = Settings::default();
        assert_eq!(settings.difficulty, default.difficulty);
        assert_eq!(settings.seed, default.seed);
        assert_eq!(settings.time_scale, default.time_scale);
        assert_eq!(settings.scoring, default.scoring);
    }

    #[test]
    fn test_difficulty_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let mut custom = DifficultySettings::preset(Difficulty::Easy);
        custom.winning_score = 123;
        fs::write(&path, serde_json::to_string(&custom).unwrap()).unwrap();

        let path_str = path.to_string_lossy().to_string();
        let settings = Settings::from_lookup(lookup(&[(DIFFICULTY_VAR, path_str.as_str())]));
        assert_eq!(settings.difficulty, custom);

        custom.max_misses = 0;
        fs::write(&path, serde_json::to_string(&custom).unwrap()).unwrap();
        let settings = Settings::from_lookup(lookup(&[(DIFFICULTY_VAR, path_str.as_str())]));
        assert_eq!(settings.difficulty, DifficultySettings::default());
    }
}
