//! Data-driven game balance
//!
//! Every value defaults to the canonical constant in [`crate::consts`], so a
//! tuning file only needs the fields it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::PowerUpKind;

/// Per-kind power-up balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpTuning {
    /// How long the effect lasts once picked up
    pub duration_ms: u64,
    /// Relative spawn weight (weights need not sum to 1)
    pub weight: f64,
}

/// Balance table for the three power-up kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTable {
    pub speed: PowerUpTuning,
    pub shield: PowerUpTuning,
    pub magnet: PowerUpTuning,
}

impl Default for PowerUpTable {
    fn default() -> Self {
        Self {
            speed: PowerUpTuning {
                duration_ms: 10_000,
                weight: 0.6,
            },
            shield: PowerUpTuning {
                duration_ms: 8_000,
                weight: 0.3,
            },
            magnet: PowerUpTuning {
                duration_ms: 5_000,
                weight: 0.1,
            },
        }
    }
}

impl PowerUpTable {
    pub fn get(&self, kind: PowerUpKind) -> &PowerUpTuning {
        match kind {
            PowerUpKind::Speed => &self.speed,
            PowerUpKind::Shield => &self.shield,
            PowerUpKind::Magnet => &self.magnet,
        }
    }

    /// Sum of all spawn weights
    pub fn total_weight(&self) -> f64 {
        PowerUpKind::ALL.iter().map(|k| self.get(*k).weight).sum()
    }
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,
    pub player_base_speed: f32,
    pub max_rounds: u32,
    pub sheep_to_level_up: u32,
    pub round_time_secs: u32,
    pub combo_window_ms: u64,
    pub combo_score_cap: u32,
    pub transition_ms: u64,
    pub powerup_spawn_chance: f64,
    pub magnet_radius: f32,
    pub magnet_pull: f32,
    pub powerups: PowerUpTable,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            player_base_speed: PLAYER_BASE_SPEED,
            max_rounds: MAX_ROUNDS,
            sheep_to_level_up: SHEEP_TO_LEVEL_UP,
            round_time_secs: ROUND_TIME_SECS,
            combo_window_ms: COMBO_WINDOW_MS,
            combo_score_cap: COMBO_SCORE_CAP,
            transition_ms: TRANSITION_MS,
            powerup_spawn_chance: POWERUP_SPAWN_CHANCE,
            magnet_radius: MAGNET_RADIUS,
            magnet_pull: MAGNET_PULL,
            powerups: PowerUpTable::default(),
        }
    }
}

impl Tuning {
    /// Parse a tuning document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {:?}", path);
                    tuning
                }
                Err(e) => {
                    log::warn!("Failed to parse tuning {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read tuning {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Round time in milliseconds
    pub fn round_time_ms(&self) -> u64 {
        u64::from(self.round_time_secs) * 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_tuning_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_rounds": 3, "powerup_spawn_chance": 0.5 }"#)
            .expect("valid json");
        assert_eq!(tuning.max_rounds, 3);
        assert_eq!(tuning.powerup_spawn_chance, 0.5);
        assert_eq!(tuning.sheep_to_level_up, SHEEP_TO_LEVEL_UP);
        assert_eq!(tuning.powerups, PowerUpTable::default());
    }

    #[test]
    fn test_bad_tuning_is_an_error() {
        assert!(Tuning::from_json("{ max_rounds: }").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tuning = Tuning::load(Path::new("/definitely/not/here/tuning.json"));
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_total_weight() {
        let table = PowerUpTable::default();
        assert!((table.total_weight() - 1.0).abs() < 1e-9);
        assert_eq!(table.get(PowerUpKind::Shield).duration_ms, 8_000);
    }
}
