//! JSON simulation configuration.
//!
//! Everything here has a sensible default, so `SimConfig::default()` runs a
//! playable simulation with no file at all. A JSON file overrides stats,
//! the map layout, the RNG seed and the cast-death policy for reproducible
//! scenarios.

use serde::Deserialize;
use std::path::Path;

/// What happens to a pending cast when its caster dies mid-cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CastDeathPolicy {
    /// Death cancels the cast; the effect never fires (default).
    CancelOnDeath,
    /// The effect still fires at its trigger time, posthumously.
    FireAfterDeath,
}

impl Default for CastDeathPolicy {
    fn default() -> Self {
        CastDeathPolicy::CancelOnDeath
    }
}

/// Spawn-time stat block for one combatant archetype.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatBlock {
    pub health: f32,
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
    #[serde(default = "default_flat_damage")]
    pub flat_damage: f32,
}

fn default_flat_damage() -> f32 {
    1.0
}

fn default_stat_multiplier() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    /// Random seed for deterministic runs. `None` seeds from entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,

    #[serde(default)]
    pub cast_death_policy: CastDeathPolicy,

    /// Difficulty scaling applied to enemy health/attack/defense at spawn.
    #[serde(default = "default_stat_multiplier")]
    pub stat_multiplier: f32,

    #[serde(default = "default_player_stats")]
    pub player: StatBlock,
    #[serde(default = "default_enemy_stats")]
    pub enemy: StatBlock,

    /// Boss stats scale with stage: `health + 50 * stage`, `attack + 5 * stage`.
    #[serde(default = "default_boss_stats")]
    pub boss: StatBlock,

    /// Map rows, one string per row, '1' marking a wall tile.
    #[serde(default = "default_layout")]
    pub layout: Vec<String>,
}

fn default_player_stats() -> StatBlock {
    StatBlock {
        health: 100.0,
        attack: 20.0,
        defense: 10.0,
        speed: 5.0,
        flat_damage: 2.0,
    }
}

fn default_enemy_stats() -> StatBlock {
    StatBlock {
        health: 40.0,
        attack: 10.0,
        defense: 5.0,
        speed: 5.0,
        flat_damage: 1.0,
    }
}

fn default_boss_stats() -> StatBlock {
    StatBlock {
        health: 200.0,
        attack: 25.0,
        defense: 10.0,
        speed: 4.0,
        flat_damage: 1.0,
    }
}

fn default_layout() -> Vec<String> {
    vec![
        "1111111111111111".to_string(),
        "1000000000000001".to_string(),
        "1000000000000001".to_string(),
        "1000001100000001".to_string(),
        "1000001100000001".to_string(),
        "1000000000000001".to_string(),
        "1000000000000001".to_string(),
        "1000000000000001".to_string(),
        "1000000000000001".to_string(),
        "1111111111111111".to_string(),
    ]
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            cast_death_policy: CastDeathPolicy::default(),
            stat_multiplier: 1.0,
            player: default_player_stats(),
            enemy: default_enemy_stats(),
            boss: default_boss_stats(),
            layout: default_layout(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, String> {
        let config: SimConfig =
            serde_json::from_str(contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.layout.is_empty() {
            return Err("layout must have at least one row".to_string());
        }
        let width = self.layout[0].len();
        if width == 0 {
            return Err("layout rows must be non-empty".to_string());
        }
        for (i, row) in self.layout.iter().enumerate() {
            if row.len() != width {
                return Err(format!("layout row {} has width {}, expected {}", i, row.len(), width));
            }
        }
        if self.stat_multiplier <= 0.0 {
            return Err("stat_multiplier must be positive".to_string());
        }
        for stats in [&self.player, &self.enemy, &self.boss] {
            if stats.health <= 0.0 {
                return Err("health must be positive".to_string());
            }
            if stats.defense < 0.0 {
                return Err("defense must be non-negative".to_string());
            }
        }
        Ok(())
    }
}
