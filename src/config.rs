//! Gameplay tuning
//!
//! Every number the simulation uses lives here so a run can be reproduced or
//! rebalanced from a JSON file without recompiling.

use std::path::Path;

use color_eyre::{
    Result,
    eyre::{WrapErr, bail},
};

use crate::entities::{EnemyKind, Player};
use serde::{Deserialize, Serialize};

/// Length of one reference frame in milliseconds. Velocities are expressed
/// in logical pixels per reference frame and scaled by `dt / FRAME_MS`.
pub const FRAME_MS: f32 = 1000.0 / 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logical playfield width
    pub width: f32,
    /// Logical playfield height
    pub height: f32,
    pub starting_lives: u32,

    // Spawning
    pub enemy_interval_ms: f32,
    pub collectible_interval_ms: f32,
    /// Cumulative weights for asteroid / chaser / shooter
    pub enemy_weights: [f32; 3],
    /// Cumulative weights for coin / boost / life / shield / magnet
    pub collectible_weights: [f32; 5],
    /// Difficulty grows by `difficulty_step` every `difficulty_period_ms`
    pub difficulty_period_ms: f32,
    pub difficulty_step: f32,

    // Boss
    pub boss_score_threshold: u32,
    pub boss_bonus: u32,

    // Scoring
    pub kill_points: u32,
    pub combo_window_ms: f32,
    pub combo_cap: u32,
    pub coin_points: u32,
    pub boost_points: u32,

    // Player
    pub player_speed: f32,
    pub dash_speed: f32,
    pub dash_duration_ms: f32,
    pub dash_cooldown_ms: f32,
    pub fire_cooldown_ms: f32,

    // Magnet
    pub magnet_duration_ms: f32,
    pub magnet_radius: f32,
    pub magnet_pull_divisor: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 800.0,
            starting_lives: 3,

            enemy_interval_ms: 1000.0,
            collectible_interval_ms: 2000.0,
            enemy_weights: [0.8, 0.9, 1.0],
            collectible_weights: [0.6, 0.75, 0.85, 0.95, 1.0],
            difficulty_period_ms: 10_000.0,
            difficulty_step: 0.1,

            boss_score_threshold: 1000,
            boss_bonus: 500,

            kill_points: 10,
            combo_window_ms: 2000.0,
            combo_cap: 5,
            coin_points: 10,
            boost_points: 50,

            player_speed: 7.0,
            dash_speed: 15.0,
            dash_duration_ms: 150.0,
            dash_cooldown_ms: 1000.0,
            fire_cooldown_ms: 150.0,

            magnet_duration_ms: 5000.0,
            magnet_radius: 200.0,
            magnet_pull_divisor: 20.0,
        }
    }
}

impl Config {
    /// Load tuning from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("failed to parse config {}", path.display()))?;
        config
            .validate()
            .wrap_err_with(|| format!("invalid config {}", path.display()))?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let (boss_width, _) = EnemyKind::Boss.size();
        if !self.width.is_finite() || self.width < boss_width {
            bail!("width {} is narrower than a boss ({boss_width})", self.width);
        }
        let min_height = Player::SIZE * 2.0;
        if !self.height.is_finite() || self.height < min_height {
            bail!("height {} must be at least {min_height}", self.height);
        }
        if self.starting_lives == 0 {
            bail!("starting_lives must be at least 1");
        }
        if self.combo_cap == 0 {
            bail!("combo_cap must be at least 1");
        }

        for (name, value) in [
            ("enemy_interval_ms", self.enemy_interval_ms),
            ("collectible_interval_ms", self.collectible_interval_ms),
            ("difficulty_period_ms", self.difficulty_period_ms),
            ("combo_window_ms", self.combo_window_ms),
            ("magnet_pull_divisor", self.magnet_pull_divisor),
        ] {
            if !(value.is_finite() && value > 0.0) {
                bail!("{name} must be positive, got {value}");
            }
        }
        for (name, value) in [
            ("difficulty_step", self.difficulty_step),
            ("player_speed", self.player_speed),
            ("dash_speed", self.dash_speed),
            ("dash_duration_ms", self.dash_duration_ms),
            ("dash_cooldown_ms", self.dash_cooldown_ms),
            ("fire_cooldown_ms", self.fire_cooldown_ms),
            ("magnet_duration_ms", self.magnet_duration_ms),
            ("magnet_radius", self.magnet_radius),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                bail!("{name} must not be negative, got {value}");
            }
        }

        check_cumulative("enemy_weights", &self.enemy_weights)?;
        check_cumulative("collectible_weights", &self.collectible_weights)?;
        Ok(())
    }

    /// Difficulty multiplier for the given elapsed game time
    pub fn difficulty_at(&self, game_time_ms: f32) -> f32 {
        1.0 + (game_time_ms / self.difficulty_period_ms).floor() * self.difficulty_step
    }
}

/// Cumulative probabilities: within [0, 1], non-decreasing, ending at 1
fn check_cumulative(name: &str, weights: &[f32]) -> Result<()> {
    let mut previous = 0.0;
    for &weight in weights {
        if !(previous..=1.0).contains(&weight) {
            bail!("{name} must be non-decreasing within [0, 1], got {weights:?}");
        }
        previous = weight;
    }
    if previous != 1.0 {
        bail!("{name} must end at 1.0, got {weights:?}");
    }
    Ok(())
}
