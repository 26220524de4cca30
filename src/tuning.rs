//! Data-driven game balance
//!
//! Every field defaults to the matching constant in [`crate::consts`]. A JSON
//! tuning file only needs the keys it wants to override.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Runtime-tunable gameplay values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Milliseconds between ticks
    pub tick_interval_ms: u64,
    /// Fixed seed for the obstacle RNG (None = OS entropy)
    pub seed: Option<u64>,

    // === Player ===
    pub player_start_x: f32,
    pub player_y: f32,
    pub player_radius: f32,

    // === Obstacles ===
    pub obstacle_base_radius: f32,
    pub spawn_y: f32,
    pub cull_y: f32,
    pub spawn_chance_base: f32,
    pub spawn_chance_per_level: f32,
    pub base_speed: f32,
    pub speed_jitter: f32,
    pub speed_growth_per_level: f32,
    pub size_scale_min: f32,
    pub size_scale_jitter: f32,

    // === Scoring ===
    pub points_per_level: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            seed: None,

            player_start_x: PLAYER_START_X,
            player_y: PLAYER_Y,
            player_radius: PLAYER_RADIUS,

            obstacle_base_radius: OBSTACLE_BASE_RADIUS,
            spawn_y: SPAWN_Y,
            cull_y: CULL_Y,
            spawn_chance_base: SPAWN_CHANCE_BASE,
            spawn_chance_per_level: SPAWN_CHANCE_PER_LEVEL,
            base_speed: OBSTACLE_BASE_SPEED,
            speed_jitter: OBSTACLE_SPEED_JITTER,
            speed_growth_per_level: SPEED_GROWTH_PER_LEVEL,
            size_scale_min: SIZE_SCALE_MIN,
            size_scale_jitter: SIZE_SCALE_JITTER,

            points_per_level: POINTS_PER_LEVEL,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a JSON tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the tick step cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), SimError> {
            if ok {
                Ok(())
            } else {
                Err(SimError::InvalidTuning { field, reason })
            }
        }

        check(self.tick_interval_ms > 0, "tick_interval_ms", "must be > 0")?;
        check(
            (0.0..=1.0).contains(&self.player_start_x),
            "player_start_x",
            "must be within [0, 1]",
        )?;
        check(self.player_y.is_finite(), "player_y", "must be finite")?;
        check(self.player_radius > 0.0, "player_radius", "must be > 0")?;
        check(
            self.obstacle_base_radius > 0.0,
            "obstacle_base_radius",
            "must be > 0",
        )?;
        check(self.spawn_y.is_finite(), "spawn_y", "must be finite")?;
        check(
            self.cull_y.is_finite() && self.cull_y > self.spawn_y,
            "cull_y",
            "must be finite and greater than spawn_y",
        )?;
        check(
            self.spawn_chance_base.is_finite() && self.spawn_chance_base >= 0.0,
            "spawn_chance_base",
            "must be finite and >= 0",
        )?;
        check(
            self.spawn_chance_per_level.is_finite() && self.spawn_chance_per_level >= 0.0,
            "spawn_chance_per_level",
            "must be finite and >= 0",
        )?;
        check(self.base_speed > 0.0, "base_speed", "must be > 0")?;
        check(
            self.speed_jitter.is_finite() && self.speed_jitter >= 0.0,
            "speed_jitter",
            "must be finite and >= 0",
        )?;
        check(
            self.speed_growth_per_level.is_finite() && self.speed_growth_per_level >= 0.0,
            "speed_growth_per_level",
            "must be finite and >= 0",
        )?;
        check(self.size_scale_min > 0.0, "size_scale_min", "must be > 0")?;
        check(
            self.size_scale_jitter.is_finite() && self.size_scale_jitter >= 0.0,
            "size_scale_jitter",
            "must be finite and >= 0",
        )?;
        check(self.points_per_level > 0, "points_per_level", "must be > 0")?;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Chance that one tick spawns an obstacle at the given level
    pub fn spawn_probability(&self, level: u32) -> f32 {
        (self.spawn_chance_base + self.spawn_chance_per_level * level as f32).clamp(0.0, 1.0)
    }

    /// Fall speed multiplier at the given level
    pub fn speed_multiplier(&self, level: u32) -> f32 {
        1.0 + self.speed_growth_per_level * level as f32
    }

    /// Level reached with the given score (1-based)
    pub fn level_for_score(&self, score: u32) -> u32 {
        score / self.points_per_level + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
        assert_eq!(Tuning::default().tick_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_spawn_probability_by_level() {
        let tuning = Tuning::default();
        assert!(approx(tuning.spawn_probability(1), 0.022));
        assert!(approx(tuning.spawn_probability(10), 0.04));
        // Clamped once the ramp passes certainty
        assert_eq!(tuning.spawn_probability(1_000), 1.0);
    }

    #[test]
    fn test_level_for_score() {
        let tuning = Tuning::default();
        assert_eq!(tuning.level_for_score(0), 1);
        assert_eq!(tuning.level_for_score(499), 1);
        assert_eq!(tuning.level_for_score(500), 2);
        assert_eq!(tuning.level_for_score(1_499), 3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "seed": 7, "tick_interval_ms": 8 }"#).unwrap();
        assert_eq!(tuning.seed, Some(7));
        assert_eq!(tuning.tick_interval_ms, 8);
        assert_eq!(tuning.player_radius, PLAYER_RADIUS);
        assert_eq!(tuning.points_per_level, POINTS_PER_LEVEL);
    }

    #[test]
    fn test_invalid_json_value_rejected() {
        let err = Tuning::from_json(r#"{ "player_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidTuning {
                field: "player_radius",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "cull_y": -1.0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidTuning { field: "cull_y", .. }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimError::TuningParse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
