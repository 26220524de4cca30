//! Game state and core simulation types
//!
//! A [`SimulationState`] is a snapshot: transitions build a new value instead
//! of editing one in place, so a reader holding a snapshot always sees a
//! consistent tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// A falling obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Session-unique id, never reused until restart
    pub id: u32,
    /// Horizontal position in [0, 1]
    pub x: f32,
    /// Vertical position (spawns above the screen, culled below it)
    pub y: f32,
    /// Distance fallen per tick
    pub vertical_speed: f32,
    /// Multiplier on the base obstacle radius
    pub size_scale: f32,
}

impl Obstacle {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Copy of this obstacle moved down by one tick
    pub fn fallen(&self) -> Self {
        Self {
            y: self.y + self.vertical_speed,
            ..self.clone()
        }
    }
}

/// Complete simulation snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Player horizontal position, always within [0, 1]
    pub player_x: f32,
    /// Player vertical position (fixed for a session)
    pub player_y: f32,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub is_game_over: bool,
    pub is_paused: bool,
    /// Best score seen by this process, carried across restarts
    pub high_score: u32,
    /// `score / points_per_level + 1`
    pub level: u32,
}

impl SimulationState {
    /// Fresh session start with the default player placement
    pub fn new(high_score: u32) -> Self {
        Self {
            player_x: crate::consts::PLAYER_START_X,
            player_y: crate::consts::PLAYER_Y,
            obstacles: Vec::new(),
            score: 0,
            is_game_over: false,
            is_paused: false,
            high_score,
            level: 1,
        }
    }

    /// Fresh session start using tuned player placement
    pub fn with_tuning(tuning: &Tuning, high_score: u32) -> Self {
        Self {
            player_x: tuning.player_start_x.clamp(0.0, 1.0),
            player_y: tuning.player_y,
            ..Self::new(high_score)
        }
    }

    pub fn player_pos(&self) -> Vec2 {
        Vec2::new(self.player_x, self.player_y)
    }

    /// Whether the tick step may run on this snapshot
    pub fn can_advance(&self) -> bool {
        !self.is_paused && !self.is_game_over
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_start() {
        let state = SimulationState::default();
        assert_eq!(state.player_x, 0.5);
        assert_eq!(state.player_y, 0.8);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.high_score, 0);
        assert!(!state.is_paused);
        assert!(!state.is_game_over);
        assert!(state.can_advance());
    }

    #[test]
    fn test_high_score_inherited() {
        let state = SimulationState::new(1200);
        assert_eq!(state.high_score, 1200);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_with_tuning_uses_player_placement() {
        let tuning = Tuning {
            player_start_x: 0.25,
            player_y: 0.9,
            ..Tuning::default()
        };
        let state = SimulationState::with_tuning(&tuning, 3);
        assert_eq!(state.player_pos(), Vec2::new(0.25, 0.9));
        assert_eq!(state.high_score, 3);
    }

    #[test]
    fn test_paused_or_over_cannot_advance() {
        let mut state = SimulationState::default();
        state.is_paused = true;
        assert!(!state.can_advance());
        state.is_paused = false;
        state.is_game_over = true;
        assert!(!state.can_advance());
    }

    #[test]
    fn test_obstacle_fallen() {
        let obstacle = Obstacle {
            id: 4,
            x: 0.3,
            y: 0.5,
            vertical_speed: 0.25,
            size_scale: 1.0,
        };
        let moved = obstacle.fallen();
        assert_eq!(moved.y, 0.75);
        assert_eq!(moved.id, 4);
        assert_eq!(obstacle.y, 0.5);
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let mut state = SimulationState::new(10);
        state.obstacles.push(Obstacle {
            id: 1,
            x: 0.5,
            y: -0.1,
            vertical_speed: 0.01,
            size_scale: 1.0,
        });
        let json = serde_json::to_string(&state).unwrap();
        let back: SimulationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
