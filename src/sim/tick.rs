//! Fixed timestep simulation tick
//!
//! Pure transitions from one snapshot to the next. Randomness and the id
//! counter are passed in by the owning session so any number of sessions
//! can run side by side, and tests can substitute a seeded RNG.

use rand::Rng;

use super::collision::first_collision;
use super::spawn::{ObstacleIds, should_spawn, spawn_obstacle};
use super::state::SimulationState;
use crate::tuning::Tuning;

/// Notable events from one tick (for logging and callers that care)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Id of the obstacle spawned this tick
    pub spawned: Option<u32>,
    /// Id of the first obstacle hitting the player
    pub collided_with: Option<u32>,
    /// Obstacles removed after leaving the screen
    pub culled: usize,
    /// Level increased this tick
    pub leveled_up: bool,
    /// Score passed the previous high score this tick
    pub new_high_score: bool,
}

/// Advance the game state by one fixed timestep
///
/// Callers must only invoke this while [`SimulationState::can_advance`] holds.
/// Order: fall, cull, spawn, collide, score, derive.
pub fn advance<R: Rng>(
    state: &SimulationState,
    tuning: &Tuning,
    ids: &mut ObstacleIds,
    rng: &mut R,
) -> (SimulationState, TickReport) {
    let mut report = TickReport::default();

    // Fall and cull
    let mut obstacles: Vec<_> = state
        .obstacles
        .iter()
        .map(|o| o.fallen())
        .filter(|o| o.y < tuning.cull_y)
        .collect();
    report.culled = state.obstacles.len() - obstacles.len();

    // Spawn (one draw for the decision, then the obstacle's own draws)
    if should_spawn(state.level, rng, tuning) {
        let obstacle = spawn_obstacle(state.level, ids, rng, tuning);
        report.spawned = Some(obstacle.id);
        obstacles.push(obstacle);
    }

    // Collide against the post-spawn set
    report.collided_with = first_collision(state.player_pos(), &obstacles, tuning);
    let collided = report.collided_with.is_some();

    let score = if collided {
        state.score
    } else {
        state.score.saturating_add(1)
    };
    let level = tuning.level_for_score(score);
    report.leveled_up = level > state.level;
    report.new_high_score = score > state.high_score;

    let next = SimulationState {
        obstacles,
        score,
        level,
        high_score: state.high_score.max(score),
        is_game_over: collided,
        ..state.clone()
    };
    (next, report)
}

/// Move the player horizontally, clamped to [0, 1]
///
/// Accepted while paused or after game over. NaN leaves the player where it is.
pub fn set_player_x(state: &SimulationState, x: f32) -> SimulationState {
    let player_x = if x.is_nan() {
        state.player_x
    } else {
        x.clamp(0.0, 1.0)
    };
    SimulationState {
        player_x,
        ..state.clone()
    }
}

/// Flip the pause flag (no game-over guard)
pub fn toggle_pause(state: &SimulationState) -> SimulationState {
    SimulationState {
        is_paused: !state.is_paused,
        ..state.clone()
    }
}

/// Fresh session start keeping the high score; resets the id counter too
pub fn restart(state: &SimulationState, tuning: &Tuning, ids: &mut ObstacleIds) -> SimulationState {
    ids.reset();
    SimulationState::with_tuning(tuning, state.high_score)
}
