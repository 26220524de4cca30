//! Obstacle spawning with level-based difficulty scaling

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Obstacle;
use crate::tuning::Tuning;

/// Session-scoped obstacle id allocator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleIds {
    next: u32,
}

impl ObstacleIds {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocator whose first id is `next`
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    /// Allocate a new obstacle id (wraps after `u32::MAX`)
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }

    /// Id the next allocation will return
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// Start numbering from zero again (restart only)
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// Roll the per-tick spawn chance (exactly one draw)
pub fn should_spawn<R: Rng>(level: u32, rng: &mut R, tuning: &Tuning) -> bool {
    rng.random::<f32>() < tuning.spawn_probability(level)
}

/// Build a new obstacle above the top edge
///
/// Draws x, speed jitter and size jitter in that order.
pub fn spawn_obstacle<R: Rng>(
    level: u32,
    ids: &mut ObstacleIds,
    rng: &mut R,
    tuning: &Tuning,
) -> Obstacle {
    let x = rng.random::<f32>();
    let speed_jitter = rng.random::<f32>() * tuning.speed_jitter;
    let size_jitter = rng.random::<f32>() * tuning.size_scale_jitter;

    Obstacle {
        id: ids.next_id(),
        x,
        y: tuning.spawn_y,
        vertical_speed: (tuning.base_speed + speed_jitter) * tuning.speed_multiplier(level),
        size_scale: tuning.size_scale_min + size_jitter,
    }
}
