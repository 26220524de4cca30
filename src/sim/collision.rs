//! Circle-circle collision between the player and obstacles

use glam::Vec2;

use super::state::Obstacle;
use crate::tuning::Tuning;

/// Strict overlap test: touching circles do not collide
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Collision radius of an obstacle after size scaling
#[inline]
pub fn obstacle_radius(obstacle: &Obstacle, tuning: &Tuning) -> f32 {
    obstacle.size_scale * tuning.obstacle_base_radius
}

/// Id of the first obstacle overlapping the player, if any
pub fn first_collision(player: Vec2, obstacles: &[Obstacle], tuning: &Tuning) -> Option<u32> {
    obstacles
        .iter()
        .find(|o| {
            circles_overlap(
                player,
                tuning.player_radius,
                o.pos(),
                obstacle_radius(o, tuning),
            )
        })
        .map(|o| o.id)
}
