//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One transition per tick or command, each producing a new snapshot
//! - Seeded RNG only, owned by the session
//! - Stable iteration order (spawn order)
//! - No timers, rendering or platform dependencies

pub mod collision;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circles_overlap, first_collision, obstacle_radius};
pub use session::Session;
pub use spawn::{ObstacleIds, should_spawn, spawn_obstacle};
pub use state::{Obstacle, SimulationState};
pub use tick::{TickReport, advance, restart, set_player_x, toggle_pause};
