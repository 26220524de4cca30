//! Space Dodger - falling-obstacle dodging game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state, spawning, collisions, tick step)
//! - `driver`: Fixed-cadence tick driver owning one session
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration and driver handle errors
//!
//! Rendering and input live outside this crate. They read snapshots from a
//! [`driver::SimulationHandle`] and push player movement back through it.

pub mod driver;
pub mod error;
pub mod sim;
pub mod tuning;

pub use driver::{DriverPhase, SimulationHandle};
pub use error::SimError;
pub use sim::{Obstacle, Session, SimulationState};
pub use tuning::Tuning;

/// Game configuration constants
///
/// All positions are normalized screen coordinates: x in [0, 1] left to
/// right, y growing downward.
pub mod consts {
    /// Fixed tick interval in milliseconds (~60 ticks/second)
    pub const TICK_INTERVAL_MS: u64 = 16;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 0.5;
    pub const PLAYER_Y: f32 = 0.8;
    pub const PLAYER_RADIUS: f32 = 0.04;

    /// Obstacle collision radius before size scaling
    pub const OBSTACLE_BASE_RADIUS: f32 = 0.05;
    /// New obstacles enter just above the top edge
    pub const SPAWN_Y: f32 = -0.1;
    /// Obstacles at or past this y are removed
    pub const CULL_Y: f32 = 1.2;

    /// Spawn chance per tick is `SPAWN_CHANCE_BASE + SPAWN_CHANCE_PER_LEVEL * level`
    pub const SPAWN_CHANCE_BASE: f32 = 0.02;
    pub const SPAWN_CHANCE_PER_LEVEL: f32 = 0.002;

    /// Fall speed per tick is `(BASE + jitter) * (1 + SPEED_GROWTH_PER_LEVEL * level)`
    pub const OBSTACLE_BASE_SPEED: f32 = 0.008;
    pub const OBSTACLE_SPEED_JITTER: f32 = 0.005;
    pub const SPEED_GROWTH_PER_LEVEL: f32 = 0.15;

    /// Size scale is `SIZE_SCALE_MIN + jitter`, jitter in [0, SIZE_SCALE_JITTER)
    pub const SIZE_SCALE_MIN: f32 = 0.75;
    pub const SIZE_SCALE_JITTER: f32 = 0.5;

    /// Score needed per level
    pub const POINTS_PER_LEVEL: u32 = 500;
}
