//! Space Dodger headless runner
//!
//! Runs one session with a simple dodging autopilot in place of a player.
//! Usage: `space-dodger [tuning.json]`. Set `RUST_LOG=debug` for more detail.

use std::time::Duration;

use space_dodger::sim::obstacle_radius;
use space_dodger::{DriverPhase, Session, SimulationState, Tuning, driver};

/// Give up after this long even if the autopilot survives
const MAX_RUN: Duration = Duration::from_secs(60);
/// Furthest the autopilot moves per frame
const MAX_STEP: f32 = 0.03;
/// Candidate lanes the autopilot considers
const LANES: usize = 21;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let frame = tuning.tick_interval();

    let (handle, task) = driver::spawn(Session::new(tuning.clone()));
    handle.start()?;

    let deadline = tokio::time::Instant::now() + MAX_RUN;
    let mut frames = tokio::time::interval(frame);
    loop {
        frames.tick().await;
        let state = handle.current_state();
        if state.is_game_over || tokio::time::Instant::now() >= deadline {
            break;
        }
        let target = pick_lane(&state, &tuning);
        let step = (target - state.player_x).clamp(-MAX_STEP, MAX_STEP);
        if step != 0.0 {
            handle.set_player_x(state.player_x + step)?;
        }
    }

    let state = handle.current_state();
    log::info!(
        "Run finished: score {} (level {}, high score {}, game over: {})",
        state.score,
        state.level,
        state.high_score,
        state.is_game_over
    );

    handle.shutdown()?;
    task.await?;
    debug_assert_eq!(handle.phase(), DriverPhase::Stopped);
    Ok(())
}

/// Lane with the most clearance from obstacles about to reach the player
fn pick_lane(state: &SimulationState, tuning: &Tuning) -> f32 {
    let threats: Vec<_> = state
        .obstacles
        .iter()
        .filter(|o| o.y > state.player_y - 0.45 && o.y < state.player_y + 0.1)
        .collect();
    if threats.is_empty() {
        return state.player_x;
    }

    let clearance = |x: f32| {
        threats
            .iter()
            .map(|o| {
                let reach = tuning.player_radius + obstacle_radius(o, tuning);
                // Closer obstacles matter more
                let urgency = 1.0 + (state.player_y - o.y).max(0.0) * 4.0;
                ((o.x - x).abs() - reach) / urgency
            })
            .fold(f32::INFINITY, f32::min)
    };

    (0..LANES)
        .map(|i| i as f32 / (LANES - 1) as f32)
        .map(|x| {
            // Prefer lanes close to where the player already is
            let travel = (x - state.player_x).abs() * 0.05;
            (x, clearance(x) - travel)
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(x, _)| x)
        .unwrap_or(state.player_x)
}
