//! One running game: the current snapshot plus everything it is stepped with
//!
//! The RNG and the obstacle id counter belong to the session rather than to
//! any global, so independent sessions never share either.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::spawn::ObstacleIds;
use super::state::SimulationState;
use super::tick::{self, TickReport};
use crate::tuning::Tuning;

/// Exclusive owner of one session's state
#[derive(Debug)]
pub struct Session<R: Rng = Pcg32> {
    state: Arc<SimulationState>,
    ids: ObstacleIds,
    rng: R,
    tuning: Tuning,
}

impl Session<Pcg32> {
    /// Start a session seeded from `tuning.seed`, or OS entropy without one
    pub fn new(tuning: Tuning) -> Self {
        let rng = match tuning.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_os_rng(),
        };
        Self::with_rng(tuning, rng)
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(tuning: Tuning, rng: R) -> Self {
        let state = SimulationState::with_tuning(&tuning, 0);
        Self::from_state(tuning, rng, state)
    }

    /// Resume from an existing snapshot (id counter continues past its obstacles)
    ///
    /// A snapshot already holding id `u32::MAX` has its obstacles renumbered
    /// from zero in order, so later spawns cannot reuse a live id.
    pub fn from_state(tuning: Tuning, rng: R, mut state: SimulationState) -> Self {
        let max_id = state.obstacles.iter().map(|o| o.id).max();
        let ids = match max_id.map(|id| id.checked_add(1)) {
            None => ObstacleIds::new(),
            Some(Some(next)) => ObstacleIds::starting_at(next),
            Some(None) => {
                log::warn!(
                    "Obstacle ids exhausted in snapshot, renumbering {} obstacles",
                    state.obstacles.len()
                );
                let mut ids = ObstacleIds::new();
                for obstacle in &mut state.obstacles {
                    obstacle.id = ids.next_id();
                }
                ids
            }
        };
        Self {
            state: Arc::new(state),
            ids,
            rng,
            tuning,
        }
    }

    /// Latest snapshot
    pub fn state(&self) -> Arc<SimulationState> {
        Arc::clone(&self.state)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Id the next spawned obstacle will get
    pub fn next_obstacle_id(&self) -> u32 {
        self.ids.peek()
    }

    /// Run one tick if the snapshot allows it
    ///
    /// Returns `None` (state unchanged) while paused or after game over.
    pub fn advance(&mut self) -> Option<TickReport> {
        if !self.state.can_advance() {
            return None;
        }

        let (next, report) = tick::advance(&self.state, &self.tuning, &mut self.ids, &mut self.rng);
        if let Some(id) = report.spawned {
            log::trace!("Spawned obstacle {} (level {})", id, self.state.level);
        }
        if report.leveled_up {
            log::info!("Level {} reached at score {}", next.level, next.score);
        }
        if let Some(id) = report.collided_with {
            log::info!(
                "Game over: hit obstacle {} at score {} (high score {})",
                id,
                next.score,
                next.high_score
            );
        }

        self.state = Arc::new(next);
        Some(report)
    }

    pub fn set_player_x(&mut self, x: f32) {
        self.state = Arc::new(tick::set_player_x(&self.state, x));
    }

    pub fn toggle_pause(&mut self) {
        self.state = Arc::new(tick::toggle_pause(&self.state));
        log::debug!("Paused: {}", self.state.is_paused);
    }

    /// Fresh run keeping the high score; obstacle ids start over
    pub fn restart(&mut self) {
        let next = tick::restart(&self.state, &self.tuning, &mut self.ids);
        log::debug!(
            "Restart after score {} (high score {})",
            self.state.score,
            next.high_score
        );
        self.state = Arc::new(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;

    fn seeded(seed: u64) -> Session {
        Session::with_rng(Tuning::default(), Pcg32::seed_from_u64(seed))
    }

    #[test]
    fn test_session_advances_and_replaces_snapshot() {
        let mut session = seeded(1);
        let before = session.state();
        assert!(session.advance().is_some());
        let after = session.state();
        assert_eq!(before.score, 0);
        assert_eq!(after.score, 1);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_session_skips_when_paused() {
        let mut session = seeded(1);
        session.toggle_pause();
        let before = session.state();
        assert!(session.advance().is_none());
        assert!(Arc::ptr_eq(&before, &session.state()));

        // Movement still lands while paused
        session.set_player_x(0.2);
        assert_eq!(session.state().player_x, 0.2);

        session.toggle_pause();
        assert!(session.advance().is_some());
    }

    fn obstacle_with_id(id: u32, x: f32) -> Obstacle {
        Obstacle {
            id,
            x,
            y: 0.1,
            vertical_speed: 0.01,
            size_scale: 1.0,
        }
    }

    #[test]
    fn test_from_state_resumes_past_large_id() {
        let mut state = SimulationState::default();
        state.obstacles.push(obstacle_with_id(3_000_000_000, 0.1));
        state.obstacles.push(obstacle_with_id(12, 0.2));

        let session = Session::from_state(Tuning::default(), Pcg32::seed_from_u64(1), state);
        assert_eq!(session.next_obstacle_id(), 3_000_000_001);
        assert_eq!(session.state().obstacles[0].id, 3_000_000_000);
    }

    #[test]
    fn test_from_state_renumbers_exhausted_ids() {
        let mut state = SimulationState::default();
        state.obstacles.push(obstacle_with_id(u32::MAX, 0.1));
        state.obstacles.push(obstacle_with_id(7, 0.2));
        let tuning = Tuning {
            spawn_chance_base: 1.0,
            ..Tuning::default()
        };

        let mut session = Session::from_state(tuning, Pcg32::seed_from_u64(1), state);
        let ids: Vec<u32> = session.state().obstacles.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(session.next_obstacle_id(), 2);

        let report = session.advance().unwrap();
        assert_eq!(report.spawned, Some(2));
    }

    #[test]
    fn test_session_stops_after_game_over() {
        let mut state = SimulationState::default();
        state.obstacles.push(Obstacle {
            id: 3,
            x: 0.5,
            y: 0.8,
            vertical_speed: 0.0,
            size_scale: 1.0,
        });
        let tuning = Tuning {
            spawn_chance_base: 0.0,
            spawn_chance_per_level: 0.0,
            ..Tuning::default()
        };
        let mut session = Session::from_state(tuning, Pcg32::seed_from_u64(1), state);
        assert_eq!(session.next_obstacle_id(), 4);

        let report = session.advance().unwrap();
        assert_eq!(report.collided_with, Some(3));
        assert!(session.state().is_game_over);
        assert!(session.advance().is_none());
    }

    #[test]
    fn test_session_restart_resets_ids() {
        let tuning = Tuning {
            spawn_chance_base: 1.0,
            ..Tuning::default()
        };
        let mut session = Session::with_rng(tuning, Pcg32::seed_from_u64(8));
        for _ in 0..5 {
            session.advance();
        }
        assert_eq!(session.next_obstacle_id(), 5);
        let high = session.state().high_score;
        assert!(high > 0);

        session.restart();
        assert_eq!(session.next_obstacle_id(), 0);
        let state = session.state();
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, high);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_independent_sessions_do_not_share_ids() {
        let tuning = Tuning {
            spawn_chance_base: 1.0,
            ..Tuning::default()
        };
        let mut a = Session::with_rng(tuning.clone(), Pcg32::seed_from_u64(1));
        let mut b = Session::with_rng(tuning, Pcg32::seed_from_u64(2));
        a.advance();
        a.advance();
        b.advance();
        assert_eq!(a.next_obstacle_id(), 2);
        assert_eq!(b.next_obstacle_id(), 1);
    }

    #[test]
    fn test_seeded_tuning_is_reproducible() {
        let tuning = Tuning {
            seed: Some(77),
            ..Tuning::default()
        };
        let mut a = Session::new(tuning.clone());
        let mut b = Session::new(tuning);
        for _ in 0..200 {
            a.advance();
            b.advance();
        }
        assert_eq!(a.state(), b.state());
    }
}
