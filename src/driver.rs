//! Fixed-cadence tick driver
//!
//! One task owns the [`Session`]. Ticks and external commands both arrive at
//! that task and are handled one at a time, so no two transitions ever race.
//! Each new snapshot is broadcast on a watch channel; readers only ever see
//! whole snapshots.
//!
//! The tick source is an `Option<Interval>`: `None` means no ticks are
//! scheduled. Starting always drops the previous interval first, so a session
//! never has two tick sources.

use std::future;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use crate::error::SimError;
use crate::sim::{Session, SimulationState};

/// Tick scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    /// Spawned, never started
    Idle,
    /// Tick source active (ticks may still be skipped while paused or over)
    Running,
    /// Tick source cancelled
    Stopped,
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Start,
    Stop,
    SetPlayerX(f32),
    TogglePause,
    Restart,
    Shutdown,
}

/// Cloneable handle used by the presentation layer
///
/// Dropping every handle shuts the session task down.
#[derive(Debug, Clone)]
pub struct SimulationHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Arc<SimulationState>>,
    phase: watch::Receiver<DriverPhase>,
}

impl SimulationHandle {
    /// Begin ticking; restarts the tick source if already running
    pub fn start(&self) -> Result<(), SimError> {
        self.send(Command::Start)
    }

    /// Cancel the tick source; the state is kept as-is
    pub fn stop(&self) -> Result<(), SimError> {
        self.send(Command::Stop)
    }

    pub fn set_player_x(&self, x: f32) -> Result<(), SimError> {
        self.send(Command::SetPlayerX(x))
    }

    pub fn toggle_pause(&self) -> Result<(), SimError> {
        self.send(Command::TogglePause)
    }

    /// Stop, reset the session (keeping the high score) and start again
    pub fn restart(&self) -> Result<(), SimError> {
        self.send(Command::Restart)
    }

    /// Ask the session task to exit
    pub fn shutdown(&self) -> Result<(), SimError> {
        self.send(Command::Shutdown)
    }

    /// Latest published snapshot
    pub fn current_state(&self) -> Arc<SimulationState> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Receiver notified on every new snapshot (latest value wins)
    pub fn subscribe(&self) -> watch::Receiver<Arc<SimulationState>> {
        let mut rx = self.snapshots.clone();
        let _ = rx.borrow_and_update();
        rx
    }

    pub fn phase(&self) -> DriverPhase {
        *self.phase.borrow()
    }

    fn send(&self, command: Command) -> Result<(), SimError> {
        self.commands
            .send(command)
            .map_err(|_| SimError::DriverClosed)
    }
}

/// Spawn the task owning `session` on the current tokio runtime
///
/// The driver starts [`DriverPhase::Idle`]; call [`SimulationHandle::start`]
/// to begin ticking.
pub fn spawn<R>(session: Session<R>) -> (SimulationHandle, JoinHandle<()>)
where
    R: Rng + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(session.state());
    let (phase_tx, phase_rx) = watch::channel(DriverPhase::Idle);

    let driver = Driver {
        session,
        commands: command_rx,
        snapshots: snapshot_tx,
        phase_tx,
        phase: DriverPhase::Idle,
        ticker: None,
        ticks: 0,
    };
    let task = tokio::spawn(driver.run());

    let handle = SimulationHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
        phase: phase_rx,
    };
    (handle, task)
}

struct Driver<R: Rng> {
    session: Session<R>,
    commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<Arc<SimulationState>>,
    phase_tx: watch::Sender<DriverPhase>,
    phase: DriverPhase,
    ticker: Option<Interval>,
    /// Tick source firings handled since spawn (including skipped ones)
    ticks: u64,
}

impl<R: Rng> Driver<R> {
    async fn run(mut self) {
        log::debug!("Simulation driver task started");
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    if !self.handle(command) {
                        break;
                    }
                }
                _ = next_tick(&mut self.ticker) => self.on_tick(),
            }
        }
        self.stop();
        log::debug!(
            "Simulation driver task exiting after {} ticks (final score {})",
            self.ticks,
            self.session.state().score
        );
    }

    /// Returns false when the task should exit
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Start => self.start(),
            Command::Stop => self.stop(),
            Command::SetPlayerX(x) => {
                self.session.set_player_x(x);
                self.publish();
            }
            Command::TogglePause => {
                self.session.toggle_pause();
                self.publish();
            }
            Command::Restart => {
                self.stop();
                self.session.restart();
                self.publish();
                self.start();
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn start(&mut self) {
        if self.ticker.take().is_some() {
            log::debug!("Replacing active tick source");
        }
        let period = self.session.tuning().tick_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
        self.set_phase(DriverPhase::Running);
        log::info!("Simulation running ({} ms ticks)", period.as_millis());
    }

    fn stop(&mut self) {
        self.ticker = None;
        self.set_phase(DriverPhase::Stopped);
    }

    fn on_tick(&mut self) {
        // Cancellation check: a stopped driver never advances.
        if self.phase != DriverPhase::Running {
            return;
        }
        self.ticks += 1;
        if self.session.advance().is_some() {
            self.publish();
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.session.state());
    }

    fn set_phase(&mut self, phase: DriverPhase) {
        if self.phase != phase {
            log::debug!("Driver {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.phase_tx.send_replace(phase);
        }
    }
}

/// Next firing of the tick source, or never when there is none
async fn next_tick(ticker: &mut Option<Interval>) -> Instant {
    match ticker {
        Some(ticker) => ticker.tick().await,
        None => future::pending().await,
    }
}
