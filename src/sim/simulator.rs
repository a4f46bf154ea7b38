//! Movement simulator: runs the physics ticks on a worker thread
//!
//! Lifecycle:
//! - `Stopped` until [`MovementSimulator::start_movement`]
//! - `Moving` while ticks advance the ball
//! - `Resting` for a random pause once friction has stopped the ball, after
//!   which the ball is relaunched and the state goes back to `Moving`
//! - `Stopped` again after [`MovementSimulator::stop`], permanently
//!
//! Observers hear about every `Moving`/`Resting` transition on the worker
//! thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ball::BallSnapshot;
use super::ball_box::BallBox;
use super::observer::{ObserverHandle, ObserverRegistry};
use super::stop::{StopHandle, StopSignal, stop_pair};
use super::tick::compute_next_position;
use crate::settings::{SettingsError, SimulationSettings};

/// Consumer-facing view of a running simulation
pub trait Simulation: Send + Sync {
    fn ball_position(&self) -> DVec2;

    fn ball_x(&self) -> f64 {
        self.ball_position().x
    }

    fn ball_y(&self) -> f64 {
        self.ball_position().y
    }

    fn ball_radius(&self) -> u32;

    /// (width, height) of the box
    fn box_size(&self) -> (u32, u32);

    /// Start moving the ball; no-op if already started
    fn start_movement(&self);

    fn register_observer(&self, observer: ObserverHandle);

    /// No-op if the observer was never registered
    fn unregister_observer(&self, observer: &ObserverHandle);
}

/// Where the simulator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementState {
    Stopped,
    Moving,
    Resting,
}

/// Worker slot. Holds the RNG until the worker takes it over.
enum Worker {
    Idle(Pcg32),
    Running {
        stop: StopHandle,
        handle: JoinHandle<()>,
    },
    Cancelled,
}

/// Simulates a ball bouncing in a box with friction and rest pauses
pub struct MovementSimulator {
    ball_box: Arc<BallBox>,
    observers: Arc<ObserverRegistry>,
    state: Arc<Mutex<MovementState>>,
    settings: SimulationSettings,
    worker: Mutex<Worker>,
}

impl std::fmt::Debug for MovementSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovementSimulator")
            .field("ball_box", &self.ball_box)
            .field("observers", &self.observers)
            .field("state", &self.state())
            .finish()
    }
}

impl MovementSimulator {
    /// Build a simulator with the ball at a random position
    pub fn new(settings: SimulationSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let ball_box = BallBox::new(
            settings.box_width,
            settings.box_height,
            settings.ball_radius,
            &mut rng,
        )?;
        log::info!(
            "Created {}x{} box, ball radius {} at {:?} (seed {seed})",
            settings.box_width,
            settings.box_height,
            settings.ball_radius,
            ball_box.ball_position()
        );
        Ok(Self {
            ball_box: Arc::new(ball_box),
            observers: Arc::new(ObserverRegistry::new()),
            state: Arc::new(Mutex::new(MovementState::Stopped)),
            settings,
            worker: Mutex::new(Worker::Idle(rng)),
        })
    }

    /// Default timing with the given geometry
    pub fn with_dimensions(
        width: u32,
        height: u32,
        ball_radius: u32,
    ) -> Result<Self, SettingsError> {
        Self::new(SimulationSettings::with_box(width, height, ball_radius))
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Shared access to the box, for readers on other threads
    pub fn ball_box(&self) -> &Arc<BallBox> {
        &self.ball_box
    }

    pub fn ball_snapshot(&self) -> BallSnapshot {
        self.ball_box.ball_snapshot()
    }

    pub fn state(&self) -> MovementState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True between a successful [`start_movement`](Self::start_movement)
    /// and [`stop`](Self::stop), while the worker has not exited.
    ///
    /// After a stop issued from an observer callback this is already
    /// `false`, though the worker runs on until its next suspension point.
    pub fn is_running(&self) -> bool {
        match &*self.lock_worker() {
            Worker::Running { handle, .. } => !handle.is_finished(),
            Worker::Idle(_) | Worker::Cancelled => false,
        }
    }

    pub fn subscribe(&self, observer: ObserverHandle) {
        self.observers.subscribe(observer);
    }

    pub fn unsubscribe(&self, observer: &ObserverHandle) {
        self.observers.unsubscribe(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Give the ball a random velocity and launch the worker.
    ///
    /// No-op while running and after [`stop`](Self::stop).
    pub fn start_movement(&self) {
        let mut worker = self.lock_worker();
        let mut rng = match std::mem::replace(&mut *worker, Worker::Cancelled) {
            Worker::Idle(rng) => rng,
            running @ Worker::Running { .. } => {
                *worker = running;
                log::debug!("start_movement: already running");
                return;
            }
            Worker::Cancelled => {
                log::warn!("start_movement: simulator was stopped, not restarting");
                return;
            }
        };

        randomize_velocity(&self.ball_box, &mut rng);
        let (stop, signal) = stop_pair();
        let movement = MovementLoop {
            ball_box: Arc::clone(&self.ball_box),
            observers: Arc::clone(&self.observers),
            state: Arc::clone(&self.state),
            settings: self.settings.clone(),
            rng,
            stop: signal,
        };

        match thread::Builder::new()
            .name("ball-movement".into())
            .spawn(move || movement.run())
        {
            Ok(handle) => {
                log::info!("Movement started, velocity {:?}", self.ball_box.ball_velocity());
                *worker = Worker::Running { stop, handle };
            }
            Err(e) => {
                log::error!("Failed to spawn movement thread: {e}");
                *worker = Worker::Idle(Pcg32::seed_from_u64(rand::random()));
            }
        }
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// Safe to call from an observer callback: the worker is then not
    /// joined, it exits at its next suspension point.
    pub fn stop(&self) {
        let previous = std::mem::replace(&mut *self.lock_worker(), Worker::Cancelled);
        let Worker::Running { stop, handle } = previous else {
            return;
        };

        stop.request_stop();
        drop(stop);

        if handle.thread().id() == thread::current().id() {
            log::debug!("stop requested from the movement thread");
            return;
        }
        if handle.join().is_err() {
            log::error!("Movement thread panicked");
        }
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = MovementState::Stopped;
        log::info!("Movement stopped");
    }

    fn lock_worker(&self) -> MutexGuard<'_, Worker> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for MovementSimulator {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Simulation for MovementSimulator {
    fn ball_position(&self) -> DVec2 {
        self.ball_box.ball_position()
    }

    fn ball_radius(&self) -> u32 {
        self.ball_box.ball_radius()
    }

    fn box_size(&self) -> (u32, u32) {
        (self.ball_box.width(), self.ball_box.height())
    }

    fn start_movement(&self) {
        MovementSimulator::start_movement(self);
    }

    fn register_observer(&self, observer: ObserverHandle) {
        self.subscribe(observer);
    }

    fn unregister_observer(&self, observer: &ObserverHandle) {
        self.unsubscribe(observer);
    }
}

/// Random velocity: independent signs, magnitudes uniform in [0, 1)
fn randomize_velocity<R: Rng>(ball_box: &BallBox, rng: &mut R) {
    let positive_x = rng.random_bool(0.5);
    let positive_y = rng.random_bool(0.5);
    let vx: f64 = rng.random();
    let vy: f64 = rng.random();
    ball_box.set_ball_velocity(
        if positive_x { vx } else { -vx },
        if positive_y { vy } else { -vy },
    );
}

/// State owned by the worker thread
struct MovementLoop {
    ball_box: Arc<BallBox>,
    observers: Arc<ObserverRegistry>,
    state: Arc<Mutex<MovementState>>,
    settings: SimulationSettings,
    rng: Pcg32,
    stop: StopSignal,
}

impl MovementLoop {
    fn run(mut self) {
        self.set_state(MovementState::Moving);
        self.observers.notify_active();

        let mut ticks: u64 = 0;
        loop {
            let outcome = compute_next_position(&self.ball_box, self.settings.step_duration);
            if !self.stop.wait(self.settings.tick_duration(outcome.elapsed)) {
                break;
            }
            self.ball_box.place_ball(outcome.position.x, outcome.position.y);
            ticks += 1;
            log::trace!(
                "tick {ticks}: {} sub-steps, pos={:?}",
                outcome.elapsed,
                outcome.position
            );

            if self.ball_box.is_ball_inactive() && !self.rest() {
                break;
            }
        }

        self.set_state(MovementState::Stopped);
        log::debug!("Movement loop exited after {ticks} ticks");
    }

    /// Announce rest, pause, relaunch. Returns `false` if stopped meanwhile.
    fn rest(&mut self) -> bool {
        self.set_state(MovementState::Resting);
        log::info!("Ball at rest at {:?}", self.ball_box.ball_position());
        self.observers.notify_inactive();

        let units = self
            .rng
            .random_range(self.settings.rest_pause_min..=self.settings.rest_pause_max);
        let pause = self.settings.rest_duration(units);
        log::debug!("Resting for {pause:?}");
        if !self.stop.wait(pause) {
            return false;
        }

        randomize_velocity(&self.ball_box, &mut self.rng);
        log::info!("Ball relaunched, velocity {:?}", self.ball_box.ball_velocity());
        self.set_state(MovementState::Moving);
        self.observers.notify_active();
        true
    }

    fn set_state(&self, state: MovementState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}
