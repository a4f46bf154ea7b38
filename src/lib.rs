//! Ball in a Box - a ball bouncing in a rectangle until friction stops it
//!
//! Core modules:
//! - `sim`: Ball, box, stepper, worker thread and observers
//! - `field`: Display-side observer producing drawable frames
//! - `settings`: JSON-loadable configuration

pub mod field;
pub mod settings;
pub mod sim;

pub use field::{Field, Frame};
pub use settings::{SettingsError, SimulationSettings};
pub use sim::{BallEvent, BallStateObserver, MovementSimulator, MovementState, Simulation};

/// Physics constants
pub mod consts {
    /// Default number of unit sub-steps per tick
    pub const BASE_STEP_DURATION: u32 = 10;
    /// Largest accepted magnitude of a velocity component
    pub const MAX_SPEED_COMPONENT: f64 = 1.0;
    /// Speeds (and components) below this count as not moving
    pub const MOTION_THRESHOLD: f64 = 0.0001;
    /// Speed lost to rolling friction per sub-step
    pub const FRICTION_PER_STEP: f64 = 0.0001;
    /// Fraction of a velocity component kept after a wall bounce
    pub const WALL_DAMPING: f64 = 0.95;
}
