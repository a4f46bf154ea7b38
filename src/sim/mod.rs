//! Ball-in-box simulation
//!
//! - `ball`, `ball_box`: the shared state, safe to read from any thread
//! - `collision`, `tick`: the stepper (bounces, friction, early tick exit)
//! - `simulator`: worker thread, rest pauses, lifecycle
//! - `observer`: active/inactive notifications

pub mod ball;
pub mod ball_box;
pub mod collision;
pub mod observer;
pub mod simulator;
pub mod stop;
pub mod tick;

pub use ball::{Ball, BallSnapshot};
pub use ball_box::BallBox;
pub use collision::{Axis, CollisionResult, Wall, reflect_component, rolling_friction, wall_collision};
pub use observer::{BallEvent, BallStateObserver, ChannelObserver, ObserverHandle, ObserverRegistry};
pub use simulator::{MovementSimulator, MovementState, Simulation};
pub use stop::{StopHandle, StopSignal, stop_pair};
pub use tick::{StepOutcome, compute_next_position};
