//! Display-side consumer of a simulation
//!
//! A [`Field`] is what a drawing surface would hang off: it observes the
//! simulation, keeps a repaint flag that is on while the ball moves, shows a
//! status line and hands out [`Frame`]s to draw. Actual pixel output is up to
//! the host.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::sim::{BallStateObserver, ObserverHandle, Simulation};

/// Status text shown while the ball moves
pub const STATUS_ROLLING: &str = "Ball rolls";
/// Status text shown while the ball rests
pub const STATUS_RESTING: &str = "Ball rests";

/// Everything needed to draw one frame: a filled circle in a viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Viewport size (the box)
    pub viewport: (u32, u32),
    /// Ball centre, truncated to whole pixels
    pub center: (i64, i64),
    pub radius: u32,
}

impl Frame {
    /// Bounding square of the ball as `(left, top, width, height)`
    pub fn ball_bounds(&self) -> (i64, i64, i64, i64) {
        let r = i64::from(self.radius);
        (self.center.0 - r, self.center.1 - r, 2 * r, 2 * r)
    }
}

/// Observer that drives a redraw cadence
#[derive(Debug)]
pub struct Field {
    repainting: AtomicBool,
    status: Mutex<&'static str>,
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

impl Field {
    /// A field starts repainting straight away, like a freshly shown panel
    pub fn new() -> Self {
        Self {
            repainting: AtomicBool::new(true),
            status: Mutex::new(""),
        }
    }

    /// Create a field and register it with `simulation`
    pub fn attach(simulation: &dyn Simulation) -> Arc<Self> {
        let field = Arc::new(Self::new());
        let handle: ObserverHandle = Arc::clone(&field) as ObserverHandle;
        simulation.register_observer(handle);
        field
    }

    pub fn is_repainting(&self) -> bool {
        self.repainting.load(Ordering::Acquire)
    }

    pub fn status(&self) -> &'static str {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot the ball for drawing
    pub fn frame(&self, simulation: &dyn Simulation) -> Frame {
        let pos = simulation.ball_position();
        Frame {
            viewport: simulation.box_size(),
            center: (pos.x as i64, pos.y as i64),
            radius: simulation.ball_radius(),
        }
    }

    fn set(&self, repainting: bool, status: &'static str) {
        self.repainting.store(repainting, Ordering::Release);
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }
}

impl BallStateObserver for Field {
    fn on_active(&self) {
        self.set(true, STATUS_ROLLING);
    }

    fn on_inactive(&self) {
        self.set(false, STATUS_RESTING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MovementSimulator;

    #[test]
    fn test_notifications_toggle_repaint() {
        let field = Field::new();
        assert!(field.is_repainting());
        assert_eq!(field.status(), "");

        field.on_inactive();
        assert!(!field.is_repainting());
        assert_eq!(field.status(), STATUS_RESTING);

        field.on_active();
        assert!(field.is_repainting());
        assert_eq!(field.status(), STATUS_ROLLING);
    }

    #[test]
    fn test_frame_matches_simulation() {
        let sim = MovementSimulator::with_dimensions(200, 100, 10).unwrap();
        let field = Field::attach(&sim);
        sim.ball_box().place_ball(42.7, 30.2);

        let frame = field.frame(&sim);
        assert_eq!(frame.viewport, (200, 100));
        assert_eq!(frame.center, (42, 30));
        assert_eq!(frame.radius, 10);
        assert_eq!(frame.ball_bounds(), (32, 20, 20, 20));
    }

    #[test]
    fn test_attach_registers_observer() {
        let sim = MovementSimulator::with_dimensions(200, 100, 10).unwrap();
        let _field = Field::attach(&sim);
        assert_eq!(sim.observer_count(), 1);
    }
}
