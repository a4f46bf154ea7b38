//! The ball: fixed radius, bounded velocity and a lock-guarded position
//!
//! Velocity and position are shared between the stepping thread and any
//! reader polling for drawing, so both live behind their own `RwLock`. The
//! position is always swapped as one `DVec2`, never field by field.

use std::sync::{PoisonError, RwLock};

use glam::DVec2;
use serde::Serialize;

use crate::consts::{MAX_SPEED_COMPONENT, MOTION_THRESHOLD};

/// A ball with a constant radius and a changeable position and velocity
#[derive(Debug)]
pub struct Ball {
    radius: u32,
    velocity: RwLock<DVec2>,
    position: RwLock<DVec2>,
}

/// Point-in-time copy of the ball state (for logging and tests)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallSnapshot {
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: u32,
}

impl Ball {
    /// Create a resting ball at the given position
    pub fn new(radius: u32, x: f64, y: f64) -> Self {
        Self {
            radius,
            velocity: RwLock::new(DVec2::ZERO),
            position: RwLock::new(DVec2::new(x, y)),
        }
    }

    #[inline]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Current velocity (units per sub-step)
    pub fn velocity(&self) -> DVec2 {
        *self.velocity.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the velocity. Ignored unless both components lie in [-1, 1].
    pub fn set_velocity(&self, vx: f64, vy: f64) {
        if vx.abs() <= MAX_SPEED_COMPONENT && vy.abs() <= MAX_SPEED_COMPONENT {
            *self.velocity.write().unwrap_or_else(PoisonError::into_inner) = DVec2::new(vx, vy);
        } else {
            log::warn!("Ignoring out-of-range velocity ({vx}, {vy})");
        }
    }

    /// True when the speed magnitude is below the motion threshold
    pub fn is_inactive(&self) -> bool {
        self.velocity().length() < MOTION_THRESHOLD
    }

    pub fn moves_positive_x(&self) -> bool {
        self.velocity().x > MOTION_THRESHOLD
    }

    pub fn moves_positive_y(&self) -> bool {
        self.velocity().y > MOTION_THRESHOLD
    }

    pub fn moves_negative_x(&self) -> bool {
        let vx = self.velocity().x;
        vx < 0.0 && vx < -MOTION_THRESHOLD
    }

    pub fn moves_negative_y(&self) -> bool {
        let vy = self.velocity().y;
        vy < 0.0 && vy < -MOTION_THRESHOLD
    }

    /// Current position, read as one pair
    pub fn position(&self) -> DVec2 {
        *self.position.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the position as one pair
    pub fn set_position(&self, x: f64, y: f64) {
        *self.position.write().unwrap_or_else(PoisonError::into_inner) = DVec2::new(x, y);
    }

    pub fn snapshot(&self) -> BallSnapshot {
        BallSnapshot {
            position: self.position(),
            velocity: self.velocity(),
            radius: self.radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_set_velocity_rejects_out_of_range() {
        let ball = Ball::new(10, 50.0, 50.0);
        ball.set_velocity(0.3, -0.2);
        ball.set_velocity(1.5, 0.0);
        assert_eq!(ball.velocity(), DVec2::new(0.3, -0.2));

        ball.set_velocity(0.0, -1.01);
        assert_eq!(ball.velocity(), DVec2::new(0.3, -0.2));
    }

    #[test]
    fn test_set_velocity_accepts_unit_bounds() {
        let ball = Ball::new(10, 50.0, 50.0);
        ball.set_velocity(-1.0, 1.0);
        assert_eq!(ball.velocity(), DVec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_inactivity_threshold() {
        let ball = Ball::new(10, 50.0, 50.0);
        assert!(ball.is_inactive());

        ball.set_velocity(0.00005, 0.00005);
        assert!(ball.is_inactive());

        ball.set_velocity(0.01, 0.0);
        assert!(!ball.is_inactive());
    }

    #[test]
    fn test_direction_dead_zone() {
        let ball = Ball::new(10, 50.0, 50.0);

        ball.set_velocity(0.00005, -0.00005);
        assert!(!ball.moves_positive_x());
        assert!(!ball.moves_negative_x());
        assert!(!ball.moves_positive_y());
        assert!(!ball.moves_negative_y());

        ball.set_velocity(0.2, -0.2);
        assert!(ball.moves_positive_x());
        assert!(!ball.moves_negative_x());
        assert!(ball.moves_negative_y());
        assert!(!ball.moves_positive_y());
    }

    #[test]
    fn test_position_never_tears() {
        let ball = Arc::new(Ball::new(5, 0.0, 0.0));

        let writer = {
            let ball = Arc::clone(&ball);
            thread::spawn(move || {
                for i in 0..10_000 {
                    let v = i as f64;
                    ball.set_position(v, v);
                }
            })
        };

        for _ in 0..10_000 {
            let pos = ball.position();
            assert_eq!(pos.x, pos.y, "torn read: {pos:?}");
        }
        writer.join().expect("writer thread panicked");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn out_of_range_velocity_is_ignored(
                vx in -1.0f64..=1.0,
                vy in -1.0f64..=1.0,
                bad in 1.0001f64..100.0,
                negate in any::<bool>(),
                on_x in any::<bool>(),
            ) {
                let ball = Ball::new(4, 10.0, 10.0);
                ball.set_velocity(vx, vy);

                let bad = if negate { -bad } else { bad };
                if on_x {
                    ball.set_velocity(bad, vy);
                } else {
                    ball.set_velocity(vx, bad);
                }
                prop_assert_eq!(ball.velocity(), DVec2::new(vx, vy));
            }
        }
    }
}
