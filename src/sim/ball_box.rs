//! The box: fixed dimensions, owns the only ball
//!
//! All ball mutation goes through here so the containment invariant
//! `radius <= x <= width - radius` (same for y/height) holds at every
//! observable moment.

use glam::DVec2;
use rand::Rng;

use super::ball::{Ball, BallSnapshot};
use crate::settings::{SettingsError, SimulationSettings};

/// A rectangular box with a single ball inside
#[derive(Debug)]
pub struct BallBox {
    width: u32,
    height: u32,
    ball: Ball,
}

impl BallBox {
    /// Create a box with the ball at a uniformly random valid position
    pub fn new<R: Rng>(
        width: u32,
        height: u32,
        ball_radius: u32,
        rng: &mut R,
    ) -> Result<Self, SettingsError> {
        SimulationSettings::check_box(width, height, ball_radius)?;
        let x = rng.random_range(ball_radius..width - ball_radius);
        let y = rng.random_range(ball_radius..height - ball_radius);
        Ok(Self::with_ball_at(
            width,
            height,
            ball_radius,
            f64::from(x),
            f64::from(y),
        ))
    }

    /// Create a box with the ball at a known position inside it
    pub(crate) fn with_ball_at(width: u32, height: u32, ball_radius: u32, x: f64, y: f64) -> Self {
        let ball_box = Self {
            width,
            height,
            ball: Ball::new(ball_radius, x, y),
        };
        debug_assert!(ball_box.contains(x, y), "ball at ({x}, {y}) outside box");
        ball_box
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn ball_radius(&self) -> u32 {
        self.ball.radius()
    }

    /// Smallest legal centre coordinate on either axis
    #[inline]
    pub fn min_coord(&self) -> f64 {
        f64::from(self.ball.radius())
    }

    /// Largest legal x of the ball centre
    #[inline]
    pub fn max_x(&self) -> f64 {
        f64::from(self.width) - f64::from(self.ball.radius())
    }

    /// Largest legal y of the ball centre
    #[inline]
    pub fn max_y(&self) -> f64 {
        f64::from(self.height) - f64::from(self.ball.radius())
    }

    /// Whether a ball centred at `(x, y)` lies wholly inside the box
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let min = self.min_coord();
        x >= min && x <= self.max_x() && y >= min && y <= self.max_y()
    }

    /// Move the ball. Out-of-range positions are rejected as a whole, the
    /// previous position stays.
    pub fn place_ball(&self, x: f64, y: f64) {
        if self.contains(x, y) {
            self.ball.set_position(x, y);
        } else {
            log::debug!("Rejected ball placement at ({x:.3}, {y:.3})");
        }
    }

    pub fn set_ball_velocity(&self, vx: f64, vy: f64) {
        self.ball.set_velocity(vx, vy);
    }

    pub fn ball_velocity(&self) -> DVec2 {
        self.ball.velocity()
    }

    pub fn ball_position(&self) -> DVec2 {
        self.ball.position()
    }

    pub fn ball_x(&self) -> f64 {
        self.ball.position().x
    }

    pub fn ball_y(&self) -> f64 {
        self.ball.position().y
    }

    pub fn is_ball_inactive(&self) -> bool {
        self.ball.is_inactive()
    }

    pub fn ball_moves_positive_x(&self) -> bool {
        self.ball.moves_positive_x()
    }

    pub fn ball_moves_negative_x(&self) -> bool {
        self.ball.moves_negative_x()
    }

    pub fn ball_moves_positive_y(&self) -> bool {
        self.ball.moves_positive_y()
    }

    pub fn ball_moves_negative_y(&self) -> bool {
        self.ball.moves_negative_y()
    }

    pub fn ball_snapshot(&self) -> BallSnapshot {
        self.ball.snapshot()
    }
}
