//! Wall collision detection and response
//!
//! The box walls are axis-aligned, so each axis is checked on its own: a
//! tentative coordinate past a wall while the ball is heading into that wall
//! is a hit. The response clips the coordinate onto the wall and reflects
//! the velocity component with some energy loss.

use glam::DVec2;

use super::ball_box::BallBox;
use crate::consts::{FRICTION_PER_STEP, WALL_DAMPING};

/// Axis of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Which wall was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    /// x = radius
    Left,
    /// x = width - radius
    Right,
    /// y = radius
    Top,
    /// y = height - radius
    Bottom,
}

/// Result of a wall check on one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Wall that was hit, if any
    pub wall: Option<Wall>,
    /// Coordinate after the check (clipped onto the wall on a hit)
    pub coord: f64,
}

impl CollisionResult {
    pub fn miss(coord: f64) -> Self {
        Self { wall: None, coord }
    }

    #[inline]
    pub fn hit(&self) -> bool {
        self.wall.is_some()
    }
}

/// Check a tentative coordinate against both walls of one axis
///
/// Only counts as a hit when the ball is also moving toward that wall, so a
/// ball resting in the dead zone near a wall is never bounced.
pub fn wall_collision(ball_box: &BallBox, axis: Axis, proposed: f64) -> CollisionResult {
    let min = ball_box.min_coord();
    let (max, moves_negative, moves_positive, near, far) = match axis {
        Axis::X => (
            ball_box.max_x(),
            ball_box.ball_moves_negative_x(),
            ball_box.ball_moves_positive_x(),
            Wall::Left,
            Wall::Right,
        ),
        Axis::Y => (
            ball_box.max_y(),
            ball_box.ball_moves_negative_y(),
            ball_box.ball_moves_positive_y(),
            Wall::Top,
            Wall::Bottom,
        ),
    };

    if proposed < min && moves_negative {
        CollisionResult {
            wall: Some(near),
            coord: min,
        }
    } else if proposed > max && moves_positive {
        CollisionResult {
            wall: Some(far),
            coord: max,
        }
    } else {
        CollisionResult::miss(proposed)
    }
}

/// Reflect one velocity component off a wall, losing energy
///
/// v' = -damping * v
#[inline]
pub fn reflect_component(velocity: DVec2, axis: Axis) -> DVec2 {
    match axis {
        Axis::X => DVec2::new(-velocity.x * WALL_DAMPING, velocity.y),
        Axis::Y => DVec2::new(velocity.x, -velocity.y * WALL_DAMPING),
    }
}

/// Invert and damp the ball's velocity along `axis`
pub fn bounce(ball_box: &BallBox, axis: Axis) {
    let v = reflect_component(ball_box.ball_velocity(), axis);
    ball_box.set_ball_velocity(v.x, v.y);
}

/// Slow a velocity by a fixed amount along its current heading
///
/// A zero velocity is already at rest and comes back unchanged. Speeds below
/// the friction decrement stop dead rather than reversing.
pub fn rolling_friction(velocity: DVec2) -> DVec2 {
    let speed = velocity.length();
    if speed == 0.0 {
        return velocity;
    }
    let slowed = (speed - FRICTION_PER_STEP).max(0.0);
    velocity / speed * slowed
}

/// Apply one unit of rolling friction to the ball
pub fn apply_rolling_friction(ball_box: &BallBox) {
    let v = rolling_friction(ball_box.ball_velocity());
    ball_box.set_ball_velocity(v.x, v.y);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_left_wall_hit_clips_to_radius() {
        let ball_box = BallBox::with_ball_at(100, 100, 10, 10.2, 50.0);
        ball_box.set_ball_velocity(-0.5, 0.0);

        let result = wall_collision(&ball_box, Axis::X, 9.7);
        assert_eq!(result.wall, Some(Wall::Left));
        assert_eq!(result.coord, 10.0);
    }

    #[test]
    fn test_bottom_wall_hit_clips_to_far_edge() {
        let ball_box = BallBox::with_ball_at(100, 80, 10, 50.0, 69.8);
        ball_box.set_ball_velocity(0.0, 0.4);

        let result = wall_collision(&ball_box, Axis::Y, 70.2);
        assert_eq!(result.wall, Some(Wall::Bottom));
        assert_eq!(result.coord, 70.0);
    }

    #[test]
    fn test_no_hit_when_moving_away() {
        let ball_box = BallBox::with_ball_at(100, 100, 10, 10.0, 50.0);
        ball_box.set_ball_velocity(0.5, 0.0);

        // Past the wall but heading away from it
        let result = wall_collision(&ball_box, Axis::X, 9.9);
        assert!(!result.hit());
        assert_eq!(result.coord, 9.9);
    }

    #[test]
    fn test_no_hit_inside_box() {
        let ball_box = BallBox::with_ball_at(100, 100, 10, 50.0, 50.0);
        ball_box.set_ball_velocity(-0.5, 0.5);

        assert!(!wall_collision(&ball_box, Axis::X, 49.5).hit());
        assert!(!wall_collision(&ball_box, Axis::Y, 50.5).hit());
    }

    #[test]
    fn test_reflect_component() {
        let v = reflect_component(DVec2::new(-0.5, 0.3), Axis::X);
        assert!(approx(v.x, 0.475));
        assert!(approx(v.y, 0.3));

        let v = reflect_component(DVec2::new(-0.5, 0.3), Axis::Y);
        assert!(approx(v.x, -0.5));
        assert!(approx(v.y, -0.285));
    }

    #[test]
    fn test_friction_preserves_heading() {
        let v = DVec2::new(0.3, -0.4);
        let slowed = rolling_friction(v);

        assert!(approx(slowed.length(), 0.5 - FRICTION_PER_STEP));
        assert!(approx(slowed.normalize().dot(v.normalize()), 1.0));
    }

    #[test]
    fn test_friction_monotonic_until_rest() {
        let mut v = DVec2::new(0.006, 0.008);
        let mut applications = 0;
        while v.length() >= crate::consts::MOTION_THRESHOLD {
            let before = v.length();
            v = rolling_friction(v);
            assert!(
                approx(before - v.length(), FRICTION_PER_STEP),
                "speed dropped by {} at application {applications}",
                before - v.length()
            );
            applications += 1;
        }
        assert!((99..=100).contains(&applications));
    }

    #[test]
    fn test_friction_zero_speed_is_noop() {
        assert_eq!(rolling_friction(DVec2::ZERO), DVec2::ZERO);
    }

    #[test]
    fn test_friction_never_reverses() {
        let v = rolling_friction(DVec2::new(0.00003, -0.00004));
        assert_eq!(v.length(), 0.0);
    }
}
