//! One physics tick: unit sub-steps with early exit on wall contact
//!
//! A tick nominally covers `step_duration` sub-steps. When the ball hits a
//! wall and keeps moving, the tick ends at that sub-step so the committed
//! position sits exactly on the wall; the caller sleeps only for the
//! sub-steps actually simulated.

use glam::DVec2;

use super::ball_box::BallBox;
use super::collision::{Axis, Wall, apply_rolling_friction, bounce, wall_collision};

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Position reached (not yet committed to the box)
    pub position: DVec2,
    /// Sub-steps simulated, `1..=step_duration`
    pub elapsed: u32,
    /// Wall that ended the tick early, if any. On a corner hit both axes
    /// bounce but only the top/bottom wall is reported.
    pub truncated_by: Option<Wall>,
}

/// Compute where the ball is after one tick of `step_duration` sub-steps
///
/// Mutates the ball velocity (bounces and friction) but not its position;
/// committing the returned position is up to the caller.
pub fn compute_next_position(ball_box: &BallBox, step_duration: u32) -> StepOutcome {
    let mut pos = ball_box.ball_position();
    let mut collided = false;

    for i in 1..=step_duration {
        let v = ball_box.ball_velocity();

        let x = wall_collision(ball_box, Axis::X, pos.x + v.x);
        if x.hit() {
            bounce(ball_box, Axis::X);
            collided = true;
        }

        let y = wall_collision(ball_box, Axis::Y, pos.y + v.y);
        if y.hit() {
            bounce(ball_box, Axis::Y);
            collided = true;
        }

        pos = DVec2::new(x.coord, y.coord);

        if collided && !ball_box.is_ball_inactive() {
            let wall = y.wall.or(x.wall);
            log::debug!(
                "Wall contact {wall:?} at sub-step {i}/{step_duration}, pos=({:.2}, {:.2})",
                pos.x,
                pos.y
            );
            return StepOutcome {
                position: pos,
                elapsed: i,
                truncated_by: wall,
            };
        }

        apply_rolling_friction(ball_box);
    }

    StepOutcome {
        position: pos,
        elapsed: step_duration,
        truncated_by: None,
    }
}
