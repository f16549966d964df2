//! Ball movement: integration, serves and the delayed serve timer

use std::time::Duration;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::BallState;
use crate::ServeDirection;
use crate::settings::PhysicsConfig;

/// A serve waiting for its delay to run out
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingReset {
    remaining: Duration,
    direction: Option<ServeDirection>,
}

/// Owns the ball state. Other engines only ever see copies.
#[derive(Debug, Clone)]
pub struct BallMovement {
    state: BallState,
    max_angle_variation: f32,
    /// At most one scheduled serve; scheduling again replaces it
    pending: Option<PendingReset>,
    rng: Pcg32,
}

impl BallMovement {
    /// Ball at rest in the centre, no serve scheduled
    pub fn new(physics: &PhysicsConfig, seed: u64) -> Self {
        Self {
            state: BallState::at_rest(physics.base_ball_speed),
            max_angle_variation: physics.max_angle_variation,
            pending: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Advance by `dt` seconds.
    ///
    /// While a serve is pending the ball stays put and only the timer runs.
    /// Returns true when the pending serve fired during this call.
    pub fn update(&mut self, dt: f32) -> bool {
        let dt = dt.max(0.0);

        if let Some(pending) = self.pending.as_mut() {
            // Non-finite or huge steps just expire the timer
            let elapsed = Duration::try_from_secs_f32(dt).unwrap_or(Duration::MAX);
            pending.remaining = pending.remaining.saturating_sub(elapsed);
            if pending.remaining.is_zero() {
                let direction = pending.direction;
                self.reset_position(direction);
                return true;
            }
            return false;
        }

        self.state.position.x += self.state.velocity.x * dt;
        self.state.position.z += self.state.velocity.z * dt;
        false
    }

    /// Serve immediately from the centre.
    ///
    /// Without a direction the side is picked at random (first serve of a
    /// match). A secondary-axis component in
    /// `[-max_angle_variation/2, max_angle_variation/2) * speed` keeps rallies
    /// from running perfectly straight. Cancels any pending serve.
    pub fn reset_position(&mut self, direction: Option<ServeDirection>) {
        let sign = match direction {
            Some(dir) => dir.sign(),
            None => {
                if self.rng.random_bool(0.5) {
                    1.0
                } else {
                    -1.0
                }
            }
        };
        let angle = (self.rng.random::<f32>() - 0.5) * self.max_angle_variation;
        let speed = self.state.speed;

        self.state.position = Vec3::ZERO;
        self.state.velocity = Vec3::new(sign * speed, 0.0, angle * speed);
        self.pending = None;

        log::debug!(
            "Ball served: direction={:?} velocity={:?}",
            direction,
            self.state.velocity
        );
    }

    /// Freeze the ball at the centre now and serve after `delay`.
    ///
    /// Calling again before the delay expires replaces the scheduled serve;
    /// only the latest one fires.
    pub fn reset_with_delay(&mut self, delay: Duration, direction: Option<ServeDirection>) {
        if let Some(old) = self.pending {
            log::debug!(
                "Superseding pending serve ({:?} left, direction={:?})",
                old.remaining,
                old.direction
            );
        }

        self.state.position = Vec3::ZERO;
        self.state.velocity = Vec3::ZERO;
        self.pending = Some(PendingReset {
            remaining: delay,
            direction,
        });
    }

    /// Drop a scheduled serve without firing it
    pub fn cancel_pending_reset(&mut self) {
        self.pending = None;
    }

    pub fn is_reset_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending serve, if any
    pub fn pending_delay(&self) -> Option<Duration> {
        self.pending.map(|p| p.remaining)
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.state.position = position;
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.state.velocity = velocity;
    }

    pub fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    /// Serve speed for future resets; the ball in flight keeps its velocity
    pub fn set_ball_speed(&mut self, speed: f32) {
        self.state.speed = speed;
    }

    pub fn ball_speed(&self) -> f32 {
        self.state.speed
    }

    /// Stop the ball where it is
    pub fn pause_ball(&mut self) {
        self.state.velocity = Vec3::ZERO;
    }

    pub fn is_moving(&self) -> bool {
        self.state.velocity.length() > 0.0
    }

    /// Snapshot of the full ball state
    pub fn state(&self) -> BallState {
        self.state
    }
}
