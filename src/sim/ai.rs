//! Computer opponent
//!
//! Plays like a slightly clumsy human: it looks at the ball once per second,
//! predicts where the ball will cross its paddle line (bounces included), and
//! steers with the same held-key inputs a player would use. Random dead zones,
//! prediction error and occasional overcorrection keep it beatable.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::paddle::PaddleInput;
use super::state::{Arena, PaddleId};
use crate::settings::Settings;

/// Seconds between two looks at the ball
pub const UPDATE_INTERVAL: f32 = 1.0;
/// Seconds a decision must hold before the AI may change direction
pub const MIN_STABILITY_TIME: f32 = 0.2;
/// Below this the ball counts as stationary on the primary axis
const VELOCITY_THRESHOLD: f32 = 0.001;
const MAX_BOUNCES: u32 = 10;
/// Total width of the uniform prediction error
const PREDICTION_ERROR_RANGE: f32 = 1.8;
const OVERCORRECTION_CHANCE: f64 = 0.3;
const OVERCORRECTION_RANGE: f32 = 1.5;
const DEAD_ZONE_JITTER_CHANCE: f64 = 0.2;

/// Where a ball will cross `paddle_x`, following wall bounces.
///
/// Returns 0 (field centre) when the ball is stationary on the primary axis
/// or moving away from the paddle.
pub fn predict_arrival_z(position: Vec3, velocity: Vec3, paddle_x: f32, wall_reach: f32) -> f32 {
    if velocity.x.abs() < VELOCITY_THRESHOLD {
        return 0.0;
    }
    let moving_right = velocity.x > 0.0;
    let paddle_on_right = paddle_x > 0.0;
    if moving_right != paddle_on_right {
        return 0.0;
    }

    let mut time_remaining = (paddle_x - position.x).abs() / velocity.x.abs();
    let mut z = position.z;
    let mut vz = velocity.z;
    let mut bounces = 0;

    while time_remaining > 0.0 && bounces < MAX_BOUNCES {
        let distance_to_wall = if vz > 0.0 { wall_reach - z } else { z + wall_reach };
        let time_to_wall = if vz.abs() > VELOCITY_THRESHOLD {
            (distance_to_wall / vz).abs()
        } else {
            f32::INFINITY
        };

        let step = time_remaining.min(time_to_wall);
        z += vz * step;
        time_remaining -= step;

        if step == time_to_wall && time_remaining > 0.0 {
            vz = -vz;
            bounces += 1;
        }
    }

    z
}

/// AI controller for one paddle
#[derive(Debug, Clone)]
pub struct Ai {
    paddle: PaddleId,
    wall_reach: f32,
    rng: Pcg32,
    since_last_look: f32,
    target_z: f32,
    dead_zone: f32,
    overcorrecting: bool,
    overcorrection_offset: f32,
    last_decision: PaddleInput,
    time_since_change: f32,
}

impl Ai {
    pub fn new(paddle: PaddleId, settings: &Settings, seed: u64) -> Self {
        Self {
            paddle,
            wall_reach: settings.field.wall_limit() - settings.objects.ball_radius,
            rng: Pcg32::seed_from_u64(seed),
            // First look happens on the first update
            since_last_look: UPDATE_INTERVAL,
            target_z: 0.0,
            dead_zone: 0.3,
            overcorrecting: false,
            overcorrection_offset: 0.0,
            last_decision: PaddleInput::IDLE,
            time_since_change: 0.0,
        }
    }

    pub fn paddle(&self) -> PaddleId {
        self.paddle
    }

    /// Current aim point on the secondary axis (before overcorrection)
    pub fn target_z(&self) -> f32 {
        self.target_z
    }

    /// Refresh the prediction if a second has passed. Returns true when it did.
    pub fn update_vision(
        &mut self,
        ball_position: Vec3,
        ball_velocity: Vec3,
        paddle_x: f32,
        dt: f32,
    ) -> bool {
        self.since_last_look += dt.max(0.0);
        if self.since_last_look < UPDATE_INTERVAL {
            return false;
        }
        self.since_last_look = 0.0;

        let predicted = predict_arrival_z(ball_position, ball_velocity, paddle_x, self.wall_reach);
        let error = (self.rng.random::<f32>() - 0.5) * PREDICTION_ERROR_RANGE;
        self.target_z = predicted + error;
        self.dead_zone = 0.5 + self.rng.random::<f32>() * 1.5;

        if self.rng.random_bool(OVERCORRECTION_CHANCE) {
            self.overcorrecting = true;
            self.overcorrection_offset = (self.rng.random::<f32>() - 0.5) * OVERCORRECTION_RANGE;
        } else {
            self.overcorrecting = false;
            self.overcorrection_offset = 0.0;
        }

        true
    }

    /// Choose held keys for this frame
    pub fn decide(&mut self, paddle_z: f32, dt: f32) -> PaddleInput {
        let effective_target = self.target_z + self.overcorrection_offset;
        let diff = effective_target - paddle_z;

        if self.overcorrecting && diff.abs() < self.dead_zone * 0.5 {
            self.overcorrecting = false;
            self.overcorrection_offset = 0.0;
        }

        let mut dead_zone = self.dead_zone;
        if self.rng.random_bool(DEAD_ZONE_JITTER_CHANCE) {
            let modifier = if self.rng.random_bool(0.5) { 1.8 } else { 0.3 };
            dead_zone *= modifier;
        }

        let wants_up = diff < -dead_zone;
        let wants_down = diff > dead_zone;
        let wants_stop = !wants_up && !wants_down;

        let last = self.last_decision;
        let changing_direction = (last.up && wants_down)
            || (last.down && wants_up)
            || ((last.up || last.down) && wants_stop);

        if changing_direction && self.time_since_change < MIN_STABILITY_TIME {
            self.time_since_change += dt.max(0.0);
            return last;
        }
        self.time_since_change = 0.0;

        let decision = PaddleInput {
            up: wants_up,
            down: wants_down,
        };
        self.last_decision = decision;
        decision
    }

    /// Look (when due) and decide for the controlled paddle.
    ///
    /// `None` when the paddle is not in the arena.
    pub fn control(
        &mut self,
        arena: &Arena,
        ball_position: Vec3,
        ball_velocity: Vec3,
        dt: f32,
    ) -> Option<(PaddleId, PaddleInput)> {
        let paddle = arena.paddle(self.paddle)?;
        let (paddle_x, paddle_z) = (paddle.position.x, paddle.position.z);
        self.update_vision(ball_position, ball_velocity, paddle_x, dt);
        Some((self.paddle, self.decide(paddle_z, dt)))
    }
}
