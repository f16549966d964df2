//! Paddle movement from held-key input

use super::state::{Arena, PaddleId};
use crate::settings::Settings;

/// Held direction keys for one paddle. Up is -z, down is +z.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddleInput {
    pub up: bool,
    pub down: bool,
}

impl PaddleInput {
    pub const IDLE: Self = Self {
        up: false,
        down: false,
    };

    pub fn up() -> Self {
        Self {
            up: true,
            down: false,
        }
    }

    pub fn down() -> Self {
        Self {
            up: false,
            down: true,
        }
    }

    /// -1, 0 or 1 along z; both keys cancel out
    pub fn axis(&self) -> f32 {
        match (self.up, self.down) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Secondary-axis range a paddle centre may occupy
pub fn paddle_travel(settings: &Settings, half_depth: f32) -> (f32, f32) {
    let limit = settings.field.wall_limit() - half_depth;
    (-limit, limit)
}

/// Move paddles by their inputs for `dt` seconds, keeping them between the walls.
///
/// Unknown ids are ignored.
pub fn move_paddles(
    arena: &mut Arena,
    inputs: &[(PaddleId, PaddleInput)],
    dt: f32,
    settings: &Settings,
) {
    let step = settings.physics.paddle_speed * dt.max(0.0);

    for (id, input) in inputs {
        let axis = input.axis();
        if axis == 0.0 {
            continue;
        }
        if let Some(paddle) = arena.paddle_mut(*id) {
            let (min_z, max_z) = paddle_travel(settings, paddle.half_depth);
            paddle.position.z = (paddle.position.z + axis * step).clamp(min_z, max_z);
        }
    }
}
