//! Simulation value types
//!
//! Positions live on the x/z plane of a 3D scene: x is the primary axis
//! (goal to goal), z the secondary axis (wall to wall), y is always zero.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::{GameMode, Player};

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball frozen at centre, first serve countdown running
    Serving,
    /// Ball in play
    Rallying,
    /// Ball frozen after a goal, next serve scheduled
    GoalPause,
    /// Match over
    Finished,
}

/// Kinematic state of the ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Serve speed used by the next reset
    pub speed: f32,
}

impl BallState {
    pub fn at_rest(speed: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            speed,
        }
    }
}

/// Goal a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// -x, defended by Player Two
    Left,
    /// +x, defended by Player One
    Right,
}

impl Side {
    pub fn defender(self) -> Player {
        match self {
            Side::Left => Player::Two,
            Side::Right => Player::One,
        }
    }

    pub fn of(player: Player) -> Self {
        match player {
            Player::One => Side::Right,
            Player::Two => Side::Left,
        }
    }

    /// Sign of the primary axis on this side of the field
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// True when a ball with this primary-axis velocity travels toward this side
    #[inline]
    pub fn is_approached_by(self, velocity_x: f32) -> bool {
        velocity_x * self.sign() > 0.0
    }
}

/// Stable handle to one paddle in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaddleId {
    pub side: Side,
    /// Index within the side (0 for 1v1, 0 or 1 for 2v2)
    pub slot: u8,
}

impl PaddleId {
    pub fn new(side: Side, slot: u8) -> Self {
        Self { side, slot }
    }
}

/// A paddle as seen by the collision engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub id: PaddleId,
    pub position: Vec3,
    /// Half extent along the primary axis
    pub half_width: f32,
    /// Half extent along the secondary axis
    pub half_depth: f32,
}

impl Paddle {
    pub fn new(id: PaddleId, position: Vec3, width: f32, depth: f32) -> Self {
        Self {
            id,
            position,
            half_width: width / 2.0,
            half_depth: depth / 2.0,
        }
    }

    /// Primary-axis coordinate of the face pointing at the field centre
    #[inline]
    pub fn inner_face_x(&self) -> f32 {
        self.position.x - self.id.side.sign() * self.half_width
    }
}

/// All paddles of a match, grouped by the goal they defend.
///
/// A side may hold zero paddles (not yet spawned), one (1v1) or two (2v2).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub left: Vec<Paddle>,
    pub right: Vec<Paddle>,
}

impl Arena {
    /// Arena with no paddles
    pub fn empty() -> Self {
        Self::default()
    }

    /// Spawn paddles for a game mode.
    ///
    /// Single paddles start at z = 0; a two-paddle team starts at z = ±height/4.
    pub fn for_mode(mode: GameMode, settings: &Settings) -> Self {
        let per_side = mode.paddles_per_side();
        let obj = &settings.objects;
        let spawn = |side: Side| -> Vec<Paddle> {
            (0..per_side)
                .map(|slot| {
                    let z = if per_side == 1 {
                        0.0
                    } else {
                        let quarter = settings.field.height / 4.0;
                        if slot == 0 { -quarter } else { quarter }
                    };
                    Paddle::new(
                        PaddleId::new(side, slot as u8),
                        Vec3::new(side.sign() * obj.paddle_x, 0.0, z),
                        obj.paddle_width,
                        obj.paddle_depth,
                    )
                })
                .collect()
        };

        Self {
            left: spawn(Side::Left),
            right: spawn(Side::Right),
        }
    }

    pub fn side(&self, side: Side) -> &[Paddle] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut Vec<Paddle> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn paddle(&self, id: PaddleId) -> Option<&Paddle> {
        self.side(id.side).iter().find(|p| p.id == id)
    }

    pub fn paddle_mut(&mut self, id: PaddleId) -> Option<&mut Paddle> {
        self.side_mut(id.side).iter_mut().find(|p| p.id == id)
    }

    /// Every paddle, left side first
    pub fn paddles(&self) -> impl Iterator<Item = &Paddle> {
        self.left.iter().chain(self.right.iter())
    }

    pub fn paddles_mut(&mut self) -> impl Iterator<Item = &mut Paddle> {
        self.left.iter_mut().chain(self.right.iter_mut())
    }
}

/// Goals per player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player1: u32,
    pub player2: u32,
}

impl Score {
    pub fn new(player1: u32, player2: u32) -> Self {
        Self { player1, player2 }
    }

    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::One => self.player1,
            Player::Two => self.player2,
        }
    }

    pub fn increment(&mut self, player: Player) {
        match player {
            Player::One => self.player1 += 1,
            Player::Two => self.player2 += 1,
        }
    }

    /// Player who reached `win_score`, if any
    pub fn winner(&self, win_score: u32) -> Option<Player> {
        if self.player1 >= win_score {
            Some(Player::One)
        } else if self.player2 >= win_score {
            Some(Player::Two)
        } else {
            None
        }
    }
}
