//! Pong Bracket - Pong physics with a single-elimination tournament
//!
//! Core modules:
//! - `sim`: Per-frame simulation (ball movement, collisions, scoring, orchestration)
//! - `tournament`: Bracket generation, advancement and session persistence
//! - `settings`: Data-driven field geometry, physics tuning and match rules
//! - `persistence`: Session-scoped key-value storage
//! - `error`: Crate error type

pub mod error;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tournament;

pub use error::{Error, Result};
pub use settings::Settings;
pub use sim::{PhysicsSystem, Score};
pub use tournament::{Match, Tournament};

use serde::{Deserialize, Serialize};

/// Game configuration constants
///
/// Lengths are world units, speeds are units per second, delays are milliseconds.
pub mod consts {
    /// Field dimensions (primary axis = x, secondary axis = z)
    pub const FIELD_WIDTH: f32 = 12.0;
    pub const FIELD_HEIGHT: f32 = 8.0;
    pub const WALL_THICKNESS: f32 = 0.2;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 0.5;
    pub const PADDLE_DEPTH: f32 = 2.0;
    /// Distance of the paddle centre from the field centre on the primary axis
    pub const PADDLE_X: f32 = 6.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.375;

    /// Speeds
    pub const BASE_BALL_SPEED: f32 = 6.0;
    pub const PADDLE_SPEED: f32 = 10.0;

    /// Paddle hit effects
    pub const SPIN_INTENSITY: f32 = 1.2;
    pub const SPEED_BOOST: f32 = 1.05;
    pub const MAX_VERTICAL_SPEED_MULTIPLIER: f32 = 1.5;
    pub const MAX_HORIZONTAL_SPEED_MULTIPLIER: f32 = 2.0;
    /// Exponent of the spin curve; below 1 favours off-centre hits
    pub const SPIN_EXPONENT: f32 = 0.7;
    /// Secondary-axis spread of a serve, as a fraction of ball speed
    pub const MAX_ANGLE_VARIATION: f32 = 0.3;

    /// Largest frame delta accepted before clamping (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Largest integration substep (seconds)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Match rules
    pub const WIN_SCORE: u32 = 1;
    pub const START_DELAY_MS: u64 = 3000;
    pub const RESET_DELAY_MS: u64 = 1500;
}

/// One of the two competitors of a match
///
/// Player One defends the right goal (+x), Player Two the left goal (-x).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// 1-based slot number, as shown to users and stored in brackets
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Direction of the serve that follows a goal by this player.
    ///
    /// The ball goes toward the side that conceded.
    pub fn serve_after_goal(self) -> ServeDirection {
        match self {
            Player::One => ServeDirection::Left,
            Player::Two => ServeDirection::Right,
        }
    }
}

/// Primary-axis direction of a serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServeDirection {
    /// Toward -x (Player Two)
    Left,
    /// Toward +x (Player One)
    Right,
}

impl ServeDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            ServeDirection::Left => -1.0,
            ServeDirection::Right => 1.0,
        }
    }
}

/// Available game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Pvp1v1,
    Pvp2v2,
    VsAi,
    Tournament,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Pvp1v1 => "pvp1v1",
            GameMode::Pvp2v2 => "pvp2v2",
            GameMode::VsAi => "vsai",
            GameMode::Tournament => "tournament",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pvp1v1" => Some(GameMode::Pvp1v1),
            "pvp2v2" => Some(GameMode::Pvp2v2),
            "vsai" => Some(GameMode::VsAi),
            "tournament" => Some(GameMode::Tournament),
            _ => None,
        }
    }

    /// Humans (or AIs) at the keyboard for one match
    pub fn player_count(&self) -> usize {
        match self {
            GameMode::Pvp2v2 => 4,
            _ => 2,
        }
    }

    pub fn has_ai(&self) -> bool {
        matches!(self, GameMode::VsAi)
    }

    pub fn is_tournament(&self) -> bool {
        matches!(self, GameMode::Tournament)
    }

    /// Paddles defending each goal
    pub fn paddles_per_side(&self) -> usize {
        match self {
            GameMode::Pvp2v2 => 2,
            _ => 1,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameMode::Pvp1v1 => "1 vs 1 - Player vs Player",
            GameMode::Pvp2v2 => "2 vs 2 - Team vs Team",
            GameMode::VsAi => "1 vs 1 - Player vs AI",
            GameMode::Tournament => "Tournament Mode",
        }
    }
}
