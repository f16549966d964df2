//! Deterministic simulation module
//!
//! All match logic lives here. This module must stay pure and deterministic:
//! - Fixed substeps only
//! - Seeded RNG only
//! - Stable iteration order (left side before right, slot order within a side)
//! - No rendering or platform dependencies

pub mod ai;
pub mod ball;
pub mod collision;
pub mod paddle;
pub mod physics;
pub mod scoring;
pub mod state;

pub use ai::{Ai, predict_arrival_z};
pub use ball::BallMovement;
pub use collision::{CollisionResult, CollisionSystem, spin_for_hit};
pub use paddle::{PaddleInput, move_paddles, paddle_travel};
pub use physics::{FrameEvents, PhysicsSystem};
pub use scoring::{GoalResult, ScoringSystem};
pub use state::{Arena, BallState, GamePhase, Paddle, PaddleId, Score, Side};
