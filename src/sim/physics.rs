//! Physics orchestrator
//!
//! One `PhysicsSystem` per match. Each frame it integrates the ball, resolves
//! collisions against the live paddle positions, writes the corrected state
//! back and checks for goals. Frame time is clamped and split into fixed
//! substeps so a long frame can't carry the ball through a paddle.

use glam::Vec3;

use super::ball::BallMovement;
use super::collision::CollisionSystem;
use super::paddle::{PaddleInput, move_paddles};
use super::scoring::{GoalResult, ScoringSystem};
use super::state::{Arena, BallState, GamePhase, PaddleId, Score};
use crate::settings::Settings;
use crate::{GameMode, Player};

/// What happened during one `update` call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameEvents {
    /// Wall bounces across all substeps
    pub wall_hits: u32,
    /// Last paddle that returned the ball
    pub paddle_hit: Option<PaddleId>,
    pub goal: Option<GoalResult>,
    /// A scheduled serve fired
    pub served: bool,
}

impl FrameEvents {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A single match: ball, paddles, collisions and score
#[derive(Debug)]
pub struct PhysicsSystem {
    settings: Settings,
    mode: GameMode,
    arena: Arena,
    ball: BallMovement,
    collision: CollisionSystem,
    scoring: ScoringSystem,
    phase: GamePhase,
}

impl PhysicsSystem {
    /// Start a match in `Serving`; the first serve fires after the start delay
    pub fn new(settings: Settings, mode: GameMode, seed: u64) -> Self {
        let mut ball = BallMovement::new(&settings.physics, seed);
        ball.reset_with_delay(settings.rules.start_delay(), None);

        log::debug!("Match created: mode={} seed={}", mode.as_str(), seed);

        Self {
            arena: Arena::for_mode(mode, &settings),
            collision: CollisionSystem::new(&settings),
            scoring: ScoringSystem::new(&settings),
            ball,
            settings,
            mode,
            phase: GamePhase::Serving,
        }
    }

    /// Advance the match by `dt` seconds of wall-clock time.
    ///
    /// Does nothing once the match is finished.
    pub fn update(&mut self, dt: f32) -> FrameEvents {
        let mut events = FrameEvents::default();
        if self.phase == GamePhase::Finished {
            return events;
        }

        let max_frame_dt = self.settings.physics.max_frame_dt;
        let mut remaining = dt.max(0.0);
        if remaining > max_frame_dt {
            log::debug!("Frame dt {:.3}s clamped to {:.3}s", remaining, max_frame_dt);
            remaining = max_frame_dt;
        }

        let sim_dt = if self.settings.physics.sim_dt > 0.0 {
            self.settings.physics.sim_dt
        } else {
            remaining
        };

        while remaining > 0.0 {
            let step = remaining.min(sim_dt);
            remaining -= step;
            self.step(step, &mut events);
            if self.phase == GamePhase::Finished {
                break;
            }
        }

        events
    }

    fn step(&mut self, dt: f32, events: &mut FrameEvents) {
        if self.ball.update(dt) {
            events.served = true;
            self.set_phase(GamePhase::Rallying);
            return;
        }

        if self.phase != GamePhase::Rallying {
            return;
        }

        let result = self
            .collision
            .check_collisions(&self.arena, self.ball.position(), self.ball.velocity());
        self.ball.set_position(result.new_position);
        self.ball.set_velocity(result.new_velocity);

        if result.hit_wall {
            events.wall_hits += 1;
        }
        if result.hit_paddle.is_some() {
            events.paddle_hit = result.hit_paddle;
        }

        if let Some(goal) = self.scoring.check_goal(result.new_position) {
            if goal.is_game_over() {
                self.ball.cancel_pending_reset();
                self.ball.pause_ball();
                self.set_phase(GamePhase::Finished);
            } else {
                let serve = goal.scorer.serve_after_goal();
                self.ball
                    .reset_with_delay(self.settings.rules.reset_delay(), Some(serve));
                self.set_phase(GamePhase::GoalPause);
            }
            events.goal = Some(goal);
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::debug!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Move paddles for this frame. Call before `update`.
    pub fn apply_input(&mut self, inputs: &[(PaddleId, PaddleInput)], dt: f32) {
        let dt = dt.clamp(0.0, self.settings.physics.max_frame_dt);
        move_paddles(&mut self.arena, inputs, dt, &self.settings);
    }

    /// Restart from scratch: zero score, paddles back home, new countdown
    pub fn reset_game(&mut self) {
        self.scoring.reset_score();
        self.arena = Arena::for_mode(self.mode, &self.settings);
        self.ball.reset_with_delay(self.settings.rules.start_delay(), None);
        self.set_phase(GamePhase::Serving);
        log::info!("Match reset");
    }

    pub fn score(&self) -> Score {
        self.scoring.score()
    }

    pub fn is_game_over(&self) -> bool {
        self.scoring.is_game_over()
    }

    pub fn winner(&self) -> Option<Player> {
        self.scoring.winner()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ball(&self) -> BallState {
        self.ball.state()
    }

    pub fn ball_position(&self) -> Vec3 {
        self.ball.position()
    }

    pub fn ball_velocity(&self) -> Vec3 {
        self.ball.velocity()
    }

    pub fn set_ball_speed(&mut self, speed: f32) {
        self.ball.set_ball_speed(speed);
    }

    pub fn pause_ball(&mut self) {
        self.ball.pause_ball();
    }

    pub fn is_moving(&self) -> bool {
        self.ball.is_moving()
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Paddle positions for the input layer
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn set_on_goal(&mut self, hook: impl FnMut(Player) + 'static) {
        self.scoring.set_on_goal(hook);
    }

    pub fn set_on_score_update(&mut self, hook: impl FnMut(u32, u32) + 'static) {
        self.scoring.set_on_score_update(hook);
    }

    pub fn set_on_game_over(&mut self, hook: impl FnMut(Player) + 'static) {
        self.scoring.set_on_game_over(hook);
    }

    pub fn clear_hooks(&mut self) {
        self.scoring.clear_hooks();
    }
}
