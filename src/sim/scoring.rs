//! Goal detection, score keeping and win condition

use std::fmt;

use glam::Vec3;

use super::state::Score;
use crate::Player;
use crate::settings::Settings;

/// Called with the scorer
pub type GoalHook = Box<dyn FnMut(Player)>;
/// Called with (player1, player2)
pub type ScoreHook = Box<dyn FnMut(u32, u32)>;
/// Called with the match winner
pub type GameOverHook = Box<dyn FnMut(Player)>;

/// A confirmed goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalResult {
    pub scorer: Player,
    /// Score after the goal
    pub score: Score,
    /// Set when this goal ended the match
    pub winner: Option<Player>,
}

impl GoalResult {
    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }
}

/// Tracks goals and notifies a single UI consumer through hooks.
///
/// Each hook is a single slot: setting it again replaces the previous one.
pub struct ScoringSystem {
    score: Score,
    goal_limit: f32,
    win_score: u32,
    winner: Option<Player>,
    on_goal: Option<GoalHook>,
    on_score_update: Option<ScoreHook>,
    on_game_over: Option<GameOverHook>,
}

impl fmt::Debug for ScoringSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringSystem")
            .field("score", &self.score)
            .field("goal_limit", &self.goal_limit)
            .field("win_score", &self.win_score)
            .field("winner", &self.winner)
            .field("on_goal", &self.on_goal.is_some())
            .field("on_score_update", &self.on_score_update.is_some())
            .field("on_game_over", &self.on_game_over.is_some())
            .finish()
    }
}

impl ScoringSystem {
    pub fn new(settings: &Settings) -> Self {
        Self {
            score: Score::default(),
            goal_limit: settings.field.goal_limit(),
            win_score: settings.rules.win_score,
            winner: None,
            on_goal: None,
            on_score_update: None,
            on_game_over: None,
        }
    }

    /// Check whether the ball crossed a goal line.
    ///
    /// Player One scores past the left line (-x), Player Two past the right
    /// line (+x). Hooks fire in order: goal, score update, then game over.
    /// Once the match has a winner no more goals are counted.
    pub fn check_goal(&mut self, ball_position: Vec3) -> Option<GoalResult> {
        if self.winner.is_some() {
            return None;
        }

        let scorer = if ball_position.x < -self.goal_limit {
            Player::One
        } else if ball_position.x > self.goal_limit {
            Player::Two
        } else {
            return None;
        };

        self.score.increment(scorer);
        log::info!(
            "Goal for player {}: {}-{}",
            scorer.number(),
            self.score.player1,
            self.score.player2
        );
        self.notify_goal(scorer);

        let winner = self.score.winner(self.win_score);
        if let Some(winner) = winner {
            self.winner = Some(winner);
            log::info!("Game over, player {} wins", winner.number());
            if let Some(hook) = self.on_game_over.as_mut() {
                hook(winner);
            }
        }

        Some(GoalResult {
            scorer,
            score: self.score,
            winner,
        })
    }

    fn notify_goal(&mut self, player: Player) {
        if let Some(hook) = self.on_goal.as_mut() {
            hook(player);
        }
        self.notify_score();
    }

    fn notify_score(&mut self) {
        let Score { player1, player2 } = self.score;
        if let Some(hook) = self.on_score_update.as_mut() {
            hook(player1, player2);
        }
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn win_score(&self) -> u32 {
        self.win_score
    }

    /// Zero both counters, clear the winner and report the new score
    pub fn reset_score(&mut self) {
        self.score = Score::default();
        self.winner = None;
        self.notify_score();
    }

    pub fn set_on_goal(&mut self, hook: impl FnMut(Player) + 'static) {
        self.on_goal = Some(Box::new(hook));
    }

    pub fn set_on_score_update(&mut self, hook: impl FnMut(u32, u32) + 'static) {
        self.on_score_update = Some(Box::new(hook));
    }

    pub fn set_on_game_over(&mut self, hook: impl FnMut(Player) + 'static) {
        self.on_game_over = Some(Box::new(hook));
    }

    pub fn has_hooks(&self) -> bool {
        self.on_goal.is_some() || self.on_score_update.is_some() || self.on_game_over.is_some()
    }

    pub fn clear_hooks(&mut self) {
        self.on_goal = None;
        self.on_score_update = None;
        self.on_game_over = None;
    }
}
