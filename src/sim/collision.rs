//! Collision detection and response
//!
//! Walls bound the secondary axis, paddles guard each end of the primary axis.
//! A side is just a list of paddles, so 1v1 and 2v2 share one code path.

use std::cell::Cell;

use glam::Vec3;

use super::state::{Arena, Paddle, PaddleId, Side};
use crate::consts::SPIN_EXPONENT;
use crate::settings::Settings;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    pub new_velocity: Vec3,
    pub new_position: Vec3,
    /// Paddle that returned the ball this frame
    pub hit_paddle: Option<PaddleId>,
    /// Whether a wall reversed the secondary-axis velocity
    pub hit_wall: bool,
}

/// Stateless apart from geometry/tuning and a log-once flag per side
#[derive(Debug, Clone)]
pub struct CollisionSystem {
    wall_limit: f32,
    ball_radius: f32,
    base_speed: f32,
    spin_intensity: f32,
    speed_boost: f32,
    max_horizontal_speed: f32,
    max_vertical_speed: f32,
    /// [left, right]: an empty side has already been reported
    missing_reported: [Cell<bool>; 2],
}

impl CollisionSystem {
    pub fn new(settings: &Settings) -> Self {
        let physics = &settings.physics;
        Self {
            wall_limit: settings.field.wall_limit(),
            ball_radius: settings.objects.ball_radius,
            base_speed: physics.base_ball_speed,
            spin_intensity: physics.spin_intensity,
            speed_boost: physics.speed_boost,
            max_horizontal_speed: physics.max_horizontal_speed(),
            max_vertical_speed: physics.max_vertical_speed(),
            missing_reported: [Cell::new(false), Cell::new(false)],
        }
    }

    /// Resolve wall and paddle contacts for the current ball state.
    ///
    /// Paddle positions must already reflect this frame's input.
    pub fn check_collisions(
        &self,
        arena: &Arena,
        position: Vec3,
        velocity: Vec3,
    ) -> CollisionResult {
        let (mut new_velocity, hit_wall) = self.check_wall_collisions(position, velocity);
        let mut new_position = position;
        let mut hit_paddle = None;

        // Left before right; the first paddle that makes contact wins
        for side in [Side::Left, Side::Right] {
            let paddles = arena.side(side);
            if paddles.is_empty() {
                self.report_missing(side);
                continue;
            }

            let hit = paddles
                .iter()
                .find(|paddle| self.touches_paddle(paddle, position, new_velocity));

            if let Some(paddle) = hit {
                new_velocity = self.apply_paddle_effect(paddle, position.z, new_velocity);
                // Sit the ball against the paddle's inner face
                new_position.x =
                    paddle.position.x - side.sign() * (paddle.half_width + self.ball_radius);
                hit_paddle = Some(paddle.id);
                break;
            }
        }

        // Keep the ball between the walls whatever happened above
        let limit = self.wall_limit - self.ball_radius;
        new_position.z = new_position.z.clamp(-limit, limit);

        CollisionResult {
            new_velocity,
            new_position,
            hit_paddle,
            hit_wall,
        }
    }

    /// Reverse the secondary-axis velocity when touching a wall while moving into it
    fn check_wall_collisions(&self, position: Vec3, velocity: Vec3) -> (Vec3, bool) {
        let mut new_velocity = velocity;
        let mut hit = false;
        let reach = self.wall_limit - self.ball_radius;

        if position.z >= reach && velocity.z > 0.0 {
            new_velocity.z = -new_velocity.z;
            hit = true;
        }
        if position.z <= -reach && velocity.z < 0.0 {
            new_velocity.z = -new_velocity.z;
            hit = true;
        }

        (new_velocity, hit)
    }

    fn touches_paddle(&self, paddle: &Paddle, position: Vec3, velocity: Vec3) -> bool {
        let in_vertical_range =
            (position.z - paddle.position.z).abs() <= paddle.half_depth + self.ball_radius;
        let in_horizontal_range =
            (position.x - paddle.position.x).abs() <= paddle.half_width + self.ball_radius;

        in_vertical_range && in_horizontal_range && paddle.id.side.is_approached_by(velocity.x)
    }

    /// Bounce, spin and accelerate the ball off a paddle
    fn apply_paddle_effect(&self, paddle: &Paddle, ball_z: f32, velocity: Vec3) -> Vec3 {
        let mut new_velocity = velocity;
        new_velocity.x = -new_velocity.x;

        // Edge-overlap hits (past the paddle end but within ball reach) exceed 1
        let hit_position = (ball_z - paddle.position.z) / paddle.half_depth;
        new_velocity.z += spin_for_hit(hit_position) * self.base_speed * self.spin_intensity;
        new_velocity.x *= self.speed_boost;

        new_velocity.z = new_velocity
            .z
            .clamp(-self.max_vertical_speed, self.max_vertical_speed);
        new_velocity.x = new_velocity
            .x
            .clamp(-self.max_horizontal_speed, self.max_horizontal_speed);

        new_velocity
    }

    fn report_missing(&self, side: Side) {
        let flag = &self.missing_reported[match side {
            Side::Left => 0,
            Side::Right => 1,
        }];
        if !flag.replace(true) {
            log::warn!("No paddles on the {:?} side; collisions skipped", side);
        }
    }
}

/// Non-linear spin factor for a hit position (paddle half-depths from its centre).
///
/// Off-centre hits get disproportionately more spin than near-centre ones.
#[inline]
pub fn spin_for_hit(hit_position: f32) -> f32 {
    if hit_position == 0.0 {
        return 0.0;
    }
    hit_position.signum() * hit_position.abs().powf(SPIN_EXPONENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameMode;
    use proptest::prelude::*;

    fn setup(mode: GameMode) -> (CollisionSystem, Arena, Settings) {
        let settings = Settings::default();
        let arena = Arena::for_mode(mode, &settings);
        (CollisionSystem::new(&settings), arena, settings)
    }

    #[test]
    fn test_ball_bounces_off_top_wall() {
        let (system, arena, settings) = setup(GameMode::Pvp1v1);
        let limit = settings.field.wall_limit() - settings.objects.ball_radius;
        let pos = Vec3::new(0.0, 0.0, limit + 0.05);
        let vel = Vec3::new(3.0, 0.0, 2.0);

        let result = system.check_collisions(&arena, pos, vel);
        assert!(result.hit_wall);
        assert_eq!(result.new_velocity.z, -2.0);
        assert_eq!(result.new_velocity.x, 3.0, "X velocity should be unchanged");
        assert!(result.new_position.z <= limit, "Ball should be pushed out of wall");
    }

    #[test]
    fn test_ball_bounces_off_bottom_wall() {
        let (system, arena, settings) = setup(GameMode::Pvp1v1);
        let limit = settings.field.wall_limit() - settings.objects.ball_radius;
        let pos = Vec3::new(0.0, 0.0, -limit);
        let vel = Vec3::new(-3.0, 0.0, -2.0);

        let result = system.check_collisions(&arena, pos, vel);
        assert!(result.hit_wall);
        assert_eq!(result.new_velocity.z, 2.0);
    }

    #[test]
    fn test_no_wall_bounce_when_leaving_wall() {
        let (system, arena, settings) = setup(GameMode::Pvp1v1);
        let limit = settings.field.wall_limit() - settings.objects.ball_radius;
        let pos = Vec3::new(0.0, 0.0, limit);
        let vel = Vec3::new(3.0, 0.0, -2.0);

        let result = system.check_collisions(&arena, pos, vel);
        assert!(!result.hit_wall);
        assert_eq!(result.new_velocity, vel);
    }

    #[test]
    fn test_ball_collides_with_right_paddle() {
        let (system, arena, settings) = setup(GameMode::Pvp1v1);
        let paddle = arena.right[0];
        let pos = Vec3::new(paddle.inner_face_x() - 0.1, 0.0, 0.0);
        let vel = Vec3::new(6.0, 0.0, 0.0);

        let result = system.check_collisions(&arena, pos, vel);
        assert_eq!(result.hit_paddle, Some(paddle.id));
        assert!(result.new_velocity.x < 0.0, "Ball should bounce back left");
        let expected_x = paddle.position.x - paddle.half_width - settings.objects.ball_radius;
        assert!((result.new_position.x - expected_x).abs() < 1e-6);
    }

    #[test]
    fn test_ball_collides_with_left_paddle() {
        let (system, arena, settings) = setup(GameMode::Pvp1v1);
        let paddle = arena.left[0];
        let pos = Vec3::new(paddle.inner_face_x() + 0.1, 0.0, 0.0);
        let vel = Vec3::new(-6.0, 0.0, 0.0);

        let result = system.check_collisions(&arena, pos, vel);
        assert_eq!(result.hit_paddle, Some(paddle.id));
        assert!(result.new_velocity.x > 0.0, "Ball should bounce back right");
        let expected_x = paddle.position.x + paddle.half_width + settings.objects.ball_radius;
        assert!((result.new_position.x - expected_x).abs() < 1e-6);
    }

    #[test]
    fn test_ball_does_not_bounce_when_moving_away_from_paddle() {
        let (system, arena, _) = setup(GameMode::Pvp1v1);
        let paddle = arena.right[0];
        let pos = Vec3::new(paddle.inner_face_x(), 0.0, 0.0);
        let vel = Vec3::new(-6.0, 0.0, 0.0);

        let result = system.check_collisions(&arena, pos, vel);
        assert_eq!(result.hit_paddle, None);
        assert_eq!(result.new_velocity, vel);
        assert_eq!(result.new_position.x, pos.x);
    }

    #[test]
    fn test_ball_misses_paddle_vertically() {
        let (system, arena, _) = setup(GameMode::Pvp1v1);
        let paddle = arena.right[0];
        let pos = Vec3::new(paddle.position.x, 0.0, 2.0);
        let vel = Vec3::new(6.0, 0.0, 0.0);

        let result = system.check_collisions(&arena, pos, vel);
        assert_eq!(result.hit_paddle, None);
    }

    #[test]
    fn test_speed_boost_on_centre_hit() {
        let (system, arena, settings) = setup(GameMode::Pvp1v1);
        let paddle = arena.right[0];
        let pos = Vec3::new(paddle.inner_face_x(), 0.0, 0.0);
        let vel = Vec3::new(6.0, 0.0, 0.0);

        let result = system.check_collisions(&arena, pos, vel);
        assert!((result.new_velocity.x + 6.0 * settings.physics.speed_boost).abs() < 1e-5);
        assert_eq!(result.new_velocity.z, 0.0, "Centre hit adds no spin");
    }

    #[test]
    fn test_spin_follows_hit_position() {
        let (system, arena, _) = setup(GameMode::Pvp1v1);
        let paddle = arena.right[0];
        let vel = Vec3::new(6.0, 0.0, 0.0);

        let upper = system.check_collisions(&arena, Vec3::new(5.6, 0.0, 0.8), vel);
        assert!(upper.new_velocity.z > 0.0);

        let lower = system.check_collisions(&arena, Vec3::new(5.6, 0.0, -0.8), vel);
        assert!(lower.new_velocity.z < 0.0);
        assert!((upper.new_velocity.z + lower.new_velocity.z).abs() < 1e-5);
        assert_eq!(upper.hit_paddle, Some(paddle.id));
    }

    #[test]
    fn test_edge_overlap_hit_spins_harder_than_paddle_end() {
        let (system, arena, settings) = setup(GameMode::Pvp1v1);
        let vel = Vec3::new(6.0, 0.0, 0.0);

        let result = system.check_collisions(&arena, Vec3::new(5.6, 0.0, 1.3), vel);
        assert!(result.hit_paddle.is_some());
        let expected = 1.3f32.powf(SPIN_EXPONENT)
            * settings.physics.base_ball_speed
            * settings.physics.spin_intensity;
        assert!(expected < settings.physics.max_vertical_speed());
        assert!((result.new_velocity.z - expected).abs() < 1e-4);

        let end = system.check_collisions(&arena, Vec3::new(5.6, 0.0, 1.0), vel);
        assert!(result.new_velocity.z > end.new_velocity.z);
    }

    #[test]
    fn test_spin_is_non_linear() {
        // A quarter-offset hit gets more than a quarter of full spin
        assert!(spin_for_hit(0.25) > 0.25);
        assert!((spin_for_hit(1.0) - 1.0).abs() < 1e-6);
        assert_eq!(spin_for_hit(0.0), 0.0);
        assert!((spin_for_hit(-0.5) + spin_for_hit(0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_clamped_on_hit() {
        let (system, arena, settings) = setup(GameMode::Pvp1v1);
        let pos = Vec3::new(5.6, 0.0, 1.2);
        let vel = Vec3::new(50.0, 0.0, 40.0);

        let result = system.check_collisions(&arena, pos, vel);
        assert!(result.hit_paddle.is_some());
        assert_eq!(result.new_velocity.x, -settings.physics.max_horizontal_speed());
        assert_eq!(result.new_velocity.z, settings.physics.max_vertical_speed());
    }

    #[test]
    fn test_second_team_paddle_returns_ball() {
        let (system, arena, _) = setup(GameMode::Pvp2v2);
        let lower = arena.left[1];
        let pos = Vec3::new(lower.inner_face_x() + 0.1, 0.0, lower.position.z);
        let vel = Vec3::new(-6.0, 0.0, 0.0);

        let result = system.check_collisions(&arena, pos, vel);
        assert_eq!(result.hit_paddle, Some(lower.id));
        assert!(result.new_velocity.x > 0.0);
    }

    #[test]
    fn test_missing_paddles_do_not_panic() {
        let settings = Settings::default();
        let system = CollisionSystem::new(&settings);
        let arena = Arena::empty();
        let pos = Vec3::new(5.8, 0.0, 0.0);
        let vel = Vec3::new(6.0, 0.0, 0.0);

        let result = system.check_collisions(&arena, pos, vel);
        assert_eq!(result.hit_paddle, None);
        assert_eq!(result.new_velocity, vel);
        // Second call stays quiet and still works
        let result = system.check_collisions(&arena, pos, vel);
        assert_eq!(result.new_position, pos);
    }

    #[test]
    fn test_position_clamped_inside_walls() {
        let (system, arena, settings) = setup(GameMode::Pvp1v1);
        let limit = settings.field.wall_limit() - settings.objects.ball_radius;

        let result = system.check_collisions(&arena, Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        assert_eq!(result.new_position.z, limit);

        let result = system.check_collisions(&arena, Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO);
        assert_eq!(result.new_position.z, -limit);
    }

    proptest! {
        #[test]
        fn prop_paddle_hit_respects_speed_caps(
            z in -1.3f32..1.3,
            vx in 0.1f32..100.0,
            vz in -100.0f32..100.0,
        ) {
            let (system, arena, settings) = setup(GameMode::Pvp1v1);
            let pos = Vec3::new(5.7, 0.0, z);
            let result = system.check_collisions(&arena, pos, Vec3::new(vx, 0.0, vz));
            prop_assert!(result.hit_paddle.is_some());
            prop_assert!(result.new_velocity.x.abs() <= settings.physics.max_horizontal_speed());
            prop_assert!(result.new_velocity.z.abs() <= settings.physics.max_vertical_speed());
        }

        #[test]
        fn prop_wall_reverses_exactly_once(
            x in -3.0f32..3.0,
            vz in 0.01f32..20.0,
            top in any::<bool>(),
        ) {
            let (system, arena, settings) = setup(GameMode::Pvp1v1);
            let limit = settings.field.wall_limit() - settings.objects.ball_radius;
            let (z, vz) = if top { (limit, vz) } else { (-limit, -vz) };

            let pos = Vec3::new(x, 0.0, z);
            let first = system.check_collisions(&arena, pos, Vec3::new(1.0, 0.0, vz));
            prop_assert!(first.hit_wall);
            prop_assert_eq!(first.new_velocity.z, -vz);

            // Same frame position with the reversed velocity: no second bounce
            let second = system.check_collisions(&arena, first.new_position, first.new_velocity);
            prop_assert!(!second.hit_wall);
            prop_assert_eq!(second.new_velocity.z, -vz);
        }
    }
}
