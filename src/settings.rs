//! Field geometry, physics tuning and match rules
//!
//! Defaults mirror [`crate::consts`]. Settings deserialize from partial JSON:
//! any missing key falls back to its default, so a saved blob can override
//! just the values you care about.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::persistence::SessionStore;

/// Playing field dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Extent along the primary axis (x); goals sit at ±width/2
    pub width: f32,
    /// Extent along the secondary axis (z); walls sit at ±height/2
    pub height: f32,
    pub wall_thickness: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            wall_thickness: WALL_THICKNESS,
        }
    }
}

impl FieldConfig {
    /// Secondary-axis coordinate of the inner wall face
    #[inline]
    pub fn wall_limit(&self) -> f32 {
        self.height / 2.0 - self.wall_thickness / 2.0
    }

    /// Primary-axis coordinate of the goal lines
    #[inline]
    pub fn goal_limit(&self) -> f32 {
        self.width / 2.0
    }
}

/// Ball and paddle dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectConfig {
    /// Paddle extent along the primary axis
    pub paddle_width: f32,
    /// Paddle extent along the secondary axis
    pub paddle_depth: f32,
    /// Distance of each paddle line from the centre
    pub paddle_x: f32,
    pub ball_radius: f32,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            paddle_width: PADDLE_WIDTH,
            paddle_depth: PADDLE_DEPTH,
            paddle_x: PADDLE_X,
            ball_radius: BALL_RADIUS,
        }
    }
}

/// Motion and collision tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub base_ball_speed: f32,
    pub paddle_speed: f32,
    pub spin_intensity: f32,
    pub speed_boost: f32,
    pub max_vertical_speed_multiplier: f32,
    pub max_horizontal_speed_multiplier: f32,
    pub max_angle_variation: f32,
    pub max_frame_dt: f32,
    pub sim_dt: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            base_ball_speed: BASE_BALL_SPEED,
            paddle_speed: PADDLE_SPEED,
            spin_intensity: SPIN_INTENSITY,
            speed_boost: SPEED_BOOST,
            max_vertical_speed_multiplier: MAX_VERTICAL_SPEED_MULTIPLIER,
            max_horizontal_speed_multiplier: MAX_HORIZONTAL_SPEED_MULTIPLIER,
            max_angle_variation: MAX_ANGLE_VARIATION,
            max_frame_dt: MAX_FRAME_DT,
            sim_dt: SIM_DT,
        }
    }
}

impl PhysicsConfig {
    /// Velocity cap on the primary axis
    #[inline]
    pub fn max_horizontal_speed(&self) -> f32 {
        self.base_ball_speed * self.max_horizontal_speed_multiplier
    }

    /// Velocity cap on the secondary axis
    #[inline]
    pub fn max_vertical_speed(&self) -> f32 {
        self.base_ball_speed * self.max_vertical_speed_multiplier
    }
}

/// Match rules and timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub win_score: u32,
    pub start_delay_ms: u64,
    pub reset_delay_ms: u64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            win_score: WIN_SCORE,
            start_delay_ms: START_DELAY_MS,
            reset_delay_ms: RESET_DELAY_MS,
        }
    }
}

impl GameRules {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}

/// All runtime-tunable configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub field: FieldConfig,
    pub objects: ObjectConfig,
    pub physics: PhysicsConfig,
    pub rules: GameRules,
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "pongSettings";

    /// Parse settings from (possibly partial) JSON and validate them
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("field.width", self.field.width),
            ("field.height", self.field.height),
            ("objects.paddle_width", self.objects.paddle_width),
            ("objects.paddle_depth", self.objects.paddle_depth),
            ("objects.ball_radius", self.objects.ball_radius),
            ("physics.base_ball_speed", self.physics.base_ball_speed),
            ("physics.paddle_speed", self.physics.paddle_speed),
            ("physics.max_frame_dt", self.physics.max_frame_dt),
            ("physics.sim_dt", self.physics.sim_dt),
            (
                "physics.max_vertical_speed_multiplier",
                self.physics.max_vertical_speed_multiplier,
            ),
            (
                "physics.max_horizontal_speed_multiplier",
                self.physics.max_horizontal_speed_multiplier,
            ),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(Error::InvalidSetting {
                    name,
                    value,
                    reason: "must be positive",
                });
            }
        }

        if self.field.wall_thickness < 0.0 {
            return Err(Error::InvalidSetting {
                name: "field.wall_thickness",
                value: self.field.wall_thickness,
                reason: "must not be negative",
            });
        }
        if self.physics.speed_boost < 1.0 {
            return Err(Error::InvalidSetting {
                name: "physics.speed_boost",
                value: self.physics.speed_boost,
                reason: "must be at least 1",
            });
        }
        if self.rules.win_score == 0 {
            return Err(Error::InvalidSetting {
                name: "rules.win_score",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        // Paddles and ball must fit between the walls
        if self.objects.paddle_depth / 2.0 > self.field.wall_limit()
            || self.objects.ball_radius >= self.field.wall_limit()
        {
            return Err(Error::InvalidSetting {
                name: "field.height",
                value: self.field.height,
                reason: "too small for paddle and ball",
            });
        }
        Ok(())
    }

    /// Load settings from the store, falling back to defaults
    pub fn load(store: &dyn SessionStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring stored settings: {}", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut dyn SessionStore) -> Result<()> {
        store.set(Self::STORAGE_KEY, &self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
