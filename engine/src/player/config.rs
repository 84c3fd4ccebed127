//! Movement tuning
//!
//! Every number the movement core uses lives in [`MovementConfig`]. The
//! defaults reproduce the feel of the classic three-stage jump: a tight
//! 8 m/s run, short hops that grow with each chained jump, and a ground pound
//! that slams straight down.
//!
//! Configs are plain serde structs with `#[serde(default)]`, so a JSON file
//! only needs to name the values it changes:
//!
//! ```rust,ignore
//! use sky_hop_engine::player::MovementConfig;
//!
//! let config = MovementConfig::from_json_str(r#"{ "max_speed": 10.0 }"#)?;
//! assert_eq!(config.gravity, 20.0);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top horizontal run speed in m/s
pub const MAX_SPEED: f32 = 8.0;

/// Momentum smoothing rate while grounded (per second)
pub const ACCELERATION: f32 = 15.0;

/// Momentum smoothing rate while airborne (per second)
pub const AIR_ACCELERATION: f32 = 6.0;

/// Per-frame momentum retention with no input, grounded
pub const FRICTION: f32 = 0.92;

/// Per-frame momentum retention with no input, airborne
pub const AIR_FRICTION: f32 = 0.98;

/// Base jump impulse in m/s
pub const JUMP_HEIGHT: f32 = 2.5;

/// Second chained jump multiplier
pub const DOUBLE_JUMP_MULTIPLIER: f32 = 1.2;

/// Third chained jump multiplier
pub const TRIPLE_JUMP_MULTIPLIER: f32 = 1.8;

/// Gravity acceleration in m/s^2
pub const GRAVITY: f32 = 20.0;

/// Lowest allowed vertical velocity in m/s
pub const TERMINAL_VELOCITY: f32 = -30.0;

/// Horizontal speed required for the third jump to count as a triple jump
pub const MIN_TRIPLE_JUMP_SPEED: f32 = 4.0;

/// Momentum multiplier applied on long-jump takeoff
pub const LONG_JUMP_BOOST: f32 = 1.5;

/// Vertical velocity forced by a ground pound
pub const GROUND_POUND_VELOCITY: f32 = -25.0;

/// Wall-kick horizontal speed as a multiple of `MAX_SPEED`
pub const WALL_KICK_BOOST: f32 = 1.3;

/// Length of an unbroken jump chain
pub const MAX_JUMPS: u8 = 3;

/// How long an early jump press stays valid, in seconds
pub const JUMP_BUFFER_DURATION: f32 = 0.1;

/// Grace window after walking off a ledge, in seconds
pub const COYOTE_DURATION: f32 = 0.15;

/// Grace window after touching a wall, in seconds
pub const WALL_KICK_WINDOW: f32 = 0.15;

/// Errors raised while loading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Tuning for the character movement state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // --- Locomotion ---
    pub max_speed: f32,
    pub acceleration: f32,
    pub air_acceleration: f32,
    pub friction: f32,
    pub air_friction: f32,
    /// Momentum magnitude below which a coasting character stops dead
    pub stop_speed: f32,
    /// Facing interpolation rate (fraction per second)
    pub turn_rate: f32,

    // --- Jumping ---
    pub jump_height: f32,
    pub double_jump_multiplier: f32,
    pub triple_jump_multiplier: f32,
    pub min_triple_jump_speed: f32,
    pub max_jumps: u8,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub jump_buffer_duration: f32,
    pub coyote_duration: f32,
    /// Downward speed above which a landing is reported as hard
    pub hard_landing_speed: f32,

    // --- Long jump ---
    /// Minimum horizontal speed for crouch + jump to become a long jump
    pub long_jump_min_speed: f32,
    pub long_jump_height_factor: f32,
    pub long_jump_boost: f32,
    /// Momentum cap after the boost, as a multiple of `max_speed`
    pub long_jump_speed_cap: f32,
    /// Air steering during a long jump, as a fraction of `air_acceleration`
    pub long_jump_steering: f32,

    // --- Wall kick ---
    pub wall_kick_boost: f32,
    pub wall_kick_height_factor: f32,
    pub wall_kick_window: f32,
    pub wall_probe_distance: f32,

    // --- Ground pound ---
    pub ground_pound_velocity: f32,
    /// Momentum kept when the pound starts
    pub ground_pound_momentum_keep: f32,
    /// Per-frame momentum retention while pounding
    pub ground_pound_damping: f32,
    pub ground_pound_bounce_factor: f32,

    // --- Body and probes ---
    pub body_width: f32,
    pub body_height: f32,
    /// Height above the body center used for wall and movement rays
    pub chest_height: f32,
    /// Height above the feet where ground rays start
    pub ground_probe_lift: f32,
    pub min_ground_probe: f32,
    /// Side ground rays sit at this fraction of the half-width
    pub ground_probe_spread: f32,
    /// Fraction of momentum kept when sliding along a blocking wall
    pub slide_speed_keep: f32,

    // --- Feedback ---
    /// Speed trail starts above this fraction of `max_speed`
    pub speed_trail_threshold: f32,
    pub speed_trail_interval: f32,

    /// Longest frame the simulation will integrate in one step
    pub max_frame_dt: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            acceleration: ACCELERATION,
            air_acceleration: AIR_ACCELERATION,
            friction: FRICTION,
            air_friction: AIR_FRICTION,
            stop_speed: 0.1,
            turn_rate: 10.0,

            jump_height: JUMP_HEIGHT,
            double_jump_multiplier: DOUBLE_JUMP_MULTIPLIER,
            triple_jump_multiplier: TRIPLE_JUMP_MULTIPLIER,
            min_triple_jump_speed: MIN_TRIPLE_JUMP_SPEED,
            max_jumps: MAX_JUMPS,
            gravity: GRAVITY,
            terminal_velocity: TERMINAL_VELOCITY,
            jump_buffer_duration: JUMP_BUFFER_DURATION,
            coyote_duration: COYOTE_DURATION,
            hard_landing_speed: 5.0,

            long_jump_min_speed: 3.0,
            long_jump_height_factor: 0.8,
            long_jump_boost: LONG_JUMP_BOOST,
            long_jump_speed_cap: 1.5,
            long_jump_steering: 0.3,

            wall_kick_boost: WALL_KICK_BOOST,
            wall_kick_height_factor: 1.1,
            wall_kick_window: WALL_KICK_WINDOW,
            wall_probe_distance: 0.6,

            ground_pound_velocity: GROUND_POUND_VELOCITY,
            ground_pound_momentum_keep: 0.2,
            ground_pound_damping: 0.95,
            ground_pound_bounce_factor: 0.3,

            body_width: 0.8,
            body_height: 1.6,
            chest_height: 0.5,
            ground_probe_lift: 0.1,
            min_ground_probe: 0.2,
            ground_probe_spread: 0.4,
            slide_speed_keep: 0.5,

            speed_trail_threshold: 0.7,
            speed_trail_interval: 0.05,

            max_frame_dt: 0.1,
        }
    }
}

impl MovementConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the state machine's invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason: "must be a positive number" })
            }
        }
        fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason: "must be within 0..=1" })
            }
        }

        positive("max_speed", self.max_speed)?;
        positive("acceleration", self.acceleration)?;
        positive("air_acceleration", self.air_acceleration)?;
        positive("jump_height", self.jump_height)?;
        positive("gravity", self.gravity)?;
        positive("body_width", self.body_width)?;
        positive("body_height", self.body_height)?;
        positive("wall_probe_distance", self.wall_probe_distance)?;
        positive("min_ground_probe", self.min_ground_probe)?;
        positive("speed_trail_interval", self.speed_trail_interval)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        unit_interval("friction", self.friction)?;
        unit_interval("air_friction", self.air_friction)?;
        unit_interval("ground_pound_momentum_keep", self.ground_pound_momentum_keep)?;
        unit_interval("ground_pound_damping", self.ground_pound_damping)?;
        unit_interval("slide_speed_keep", self.slide_speed_keep)?;

        if !(self.terminal_velocity.is_finite() && self.terminal_velocity < 0.0) {
            return Err(ConfigError::Invalid {
                field: "terminal_velocity",
                reason: "must be a negative number",
            });
        }
        if !(self.ground_pound_velocity.is_finite() && self.ground_pound_velocity < 0.0) {
            return Err(ConfigError::Invalid {
                field: "ground_pound_velocity",
                reason: "must be a negative number",
            });
        }
        if self.max_jumps == 0 {
            return Err(ConfigError::Invalid { field: "max_jumps", reason: "must be at least 1" });
        }
        for (field, value) in [
            ("jump_buffer_duration", self.jump_buffer_duration),
            ("coyote_duration", self.coyote_duration),
            ("wall_kick_window", self.wall_kick_window),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid { field, reason: "must be zero or positive" });
            }
        }
        Ok(())
    }

    /// Half of the body height; distance from the center to the feet.
    pub fn half_height(&self) -> f32 {
        self.body_height * 0.5
    }

    /// Half of the body width.
    pub fn half_width(&self) -> f32 {
        self.body_width * 0.5
    }

    /// Impulse multiplier for the given position in a jump chain.
    pub fn jump_multiplier(&self, jump_count: u8) -> f32 {
        match jump_count {
            2 => self.double_jump_multiplier,
            3 => self.triple_jump_multiplier,
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_constants() {
        let config = MovementConfig::default();
        assert_eq!(config.max_speed, MAX_SPEED);
        assert_eq!(config.jump_height, JUMP_HEIGHT);
        assert_eq!(config.terminal_velocity, TERMINAL_VELOCITY);
        assert_eq!(config.max_jumps, 3);
        assert_eq!(config.half_height(), 0.8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_jump_multiplier_table() {
        let config = MovementConfig::default();
        assert_eq!(config.jump_multiplier(1), 1.0);
        assert_eq!(config.jump_multiplier(2), 1.2);
        assert_eq!(config.jump_multiplier(3), 1.8);
        assert_eq!(config.jump_multiplier(0), 1.0);
        assert_eq!(config.jump_multiplier(7), 1.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MovementConfig::from_json_str(r#"{ "max_speed": 10.0 }"#).unwrap();
        assert_eq!(config.max_speed, 10.0);
        assert_eq!(config.gravity, GRAVITY);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = MovementConfig::from_json_str(r#"{ "gravity": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "gravity", .. }));

        let err = MovementConfig::from_json_str(r#"{ "terminal_velocity": 5.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "terminal_velocity", .. }));

        let err = MovementConfig::from_json_str(r#"{ "friction": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "friction", .. }));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = MovementConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let config = MovementConfig { max_speed: 9.5, ..Default::default() };
        let json = config.to_json_string().unwrap();
        assert_eq!(MovementConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = MovementConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
