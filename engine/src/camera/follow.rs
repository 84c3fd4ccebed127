//! Third-person follow camera
//!
//! An orbit camera that trails the character at a fixed offset, rotated by
//! mouse yaw and pitch, and eases toward its goal each frame. Its yaw is what
//! makes movement input camera-relative: feed [`CameraFollower::yaw_degrees`]
//! into the input snapshot.

use std::path::Path;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::player::{ConfigError, Telemetry};

/// Follow camera tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Offset from the character at zero yaw and pitch (behind and above)
    pub offset: Vec3,
    /// Position easing rate (fraction per second)
    pub follow_speed: f32,
    /// Look target height above the body center
    pub look_height: f32,
    /// Degrees of yaw / pitch per unit of mouse movement
    pub mouse_sensitivity: Vec2,
    pub pitch_limit_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 8.0, -15.0),
            follow_speed: 6.0,
            look_height: 1.0,
            mouse_sensitivity: Vec2::new(40.0, 40.0),
            pitch_limit_degrees: 45.0,
        }
    }
}

impl CameraConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.offset.is_finite() {
            return Err(ConfigError::Invalid {
                field: "offset",
                reason: "must be finite",
            });
        }
        if !(self.follow_speed.is_finite() && self.follow_speed >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "follow_speed",
                reason: "must be a non-negative number",
            });
        }
        if !(self.pitch_limit_degrees > 0.0 && self.pitch_limit_degrees < 90.0) {
            return Err(ConfigError::Invalid {
                field: "pitch_limit_degrees",
                reason: "must be between 0 and 90",
            });
        }
        Ok(())
    }
}

/// Orbit camera following the character.
#[derive(Debug, Clone)]
pub struct CameraFollower {
    config: CameraConfig,
    position: Vec3,
    target: Vec3,
    /// Unwrapped yaw in degrees
    yaw: f32,
    /// Pitch in degrees, within `±pitch_limit_degrees`
    pitch: f32,
}

impl Default for CameraFollower {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl CameraFollower {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            position: config.offset,
            target: Vec3::Y * config.look_height,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn get_position(&self) -> Vec3 {
        self.position
    }

    /// Point the camera looks at.
    pub fn get_target(&self) -> Vec3 {
        self.target
    }

    /// Unit view direction, or zero when the camera sits on its target.
    pub fn get_forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Yaw in degrees wrapped into `[-180, 180)`.
    pub fn yaw_degrees(&self) -> f32 {
        (self.yaw + 180.0).rem_euclid(360.0) - 180.0
    }

    pub fn pitch_degrees(&self) -> f32 {
        self.pitch
    }

    /// Apply a mouse movement delta.
    pub fn handle_mouse_look(&mut self, delta_x: f32, delta_y: f32) {
        if !(delta_x.is_finite() && delta_y.is_finite()) {
            return;
        }
        let limit = self.config.pitch_limit_degrees;
        self.yaw += delta_x * self.config.mouse_sensitivity.x;
        self.pitch = (self.pitch - delta_y * self.config.mouse_sensitivity.y).clamp(-limit, limit);
    }

    /// Where the camera wants to be for a character at `anchor`.
    pub fn goal_position(&self, anchor: Vec3) -> Vec3 {
        let rotation = Quat::from_rotation_y(-self.yaw.to_radians())
            * Quat::from_rotation_x(self.pitch.to_radians());
        anchor + rotation * self.config.offset
    }

    /// Ease toward the goal behind the character.
    pub fn follow(&mut self, dt: f32, character: &Telemetry) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let goal = self.goal_position(character.position);
        let t = (self.config.follow_speed * dt).clamp(0.0, 1.0);

        self.position = self.position.lerp(goal, t);
        self.target = character.position + Vec3::Y * self.config.look_height;
    }

    /// Jump straight to the goal, skipping the easing.
    pub fn snap_to(&mut self, character: &Telemetry) {
        self.position = self.goal_position(character.position);
        self.target = character.position + Vec3::Y * self.config.look_height;
    }
}
