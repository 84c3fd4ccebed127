//! Per-frame input
//!
//! [`InputSnapshot`] is everything the movement core reads from the player in
//! one frame: a movement axis pair, the camera yaw, and three buttons. Press
//! requests are edges, so holding jump jumps once.
//!
//! [`InputSampler`] turns held [`MovementKeys`] into snapshots by remembering
//! the previous frame's keys.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::keyboard::MovementKeys;

/// One frame of movement input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSnapshot {
    /// Strafe axis, `-1..=1`, positive is right
    pub move_axis_x: f32,
    /// Forward axis, `-1..=1`, positive is forward
    pub move_axis_z: f32,
    /// Jump was pressed this frame
    pub jump_pressed: bool,
    /// Ground pound was requested this frame
    pub ground_pound_requested: bool,
    pub crouch_held: bool,
    /// Camera yaw in degrees; movement is rotated by it
    pub camera_yaw_degrees: f32,
}

impl InputSnapshot {
    pub fn with_axes(mut self, x: f32, z: f32) -> Self {
        self.move_axis_x = x;
        self.move_axis_z = z;
        self
    }

    pub fn with_jump(mut self) -> Self {
        self.jump_pressed = true;
        self
    }

    pub fn with_ground_pound(mut self) -> Self {
        self.ground_pound_requested = true;
        self
    }

    pub fn with_crouch(mut self) -> Self {
        self.crouch_held = true;
        self
    }

    pub fn with_camera_yaw(mut self, degrees: f32) -> Self {
        self.camera_yaw_degrees = degrees;
        self
    }

    /// Copy with axes clamped to `-1..=1` and non-finite values zeroed.
    pub fn sanitized(&self) -> Self {
        if !(self.move_axis_x.is_finite()
            && self.move_axis_z.is_finite()
            && self.camera_yaw_degrees.is_finite())
        {
            warn!(snapshot = ?self, "non-finite input values zeroed");
        }
        let finite_or_zero = |v: f32| if v.is_finite() { v } else { 0.0 };

        Self {
            move_axis_x: finite_or_zero(self.move_axis_x).clamp(-1.0, 1.0),
            move_axis_z: finite_or_zero(self.move_axis_z).clamp(-1.0, 1.0),
            camera_yaw_degrees: finite_or_zero(self.camera_yaw_degrees),
            ..*self
        }
    }

    /// Unit movement direction on the XZ plane, rotated by the camera yaw,
    /// or zero when there is no input.
    pub fn world_direction(&self) -> Vec3 {
        let local = Vec3::new(self.move_axis_x, 0.0, self.move_axis_z).normalize_or_zero();
        if local == Vec3::ZERO {
            return Vec3::ZERO;
        }

        let (sin, cos) = self.camera_yaw_degrees.to_radians().sin_cos();
        Vec3::new(
            local.x * cos - local.z * sin,
            0.0,
            local.x * sin + local.z * cos,
        )
    }
}

/// Builds [`InputSnapshot`]s from held keys, detecting press edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSampler {
    previous: MovementKeys,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample this frame's keys.
    ///
    /// A fresh crouch press becomes a ground-pound request only while
    /// `airborne`; on the ground it is just a crouch.
    pub fn sample(
        &mut self,
        keys: &MovementKeys,
        airborne: bool,
        camera_yaw_degrees: f32,
    ) -> InputSnapshot {
        let jump_edge = keys.jump && !self.previous.jump;
        let crouch_edge = keys.crouch && !self.previous.crouch;
        self.previous = *keys;

        InputSnapshot {
            move_axis_x: keys.right_axis() as f32,
            move_axis_z: keys.forward_axis() as f32,
            jump_pressed: jump_edge,
            ground_pound_requested: crouch_edge && airborne,
            crouch_held: keys.crouch,
            camera_yaw_degrees,
        }
    }

    /// Forget the previous keys, so held buttons register as new presses.
    pub fn reset(&mut self) {
        self.previous = MovementKeys::default();
    }
}
