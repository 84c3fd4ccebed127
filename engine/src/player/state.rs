//! Character state
//!
//! [`Character`] is the one mutable entity the movement core drives. It is
//! created once per session and mutated every frame by
//! [`PlayerMovementController`](super::PlayerMovementController).
//!
//! The behavior mode is a single [`MovementMode`] value rather than a set of
//! independent flags, so "long jumping and ground pounding at once" cannot be
//! represented.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::config::MovementConfig;
use super::timers::MovementTimers;
use crate::physics::ColliderId;

/// Exactly one of these is active on any frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementMode {
    /// Standing or running on the ground
    #[default]
    Grounded,
    /// In the air from a staged jump, a wall kick, a bounce or a ledge
    Airborne,
    /// Flat, fast arc started by crouch + jump; ends on landing
    LongJumping,
    /// Forced downward slam; ends on impact
    GroundPounding,
}

impl MovementMode {
    pub fn is_grounded(self) -> bool {
        self == MovementMode::Grounded
    }

    pub fn is_airborne(self) -> bool {
        !self.is_grounded()
    }
}

/// The wall most recently touched while falling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallContact {
    /// Surface normal reported by the wall probe
    pub normal: Vec3,
}

/// Combat bookkeeping carried with the character but never read by movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    pub damage_percent: f32,
    pub hitstun_frames: u32,
}

/// The character driven by the movement core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Body center in world space
    pub position: Vec3,
    /// `y` is jump/fall speed; `x`/`z` follow `momentum`
    pub velocity: Vec3,
    /// Smoothed horizontal intent (y is always zero)
    pub momentum: Vec3,
    pub mode: MovementMode,
    /// Position in the current jump chain, `0..=max_jumps`
    pub jump_count: u8,
    pub timers: MovementTimers,
    /// Set while a wall kick is possible; cleared on use or when the window closes
    pub wall_contact: Option<WallContact>,
    /// Sampled from input every frame
    pub is_crouching: bool,
    /// Yaw the body faces, in degrees, `atan2(x, z)` convention
    pub facing_degrees: f32,
    /// The character's own collider, skipped by every probe
    pub body: Option<ColliderId>,
    pub combat: CombatState,
}

impl Default for Character {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Character {
    /// A character standing at `position` with nothing in progress.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            momentum: Vec3::ZERO,
            mode: MovementMode::Grounded,
            jump_count: 0,
            timers: MovementTimers::default(),
            wall_contact: None,
            is_crouching: false,
            facing_degrees: 0.0,
            body: None,
            combat: CombatState::default(),
        }
    }

    pub fn with_body(mut self, body: ColliderId) -> Self {
        self.body = Some(body);
        self
    }

    pub fn is_grounded(&self) -> bool {
        self.mode.is_grounded()
    }

    /// Speed on the XZ plane, from the instantaneous velocity.
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    /// `true` while a wall was touched and its kick window is still open.
    pub fn can_wall_kick(&self) -> bool {
        self.wall_contact.is_some() && self.timers.wall_kick_open()
    }

    /// Copy momentum into the horizontal velocity components.
    pub(crate) fn sync_horizontal_velocity(&mut self) {
        self.velocity.x = self.momentum.x;
        self.velocity.z = self.momentum.z;
    }

    /// Forget the wall contact and close its window together.
    pub(crate) fn clear_wall_contact(&mut self) {
        self.wall_contact = None;
        self.timers.wall_kick = 0.0;
    }

    /// Read-only view for cameras, HUDs and game-rule code.
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            position: self.position,
            velocity: self.velocity,
            facing_degrees: self.facing_degrees,
            horizontal_speed: self.horizontal_speed(),
            grounded: self.is_grounded(),
            mode: self.mode,
            jump_count: self.jump_count,
        }
    }

    /// Assert the per-frame invariants. Compiles to nothing in release builds.
    pub fn debug_check_invariants(&self, config: &MovementConfig) {
        debug_assert!(
            self.jump_count <= config.max_jumps,
            "jump_count {} exceeds max_jumps {}",
            self.jump_count,
            config.max_jumps
        );
        debug_assert!(self.timers.all_non_negative(), "negative timer: {:?}", self.timers);
        debug_assert!(
            self.velocity.y >= config.terminal_velocity.min(config.ground_pound_velocity),
            "vertical velocity {} below terminal velocity",
            self.velocity.y
        );
        debug_assert!(
            !self.timers.wall_kick_open() || self.wall_contact.is_some(),
            "wall kick window open without a wall contact"
        );
        debug_assert!(
            !(self.is_grounded() && self.wall_contact.is_some()),
            "grounded character kept a wall contact"
        );
        debug_assert!(self.position.is_finite(), "position went non-finite");
    }
}

/// Snapshot of the character for external readers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub position: Vec3,
    pub velocity: Vec3,
    pub facing_degrees: f32,
    pub horizontal_speed: f32,
    pub grounded: bool,
    pub mode: MovementMode,
    pub jump_count: u8,
}
