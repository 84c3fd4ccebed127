//! Player Module
//!
//! The character movement core.
//!
//! # Components
//!
//! - [`PlayerMovementController`] - Frame update and mode state machine
//!   - Camera-relative running with momentum smoothing and friction
//!   - Staged single/double/triple jumps, long jumps, wall kicks, ground pounds
//!   - Coyote time and jump buffering
//! - [`jump`] - The jump decision and ground pound transitions
//! - [`resolver`] - Ray-based ground, wall and movement collision
//! - [`MovementConfig`] - Tuning, loadable from JSON
//! - [`MovementEvent`] / [`EventSink`] - Feedback for particles, sound and cameras

pub mod config;
pub mod events;
pub mod jump;
pub mod movement_controller;
pub mod resolver;
pub mod state;
pub mod timers;

pub use config::{
    ConfigError, MovementConfig,
    MAX_SPEED, ACCELERATION, AIR_ACCELERATION, FRICTION, AIR_FRICTION,
    JUMP_HEIGHT, DOUBLE_JUMP_MULTIPLIER, TRIPLE_JUMP_MULTIPLIER, GRAVITY, TERMINAL_VELOCITY,
    MIN_TRIPLE_JUMP_SPEED, LONG_JUMP_BOOST, GROUND_POUND_VELOCITY, WALL_KICK_BOOST,
    MAX_JUMPS, JUMP_BUFFER_DURATION, COYOTE_DURATION, WALL_KICK_WINDOW,
};
pub use events::{EventSink, FnSink, MovementEvent, NullSink, SpeedTrail};
pub use jump::{JumpOutcome, can_jump, request_jump, start_ground_pound};
pub use movement_controller::{FrameReport, PlayerMovementController, lerp_angle_degrees};
pub use resolver::HorizontalStep;
pub use state::{Character, CombatState, MovementMode, Telemetry, WallContact};
pub use timers::MovementTimers;

static_assertions::assert_impl_all!(PlayerMovementController: Send, Sync, Clone);
static_assertions::assert_impl_all!(Character: Send, Sync, Clone);
static_assertions::const_assert_eq!(MAX_JUMPS, 3);
