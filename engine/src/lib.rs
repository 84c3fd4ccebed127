//! Sky Hop Engine Library
//!
//! Character movement core for a 3D platformer: a per-frame state machine
//! with staged triple jumps, long jumps, wall kicks and ground pounds, coyote
//! time and jump buffering, resolved against level geometry with ray casts.
//! The core owns no renderer, window or audio; hosts feed it input and a
//! geometry query and receive telemetry and events back.
//!
//! # Modules
//!
//! - [`player`] - Movement controller, jump subsystem and collision resolver
//! - [`physics`] - Ray queries and a box-based static world
//! - [`input`] - Platform-agnostic keys and per-frame input snapshots
//! - [`camera`] - Third-person follow camera
//! - [`replay`] - Scripted, deterministic movement runs
//!
//! # Example
//!
//! ```ignore
//! use sky_hop_engine::input::{InputSampler, KeyCode, MovementKeys};
//! use sky_hop_engine::physics::StaticWorld;
//! use sky_hop_engine::player::{MovementEvent, PlayerMovementController};
//! use glam::Vec3;
//!
//! let mut world = StaticWorld::new();
//! world.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 1.0, 50.0));
//!
//! let mut controller = PlayerMovementController::at_position(Vec3::new(0.0, 0.8, 0.0));
//! let mut keys = MovementKeys::new();
//! let mut sampler = InputSampler::new();
//! let mut events: Vec<MovementEvent> = Vec::new();
//!
//! keys.handle_key(KeyCode::Space, true);
//! let input = sampler.sample(&keys, controller.mode().is_airborne(), 0.0);
//! controller.update(1.0 / 60.0, &input, &world, &mut events);
//! ```

pub mod camera;
pub mod input;
pub mod physics;
pub mod player;
pub mod replay;

// Re-export commonly used input types
pub use input::{InputSampler, InputSnapshot, KeyCode, MovementKeys};
// Re-export collision types
pub use physics::{Aabb, GeometryQuery, RayHit, StaticWorld};
// Re-export player types
pub use player::{MovementConfig, MovementEvent, PlayerMovementController};
