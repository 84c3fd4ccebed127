//! Input Module
//!
//! Platform-agnostic input for the movement core. Hosts feed key events into
//! [`MovementKeys`] and sample an [`InputSnapshot`] once per frame; scripted
//! runs and tests build snapshots directly.
//!
//! # Example
//!
//! ```rust,ignore
//! use sky_hop_engine::input::{InputSampler, KeyCode, MovementKeys};
//!
//! let mut keys = MovementKeys::new();
//! let mut sampler = InputSampler::new();
//!
//! keys.handle_key(KeyCode::W, true);
//! keys.handle_key(KeyCode::Space, true);
//!
//! let snapshot = sampler.sample(&keys, controller.mode().is_airborne(), camera.yaw_degrees());
//! controller.update(dt, &snapshot, &world, &mut events);
//! ```

pub mod keyboard;
pub mod snapshot;

pub use keyboard::{KeyCode, MovementKeys};
pub use snapshot::{InputSampler, InputSnapshot};
