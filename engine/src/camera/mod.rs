//! Camera Module
//!
//! Third-person follow camera for the character. Window-system agnostic: it
//! only manages camera state and math, and reports the yaw that makes
//! movement input camera-relative.

pub mod follow;

pub use follow::{CameraConfig, CameraFollower};
