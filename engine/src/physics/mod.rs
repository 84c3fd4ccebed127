//! Physics module
//!
//! Geometry queries for the movement core. The character never owns the
//! level; it asks a [`GeometryQuery`] implementation for ray hits and reacts
//! to the answers.
//!
//! # Unit System
//!
//! **1 unit = 1 meter**, velocities in m/s, accelerations in m/s².
//!
//! # Submodules
//!
//! - [`collision`] - Ray queries, ray-AABB intersection and a static box world

pub mod collision;

pub use collision::{
    Aabb, ColliderId, EmptyWorld, FnGeometry, GeometryQuery, RayHit, StaticWorld,
    aabb_surface_normal, ray_aabb_intersect,
};
pub use glam::{Vec2, Vec3};
