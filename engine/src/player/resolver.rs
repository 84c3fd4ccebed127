//! Collision Resolver
//!
//! Keeps the character out of the level using nothing but ray casts against a
//! [`GeometryQuery`]. Three probes run each frame:
//!
//! - **Ground**: three downward rays from just above the feet (center plus
//!   one either side along the facing's right axis). The highest hit wins and
//!   the body is snapped to stand on it.
//! - **Wall**: eight horizontal rays from chest height, axis directions first,
//!   then diagonals. The first ray that hits is the wall.
//! - **Movement**: one ray along this frame's horizontal displacement. A hit
//!   cancels the step and turns momentum along the surface.
//!
//! Only the ground snap ever moves the body out of geometry; the other probes
//! adjust velocity and momentum.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec3;
use tracing::trace;

use super::config::MovementConfig;
use super::state::{Character, MovementMode};
use crate::physics::{GeometryQuery, RayHit};

/// Wall probe directions in evaluation order.
pub const WALL_PROBE_DIRECTIONS: [Vec3; 8] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Z,
    Vec3::NEG_Z,
    Vec3::new(FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2),
    Vec3::new(-FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2),
    Vec3::new(FRAC_1_SQRT_2, 0.0, -FRAC_1_SQRT_2),
    Vec3::new(-FRAC_1_SQRT_2, 0.0, -FRAC_1_SQRT_2),
];

/// What the horizontal movement ray found this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizontalStep {
    /// No horizontal velocity, nothing to do
    Idle,
    /// The body moved by the full displacement
    Moved,
    /// Movement was cancelled by a surface with this normal
    Blocked { normal: Vec3 },
}

/// Right axis on the XZ plane for a facing yaw in degrees.
pub fn facing_right(facing_degrees: f32) -> Vec3 {
    let (sin, cos) = facing_degrees.to_radians().sin_cos();
    Vec3::new(cos, 0.0, -sin)
}

/// Origins of the three ground rays: center, left, right.
pub fn ground_ray_origins(character: &Character, config: &MovementConfig) -> [Vec3; 3] {
    let center = character.position
        + Vec3::new(0.0, config.ground_probe_lift - config.half_height(), 0.0);
    let side = facing_right(character.facing_degrees) * (config.half_width() * config.ground_probe_spread);
    [center, center - side, center + side]
}

/// Ground probe length: far enough to catch this frame's fall, never shorter
/// than `min_ground_probe`.
pub fn ground_probe_distance(vertical_velocity: f32, dt: f32, config: &MovementConfig) -> f32 {
    (vertical_velocity.abs() * dt + config.ground_probe_lift).max(config.min_ground_probe)
}

/// Cast the ground rays and return the highest surface height found.
pub fn probe_ground(
    character: &Character,
    config: &MovementConfig,
    world: &dyn GeometryQuery,
    dt: f32,
) -> Option<f32> {
    let distance = ground_probe_distance(character.velocity.y, dt, config);

    ground_ray_origins(character, config)
        .into_iter()
        .filter_map(|origin| world.cast_ray(origin, Vec3::NEG_Y, distance, character.body))
        .map(|hit| hit.point.y)
        .reduce(f32::max)
}

/// Stand the body on a surface at height `ground_y`.
pub fn snap_to_ground(character: &mut Character, config: &MovementConfig, ground_y: f32) {
    character.position.y = ground_y + config.half_height();
    character.velocity.y = 0.0;
}

/// Cast the eight wall rays from chest height; the first hit wins.
pub fn probe_wall(
    character: &Character,
    config: &MovementConfig,
    world: &dyn GeometryQuery,
) -> Option<RayHit> {
    let origin = character.position + Vec3::Y * config.chest_height;
    WALL_PROBE_DIRECTIONS.iter().find_map(|&direction| {
        world.cast_ray(origin, direction, config.wall_probe_distance, character.body)
    })
}

/// Momentum after hitting a surface: along the surface tangent on the XZ
/// plane, at `keep` times the previous speed.
///
/// Falls back to scaling the old momentum when the normal has no horizontal
/// part (floors and ceilings).
pub fn slide_momentum(momentum: Vec3, normal: Vec3, keep: f32) -> Vec3 {
    let tangent = Vec3::new(normal.z, 0.0, -normal.x).normalize_or_zero();
    if tangent == Vec3::ZERO {
        momentum * keep
    } else {
        tangent * (momentum.length() * keep)
    }
}

/// Move the body horizontally by `velocity * dt`, unless a surface is in the
/// way.
pub fn integrate_horizontal(
    character: &mut Character,
    config: &MovementConfig,
    world: &dyn GeometryQuery,
    dt: f32,
) -> HorizontalStep {
    let displacement = Vec3::new(character.velocity.x, 0.0, character.velocity.z) * dt;
    let distance = displacement.length();
    if distance <= f32::EPSILON {
        return HorizontalStep::Idle;
    }

    let direction = displacement / distance;
    let origin = character.position + Vec3::Y * config.chest_height;
    let reach = distance + config.half_width();

    match world.cast_ray(origin, direction, reach, character.body) {
        Some(hit) => {
            character.momentum = slide_momentum(character.momentum, hit.normal, config.slide_speed_keep);
            trace!(normal = ?hit.normal, momentum = ?character.momentum, "movement blocked, sliding");
            HorizontalStep::Blocked { normal: hit.normal }
        }
        None => {
            character.position += displacement;
            HorizontalStep::Moved
        }
    }
}

/// Move the body vertically by `velocity.y * dt`.
pub fn integrate_vertical(character: &mut Character, dt: f32) {
    character.position.y += character.velocity.y * dt;
}

/// Apply gravity in the modes that fall, then clamp to terminal velocity.
///
/// Grounded characters get no gravity; ground pounds keep their fixed slam
/// speed.
pub fn apply_gravity(character: &mut Character, config: &MovementConfig, dt: f32) {
    if matches!(character.mode, MovementMode::Airborne | MovementMode::LongJumping) {
        character.velocity.y -= config.gravity * dt;
        character.velocity.y = character.velocity.y.max(config.terminal_velocity);
    }
}
