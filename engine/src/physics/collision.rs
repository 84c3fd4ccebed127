//! Collision queries
//!
//! The movement core only ever asks one question of the world: "cast a ray
//! from here, in this direction, up to this far, ignoring me; what is the
//! nearest thing I hit?". [`GeometryQuery`] is that question.
//!
//! [`StaticWorld`] answers it for a set of axis-aligned boxes using the slab
//! method, which is enough for platforms, walls and floors in tests and in the
//! replay tool. Hosts with real level geometry implement the trait themselves
//! or wrap a closure in [`FnGeometry`].
//!
//! # Example
//!
//! ```ignore
//! use sky_hop_engine::physics::{GeometryQuery, StaticWorld};
//! use glam::Vec3;
//!
//! let mut world = StaticWorld::new();
//! world.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 1.0, 20.0));
//!
//! if let Some(hit) = world.cast_ray(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 5.0, None) {
//!     println!("floor at {:?}, normal {:?}", hit.point, hit.normal);
//! }
//! ```

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Identifies one collider inside a geometry provider.
///
/// The character stores its own id (if the host registered a body for it) so
/// that its rays skip it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// Result of a successful ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space position where the ray touched the surface
    pub point: Vec3,
    /// Outward surface normal at the hit point (normalized)
    pub normal: Vec3,
    /// Distance from the ray origin to `point`
    pub distance: f32,
    /// Collider that was hit, when the provider tracks ids
    pub collider: Option<ColliderId>,
}

impl RayHit {
    /// Creates a hit without collider information.
    pub fn new(point: Vec3, normal: Vec3, distance: f32) -> Self {
        Self {
            point,
            normal,
            distance,
            collider: None,
        }
    }
}

/// Synchronous ray query against level geometry.
///
/// `direction` is expected to be unit length. A `None` result is the normal
/// "open air" answer, never an error.
pub trait GeometryQuery {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<ColliderId>,
    ) -> Option<RayHit>;
}

impl<T: GeometryQuery + ?Sized> GeometryQuery for &T {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<ColliderId>,
    ) -> Option<RayHit> {
        (**self).cast_ray(origin, direction, max_distance, exclude)
    }
}

/// A world with nothing in it. Every ray misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyWorld;

impl GeometryQuery for EmptyWorld {
    fn cast_ray(&self, _: Vec3, _: Vec3, _: f32, _: Option<ColliderId>) -> Option<RayHit> {
        None
    }
}

/// Adapts a closure `(origin, direction, max_distance) -> Option<RayHit>`
/// into a [`GeometryQuery`]. Exclusion is left to the closure's owner.
pub struct FnGeometry<F>(pub F);

impl<F> GeometryQuery for FnGeometry<F>
where
    F: Fn(Vec3, Vec3, f32) -> Option<RayHit>,
{
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        _exclude: Option<ColliderId>,
    ) -> Option<RayHit> {
        (self.0)(origin, direction, max_distance)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centered on `center` with full extents `size`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Ray-AABB intersection using the slab method.
///
/// The slab method intersects the ray with each pair of axis-aligned planes
/// bounding the box. The ray hits when the latest entry happens before the
/// earliest exit and the exit is in front of the origin.
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the entry point, `0.0` when the
///   origin is already inside the box
/// * `None` - No intersection, or the box is entirely behind the origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Near-zero direction components become huge inverse values
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() > 1e-10 { 1.0 / ray_dir.x } else { f32::MAX * ray_dir.x.signum() },
        if ray_dir.y.abs() > 1e-10 { 1.0 / ray_dir.y } else { f32::MAX * ray_dir.y.signum() },
        if ray_dir.z.abs() > 1e-10 { 1.0 / ray_dir.z } else { f32::MAX * ray_dir.z.signum() },
    );

    let t1 = (aabb_min.x - ray_origin.x) * inv_dir.x;
    let t2 = (aabb_max.x - ray_origin.x) * inv_dir.x;

    let mut t_min = t1.min(t2);
    let mut t_max = t1.max(t2);

    let t3 = (aabb_min.y - ray_origin.y) * inv_dir.y;
    let t4 = (aabb_max.y - ray_origin.y) * inv_dir.y;

    t_min = t_min.max(t3.min(t4));
    t_max = t_max.min(t3.max(t4));

    let t5 = (aabb_min.z - ray_origin.z) * inv_dir.z;
    let t6 = (aabb_max.z - ray_origin.z) * inv_dir.z;

    t_min = t_min.max(t5.min(t6));
    t_max = t_max.min(t5.max(t6));

    if t_max >= t_min && t_max >= 0.0 {
        Some(t_min.max(0.0))
    } else {
        None
    }
}

/// Computes the outward normal of the AABB face closest to `point`.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let local = point - center;

    // Normalize to unit cube space
    let normalized = local / half_extents;
    let abs_normalized = normalized.abs();

    if abs_normalized.x >= abs_normalized.y && abs_normalized.x >= abs_normalized.z {
        Vec3::new(sign_or_one(normalized.x), 0.0, 0.0)
    } else if abs_normalized.y >= abs_normalized.x && abs_normalized.y >= abs_normalized.z {
        Vec3::new(0.0, sign_or_one(normalized.y), 0.0)
    } else {
        Vec3::new(0.0, 0.0, sign_or_one(normalized.z))
    }
}

fn sign_or_one(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

// =============================================================================
// StaticWorld - a set of boxes answering ray queries
// =============================================================================

/// Level geometry made of axis-aligned boxes.
///
/// Boxes are kept in a `BTreeMap` so iteration order, and therefore tie
/// breaking between equally distant hits, is stable across runs.
#[derive(Debug, Clone, Default)]
pub struct StaticWorld {
    boxes: BTreeMap<ColliderId, Aabb>,
    next_id: u32,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a world from a list of boxes, assigning ids in order.
    pub fn from_boxes(boxes: impl IntoIterator<Item = Aabb>) -> Self {
        let mut world = Self::new();
        for aabb in boxes {
            world.add_aabb(aabb);
        }
        world
    }

    /// Adds a box centered on `center` with full extents `size`.
    pub fn add_box(&mut self, center: Vec3, size: Vec3) -> ColliderId {
        self.add_aabb(Aabb::from_center_size(center, size))
    }

    pub fn add_aabb(&mut self, aabb: Aabb) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.boxes.insert(id, aabb);
        id
    }

    pub fn get(&self, id: ColliderId) -> Option<&Aabb> {
        self.boxes.get(&id)
    }

    pub fn remove(&mut self, id: ColliderId) -> Option<Aabb> {
        self.boxes.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColliderId, &Aabb)> {
        self.boxes.iter().map(|(id, aabb)| (*id, aabb))
    }
}

impl GeometryQuery for StaticWorld {
    /// Brute-force closest hit over every box. Fine for hand-built courses.
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<ColliderId>,
    ) -> Option<RayHit> {
        let mut closest: Option<RayHit> = None;

        for (&id, aabb) in &self.boxes {
            if Some(id) == exclude {
                continue;
            }
            let Some(t) = ray_aabb_intersect(origin, direction, aabb.min, aabb.max) else {
                continue;
            };
            let nearer = match closest {
                Some(current) => t < current.distance,
                None => t <= max_distance,
            };
            if nearer {
                let point = origin + direction * t;
                closest = Some(RayHit {
                    point,
                    normal: aabb_surface_normal(point, aabb.min, aabb.max),
                    distance: t,
                    collider: Some(id),
                });
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> (Vec3, Vec3) {
        (Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_ray_hits_aabb_from_front() {
        let (min, max) = unit_box();
        let t = ray_aabb_intersect(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, min, max);
        assert!((t.unwrap() - 4.0).abs() < 0.001, "Expected t=4.0, got {:?}", t);
    }

    #[test]
    fn test_ray_misses_aabb() {
        let (min, max) = unit_box();
        assert!(ray_aabb_intersect(Vec3::new(0.0, 5.0, -5.0), Vec3::Z, min, max).is_none());
    }

    #[test]
    fn test_ray_starting_inside_reports_zero() {
        let (min, max) = unit_box();
        assert_eq!(ray_aabb_intersect(Vec3::ZERO, Vec3::Z, min, max), Some(0.0));
    }

    #[test]
    fn test_ray_aabb_behind_origin() {
        let (min, max) = unit_box();
        assert!(ray_aabb_intersect(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, min, max).is_none());
    }

    #[test]
    fn test_surface_normals() {
        let (min, max) = unit_box();
        assert_eq!(aabb_surface_normal(Vec3::new(1.0, 0.0, 0.0), min, max), Vec3::X);
        assert_eq!(aabb_surface_normal(Vec3::new(-1.0, 0.0, 0.0), min, max), Vec3::NEG_X);
        assert_eq!(aabb_surface_normal(Vec3::new(0.0, 1.0, 0.2), min, max), Vec3::Y);
        assert_eq!(aabb_surface_normal(Vec3::new(0.1, 0.0, -1.0), min, max), Vec3::NEG_Z);
    }

    #[test]
    fn test_aabb_new_orders_corners() {
        let aabb = Aabb::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::ONE);
        assert!(aabb.contains(Vec3::splat(0.5)));
        assert!(!aabb.contains(Vec3::splat(1.5)));
    }

    #[test]
    fn test_world_returns_closest_hit() {
        let mut world = StaticWorld::new();
        world.add_box(Vec3::new(0.0, 0.0, 10.0), Vec3::ONE);
        let near = world.add_box(Vec3::new(0.0, 0.0, 5.0), Vec3::ONE);

        let hit = world.cast_ray(Vec3::ZERO, Vec3::Z, 20.0, None).unwrap();
        assert_eq!(hit.collider, Some(near));
        assert!((hit.distance - 4.5).abs() < 0.001);
        assert_eq!(hit.normal, Vec3::NEG_Z);
    }

    #[test]
    fn test_world_respects_max_distance() {
        let mut world = StaticWorld::new();
        world.add_box(Vec3::new(0.0, 0.0, 5.0), Vec3::ONE);
        assert!(world.cast_ray(Vec3::ZERO, Vec3::Z, 4.0, None).is_none());
    }

    #[test]
    fn test_world_skips_excluded_collider() {
        let mut world = StaticWorld::new();
        let own_body = world.add_box(Vec3::ZERO, Vec3::new(0.8, 1.6, 0.8));
        let wall = world.add_box(Vec3::new(0.0, 0.0, 3.0), Vec3::ONE);

        let hit = world.cast_ray(Vec3::ZERO, Vec3::Z, 10.0, Some(own_body)).unwrap();
        assert_eq!(hit.collider, Some(wall));

        let hit = world.cast_ray(Vec3::ZERO, Vec3::Z, 10.0, None).unwrap();
        assert_eq!(hit.collider, Some(own_body));
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_remove_box() {
        let mut world = StaticWorld::new();
        let id = world.add_box(Vec3::ZERO, Vec3::ONE);
        assert_eq!(world.len(), 1);
        assert!(world.remove(id).is_some());
        assert!(world.is_empty());
    }

    #[test]
    fn test_fn_geometry_adapter() {
        let floor = FnGeometry(|origin: Vec3, dir: Vec3, max: f32| {
            if dir.y < 0.0 && origin.y >= 0.0 && origin.y <= max {
                Some(RayHit::new(Vec3::new(origin.x, 0.0, origin.z), Vec3::Y, origin.y))
            } else {
                None
            }
        });
        assert!(floor.cast_ray(Vec3::new(0.0, 0.1, 0.0), Vec3::NEG_Y, 0.2, None).is_some());
        assert!(floor.cast_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y, 0.2, None).is_none());
        assert!(EmptyWorld.cast_ray(Vec3::ZERO, Vec3::NEG_Y, 100.0, None).is_none());
    }
}
