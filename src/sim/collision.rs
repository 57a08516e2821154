//! Sphere vs. box collision
//!
//! Level geometry is made of axis-aligned boxes. Solid boxes get a contact
//! with normal and penetration; trigger boxes only need an overlap test.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Closest point on or in the box to `p`
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min(), self.max())
    }

    pub fn contains(&self, p: Vec3) -> bool {
        self.closest_point(p) == p
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the sphere touches the box (within the contact skin)
    pub hit: bool,
    /// Contact point on the box surface
    pub point: Vec3,
    /// Surface normal pointing toward the sphere center
    pub normal: Vec3,
    /// Overlap depth (0 when only within the skin)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a sphere against a solid box
///
/// `skin` widens the touch test so a sphere resting on a surface keeps its
/// contact from step to step.
pub fn sphere_box_collision(center: Vec3, radius: f32, aabb: &Aabb, skin: f32) -> CollisionResult {
    if aabb.contains(center) {
        return deep_contact(center, radius, aabb);
    }

    let closest = aabb.closest_point(center);
    let delta = center - closest;
    let dist = delta.length();
    if dist > radius + skin {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        point: closest,
        normal: delta / dist,
        penetration: (radius - dist).max(0.0),
    }
}

/// Sphere center is inside the box: push out along the shallowest face
fn deep_contact(center: Vec3, radius: f32, aabb: &Aabb) -> CollisionResult {
    let local = center - aabb.center;
    let depth = aabb.half_extents - local.abs();

    let (axis, sign) = if depth.x <= depth.y && depth.x <= depth.z {
        (Vec3::X, local.x.signum())
    } else if depth.y <= depth.z {
        (Vec3::Y, local.y.signum())
    } else {
        (Vec3::Z, local.z.signum())
    };
    let normal = axis * sign;
    let face_depth = depth.dot(axis);

    CollisionResult {
        hit: true,
        point: center - normal * face_depth,
        normal,
        penetration: face_depth + radius,
    }
}

/// Overlap test for trigger volumes
#[inline]
pub fn sphere_box_overlap(center: Vec3, radius: f32, aabb: &Aabb) -> bool {
    center.distance_squared(aabb.closest_point(center)) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Aabb {
        Aabb::new(Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0))
    }

    #[test]
    fn test_resting_on_floor_is_a_hit() {
        let result = sphere_box_collision(Vec3::new(1.0, 0.5, 2.0), 0.5, &floor(), 0.02);
        assert!(result.hit);
        assert_eq!(result.normal, Vec3::Y);
        assert!(result.penetration.abs() < 1e-6);
    }

    #[test]
    fn test_sunk_into_floor() {
        let result = sphere_box_collision(Vec3::new(0.0, 0.3, 0.0), 0.5, &floor(), 0.02);
        assert!(result.hit);
        assert!((result.penetration - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_above_floor_misses() {
        let result = sphere_box_collision(Vec3::new(0.0, 1.0, 0.0), 0.5, &floor(), 0.02);
        assert!(!result.hit);
    }

    #[test]
    fn test_center_inside_box_pushes_out_shallowest_face() {
        let result = sphere_box_collision(Vec3::new(0.0, -0.1, 0.0), 0.5, &floor(), 0.02);
        assert!(result.hit);
        assert_eq!(result.normal, Vec3::Y);
        assert!((result.penetration - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_trigger_overlap() {
        let zone = Aabb::new(Vec3::new(5.0, 0.5, 0.0), Vec3::splat(0.5));
        assert!(sphere_box_overlap(Vec3::new(4.2, 0.5, 0.0), 0.5, &zone));
        assert!(!sphere_box_overlap(Vec3::new(3.8, 0.5, 0.0), 0.5, &zone));
    }
}
