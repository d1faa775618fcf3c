use glam::{Affine3A, Vec3};

use super::aabb::AABB;
use super::ray::{intersect_aabb, Ray};

/// Oriented box used for ray picking.
///
/// Stored as a local-to-world transform plus half extents around the local
/// origin. Wall-mounted panels are thin boxes; axis-aligned boxes use a pure
/// translation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hitbox {
    transform: Affine3A,
    inverse: Affine3A,
    half_extents: Vec3,
}

impl Hitbox {
    /// Box with full edge lengths `size`, centered on the origin of `transform`
    pub fn oriented(transform: Affine3A, size: Vec3) -> Self {
        Self {
            transform,
            inverse: transform.inverse(),
            half_extents: size.abs() * 0.5,
        }
    }

    pub fn from_aabb(aabb: AABB) -> Self {
        Self::oriented(Affine3A::from_translation(aabb.center()), aabb.size())
    }

    pub fn transform(&self) -> &Affine3A {
        &self.transform
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// World-space distance along `ray` to the box, if it is hit in front of the origin
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        if !self.inverse.is_finite() || ray.is_degenerate() {
            return None;
        }

        // Direction stays unnormalized so the local parameter equals the world distance
        let local_origin = self.inverse.transform_point3(ray.origin);
        let local_dir = self.inverse.transform_vector3(ray.direction);

        intersect_aabb(local_origin, local_dir, -self.half_extents, self.half_extents)
    }

    /// World-space bounds of the eight corners
    pub fn bounds(&self) -> AABB {
        let h = self.half_extents;
        let corner = |x: f32, y: f32, z: f32| {
            AABB::point(self.transform.transform_point3(Vec3::new(x * h.x, y * h.y, z * h.z)))
        };

        [
            (-1.0, -1.0, 1.0),
            (1.0, -1.0, -1.0),
            (1.0, -1.0, 1.0),
            (-1.0, 1.0, -1.0),
            (-1.0, 1.0, 1.0),
            (1.0, 1.0, -1.0),
            (1.0, 1.0, 1.0),
        ]
        .iter()
        .fold(corner(-1.0, -1.0, -1.0), |acc, &(x, y, z)| acc.union(&corner(x, y, z)))
    }
}
