use glam::{Affine3A, Vec3};

/// Hits closer than this to the ray origin are treated as behind it
const MIN_HIT_DISTANCE: f32 = 0.001;

/// World-space ray with a normalized direction
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray along a pose's forward axis (-Z), starting at its translation
    pub fn from_transform(transform: &Affine3A) -> Self {
        let origin = Vec3::from(transform.translation);
        let direction = transform.transform_vector3(Vec3::NEG_Z);
        Self::new(origin, direction)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// A zero-scale pose yields no usable direction
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO || !self.direction.is_finite()
    }
}

/// Slab test. Returns the nearest positive distance along `ray_dir`, or the
/// exit distance when the origin is inside the box.
///
/// Distances are in units of `ray_dir`, so an unnormalized direction gives the
/// parameter of the hit rather than its length.
pub fn intersect_aabb(ray_origin: Vec3, ray_dir: Vec3, box_min: Vec3, box_max: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-8;

    // Near-zero components are clamped to a huge inverse instead of dividing by zero
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.x) } else { 1.0 / ray_dir.x },
        if ray_dir.y.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.y) } else { 1.0 / ray_dir.y },
        if ray_dir.z.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.z) } else { 1.0 / ray_dir.z },
    );

    let t_min = (box_min - ray_origin) * inv_dir;
    let t_max = (box_max - ray_origin) * inv_dir;

    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);

    let t_near = t1.x.max(t1.y).max(t1.z);
    let t_far = t2.x.min(t2.y).min(t2.z);

    if t_near > t_far || t_far < 0.0 {
        return None;
    }

    if t_near < 0.0 {
        (t_far > MIN_HIT_DISTANCE).then_some(t_far)
    } else {
        Some(t_near)
    }
}
