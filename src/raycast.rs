use glam::Vec3;

use crate::math::Ray;
use crate::registry::{Entry, ObjectId};

/// Nearest pick result of one controller for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub object: ObjectId,
    /// World-space distance from the ray origin
    pub distance: f32,
    pub point: Vec3,
}

/// Tests `ray` against every live candidate and returns the closest hit
/// within `max_distance`. Ties keep the earlier candidate.
pub fn nearest_hit(ray: &Ray, candidates: &[Entry], max_distance: Option<f32>) -> Option<Hit> {
    if ray.is_degenerate() {
        return None;
    }

    let limit = max_distance.unwrap_or(f32::INFINITY);

    candidates
        .iter()
        .filter(|entry| entry.is_alive())
        .filter_map(|entry| {
            let distance = entry.hitbox().intersect(ray)?;
            (distance <= limit).then_some((entry.id(), distance))
        })
        .fold(None, |best: Option<(ObjectId, f32)>, (id, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((id, distance)),
        })
        .map(|(object, distance)| Hit {
            object,
            distance,
            point: ray.at(distance),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Hitbox, AABB};
    use crate::registry::{Payload, Registration, Registry};

    fn register_box(registry: &Registry, min: Vec3, max: Vec3) -> Registration {
        let id = registry.allocate_id();
        registry
            .register(id, Hitbox::from_aabb(AABB::new(min, max)), Payload::close_panel(|| {}))
            .unwrap()
    }

    fn forward_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 1.5, 0.0), Vec3::NEG_Z)
    }

    #[test]
    fn empty_candidate_set_has_no_hit() {
        assert_eq!(nearest_hit(&forward_ray(), &[], None), None);
    }

    #[test]
    fn nearest_of_two_boxes_wins_regardless_of_order() {
        let registry = Registry::new();
        let far = register_box(&registry, Vec3::new(-1.0, 1.0, -9.0), Vec3::new(1.0, 2.0, -8.0));
        let near = register_box(&registry, Vec3::new(-1.0, 1.0, -5.0), Vec3::new(1.0, 2.0, -4.0));

        let hit = nearest_hit(&forward_ray(), &registry.list(), None).unwrap();
        assert_eq!(hit.object, near.id());
        assert!((hit.distance - 4.0).abs() < 1e-4);
        assert!((hit.point - Vec3::new(0.0, 1.5, -4.0)).length() < 1e-4);
        drop(far);
    }

    #[test]
    fn equal_distance_keeps_first_registered() {
        let registry = Registry::new();
        let first = register_box(&registry, Vec3::new(-1.0, 1.0, -5.0), Vec3::new(1.0, 2.0, -4.0));
        let _second = register_box(&registry, Vec3::new(-2.0, 0.0, -6.0), Vec3::new(2.0, 3.0, -4.0));

        let hit = nearest_hit(&forward_ray(), &registry.list(), None).unwrap();
        assert_eq!(hit.object, first.id());
    }

    #[test]
    fn hits_beyond_max_distance_are_ignored() {
        let registry = Registry::new();
        let _guard = register_box(&registry, Vec3::new(-1.0, 1.0, -5.0), Vec3::new(1.0, 2.0, -4.0));
        assert_eq!(nearest_hit(&forward_ray(), &registry.list(), Some(3.5)), None);
        assert!(nearest_hit(&forward_ray(), &registry.list(), Some(4.5)).is_some());
    }

    #[test]
    fn boxes_behind_the_controller_are_not_hit() {
        let registry = Registry::new();
        let _guard = register_box(&registry, Vec3::new(-1.0, 1.0, 4.0), Vec3::new(1.0, 2.0, 5.0));
        assert_eq!(nearest_hit(&forward_ray(), &registry.list(), None), None);
    }

    #[test]
    fn dead_entries_in_a_snapshot_are_skipped() {
        let registry = Registry::new();
        let guard = register_box(&registry, Vec3::new(-1.0, 1.0, -5.0), Vec3::new(1.0, 2.0, -4.0));
        let snapshot = registry.list();
        drop(guard);
        assert_eq!(nearest_hit(&forward_ray(), &snapshot, None), None);
    }
}
