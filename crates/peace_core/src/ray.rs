use glam::Vec3;

use crate::bounds::Aabb;

/// Direction components (and plane/direction dot products) below this are
/// treated as parallel.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// A ray in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length when built through [`Ray::new`].
    pub direction: Vec3,
}

impl Ray {
    /// The direction is normalized; a zero direction stays zero.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// `origin + t * direction`
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        intersect_ray_aabb(self.origin, self.direction, aabb.min, aabb.max)
    }

    #[inline]
    pub fn intersect_plane(&self, normal: Vec3, point: Vec3) -> Option<Vec3> {
        intersect_ray_plane(self.origin, self.direction, normal, point)
    }
}

/// Slab test.  Returns the entry distance along `dir` (0 when the origin is
/// already inside the box), or `None` on a miss or a box entirely behind the
/// origin.
pub fn intersect_ray_aabb(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_min = 0.0_f32;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let (o, d, lo, hi) = (origin[axis], dir[axis], min[axis], max[axis]);
        if d.abs() < PARALLEL_EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (t1, t2) = ((lo - o) * inv, (hi - o) * inv);
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return None;
        }
    }

    Some(t_min)
}

/// Intersection of a ray with the plane through `point` with `normal`.
/// `None` when the ray is parallel to the plane or the plane is behind it.
pub fn intersect_ray_plane(origin: Vec3, dir: Vec3, normal: Vec3, point: Vec3) -> Option<Vec3> {
    let denom = normal.dot(dir);
    if denom.abs() <= PARALLEL_EPSILON {
        return None;
    }
    let t = (point - origin).dot(normal) / denom;
    if t < 0.0 {
        return None;
    }
    Some(origin + dir * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Vec3 = Vec3::splat(-1.0);
    const MAX: Vec3 = Vec3::splat(1.0);

    #[test]
    fn ray_toward_box_hits() {
        let t = intersect_ray_aabb(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), MIN, MAX);
        assert_eq!(t, Some(4.0));
    }

    #[test]
    fn ray_sideways_misses() {
        let t = intersect_ray_aabb(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 0.0), MIN, MAX);
        assert_eq!(t, None);
    }

    #[test]
    fn box_behind_origin_misses() {
        let t = intersect_ray_aabb(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0), MIN, MAX);
        assert_eq!(t, None);
    }

    #[test]
    fn origin_inside_box_hits_at_zero() {
        let t = intersect_ray_aabb(Vec3::ZERO, Vec3::new(0.3, 0.4, 0.5), MIN, MAX);
        assert_eq!(t, Some(0.0));
    }

    #[test]
    fn ray_down_hits_ground() {
        let hit = intersect_ray_plane(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0), Vec3::Y, Vec3::ZERO);
        assert!(hit.unwrap().abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn parallel_ray_misses_plane() {
        let hit = intersect_ray_plane(Vec3::new(0.0, 5.0, 0.0), Vec3::X, Vec3::Y, Vec3::ZERO);
        assert_eq!(hit, None);
    }

    #[test]
    fn plane_behind_ray_misses() {
        let hit = intersect_ray_plane(Vec3::new(0.0, 5.0, 0.0), Vec3::Y, Vec3::Y, Vec3::ZERO);
        assert_eq!(hit, None);
    }

    #[test]
    fn ray_struct_normalizes_and_delegates() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -3.0));
        assert_eq!(ray.direction, Vec3::new(0.0, 0.0, -1.0));
        let aabb = Aabb::new(MIN, MAX);
        let t = ray.intersect_aabb(&aabb).unwrap();
        assert!(ray.point_at(t).abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-6));
    }
}
