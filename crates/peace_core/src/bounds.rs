use glam::{Mat4, Vec3};

/// World-space axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Degenerate box around a single point.
    #[inline]
    pub fn point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Tight box around `points`, or `None` when the iterator is empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::point(first), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    /// Transforms every point by `model` before fitting the box.
    ///
    /// Unlike transforming the eight corners of a local box this stays tight
    /// under rotation, at the cost of touching every vertex.
    pub fn from_transformed_points<I>(points: I, model: &Mat4) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        Self::from_points(points.into_iter().map(|p| model.transform_point3(p)))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube_corners() -> Vec<Vec3> {
        let mut out = Vec::new();
        for &x in &[-0.5, 0.5] {
            for &y in &[-0.5, 0.5] {
                for &z in &[-0.5, 0.5] {
                    out.push(Vec3::new(x, y, z));
                }
            }
        }
        out
    }

    #[test]
    fn empty_input_has_no_box() {
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn translation_shifts_both_corners() {
        let local = Aabb::from_points(unit_cube_corners()).unwrap();
        let model = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let world = Aabb::from_transformed_points(unit_cube_corners(), &model).unwrap();
        assert!(world.min.abs_diff_eq(local.min + Vec3::new(5.0, 0.0, 0.0), 1e-6));
        assert!(world.max.abs_diff_eq(local.max + Vec3::new(5.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn uniform_scale_doubles_extents() {
        let local = Aabb::from_points(unit_cube_corners()).unwrap();
        let model = Mat4::from_scale(Vec3::splat(2.0));
        let world = Aabb::from_transformed_points(unit_cube_corners(), &model).unwrap();
        assert!(world.size().abs_diff_eq(local.size() * 2.0, 1e-6));
        assert!(world.center().abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn contains_is_inclusive() {
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(b.contains_point(Vec3::ONE));
        assert!(!b.contains_point(Vec3::new(1.01, 0.0, 0.0)));
    }
}
