//! Frustum culling: CPU-side visibility test for axis-aligned bounding boxes.
//!
//! ## Algorithm
//!
//! Given the combined `view_proj` matrix `M` (GL clip convention, depth in
//! `[-1, 1]`), the six planes are sums and differences of its rows
//! (Gribb-Hartmann).  Each plane is stored as `Vec4(a, b, c, d)` and a point
//! `p` is on the visible side when `dot((a, b, c), p) + d >= 0`.
//!
//! A box is rejected as soon as its *positive vertex* (the corner farthest
//! along the plane normal) lies behind some plane.  Boxes straddling the
//! region just outside a frustum corner pass every plane and are accepted;
//! the test never rejects a box that is actually inside.
use glam::{Mat4, Vec3, Vec4};

use crate::bounds::Aabb;

/// Index of each plane in [`Frustum::planes`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrustumPlane {
    Left = 0,
    Right = 1,
    Bottom = 2,
    Top = 3,
    Near = 4,
    Far = 5,
}

/// Six clip planes extracted from a `view_proj` matrix.
///
/// The default value has all-zero planes and accepts everything; call
/// [`update`](Self::update) before the first cull.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    pub fn from_view_proj(view_proj: &Mat4) -> Self {
        let mut f = Self::default();
        f.update(view_proj);
        f
    }

    /// Re-extracts all six planes from `view_proj`.
    pub fn update(&mut self, view_proj: &Mat4) {
        let m = view_proj.to_cols_array_2d();
        // row i of a column-major matrix
        let row = |i: usize| Vec4::new(m[0][i], m[1][i], m[2][i], m[3][i]);
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        self.planes = [
            r3 + r0, // left
            r3 - r0, // right
            r3 + r1, // bottom
            r3 - r1, // top
            r3 + r2, // near
            r3 - r2, // far
        ];

        for p in &mut self.planes {
            let len = p.truncate().length();
            if len > 0.0 {
                *p /= len;
            }
        }
    }

    #[inline]
    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    #[inline]
    pub fn plane(&self, which: FrustumPlane) -> Vec4 {
        self.planes[which as usize]
    }

    /// Returns `false` only if the box lies fully behind at least one plane.
    pub fn is_box_in_frustum(&self, min: Vec3, max: Vec3) -> bool {
        for plane in &self.planes {
            let pv = Vec3::new(
                if plane.x > 0.0 { max.x } else { min.x },
                if plane.y > 0.0 { max.y } else { min.y },
                if plane.z > 0.0 { max.z } else { min.z },
            );
            if plane.truncate().dot(pv) + plane.w < 0.0 {
                return false;
            }
        }
        true
    }

    #[inline]
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.is_box_in_frustum(aabb.min, aabb.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_accepts_the_clip_cube() {
        let f = Frustum::from_view_proj(&Mat4::IDENTITY);
        assert!(f.is_box_in_frustum(Vec3::splat(-1.0), Vec3::splat(1.0)));
    }

    #[test]
    fn identity_rejects_box_beyond_far() {
        let f = Frustum::from_view_proj(&Mat4::IDENTITY);
        assert!(!f.is_box_in_frustum(Vec3::new(-0.5, -0.5, 2.0), Vec3::new(0.5, 0.5, 3.0)));
    }

    #[test]
    fn planes_are_normalized() {
        let proj = Mat4::perspective_rh_gl(45f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 4.0, 15.0), Vec3::ZERO, Vec3::Y);
        let f = Frustum::from_view_proj(&(proj * view));
        for p in f.planes() {
            assert!((p.truncate().length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn perspective_camera_culls_behind() {
        let proj = Mat4::perspective_rh_gl(45f32.to_radians(), 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let f = Frustum::from_view_proj(&(proj * view));

        let ahead = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let behind = Aabb::new(Vec3::new(-1.0, -1.0, 9.0), Vec3::new(1.0, 1.0, 11.0));
        let far_away = Aabb::new(Vec3::new(-1.0, -1.0, -200.0), Vec3::new(1.0, 1.0, -150.0));
        assert!(f.intersects_aabb(&ahead));
        assert!(!f.intersects_aabb(&behind));
        assert!(!f.intersects_aabb(&far_away));
    }

    #[test]
    fn near_plane_uses_row_sum() {
        let f = Frustum::from_view_proj(&Mat4::IDENTITY);
        // identity near plane is z >= -1
        assert!(f.plane(FrustumPlane::Near).abs_diff_eq(Vec4::new(0.0, 0.0, 1.0, 1.0), 1e-6));
    }

    #[test]
    fn default_accepts_everything() {
        let f = Frustum::default();
        assert!(f.is_box_in_frustum(Vec3::splat(1e6), Vec3::splat(1e6 + 1.0)));
    }
}
