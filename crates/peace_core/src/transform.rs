//! Position / Euler rotation / scale with a lazily rebuilt model matrix.
//!
//! The matrix is composed in row-vector order as
//! `Scale · RotZ · RotY · RotX · Translate` and then transposed once into
//! glam's column-major layout, so `model.transform_point3(p)` scales `p`,
//! rotates it, and finally translates it.

use glam::{Mat4, Vec3};

/// Placement of a single scene object.
///
/// Every setter marks the cached matrix stale and bumps [`revision`], so a
/// reader that caches data derived from the matrix (the object's AABB) can
/// tell whether it is still current even after someone else has already
/// refreshed the matrix.
///
/// [`revision`]: Transform::revision
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    rotation: Vec3,
    scale: Vec3,
    cached: Option<Mat4>,
    revision: u64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE)
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            cached: None,
            revision: 0,
        }
    }

    /// Shorthand for a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO, Vec3::ONE)
    }

    /// Builder-style scale override.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.mark_dirty();
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.mark_dirty();
    }

    /// Zero components are allowed; the resulting matrix is singular.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.mark_dirty();
    }

    /// Moves the position by `delta`.
    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.position + delta);
    }

    /// `true` until the next call to [`model_matrix`](Self::model_matrix).
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.cached.is_none()
    }

    /// Counter incremented by every mutation.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the model matrix, rebuilding it only if a setter ran since the
    /// last call.  A clean transform returns the cached value bit for bit.
    pub fn model_matrix(&mut self) -> Mat4 {
        match self.cached {
            Some(m) => m,
            None => {
                let m = Self::compose(self.position, self.rotation, self.scale);
                self.cached = Some(m);
                m
            }
        }
    }

    /// Pure composition used by [`model_matrix`](Self::model_matrix).
    pub fn compose(position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
        let rot = Mat4::from_rotation_z(rotation.z)
            * Mat4::from_rotation_y(rotation.y)
            * Mat4::from_rotation_x(rotation.x);
        // translation sits in the bottom row under the row-vector convention
        let translate = Mat4::from_translation(position).transpose();
        (Mat4::from_scale(scale) * rot * translate).transpose()
    }

    fn mark_dirty(&mut self) {
        self.cached = None;
        self.revision = self.revision.wrapping_add(1);
    }
}
