use glam::{Mat4, Vec3, Vec4};

use crate::error::MathError;

/// Builds world-space pick rays from screen positions.
///
/// The projection (and its inverse) is fixed at construction; the view is
/// replaced every frame through [`update_matrices`](Self::update_matrices).
#[derive(Debug, Clone)]
pub struct Raycaster {
    projection: Mat4,
    inv_projection: Mat4,
    view: Mat4,
    inv_view: Mat4,
}

fn checked_inverse(m: &Mat4, what: &'static str) -> Result<Mat4, MathError> {
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        return Err(MathError::SingularMatrix(what));
    }
    Ok(m.inverse())
}

impl Raycaster {
    pub fn new(projection: Mat4) -> Result<Self, MathError> {
        let inv_projection = checked_inverse(&projection, "projection")?;
        Ok(Self {
            projection,
            inv_projection,
            view: Mat4::IDENTITY,
            inv_view: Mat4::IDENTITY,
        })
    }

    /// Stores the new view matrix.  A singular view is rejected and the
    /// previous one is kept.
    pub fn update_matrices(&mut self, view: Mat4) -> Result<(), MathError> {
        self.inv_view = checked_inverse(&view, "view")?;
        self.view = view;
        Ok(())
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Camera position recovered from the inverse view.
    #[inline]
    pub fn camera_position(&self) -> Vec3 {
        self.inv_view.w_axis.truncate()
    }

    /// Unit world-space direction through pixel `(x, y)` of a `width` ×
    /// `height` screen whose origin is the top-left corner.
    pub fn ray_from_mouse(&self, x: f32, y: f32, width: f32, height: f32) -> Vec3 {
        if width <= 0.0 || height <= 0.0 {
            return self.ray_from_center();
        }
        let ndc_x = 2.0 * x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * y / height;

        let eye = self.inv_projection * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        // point the eye-space vector down -Z and drop w so the view inverse
        // rotates it without translating
        let eye = Vec4::new(eye.x, eye.y, -1.0, 0.0);
        (self.inv_view * eye).truncate().normalize_or_zero()
    }

    /// The camera's forward axis in world space.
    pub fn ray_from_center(&self) -> Vec3 {
        (-self.inv_view.z_axis.truncate()).normalize_or_zero()
    }
}
