//! Free-fly perspective camera.
//!
//! Orientation is kept as yaw/pitch in degrees; the `front`, `right` and `up`
//! basis vectors are derived from them after every rotation.  Yaw −90°
//! looks down −Z.

use glam::{Mat4, Vec3};

/// Upper bound on |pitch| when constrained, in degrees.
pub const PITCH_LIMIT: f32 = 89.0;

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    /// Degrees.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    /// World units per second.
    pub speed: f32,
    /// Degrees per pixel of mouse motion.
    pub sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 4.0, 15.0), 16.0 / 9.0)
    }
}

impl Camera {
    pub fn new(position: Vec3, aspect: f32) -> Self {
        let mut cam = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            fov: 45.0,
            aspect,
            znear: 0.1,
            zfar: 1000.0,
            speed: 5.0,
            sensitivity: 0.1,
        };
        cam.update_vectors();
        cam
    }

    #[inline]
    pub fn front(&self) -> Vec3 {
        self.front
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Right-handed perspective with GL depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.znear, self.zfar)
    }

    /// Updates the aspect ratio after a viewport resize; zero heights are ignored.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Moves along the camera basis.  `dir` is camera-space: +X right,
    /// +Y world up, +Z forward.
    pub fn move_local(&mut self, dir: Vec3, dt: f32) {
        let velocity = self.speed * dt;
        self.position +=
            (self.right * dir.x + self.world_up * dir.y + self.front * dir.z) * velocity;
    }

    /// Applies a mouse delta in pixels.  Positive `dx` turns right, positive
    /// `dy` looks up.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * self.sensitivity;
        self.pitch += dy * self.sensitivity;
        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        self.update_vectors();
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

// ── Keyboard / mouse controller ─────────────────────────────────────────────

#[cfg(feature = "input")]
pub use controller::Controller;

#[cfg(feature = "input")]
mod controller {
    use std::collections::HashMap;

    use glam::Vec3;

    use super::Camera;
    use crate::input::{InputState, KeyCode};

    /// Maps keys to camera-space movement directions.
    ///
    /// Positive Z is forward, positive X is right and positive Y is world up.
    #[derive(Debug, Clone)]
    pub struct Controller {
        mappings: HashMap<KeyCode, Vec3>,
    }

    impl Default for Controller {
        fn default() -> Self {
            Self::with_default_bindings()
        }
    }

    impl Controller {
        /// A controller with no key bindings.
        pub fn new() -> Self {
            Self { mappings: HashMap::new() }
        }

        /// WASD for planar movement, Space / left Shift for up / down.
        pub fn with_default_bindings() -> Self {
            let mut ctl = Self::new();
            ctl.bind(KeyCode::KeyW, Vec3::new( 0.0,  0.0,  1.0));
            ctl.bind(KeyCode::KeyS, Vec3::new( 0.0,  0.0, -1.0));
            ctl.bind(KeyCode::KeyA, Vec3::new(-1.0,  0.0,  0.0));
            ctl.bind(KeyCode::KeyD, Vec3::new( 1.0,  0.0,  0.0));
            ctl.bind(KeyCode::Space, Vec3::new(0.0, 1.0, 0.0));
            ctl.bind(KeyCode::ShiftLeft, Vec3::new(0.0, -1.0, 0.0));
            ctl
        }

        /// Overwrites any existing binding for `key`.
        pub fn bind(&mut self, key: KeyCode, dir: Vec3) {
            self.mappings.insert(key, dir);
        }

        /// Sum of the directions whose keys are held.  Not normalized.
        pub fn direction(&self, input: &InputState) -> Vec3 {
            self.mappings
                .iter()
                .filter(|(key, _)| input.is_key_pressed(**key))
                .fold(Vec3::ZERO, |acc, (_, dir)| acc + *dir)
        }

        /// Applies held keys and, when `look` is set, the pending mouse delta.
        pub fn update(&self, camera: &mut Camera, input: &mut InputState, dt: f32, look: bool) {
            let dir = self.direction(input);
            if dir != Vec3::ZERO {
                camera.move_local(dir, dt);
            }

            let (dx, dy) = input.consume_mouse_delta();
            if look && (dx != 0.0 || dy != 0.0) {
                // screen y grows downward
                camera.process_mouse_movement(dx, -dy, true);
            }
        }
    }
}
