//! Per-frame data handed to every pass.
//!
//! The engine builds one [`FramePacket`] after its update step; passes read
//! camera, light and culling state from it instead of reaching back into the
//! engine.

use glam::{Mat4, Vec3};
use peace_core::Frustum;

use crate::gpu::Viewport;

#[derive(Debug, Clone, Copy)]
pub struct CameraPacket {
    pub projection: Mat4,
    pub view: Mat4,
    /// World-space eye position.
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct LightPacket {
    pub position: Vec3,
    pub color: Vec3,
    pub ambient: Vec3,
    /// Orthographic projection × view from the light.
    pub light_space: Mat4,
}

#[derive(Debug, Clone, Copy)]
pub struct FramePacket {
    pub viewport: Viewport,
    pub camera: CameraPacket,
    pub light: LightPacket,
    /// Clear colour of the main pass.
    pub sky_color: Vec3,
    /// Extracted from `camera.projection * camera.view` this frame.
    pub frustum: Frustum,
}
