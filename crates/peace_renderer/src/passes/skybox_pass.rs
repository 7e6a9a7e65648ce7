//! Sky cube drawn last, behind everything already in the depth buffer.
//!
//! The cube is rendered from the inside (front faces culled) with the
//! camera translation stripped from the view, and with a `LessEqual` depth
//! test so the far-plane fragments survive.  Depth and cull state are
//! restored to their defaults afterwards.
use glam::{Mat3, Mat4};

use crate::geometry::MeshHandle;
use crate::gpu::{CullFace, DepthFunc, RenderDevice, ShaderProgram, TextureId};
use crate::graph::{FramePacket, RenderPass};
use crate::scene::{DrawStats, Scene};
use crate::uniforms;

pub struct SkyboxPass {
    shader: Box<dyn ShaderProgram>,
    mesh: Option<MeshHandle>,
    /// Owned by this pass; destroyed with it.
    cubemap: Option<TextureId>,
}

impl SkyboxPass {
    pub fn new(shader: Box<dyn ShaderProgram>, mesh: MeshHandle, cubemap: TextureId) -> Self {
        Self { shader, mesh: Some(mesh), cubemap: Some(cubemap) }
    }
}

impl RenderPass for SkyboxPass {
    fn name(&self) -> &'static str {
        "skybox"
    }

    fn execute(&mut self, device: &mut dyn RenderDevice, _scene: &mut Scene, packet: &FramePacket) -> DrawStats {
        let (Some(mesh), Some(cubemap)) = (&self.mesh, self.cubemap) else {
            return DrawStats::default();
        };
        device.set_depth_func(DepthFunc::LessEqual);
        device.set_cull_face(CullFace::Front);

        let view = Mat4::from_mat3(Mat3::from_mat4(packet.camera.view));
        self.shader.bind();
        self.shader.set_mat4(uniforms::VIEW, &view);
        self.shader.set_mat4(uniforms::PROJECTION, &packet.camera.projection);
        device.bind_texture(uniforms::SKYBOX_UNIT, cubemap);
        self.shader.set_int(uniforms::SKYBOX, uniforms::SKYBOX_UNIT as i32);
        mesh.draw();

        device.set_cull_face(CullFace::default());
        device.set_depth_func(DepthFunc::default());
        DrawStats { drawn: 1, ..DrawStats::default() }
    }

    fn destroy(&mut self, device: &mut dyn RenderDevice) {
        self.shader.destroy();
        // the mesh itself belongs to the cache
        self.mesh = None;
        if let Some(tex) = self.cubemap.take() {
            device.destroy_texture(tex);
        }
    }
}
