//! Depth-only render of the scene from the light.
//!
//! Writes into a square depth target that the lit pass later samples.
//! Only shadow casters are drawn and no frustum culling is applied, so
//! casters outside the camera view still shadow visible receivers.
use crate::gpu::{ClearOp, CullFace, DepthTarget, RenderDevice, RenderError, ShaderProgram, TargetBinding, TextureId, Viewport};
use crate::graph::{FramePacket, RenderPass};
use crate::scene::{DrawStats, PassKind, Scene};
use crate::uniforms;

pub const DEFAULT_SHADOW_RESOLUTION: u32 = 2048;

pub struct ShadowPass {
    shader: Box<dyn ShaderProgram>,
    target: Option<DepthTarget>,
    resolution: u32,
}

impl ShadowPass {
    /// Fails if the device cannot complete a depth target of `resolution`².
    pub fn new(
        device: &mut dyn RenderDevice,
        shader: Box<dyn ShaderProgram>,
        resolution: u32,
    ) -> Result<Self, RenderError> {
        let target = device.create_depth_target("shadow map", resolution)?;
        log::info!("shadow map {}x{} ready", resolution, resolution);
        Ok(Self { shader, target: Some(target), resolution })
    }

    /// Texture the lit pass samples, `None` after teardown.
    pub fn depth_texture(&self) -> Option<TextureId> {
        self.target.as_ref().map(|t| t.texture)
    }
}

impl RenderPass for ShadowPass {
    fn name(&self) -> &'static str {
        "shadow"
    }

    fn execute(&mut self, device: &mut dyn RenderDevice, scene: &mut Scene, packet: &FramePacket) -> DrawStats {
        let Some(target) = &self.target else {
            return DrawStats::default();
        };
        device.bind_target(TargetBinding::Depth(target.id));
        device.set_viewport(Viewport::square(self.resolution));
        device.clear(ClearOp::Depth);
        device.set_cull_face(CullFace::Back);

        self.shader.bind();
        self.shader.set_mat4(uniforms::LIGHT_SPACE, &packet.light.light_space);
        scene.draw(self.shader.as_mut(), None, PassKind::Shadow)
    }

    fn destroy(&mut self, device: &mut dyn RenderDevice) {
        self.shader.destroy();
        if let Some(target) = self.target.take() {
            device.destroy_depth_target(target);
        }
    }
}
