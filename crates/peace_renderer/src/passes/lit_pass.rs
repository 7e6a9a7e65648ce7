//! Forward-lit render of the scene from the camera into the window.
//!
//! Samples the shadow map produced earlier in the frame and culls against
//! the camera frustum.
use crate::gpu::{ClearOp, RenderDevice, ShaderProgram, TargetBinding, TextureId};
use crate::graph::{FramePacket, RenderPass};
use crate::scene::{DrawStats, PassKind, Scene};
use crate::uniforms;

pub struct LitPass {
    shader: Box<dyn ShaderProgram>,
    shadow_map: TextureId,
    /// Owned by this pass; destroyed with it.
    object_texture: Option<TextureId>,
}

impl LitPass {
    pub fn new(shader: Box<dyn ShaderProgram>, shadow_map: TextureId, object_texture: Option<TextureId>) -> Self {
        Self { shader, shadow_map, object_texture }
    }
}

impl RenderPass for LitPass {
    fn name(&self) -> &'static str {
        "main"
    }

    fn execute(&mut self, device: &mut dyn RenderDevice, scene: &mut Scene, packet: &FramePacket) -> DrawStats {
        device.bind_target(TargetBinding::Default);
        device.set_viewport(packet.viewport);
        device.clear(ClearOp::ColorDepth(packet.sky_color));

        let s = self.shader.as_mut();
        s.bind();
        s.set_mat4(uniforms::PROJECTION, &packet.camera.projection);
        s.set_mat4(uniforms::VIEW, &packet.camera.view);
        s.set_vec3(uniforms::VIEW_POS, packet.camera.position);
        s.set_vec3(uniforms::LIGHT_POS, packet.light.position);
        s.set_vec3(uniforms::LIGHT_COLOR, packet.light.color);
        s.set_vec3(uniforms::AMBIENT_COLOR, packet.light.ambient);
        s.set_mat4(uniforms::LIGHT_SPACE, &packet.light.light_space);

        if let Some(tex) = self.object_texture {
            device.bind_texture(uniforms::OBJECT_TEXTURE_UNIT, tex);
        }
        s.set_int(uniforms::OBJECT_TEXTURE, uniforms::OBJECT_TEXTURE_UNIT as i32);
        device.bind_texture(uniforms::SHADOW_MAP_UNIT, self.shadow_map);
        s.set_int(uniforms::SHADOW_MAP, uniforms::SHADOW_MAP_UNIT as i32);

        scene.draw(s, Some(&packet.frustum), PassKind::Main)
    }

    fn destroy(&mut self, device: &mut dyn RenderDevice) {
        self.shader.destroy();
        if let Some(tex) = self.object_texture.take() {
            device.destroy_texture(tex);
        }
    }
}
