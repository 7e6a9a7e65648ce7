//! `peace_renderer`: scene graph and shadow-mapped forward renderer.
//!
//! # Module layout
//!
//! | Module      | Responsibility                                              |
//! |-------------|-------------------------------------------------------------|
//! | `gpu`       | Backend seams: `RenderDevice`, `ShaderProgram`, `GpuMesh`   |
//! | `geometry`  | `Vertex` layouts, `MeshData`, `Mesh`, built-in primitives   |
//! | `cache`     | `MeshCache`, sole owner and destroyer of uploaded meshes    |
//! | `object`    | `GameObject` + `RenderFlags`                                |
//! | `scene`     | `Scene`: ordered objects, light, selection, culled drawing  |
//! | `graph`     | `RenderPass` trait + `FramePacket`                          |
//! | `passes`    | Built-in passes: `ShadowPass`, `LitPass`, `SkyboxPass`      |
//! | `uniforms`  | Uniform names and texture units shared with the shaders     |
//! | `headless`  | Command-recording backend                                   |
pub mod cache;
pub mod geometry;
pub mod gpu;
pub mod graph;
pub mod headless;
pub mod object;
pub mod passes;
pub mod scene;
pub mod uniforms;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use glam;

pub use cache::MeshCache;
pub use geometry::{Mesh, MeshData, MeshHandle, Vertex, VertexLayout};
pub use gpu::{
    ClearOp, CullFace, DepthFunc, GpuMesh, RenderDevice, RenderError, ShaderProgram, ShaderSource, TextureDesc,
    TextureId, TextureKind, Viewport,
};
pub use graph::{CameraPacket, FramePacket, LightPacket, RenderPass};
pub use object::{GameObject, RenderFlags};
pub use scene::{DrawStats, ObjectId, PassKind, Scene};

use passes::{LitPass, ShadowPass, SkyboxPass};

// ── Renderer ──────────────────────────────────────────────────────────────────

/// Programs for the three built-in passes.
pub struct RendererShaders {
    pub depth: Box<dyn ShaderProgram>,
    pub lit: Box<dyn ShaderProgram>,
    pub skybox: Box<dyn ShaderProgram>,
}

/// Resources the built-in passes draw with besides the scene.
pub struct RendererDesc {
    pub shadow_resolution: u32,
    pub skybox_mesh: MeshHandle,
    pub skybox_texture: TextureId,
    pub object_texture: Option<TextureId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassStats {
    pub name: &'static str,
    pub draws: DrawStats,
}

/// Per-pass draw statistics of the last frame, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub passes: Vec<PassStats>,
}

impl FrameStats {
    pub fn pass(&self, name: &str) -> Option<DrawStats> {
        self.passes.iter().find(|p| p.name == name).map(|p| p.draws)
    }
}

/// Top-level renderer.
///
/// Owns an ordered list of [`RenderPass`] stages and runs every one of them
/// each frame, in the fixed order shadow → main → skybox.
pub struct Renderer {
    passes: Vec<Box<dyn RenderPass>>,
    stats: FrameStats,
}

impl Renderer {
    /// Builds the built-in passes.  Fails if the shadow framebuffer cannot
    /// be completed.
    pub fn new(device: &mut dyn RenderDevice, shaders: RendererShaders, desc: RendererDesc) -> Result<Self, RenderError> {
        let shadow = ShadowPass::new(device, shaders.depth, desc.shadow_resolution)?;
        let shadow_map = shadow
            .depth_texture()
            .ok_or_else(|| RenderError::FramebufferIncomplete {
                label: "shadow map".into(),
                reason: "no depth attachment".into(),
            })?;
        let lit = LitPass::new(shaders.lit, shadow_map, desc.object_texture);
        let sky = SkyboxPass::new(shaders.skybox, desc.skybox_mesh, desc.skybox_texture);

        Ok(Self {
            passes: vec![Box::new(shadow), Box::new(lit), Box::new(sky)],
            stats: FrameStats::default(),
        })
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Runs every pass once.
    pub fn render(&mut self, device: &mut dyn RenderDevice, scene: &mut Scene, packet: &FramePacket) -> &FrameStats {
        self.stats.passes.clear();
        for pass in &mut self.passes {
            let draws = pass.execute(device, scene, packet);
            self.stats.passes.push(PassStats { name: pass.name(), draws });
        }
        log::trace!("frame stats: {:?}", self.stats);
        &self.stats
    }

    pub fn last_stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Releases every pass's resources.
    pub fn destroy(mut self, device: &mut dyn RenderDevice) {
        for pass in &mut self.passes {
            pass.destroy(device);
        }
        log::info!("renderer destroyed ({} passes)", self.passes.len());
    }
}
