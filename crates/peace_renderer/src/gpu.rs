//! Seams between the renderer and a graphics backend.
//!
//! The renderer never talks to a graphics API directly.  It drives a
//! [`RenderDevice`] for global state and resource creation, binds
//! [`ShaderProgram`]s and uploads uniforms through them, and draws
//! [`GpuMesh`]es.  Backends implement all three; `headless` records the calls.

use std::fmt;

use glam::{Mat4, Vec3};
use thiserror::Error;

use crate::geometry::MeshData;

// ── Handles ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u32);

/// A complete depth-only framebuffer and the texture it renders into.
///
/// Owned by whoever created it; hand it back through
/// [`RenderDevice::destroy_depth_target`].
#[derive(Debug, PartialEq, Eq)]
pub struct DepthTarget {
    pub id: TargetId,
    pub texture: TextureId,
    pub size: u32,
}

// ── State enums ─────────────────────────────────────────────────────────────

/// Which framebuffer subsequent draws write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetBinding {
    /// The window's framebuffer.
    Default,
    Depth(TargetId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearOp {
    Depth,
    ColorDepth(Vec3),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthFunc {
    #[default]
    Less,
    LessEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullFace {
    #[default]
    Back,
    Front,
}

/// Pixel rectangle, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }

    pub fn square(size: u32) -> Self {
        Self::new(size, size)
    }
}

// ── Resource descriptions ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// GLSL source pair for one program.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub label: String,
    pub vertex: String,
    pub fragment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Texture2d,
    /// Six faces in +X, −X, +Y, −Y, +Z, −Z order.
    CubeMap,
}

impl TextureKind {
    pub fn layers(self) -> usize {
        match self {
            TextureKind::Texture2d => 1,
            TextureKind::CubeMap => 6,
        }
    }
}

/// Tightly packed RGBA8 pixels for every layer of the texture.
#[derive(Debug, Clone)]
pub struct TextureDesc {
    pub label: String,
    pub kind: TextureKind,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureDesc {
    /// A 1×1 texture (or cube map) of a single colour.
    pub fn solid(label: impl Into<String>, kind: TextureKind, rgba: [u8; 4]) -> Self {
        Self {
            label: label.into(),
            kind,
            width: 1,
            height: 1,
            pixels: rgba.repeat(kind.layers()),
        }
    }

    /// Number of bytes `pixels` must hold.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4 * self.kind.layers()
    }
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to compile {stage} shader of `{label}`:\n{log}")]
    ShaderCompile {
        label: String,
        stage: ShaderStage,
        log: String,
    },

    #[error("failed to link shader `{label}`:\n{log}")]
    ShaderLink { label: String, log: String },

    #[error("framebuffer `{label}` is incomplete: {reason}")]
    FramebufferIncomplete { label: String, reason: String },

    #[error("texture `{label}` rejected: {reason}")]
    Texture { label: String, reason: String },
}

// ── Collaborator traits ─────────────────────────────────────────────────────

/// A linked GPU program.
///
/// Uniform setters act on the program last made current with [`bind`].
///
/// [`bind`]: ShaderProgram::bind
pub trait ShaderProgram {
    fn label(&self) -> &str;
    /// Makes this program current.
    fn bind(&mut self);
    fn set_mat4(&mut self, name: &str, value: &Mat4);
    fn set_vec3(&mut self, name: &str, value: Vec3);
    fn set_int(&mut self, name: &str, value: i32);
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_float(&mut self, name: &str, value: f32);
    /// Releases the program.  The shader must not be used afterwards.
    fn destroy(&mut self);
}

/// Vertex data resident on the GPU.
pub trait GpuMesh {
    /// Draws the whole buffer as a triangle list.
    fn draw(&self);
    fn vertex_count(&self) -> u32;
    fn destroy(&mut self);
}

/// Global pipeline state and resource creation.
pub trait RenderDevice {
    fn create_shader(&mut self, source: &ShaderSource) -> Result<Box<dyn ShaderProgram>, RenderError>;
    fn create_mesh(&mut self, label: &str, data: &MeshData) -> Result<Box<dyn GpuMesh>, RenderError>;
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId, RenderError>;
    fn destroy_texture(&mut self, texture: TextureId);
    /// Builds a square depth-only framebuffer.  Fails with
    /// [`RenderError::FramebufferIncomplete`] when it cannot be completed.
    fn create_depth_target(&mut self, label: &str, size: u32) -> Result<DepthTarget, RenderError>;
    fn destroy_depth_target(&mut self, target: DepthTarget);

    fn bind_target(&mut self, target: TargetBinding);
    fn set_viewport(&mut self, viewport: Viewport);
    fn clear(&mut self, op: ClearOp);
    fn set_depth_func(&mut self, func: DepthFunc);
    fn set_cull_face(&mut self, face: CullFace);
    fn bind_texture(&mut self, unit: u32, texture: TextureId);
}
