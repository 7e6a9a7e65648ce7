use std::rc::Rc;

use glam::Vec3;

use super::vertex::{TangentVertex, Vertex, VertexLayout};
use crate::gpu::{GpuMesh, RenderDevice, RenderError};

/// CPU-side interleaved vertex data.  Triangle list, no index buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    layout: VertexLayout,
    floats: Vec<f32>,
}

impl MeshData {
    /// Trailing floats that do not form a whole vertex are dropped.
    pub fn new(layout: VertexLayout, mut floats: Vec<f32>) -> Self {
        let n = layout.floats_per_vertex();
        floats.truncate(floats.len() / n * n);
        Self { layout, floats }
    }

    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        Self::new(VertexLayout::Basic, bytemuck::cast_slice(vertices).to_vec())
    }

    pub fn from_tangent_vertices(vertices: &[TangentVertex]) -> Self {
        Self::new(VertexLayout::Tangent, bytemuck::cast_slice(vertices).to_vec())
    }

    #[inline]
    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    /// Raw interleaved floats, ready for upload.
    #[inline]
    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    pub fn vertex_count(&self) -> usize {
        self.floats.len() / self.layout.floats_per_vertex()
    }

    /// Object-space positions, one per vertex.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.floats
            .chunks_exact(self.layout.floats_per_vertex())
            .map(|v| Vec3::new(v[0], v[1], v[2]))
    }
}

/// Vertex data paired with its GPU buffer.
///
/// Meshes are shared between scene objects through [`MeshHandle`]; the
/// [`MeshCache`](crate::cache::MeshCache) that created them is the only
/// place that destroys them.
pub struct Mesh {
    label: String,
    data: MeshData,
    gpu: Box<dyn GpuMesh>,
}

/// Shared, non-owning reference held by scene objects.
pub type MeshHandle = Rc<Mesh>;

impl Mesh {
    pub fn upload(device: &mut dyn RenderDevice, label: &str, data: MeshData) -> Result<Self, RenderError> {
        let gpu = device.create_mesh(label, &data)?;
        log::debug!("uploaded mesh `{}` ({} vertices)", label, data.vertex_count());
        Ok(Self { label: label.to_owned(), data, gpu })
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn data(&self) -> &MeshData {
        &self.data
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.gpu.vertex_count()
    }

    #[inline]
    pub fn draw(&self) {
        self.gpu.draw();
    }

    pub(crate) fn destroy(mut self) {
        self.gpu.destroy();
    }
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("label", &self.label)
            .field("layout", &self.data.layout)
            .field("vertices", &self.data.vertex_count())
            .finish()
    }
}
