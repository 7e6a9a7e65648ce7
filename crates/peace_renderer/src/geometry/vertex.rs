/// Interleaved vertex of the basic layout: position, normal, texture
/// coordinate.  `bytemuck` reinterprets slices of it as raw `f32`s for upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Basic vertex extended with a per-triangle tangent frame for normal mapping.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TangentVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

/// Which of the two interleaved formats a buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    /// pos3 normal3 uv2
    Basic,
    /// pos3 normal3 uv2 tangent3 bitangent3
    Tangent,
}

impl VertexLayout {
    pub const fn floats_per_vertex(self) -> usize {
        match self {
            VertexLayout::Basic => 8,
            VertexLayout::Tangent => 14,
        }
    }

    pub const fn stride(self) -> usize {
        self.floats_per_vertex() * std::mem::size_of::<f32>()
    }
}
