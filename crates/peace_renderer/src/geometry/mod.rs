pub mod mesh;
pub mod primitives;
pub mod vertex;

pub use mesh::{Mesh, MeshData, MeshHandle};
pub use vertex::{TangentVertex, Vertex, VertexLayout};
