use std::collections::HashMap;
use std::rc::Rc;

use crate::geometry::{Mesh, MeshData, MeshHandle};
use crate::gpu::{RenderDevice, RenderError};

/// Owner of every uploaded mesh, keyed by name.
///
/// Scene objects hold clones of the [`MeshHandle`]; the cache keeps one more.
/// A mesh is only destroyed here, and only once no object references it.
#[derive(Debug, Default)]
pub struct MeshCache {
    meshes: HashMap<String, MeshHandle>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<MeshHandle> {
        self.meshes.get(name).cloned()
    }

    /// Returns the cached mesh, uploading the output of `build` on first use.
    pub fn get_or_upload<F>(&mut self, device: &mut dyn RenderDevice, name: &str, build: F) -> Result<MeshHandle, RenderError>
    where
        F: FnOnce() -> MeshData,
    {
        if let Some(mesh) = self.meshes.get(name) {
            return Ok(mesh.clone());
        }
        let mesh = Rc::new(Mesh::upload(device, name, build())?);
        self.meshes.insert(name.to_owned(), mesh.clone());
        Ok(mesh)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Destroys meshes nothing outside the cache refers to.  Returns how many
    /// were released.
    pub fn release_unused(&mut self) -> usize {
        let unused: Vec<String> = self
            .meshes
            .iter()
            .filter(|(_, m)| Rc::strong_count(m) == 1)
            .map(|(name, _)| name.clone())
            .collect();
        for name in &unused {
            if let Some(mesh) = self.meshes.remove(name).and_then(|m| Rc::try_unwrap(m).ok()) {
                mesh.destroy();
            }
        }
        unused.len()
    }

    /// Destroys every mesh.  Meshes still referenced elsewhere are leaked
    /// with a warning; clear the scene first.
    pub fn destroy_all(&mut self) {
        for (name, mesh) in self.meshes.drain() {
            match Rc::try_unwrap(mesh) {
                Ok(mesh) => mesh.destroy(),
                Err(rc) => log::warn!(
                    "mesh `{}` still has {} outside reference(s) at teardown",
                    name,
                    Rc::strong_count(&rc) - 1
                ),
            }
        }
    }
}
