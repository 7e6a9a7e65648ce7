//! In-world placement of primitive objects.
//!
//! Placement runs in two steps.  `start_placement` spawns a translucent
//! ghost that follows the mouse ray's hit on the ground plane.
//! `place_object` swaps the ghost for a real object, and `cancel_placement`
//! just drops it.

use glam::Vec3;
use peace_core::Transform;
use peace_renderer::{GameObject, MeshCache, ObjectId, RenderFlags, Scene};

/// Cache keys of the primitive meshes.
pub const CUBE_MESH: &str = "cube";
pub const SPHERE_MESH: &str = "sphere";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Cube,
    Sphere,
}

impl PrimitiveKind {
    pub fn mesh_name(self) -> &'static str {
        match self {
            PrimitiveKind::Cube => CUBE_MESH,
            PrimitiveKind::Sphere => SPHERE_MESH,
        }
    }

    /// Scale that makes the primitive one unit across.
    fn scale(self) -> Vec3 {
        match self {
            PrimitiveKind::Cube => Vec3::ONE,
            PrimitiveKind::Sphere => Vec3::splat(0.5),
        }
    }
}

#[derive(Debug, Default)]
pub struct Editor {
    ghost: Option<(PrimitiveKind, ObjectId)>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_placing(&self) -> bool {
        self.ghost.is_some()
    }

    pub fn placing_kind(&self) -> Option<PrimitiveKind> {
        self.ghost.map(|(kind, _)| kind)
    }

    pub fn ghost_id(&self) -> Option<ObjectId> {
        self.ghost.map(|(_, id)| id)
    }

    fn spawn(meshes: &MeshCache, kind: PrimitiveKind, center: Vec3, flags: RenderFlags) -> Option<GameObject> {
        let Some(mesh) = meshes.get(kind.mesh_name()) else {
            log::warn!("no `{}` mesh loaded, cannot spawn {:?}", kind.mesh_name(), kind);
            return None;
        };
        let transform = Transform::from_position(center).with_scale(kind.scale());
        Some(GameObject::new(mesh, transform).with_flags(flags))
    }

    /// Spawns a ghost of `kind` at the origin, replacing any placement in
    /// progress.
    pub fn start_placement(&mut self, scene: &mut Scene, meshes: &MeshCache, kind: PrimitiveKind) -> Option<ObjectId> {
        self.cancel_placement(scene);
        let ghost = Self::spawn(meshes, kind, Vec3::ZERO, RenderFlags::ghost())?;
        let id = scene.add_object(ghost);
        self.ghost = Some((kind, id));
        log::debug!("placing {:?}", kind);
        Some(id)
    }

    /// Moves the ghost to `hit`, the mouse ray's point on the ground plane.
    pub fn update_ghost_position(&mut self, scene: &mut Scene, hit: Vec3) {
        if let Some(ghost) = self.ghost_id().and_then(|id| scene.get_mut(id)) {
            ghost.set_position(hit);
        }
    }

    /// Replaces the ghost with a real object at the same spot.
    pub fn place_object(&mut self, scene: &mut Scene, meshes: &MeshCache) -> Option<ObjectId> {
        let (kind, ghost_id) = self.ghost.take()?;
        let center = scene.remove_object(ghost_id)?.position();
        let object = Self::spawn(meshes, kind, center, RenderFlags::default())?;
        let id = scene.add_object(object);
        log::info!("placed {:?} at {:.2?}", kind, center);
        Some(id)
    }

    /// Drops the ghost, if any.
    pub fn cancel_placement(&mut self, scene: &mut Scene) {
        if let Some((_, id)) = self.ghost.take() {
            scene.remove_object(id);
        }
    }

    /// Adds a real primitive centered at `position` without going through a ghost.
    pub fn add_primitive(&mut self, scene: &mut Scene, meshes: &MeshCache, kind: PrimitiveKind, position: Vec3) -> Option<ObjectId> {
        let object = Self::spawn(meshes, kind, position, RenderFlags::default())?;
        Some(scene.add_object(object))
    }
}
