use glam::Vec3;
use peace_core::{Aabb, Transform};

use crate::geometry::MeshHandle;
use crate::gpu::ShaderProgram;
use crate::uniforms;

/// Per-object switches read by the passes and uploaded as uniforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderFlags {
    pub textured: bool,
    /// Translucent placement preview.
    pub ghost: bool,
    /// Skip lighting and output the base colour.
    pub unlit: bool,
    pub casts_shadow: bool,
    /// Eligible for center-ray picking.
    pub selectable: bool,
}

impl Default for RenderFlags {
    /// A solid, lit, textured, pickable object that casts a shadow.
    fn default() -> Self {
        Self {
            textured: true,
            ghost: false,
            unlit: false,
            casts_shadow: true,
            selectable: true,
        }
    }
}

impl RenderFlags {
    /// Placement preview: never picked, never in the shadow map.
    pub fn ghost() -> Self {
        Self {
            ghost: true,
            casts_shadow: false,
            selectable: false,
            ..Self::default()
        }
    }

    /// Emissive marker such as the sun proxy.
    pub fn unlit() -> Self {
        Self {
            textured: false,
            unlit: true,
            casts_shadow: false,
            selectable: false,
            ..Self::default()
        }
    }
}

/// A drawable scene entry: transform, shared mesh, render flags.
///
/// The world-space AABB is fitted lazily to the mesh's vertices and
/// refitted only when the transform's revision moves past the one it was
/// computed for.
#[derive(Debug, Clone)]
pub struct GameObject {
    transform: Transform,
    mesh: MeshHandle,
    pub flags: RenderFlags,
    selected: bool,
    bounds: Option<(u64, Aabb)>,
}

impl GameObject {
    pub fn new(mesh: MeshHandle, transform: Transform) -> Self {
        Self {
            transform,
            mesh,
            flags: RenderFlags::default(),
            selected: false,
            bounds: None,
        }
    }

    pub fn with_flags(mut self, flags: RenderFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn mesh(&self) -> &MeshHandle {
        &self.mesh
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.set_position(position);
    }

    /// Set only through [`Scene::update_selection`](crate::scene::Scene::update_selection).
    #[inline]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// World-space bounds for the current transform.
    pub fn aabb(&mut self) -> Aabb {
        let revision = self.transform.revision();
        if let Some((rev, aabb)) = self.bounds {
            if rev == revision {
                return aabb;
            }
        }
        let model = self.transform.model_matrix();
        let aabb = Aabb::from_transformed_points(self.mesh.data().positions(), &model)
            .unwrap_or_else(|| Aabb::point(model.w_axis.truncate()));
        self.bounds = Some((revision, aabb));
        aabb
    }

    /// Uploads the per-object uniforms to the bound `shader` and issues the
    /// mesh draw.
    pub fn draw(&mut self, shader: &mut dyn ShaderProgram) {
        let model = self.transform.model_matrix();
        shader.set_mat4(uniforms::MODEL, &model);
        shader.set_bool(uniforms::IS_GHOST, self.flags.ghost);
        shader.set_bool(uniforms::IS_SELECTED, self.selected);
        shader.set_bool(uniforms::TEXTURED, self.flags.textured);
        shader.set_bool(uniforms::IS_UNLIT, self.flags.unlit);
        self.mesh.draw();
    }
}
