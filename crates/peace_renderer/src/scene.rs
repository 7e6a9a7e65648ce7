//! Flat, insertion-ordered list of [`GameObject`]s plus the single light.
//!
//! No spatial index: culling and picking are linear scans.

use glam::Vec3;
use peace_core::{intersect_ray_aabb, Frustum};

use crate::gpu::ShaderProgram;
use crate::object::GameObject;

/// Stable identifier returned by [`Scene::add_object`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// Which pass a [`Scene::draw`] call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Depth-only render from the light; non-casters are skipped.
    Shadow,
    /// Lit render from the camera.
    Main,
}

/// Outcome of one [`Scene::draw`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub drawn: usize,
    /// Rejected by the frustum test.
    pub culled: usize,
    /// Filtered out by the pass (non-casters in the shadow pass).
    pub skipped: usize,
}

/// Default light position before the day cycle takes over.
pub const DEFAULT_LIGHT_POS: Vec3 = Vec3::new(-25.0, 40.0, -25.0);

#[derive(Debug)]
pub struct Scene {
    objects: Vec<(ObjectId, GameObject)>,
    next_id: u64,
    light_pos: Vec3,
    sun: Option<ObjectId>,
    selected: Option<ObjectId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
            light_pos: DEFAULT_LIGHT_POS,
            sun: None,
            selected: None,
        }
    }

    // ── Membership ──────────────────────────────────────────────────────────

    /// Appends `object` and returns its id.  Draw order is insertion order.
    pub fn add_object(&mut self, mut object: GameObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        object.set_selected(false);
        self.objects.push((id, object));
        id
    }

    /// Removes and returns the object.  Unknown ids are ignored.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<GameObject> {
        let idx = self.objects.iter().position(|(oid, _)| *oid == id)?;
        let (_, object) = self.objects.remove(idx);
        if self.sun == Some(id) {
            self.sun = None;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(object)
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|(oid, _)| *oid == id).map(|(_, o)| o)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|(oid, _)| *oid == id).map(|(_, o)| o)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &GameObject)> {
        self.objects.iter().map(|(id, o)| (*id, o))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Drops every object, releasing their mesh handles.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.sun = None;
        self.selected = None;
    }

    // ── Light and sun ───────────────────────────────────────────────────────

    #[inline]
    pub fn light_position(&self) -> Vec3 {
        self.light_pos
    }

    pub fn set_light_position(&mut self, pos: Vec3) {
        self.light_pos = pos;
    }

    /// Marks an object as the visual stand-in for the light.
    pub fn set_sun(&mut self, id: Option<ObjectId>) {
        self.sun = id;
    }

    #[inline]
    pub fn sun(&self) -> Option<ObjectId> {
        self.sun
    }

    /// Moves the sun object onto the light position.
    pub fn snap_sun_to_light(&mut self) {
        let pos = self.light_pos;
        if let Some(sun) = self.sun.and_then(|id| self.get_mut(id)) {
            if sun.position() != pos {
                sun.set_position(pos);
            }
        }
    }

    // ── Selection ───────────────────────────────────────────────────────────

    /// Selects `target` and deselects everything else in one pass.  Passing
    /// `None`, or an id not in the scene, clears the selection.
    pub fn update_selection(&mut self, target: Option<ObjectId>) {
        let mut found = None;
        for (id, object) in &mut self.objects {
            let hit = Some(*id) == target;
            object.set_selected(hit);
            if hit {
                found = Some(*id);
            }
        }
        self.selected = found;
    }

    #[inline]
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Nearest selectable, non-ghost object whose bounds the ray hits.
    /// "Nearest" is the distance from `origin` to the object's position.
    pub fn pick(&mut self, origin: Vec3, dir: Vec3) -> Option<ObjectId> {
        let mut best: Option<(f32, ObjectId)> = None;
        for (id, object) in &mut self.objects {
            if !object.flags.selectable || object.flags.ghost {
                continue;
            }
            let aabb = object.aabb();
            if intersect_ray_aabb(origin, dir, aabb.min, aabb.max).is_none() {
                continue;
            }
            let dist = origin.distance(object.position());
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, *id));
            }
        }
        best.map(|(_, id)| id)
    }

    // ── Drawing ─────────────────────────────────────────────────────────────

    /// Draws every eligible object with the already bound `shader`.
    ///
    /// The shadow pass skips objects that do not cast shadows.  When a
    /// frustum is given, objects whose bounds fall outside it are culled.
    pub fn draw(&mut self, shader: &mut dyn ShaderProgram, frustum: Option<&Frustum>, pass: PassKind) -> DrawStats {
        let mut stats = DrawStats::default();
        for (_, object) in &mut self.objects {
            if pass == PassKind::Shadow && !object.flags.casts_shadow {
                stats.skipped += 1;
                continue;
            }
            if let Some(frustum) = frustum {
                if !frustum.intersects_aabb(&object.aabb()) {
                    stats.culled += 1;
                    continue;
                }
            }
            object.draw(shader);
            stats.drawn += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use glam::Mat4;
    use peace_core::Transform;

    use super::*;
    use crate::geometry::{primitives, Mesh, MeshData, MeshHandle};
    use crate::gpu::{RenderDevice, ShaderSource};
    use crate::headless::{HeadlessDevice, UniformValue};
    use crate::object::RenderFlags;
    use crate::uniforms;

    fn cube_mesh(dev: &mut HeadlessDevice) -> MeshHandle {
        Rc::new(Mesh::upload(dev, "cube", MeshData::from_vertices(&primitives::cube())).unwrap())
    }

    fn shader(dev: &mut HeadlessDevice, label: &str) -> Box<dyn ShaderProgram> {
        let src = ShaderSource {
            label: label.into(),
            vertex: "void main() {}".into(),
            fragment: "void main() {}".into(),
        };
        dev.create_shader(&src).unwrap()
    }

    fn at(mesh: &MeshHandle, x: f32, y: f32, z: f32) -> GameObject {
        GameObject::new(mesh.clone(), Transform::from_position(Vec3::new(x, y, z)))
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut dev = HeadlessDevice::new();
        let mesh = cube_mesh(&mut dev);
        let mut scene = Scene::new();
        let id = scene.add_object(at(&mesh, 0.0, 0.0, 0.0));
        assert!(scene.remove_object(ObjectId(999)).is_none());
        assert_eq!(scene.len(), 1);
        assert!(scene.remove_object(id).is_some());
        assert!(scene.is_empty());
        assert!(scene.remove_object(id).is_none());
    }

    #[test]
    fn selection_is_exclusive() {
        let mut dev = HeadlessDevice::new();
        let mesh = cube_mesh(&mut dev);
        let mut scene = Scene::new();
        let ids: Vec<_> = (0..3).map(|i| scene.add_object(at(&mesh, i as f32 * 3.0, 0.0, 0.0))).collect();

        scene.update_selection(Some(ids[1]));
        let selected: Vec<_> = scene.iter().filter(|(_, o)| o.is_selected()).map(|(id, _)| id).collect();
        assert_eq!(selected, vec![ids[1]]);

        scene.update_selection(Some(ids[2]));
        assert!(!scene.get(ids[1]).unwrap().is_selected());
        assert!(scene.get(ids[2]).unwrap().is_selected());

        scene.update_selection(None);
        assert!(scene.iter().all(|(_, o)| !o.is_selected()));
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn aabb_follows_transform_changes() {
        let mut dev = HeadlessDevice::new();
        let mesh = cube_mesh(&mut dev);
        let mut obj = at(&mesh, 0.0, 0.0, 0.0);
        let before = obj.aabb();
        // another reader cleans the matrix first; the bounds must still refit
        obj.set_position(Vec3::new(5.0, 0.0, 0.0));
        obj.transform_mut().model_matrix();
        let after = obj.aabb();
        assert!(after.min.abs_diff_eq(before.min + Vec3::X * 5.0, 1e-6));
        assert!(after.max.abs_diff_eq(before.max + Vec3::X * 5.0, 1e-6));

        obj.transform_mut().set_scale(Vec3::splat(2.0));
        assert!(obj.aabb().size().abs_diff_eq(before.size() * 2.0, 1e-6));
    }

    #[test]
    fn shadow_and_main_passes_filter_differently() {
        let mut dev = HeadlessDevice::new();
        let log = dev.log();
        let mesh = cube_mesh(&mut dev);
        let mut scene = Scene::new();
        scene.add_object(at(&mesh, 0.0, 0.0, 0.0));
        scene.add_object(at(&mesh, 0.0, 0.0, -500.0));
        scene.add_object(
            at(&mesh, 0.0, 2.0, 0.0).with_flags(RenderFlags { casts_shadow: false, ..RenderFlags::default() }),
        );

        let proj = Mat4::perspective_rh_gl(45f32.to_radians(), 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let frustum = Frustum::from_view_proj(&(proj * view));

        let mut depth = shader(&mut dev, "depth");
        depth.bind();
        let shadow = scene.draw(depth.as_mut(), None, PassKind::Shadow);
        assert_eq!(shadow, DrawStats { drawn: 2, culled: 0, skipped: 1 });

        let mut lit = shader(&mut dev, "lit");
        lit.bind();
        let main = scene.draw(lit.as_mut(), Some(&frustum), PassKind::Main);
        assert_eq!(main, DrawStats { drawn: 2, culled: 1, skipped: 0 });

        assert_eq!(log.draws_with("depth").len(), 2);
        assert_eq!(log.draws_with("lit").len(), 2);
    }

    #[test]
    fn draw_uploads_object_uniforms() {
        let mut dev = HeadlessDevice::new();
        let log = dev.log();
        let mesh = cube_mesh(&mut dev);
        let mut scene = Scene::new();
        let id = scene.add_object(at(&mesh, 1.0, 2.0, 3.0).with_flags(RenderFlags::ghost()));
        scene.update_selection(Some(id));

        let mut lit = shader(&mut dev, "lit");
        lit.bind();
        scene.draw(lit.as_mut(), None, PassKind::Main);

        assert_eq!(log.last_uniform("lit", uniforms::IS_GHOST), Some(UniformValue::Bool(true)));
        assert_eq!(log.last_uniform("lit", uniforms::IS_SELECTED), Some(UniformValue::Bool(true)));
        assert_eq!(log.last_uniform("lit", uniforms::IS_UNLIT), Some(UniformValue::Bool(false)));
        match log.last_uniform("lit", uniforms::MODEL) {
            Some(UniformValue::Mat4(m)) => assert_eq!(m.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0)),
            other => panic!("unexpected model uniform {:?}", other),
        }
    }

    #[test]
    fn pick_prefers_nearest_selectable() {
        let mut dev = HeadlessDevice::new();
        let mesh = cube_mesh(&mut dev);
        let mut scene = Scene::new();
        let far = scene.add_object(at(&mesh, 0.0, 0.0, -10.0));
        let near = scene.add_object(at(&mesh, 0.0, 0.0, -4.0));
        scene.add_object(at(&mesh, 0.0, 0.0, -2.0).with_flags(RenderFlags::ghost()));
        scene.add_object(at(&mesh, 0.0, 0.0, -1.0).with_flags(RenderFlags { selectable: false, ..RenderFlags::default() }));

        let origin = Vec3::ZERO;
        assert_eq!(scene.pick(origin, Vec3::NEG_Z), Some(near));
        scene.remove_object(near);
        assert_eq!(scene.pick(origin, Vec3::NEG_Z), Some(far));
        assert_eq!(scene.pick(origin, Vec3::X), None);
    }

    #[test]
    fn sun_snaps_to_light() {
        let mut dev = HeadlessDevice::new();
        let mesh = cube_mesh(&mut dev);
        let mut scene = Scene::new();
        let sun = scene.add_object(at(&mesh, 0.0, 0.0, 0.0).with_flags(RenderFlags::unlit()));
        scene.set_sun(Some(sun));
        scene.set_light_position(Vec3::new(10.0, 20.0, 30.0));
        scene.snap_sun_to_light();
        assert_eq!(scene.get(sun).unwrap().position(), Vec3::new(10.0, 20.0, 30.0));

        scene.remove_object(sun);
        assert_eq!(scene.sun(), None);
    }
}
