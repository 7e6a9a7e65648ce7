//! The PEACE engine: scene, camera, day cycle and renderer.
//!
//! One [`Engine`] owns everything a frame touches.  The runner feeds it
//! [`PlatformEvent`]s, then calls [`update`](Engine::update),
//! [`render`](Engine::render) and [`end_frame`](Engine::end_frame) in that
//! order, until [`is_running`](Engine::is_running) turns false.

use anyhow::{Context, Result};
use glam::Vec3;
use peace_core::{
    intersect_ray_plane, light_space_matrix, Camera, Controller, DayCycle, Frustum, InputState, KeyCode,
    MouseButton, Raycaster, Transform,
};
use peace_renderer::geometry::primitives;
use peace_renderer::{
    CameraPacket, FramePacket, FrameStats, GameObject, LightPacket, MeshCache, MeshData, ObjectId, RenderDevice,
    RenderFlags, Renderer, RendererDesc, RendererShaders, Scene, TextureDesc, TextureKind, Viewport,
};

use crate::config::AppConfig;
use crate::editor::{Editor, PrimitiveKind, CUBE_MESH, SPHERE_MESH};
use crate::platform::PlatformEvent;
use crate::shaders;

pub const FLOOR_MESH: &str = "floor";
pub const SKYBOX_MESH: &str = "skybox";

/// Ground-plane resting spots of the objects present at startup.
const STARTER_OBJECTS: [(PrimitiveKind, Vec3); 4] = [
    (PrimitiveKind::Cube, Vec3::new(-3.0, 0.5, 0.0)),
    (PrimitiveKind::Cube, Vec3::new(3.0, 0.5, -2.0)),
    (PrimitiveKind::Cube, Vec3::new(0.0, 0.5, -6.0)),
    (PrimitiveKind::Sphere, Vec3::new(0.0, 0.5, 2.0)),
];

const SUN_SCALE: f32 = 3.0;

/// Longest text the time-entry box accepts (`HH:MM`).
const TIME_ENTRY_LEN: usize = 5;

#[derive(Debug)]
struct TimeEntry {
    text: String,
    /// Pause state to restore when the entry closes.
    was_paused: bool,
}

pub struct Engine {
    config: AppConfig,
    device: Box<dyn RenderDevice>,
    renderer: Option<Renderer>,
    meshes: MeshCache,
    scene: Scene,
    camera: Camera,
    controller: Controller,
    raycaster: Raycaster,
    frustum: Frustum,
    day: DayCycle,
    input: InputState,
    editor: Editor,
    time_entry: Option<TimeEntry>,
    mouse_grabbed: bool,
    running: bool,
    viewport: Viewport,
}

impl Engine {
    /// Uploads the built-in resources, builds the render passes and fills
    /// the starting scene.
    pub fn new(config: AppConfig, mut device: Box<dyn RenderDevice>) -> Result<Self> {
        let sources = shaders::load(config.asset_dir.as_deref())?;
        let shaders = RendererShaders {
            depth: device.create_shader(&sources.depth).context("compiling depth shader")?,
            lit: device.create_shader(&sources.lit).context("compiling lit shader")?,
            skybox: device.create_shader(&sources.skybox).context("compiling skybox shader")?,
        };

        let mut meshes = MeshCache::new();
        let dev = device.as_mut();
        meshes.get_or_upload(dev, CUBE_MESH, || {
            MeshData::from_tangent_vertices(&primitives::with_tangents(&primitives::cube()))
        })?;
        meshes.get_or_upload(dev, SPHERE_MESH, || {
            MeshData::from_tangent_vertices(&primitives::with_tangents(&primitives::sphere(1.0, 36, 18)))
        })?;
        let floor = meshes.get_or_upload(dev, FLOOR_MESH, || MeshData::from_vertices(&primitives::quad()))?;
        let skybox_mesh = meshes.get_or_upload(dev, SKYBOX_MESH, || MeshData::from_vertices(&primitives::cube()))?;

        let object_texture = device
            .create_texture(&TextureDesc::solid("object", TextureKind::Texture2d, [200, 200, 200, 255]))
            .context("creating object texture")?;
        let skybox_texture = device
            .create_texture(&TextureDesc::solid("sky", TextureKind::CubeMap, [128, 204, 255, 255]))
            .context("creating skybox cubemap")?;

        let renderer = Renderer::new(
            device.as_mut(),
            shaders,
            RendererDesc {
                shadow_resolution: config.shadow.resolution,
                skybox_mesh,
                skybox_texture,
                object_texture: Some(object_texture),
            },
        )
        .context("building renderer")?;

        let cam_cfg = &config.camera;
        let mut camera = Camera::new(Vec3::from_array(cam_cfg.position), 1.0);
        camera.set_viewport_size(config.width, config.height);
        camera.fov = cam_cfg.fov_degrees;
        camera.znear = cam_cfg.near;
        camera.zfar = cam_cfg.far;
        camera.speed = cam_cfg.speed;
        camera.sensitivity = cam_cfg.mouse_sensitivity;

        let mut raycaster = Raycaster::new(camera.projection_matrix())?;
        raycaster.update_matrices(camera.view_matrix())?;

        let day = DayCycle::new(config.day.start_minutes, config.day.day_duration_seconds, config.day.orbit_radius);

        let mut scene = Scene::new();
        let floor_scale = config.world.floor_scale;
        scene.add_object(
            GameObject::new(floor, Transform::new(Vec3::ZERO, Vec3::ZERO, Vec3::new(floor_scale, 1.0, floor_scale)))
                .with_flags(RenderFlags { casts_shadow: false, selectable: false, ..RenderFlags::default() }),
        );

        let mut editor = Editor::new();
        for (kind, position) in STARTER_OBJECTS {
            editor.add_primitive(&mut scene, &meshes, kind, position);
        }

        if let Some(sphere) = meshes.get(SPHERE_MESH) {
            let sun = GameObject::new(sphere, Transform::from_position(day.sun_position()).with_scale(Vec3::splat(SUN_SCALE)))
                .with_flags(RenderFlags::unlit());
            let id = scene.add_object(sun);
            scene.set_sun(Some(id));
        }
        scene.set_light_position(day.sun_position());

        log::info!(
            "engine ready: {} objects, {} meshes, clock {}",
            scene.len(),
            meshes.len(),
            day.clock_label()
        );

        Ok(Self {
            viewport: Viewport::new(config.width, config.height),
            config,
            device,
            renderer: Some(renderer),
            meshes,
            scene,
            camera,
            controller: Controller::with_default_bindings(),
            raycaster,
            frustum: Frustum::default(),
            day,
            input: InputState::new(),
            editor,
            time_entry: None,
            mouse_grabbed: false,
            running: true,
        })
    }

    // ── Events ──────────────────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::Quit => self.request_quit(),
            PlatformEvent::Resized { width, height } => self.resize(width, height),
            PlatformEvent::MouseMoved { x, y } => self.input.set_mouse_position(x, y),
            PlatformEvent::MouseButton { button, pressed } => {
                self.input.update_mouse_button(button, pressed);
                if pressed && self.time_entry.is_none() {
                    self.on_mouse_button(button);
                }
            }
            PlatformEvent::Key { key, pressed } => {
                // held keys repeat; act on the first press only
                let fresh = !self.input.is_key_pressed(key);
                self.input.update_key(key, pressed);
                if pressed && fresh {
                    self.on_key(key);
                }
            }
            PlatformEvent::Text(c) => {
                if let Some(entry) = &mut self.time_entry {
                    if (c.is_ascii_digit() || c == ':') && entry.text.len() < TIME_ENTRY_LEN {
                        entry.text.push(c);
                    }
                }
            }
        }
    }

    fn on_key(&mut self, key: KeyCode) {
        if self.time_entry.is_some() {
            match key {
                KeyCode::Enter | KeyCode::NumpadEnter => self.commit_time_entry(),
                KeyCode::Escape => {
                    self.close_time_entry();
                }
                KeyCode::Backspace => {
                    if let Some(entry) = &mut self.time_entry {
                        entry.text.pop();
                    }
                }
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Escape => self.request_quit(),
            KeyCode::Tab => {
                self.mouse_grabbed = !self.mouse_grabbed;
                log::debug!("mouse look {}", if self.mouse_grabbed { "on" } else { "off" });
            }
            KeyCode::KeyT => self.open_time_entry(),
            KeyCode::KeyP => {
                let paused = !self.day.is_paused();
                self.day.set_paused(paused);
                log::info!("day cycle {}", if paused { "paused" } else { "resumed" });
            }
            KeyCode::KeyL => {
                let enabled = !self.day.is_sun_enabled();
                self.day.set_sun_enabled(enabled);
                log::info!("sun {}", if enabled { "on" } else { "off" });
            }
            KeyCode::Digit1 => {
                self.editor.start_placement(&mut self.scene, &self.meshes, PrimitiveKind::Cube);
            }
            KeyCode::Digit2 => {
                self.editor.start_placement(&mut self.scene, &self.meshes, PrimitiveKind::Sphere);
            }
            KeyCode::Delete => {
                if let Some(id) = self.scene.selected() {
                    self.scene.remove_object(id);
                    log::info!("deleted object {:?}", id);
                }
            }
            _ => {}
        }
    }

    fn on_mouse_button(&mut self, button: MouseButton) {
        match button {
            MouseButton::Left if self.editor.is_placing() => {
                self.editor.place_object(&mut self.scene, &self.meshes);
            }
            MouseButton::Right => self.editor.cancel_placement(&mut self.scene),
            _ => {}
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("ignoring resize to {}x{}", width, height);
            return;
        }
        self.viewport = Viewport::new(width, height);
        self.camera.set_viewport_size(width, height);
        match Raycaster::new(self.camera.projection_matrix()) {
            Ok(raycaster) => self.raycaster = raycaster,
            Err(err) => log::warn!("keeping previous projection after resize: {}", err),
        }
    }

    // ── Time entry ──────────────────────────────────────────────────────────

    /// Opens the `HH:MM` entry box.  The clock stays paused while it is open.
    pub fn open_time_entry(&mut self) {
        if self.time_entry.is_some() {
            return;
        }
        self.editor.cancel_placement(&mut self.scene);
        self.time_entry = Some(TimeEntry { text: String::new(), was_paused: self.day.is_paused() });
        self.day.set_paused(true);
    }

    fn close_time_entry(&mut self) -> Option<String> {
        let entry = self.time_entry.take()?;
        self.day.set_paused(entry.was_paused);
        Some(entry.text)
    }

    fn commit_time_entry(&mut self) {
        if let Some(text) = self.close_time_entry() {
            if let Err(err) = self.day.set_clock_time(&text) {
                log::warn!("ignoring time {:?}: {}", text, err);
            }
        }
    }

    pub fn time_entry(&self) -> Option<&str> {
        self.time_entry.as_ref().map(|e| e.text.as_str())
    }

    // ── Frame ───────────────────────────────────────────────────────────────

    pub fn update(&mut self, dt: f32) {
        self.day.advance(dt);
        self.scene.set_light_position(self.day.sun_position());

        if self.time_entry.is_none() {
            self.controller.update(&mut self.camera, &mut self.input, dt, self.mouse_grabbed);
        } else {
            self.input.consume_mouse_delta();
        }

        let view = self.camera.view_matrix();
        if let Err(err) = self.raycaster.update_matrices(view) {
            log::warn!("raycaster kept last view: {}", err);
        }
        self.frustum.update(&(self.camera.projection_matrix() * view));
        self.scene.snap_sun_to_light();

        let eye = self.camera.position;
        if self.editor.is_placing() {
            let (mx, my) = self.input.mouse_position();
            let dir = self.raycaster.ray_from_mouse(
                mx,
                my,
                self.viewport.width as f32,
                self.viewport.height as f32,
            );
            if let Some(ground) = intersect_ray_plane(eye, dir, Vec3::Y, Vec3::ZERO) {
                self.editor.update_ghost_position(&mut self.scene, ground);
            }
        } else if self.time_entry.is_none() {
            let target = self.scene.pick(eye, self.raycaster.ray_from_center());
            self.scene.update_selection(target);
        }
    }

    fn frame_packet(&self) -> FramePacket {
        let lighting = self.day.lighting();
        let light_pos = self.scene.light_position();
        let shadow = &self.config.shadow;
        FramePacket {
            viewport: self.viewport,
            camera: CameraPacket {
                projection: self.camera.projection_matrix(),
                view: self.camera.view_matrix(),
                position: self.camera.position,
            },
            light: LightPacket {
                position: light_pos,
                color: lighting.light_color,
                ambient: lighting.ambient_color,
                light_space: light_space_matrix(light_pos, shadow.extent, shadow.near, shadow.far),
            },
            sky_color: lighting.sky_color,
            frustum: self.frustum,
        }
    }

    /// Runs the render passes.  Does nothing after [`shutdown`](Self::shutdown).
    pub fn render(&mut self) {
        let packet = self.frame_packet();
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(self.device.as_mut(), &mut self.scene, &packet);
        }
    }

    pub fn end_frame(&mut self) {
        self.input.end_frame();
    }

    /// Releases GPU resources.  Passes go first, then the scene's mesh
    /// handles, then the meshes themselves.
    pub fn shutdown(&mut self) {
        let Some(renderer) = self.renderer.take() else {
            return;
        };
        self.editor.cancel_placement(&mut self.scene);
        renderer.destroy(self.device.as_mut());
        self.scene.clear();
        self.meshes.destroy_all();
        log::info!("engine shut down");
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_quit(&mut self) {
        if self.running {
            log::info!("quit requested");
        }
        self.running = false;
    }

    pub fn mouse_grabbed(&self) -> bool {
        self.mouse_grabbed
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn day(&self) -> &DayCycle {
        &self.day
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn meshes(&self) -> &MeshCache {
        &self.meshes
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Statistics of the last rendered frame.
    pub fn last_stats(&self) -> Option<&FrameStats> {
        self.renderer.as_ref().map(|r| r.last_stats())
    }

    /// Adds a primitive resting on `ground`.
    pub fn add_primitive(&mut self, kind: PrimitiveKind, position: Vec3) -> Option<ObjectId> {
        self.editor.add_primitive(&mut self.scene, &self.meshes, kind, position)
    }
}

#[cfg(test)]
mod tests {
    use peace_renderer::headless::{Command, CommandLog, HeadlessDevice};

    use super::*;

    fn engine() -> (Engine, CommandLog) {
        let dev = HeadlessDevice::new();
        let log = dev.log();
        let engine = Engine::new(AppConfig::default(), Box::new(dev)).unwrap();
        (engine, log)
    }

    fn key(engine: &mut Engine, key: KeyCode) {
        engine.handle_event(PlatformEvent::Key { key, pressed: true });
        engine.handle_event(PlatformEvent::Key { key, pressed: false });
    }

    fn type_text(engine: &mut Engine, text: &str) {
        for c in text.chars() {
            engine.handle_event(PlatformEvent::Text(c));
        }
    }

    #[test]
    fn startup_fills_scene_and_cache() {
        let (engine, _) = engine();
        // floor + starters + sun
        assert_eq!(engine.scene().len(), 1 + STARTER_OBJECTS.len() + 1);
        assert!(engine.scene().sun().is_some());
        for name in [CUBE_MESH, SPHERE_MESH, FLOOR_MESH, SKYBOX_MESH] {
            assert!(engine.meshes().get(name).is_some(), "missing {}", name);
        }
        assert!(engine.is_running());
    }

    #[test]
    fn broken_shadow_target_fails_startup() {
        let mut config = AppConfig::default();
        config.shadow.resolution = 0;
        assert!(Engine::new(config, Box::new(HeadlessDevice::new())).is_err());
    }

    #[test]
    fn escape_and_quit_stop_the_engine() {
        let (mut e, _) = engine();
        key(&mut e, KeyCode::Escape);
        assert!(!e.is_running());

        let (mut e, _) = engine();
        e.handle_event(PlatformEvent::Quit);
        assert!(!e.is_running());
    }

    #[test]
    fn center_ray_selects_object_in_view() {
        let (mut e, _) = engine();
        // camera sits at y = 4 looking down -Z
        let target = e.add_primitive(PrimitiveKind::Cube, Vec3::new(0.0, 4.0, 0.0)).unwrap();
        e.update(0.016);
        assert_eq!(e.scene().selected(), Some(target));
        assert!(e.scene().get(target).unwrap().is_selected());

        e.camera_mut().process_mouse_movement(90.0 / 0.1, 0.0, true);
        e.update(0.016);
        assert_eq!(e.scene().selected(), None);
    }

    #[test]
    fn delete_removes_selection() {
        let (mut e, _) = engine();
        let target = e.add_primitive(PrimitiveKind::Cube, Vec3::new(0.0, 4.0, 0.0)).unwrap();
        e.update(0.016);
        key(&mut e, KeyCode::Delete);
        assert!(!e.scene().contains(target));
        assert_eq!(e.scene().selected(), None);
    }

    #[test]
    fn time_entry_sets_clock_and_pauses_meanwhile() {
        let (mut e, _) = engine();
        key(&mut e, KeyCode::KeyT);
        assert_eq!(e.time_entry(), Some(""));
        type_text(&mut e, "t07:30x9");
        assert_eq!(e.time_entry(), Some("07:30"));

        let before = e.day().minutes();
        e.update(5.0);
        assert_eq!(e.day().minutes(), before);

        key(&mut e, KeyCode::Enter);
        assert_eq!(e.time_entry(), None);
        assert_eq!(e.day().minutes(), 450.0);
        assert!(!e.day().is_paused());
    }

    #[test]
    fn bad_time_entry_leaves_clock_alone() {
        let (mut e, _) = engine();
        let before = e.day().minutes();
        key(&mut e, KeyCode::KeyT);
        type_text(&mut e, "25:00");
        key(&mut e, KeyCode::Enter);
        assert_eq!(e.day().minutes(), before);

        key(&mut e, KeyCode::KeyT);
        type_text(&mut e, "12:0");
        key(&mut e, KeyCode::Backspace);
        key(&mut e, KeyCode::Escape);
        assert_eq!(e.time_entry(), None);
        assert!(e.is_running());
    }

    #[test]
    fn toggles_flip_state() {
        let (mut e, _) = engine();
        key(&mut e, KeyCode::KeyP);
        assert!(e.day().is_paused());
        key(&mut e, KeyCode::KeyL);
        assert_eq!(e.day().lighting().light_color, Vec3::ZERO);
        key(&mut e, KeyCode::Tab);
        assert!(e.mouse_grabbed());
    }

    #[test]
    fn ghost_follows_mouse_and_places_on_click() {
        let (mut e, _) = engine();
        let count = e.scene().len();
        key(&mut e, KeyCode::Digit2);
        assert!(e.editor().is_placing());
        assert_eq!(e.scene().len(), count + 1);

        // lower part of the screen looks at the ground in front of the camera
        e.handle_event(PlatformEvent::MouseMoved { x: 640.0, y: 700.0 });
        e.update(0.016);
        let ghost = e.editor().ghost_id().unwrap();
        let pos = e.scene().get(ghost).unwrap().position();
        // the ghost sits on the ray's hit with the ground plane
        assert!(pos.y.abs() < 1e-4);
        assert!(pos.z > 0.0 && pos.z < 15.0);

        e.handle_event(PlatformEvent::MouseButton { button: MouseButton::Left, pressed: true });
        assert!(!e.editor().is_placing());
        assert_eq!(e.scene().len(), count + 1);
        assert!(e.scene().iter().any(|(_, o)| !o.flags.ghost && o.position() == pos));
    }

    #[test]
    fn right_click_cancels_placement() {
        let (mut e, _) = engine();
        let count = e.scene().len();
        key(&mut e, KeyCode::Digit1);
        e.handle_event(PlatformEvent::MouseButton { button: MouseButton::Right, pressed: true });
        assert!(!e.editor().is_placing());
        assert_eq!(e.scene().len(), count);
    }

    #[test]
    fn frame_renders_all_passes_and_shutdown_releases_meshes() {
        let (mut e, log) = engine();
        e.update(0.016);
        e.render();
        let stats = e.last_stats().unwrap().clone();
        assert!(stats.pass("main").unwrap().drawn > 0);
        assert_eq!(stats.pass("skybox").unwrap().drawn, 1);

        e.shutdown();
        let cmds = log.commands();
        for name in [CUBE_MESH, SPHERE_MESH, FLOOR_MESH, SKYBOX_MESH] {
            assert!(cmds.contains(&Command::DestroyMesh(name.into())), "{} not destroyed", name);
        }
        assert!(e.meshes().is_empty());
        assert!(e.scene().is_empty());

        log.clear();
        e.render();
        assert!(log.is_empty());
    }

    #[test]
    fn resize_updates_viewport_and_aspect() {
        let (mut e, _) = engine();
        e.handle_event(PlatformEvent::Resized { width: 800, height: 800 });
        assert_eq!(e.viewport(), Viewport::new(800, 800));
        assert_eq!(e.camera().aspect, 1.0);
        e.handle_event(PlatformEvent::Resized { width: 0, height: 0 });
        assert_eq!(e.viewport(), Viewport::new(800, 800));
    }
}
