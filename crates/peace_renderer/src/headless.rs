//! Command-recording backend.
//!
//! [`HeadlessDevice`] implements the collaborator traits without a graphics
//! API: every call is appended to a shared [`CommandLog`].  Resource creation
//! still validates its input the way a driver would, so startup failures
//! (bad shader source, impossible framebuffer) surface as the same
//! [`RenderError`]s a real backend produces.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::geometry::MeshData;
use crate::gpu::{
    ClearOp, CullFace, DepthFunc, DepthTarget, GpuMesh, RenderDevice, RenderError, ShaderProgram,
    ShaderSource, ShaderStage, TargetBinding, TargetId, TextureDesc, TextureId, Viewport,
};

/// Largest depth target the headless device will build.
pub const MAX_TARGET_SIZE: u32 = 16384;

#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Mat4(Mat4),
    Vec3(Vec3),
    Int(i32),
    Bool(bool),
    Float(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateShader(String),
    DestroyShader(String),
    CreateMesh { label: String, vertices: u32 },
    DestroyMesh(String),
    CreateTexture { label: String, id: TextureId },
    DestroyTexture(TextureId),
    CreateDepthTarget { label: String, target: TargetId, size: u32 },
    DestroyDepthTarget(TargetId),
    BindTarget(TargetBinding),
    SetViewport(Viewport),
    Clear(ClearOp),
    SetDepthFunc(DepthFunc),
    SetCullFace(CullFace),
    BindTexture { unit: u32, texture: TextureId },
    UseProgram(String),
    Uniform { program: String, name: String, value: UniformValue },
    Draw { mesh: String, program: Option<String>, vertices: u32 },
}

#[derive(Debug, Default)]
struct Recorder {
    commands: Vec<Command>,
    active_program: Option<String>,
}

/// Shared handle to the recorded command stream.
#[derive(Debug, Clone, Default)]
pub struct CommandLog(Rc<RefCell<Recorder>>);

impl CommandLog {
    fn push(&self, cmd: Command) {
        log::trace!("{:?}", cmd);
        self.0.borrow_mut().commands.push(cmd);
    }

    /// Copy of everything recorded so far.
    pub fn commands(&self) -> Vec<Command> {
        self.0.borrow().commands.clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.0.borrow_mut().commands.clear();
    }

    /// Labels of every mesh drawn while `program` was current, in order.
    pub fn draws_with(&self, program: &str) -> Vec<String> {
        self.0
            .borrow()
            .commands
            .iter()
            .filter_map(|c| match c {
                Command::Draw { mesh, program: Some(p), .. } if p == program => Some(mesh.clone()),
                _ => None,
            })
            .collect()
    }

    /// Position of the first command matching `pred`.
    pub fn position(&self, pred: impl Fn(&Command) -> bool) -> Option<usize> {
        self.0.borrow().commands.iter().position(pred)
    }

    /// Last value uploaded to uniform `name` of `program`.
    pub fn last_uniform(&self, program: &str, name: &str) -> Option<UniformValue> {
        self.0.borrow().commands.iter().rev().find_map(|c| match c {
            Command::Uniform { program: p, name: n, value } if p == program && n == name => Some(value.clone()),
            _ => None,
        })
    }
}

// ── Device ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct HeadlessDevice {
    log: CommandLog,
    next_id: u32,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A second handle onto this device's command stream.
    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

fn version_line(src: &str) -> Option<&str> {
    src.lines().map(str::trim).find(|l| l.starts_with("#version"))
}

fn check_stage(label: &str, stage: ShaderStage, src: &str) -> Result<(), RenderError> {
    if src.contains("void main") {
        return Ok(());
    }
    Err(RenderError::ShaderCompile {
        label: label.to_owned(),
        stage,
        log: "0:1(1): error: no definition of `main` found".to_owned(),
    })
}

impl RenderDevice for HeadlessDevice {
    fn create_shader(&mut self, source: &ShaderSource) -> Result<Box<dyn ShaderProgram>, RenderError> {
        check_stage(&source.label, ShaderStage::Vertex, &source.vertex)?;
        check_stage(&source.label, ShaderStage::Fragment, &source.fragment)?;
        let (vv, fv) = (version_line(&source.vertex), version_line(&source.fragment));
        if vv != fv {
            return Err(RenderError::ShaderLink {
                label: source.label.clone(),
                log: format!("stage versions differ: {:?} vs {:?}", vv, fv),
            });
        }
        self.log.push(Command::CreateShader(source.label.clone()));
        Ok(Box::new(HeadlessShader {
            label: source.label.clone(),
            log: self.log.clone(),
            destroyed: false,
        }))
    }

    fn create_mesh(&mut self, label: &str, data: &MeshData) -> Result<Box<dyn GpuMesh>, RenderError> {
        let vertices = data.vertex_count() as u32;
        self.log.push(Command::CreateMesh { label: label.to_owned(), vertices });
        Ok(Box::new(HeadlessMesh {
            label: label.to_owned(),
            vertices,
            log: self.log.clone(),
        }))
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId, RenderError> {
        if desc.width == 0 || desc.height == 0 || desc.pixels.len() != desc.expected_len() {
            return Err(RenderError::Texture {
                label: desc.label.clone(),
                reason: format!(
                    "{}x{} {:?} needs {} bytes, got {}",
                    desc.width,
                    desc.height,
                    desc.kind,
                    desc.expected_len(),
                    desc.pixels.len()
                ),
            });
        }
        let id = TextureId(self.next_id());
        self.log.push(Command::CreateTexture { label: desc.label.clone(), id });
        Ok(id)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.log.push(Command::DestroyTexture(texture));
    }

    fn create_depth_target(&mut self, label: &str, size: u32) -> Result<DepthTarget, RenderError> {
        if size == 0 || size > MAX_TARGET_SIZE {
            return Err(RenderError::FramebufferIncomplete {
                label: label.to_owned(),
                reason: format!("depth attachment size {} outside 1..={}", size, MAX_TARGET_SIZE),
            });
        }
        let target = TargetId(self.next_id());
        let texture = TextureId(self.next_id());
        self.log.push(Command::CreateDepthTarget { label: label.to_owned(), target, size });
        Ok(DepthTarget { id: target, texture, size })
    }

    fn destroy_depth_target(&mut self, target: DepthTarget) {
        self.log.push(Command::DestroyDepthTarget(target.id));
    }

    fn bind_target(&mut self, target: TargetBinding) {
        self.log.push(Command::BindTarget(target));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.log.push(Command::SetViewport(viewport));
    }

    fn clear(&mut self, op: ClearOp) {
        self.log.push(Command::Clear(op));
    }

    fn set_depth_func(&mut self, func: DepthFunc) {
        self.log.push(Command::SetDepthFunc(func));
    }

    fn set_cull_face(&mut self, face: CullFace) {
        self.log.push(Command::SetCullFace(face));
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        self.log.push(Command::BindTexture { unit, texture });
    }
}

// ── Shader ──────────────────────────────────────────────────────────────────

pub struct HeadlessShader {
    label: String,
    log: CommandLog,
    destroyed: bool,
}

impl HeadlessShader {
    fn uniform(&self, name: &str, value: UniformValue) {
        self.log.push(Command::Uniform {
            program: self.label.clone(),
            name: name.to_owned(),
            value,
        });
    }
}

impl ShaderProgram for HeadlessShader {
    fn label(&self) -> &str {
        &self.label
    }

    fn bind(&mut self) {
        self.log.0.borrow_mut().active_program = Some(self.label.clone());
        self.log.push(Command::UseProgram(self.label.clone()));
    }

    fn set_mat4(&mut self, name: &str, value: &Mat4) {
        self.uniform(name, UniformValue::Mat4(*value));
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.uniform(name, UniformValue::Vec3(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.uniform(name, UniformValue::Int(value));
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.uniform(name, UniformValue::Bool(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.uniform(name, UniformValue::Float(value));
    }

    fn destroy(&mut self) {
        if std::mem::replace(&mut self.destroyed, true) {
            log::warn!("shader `{}` destroyed twice", self.label);
            return;
        }
        self.log.push(Command::DestroyShader(self.label.clone()));
    }
}

// ── Mesh ────────────────────────────────────────────────────────────────────

pub struct HeadlessMesh {
    label: String,
    vertices: u32,
    log: CommandLog,
}

impl GpuMesh for HeadlessMesh {
    fn draw(&self) {
        let program = self.log.0.borrow().active_program.clone();
        self.log.push(Command::Draw {
            mesh: self.label.clone(),
            program,
            vertices: self.vertices,
        });
    }

    fn vertex_count(&self) -> u32 {
        self.vertices
    }

    fn destroy(&mut self) {
        self.log.push(Command::DestroyMesh(self.label.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::TextureKind;

    fn source(label: &str, vertex: &str, fragment: &str) -> ShaderSource {
        ShaderSource {
            label: label.into(),
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    #[test]
    fn missing_main_is_a_compile_error() {
        let mut dev = HeadlessDevice::new();
        let err = dev
            .create_shader(&source("broken", "#version 330 core\nvoid main() {}", "#version 330 core\n"))
            .err()
            .unwrap();
        assert!(matches!(err, RenderError::ShaderCompile { stage: ShaderStage::Fragment, .. }));
    }

    #[test]
    fn mismatched_versions_fail_to_link() {
        let mut dev = HeadlessDevice::new();
        let err = dev
            .create_shader(&source("mixed", "#version 330 core\nvoid main() {}", "#version 410 core\nvoid main() {}"))
            .err()
            .unwrap();
        assert!(matches!(err, RenderError::ShaderLink { .. }));
    }

    #[test]
    fn oversized_depth_target_is_incomplete() {
        let mut dev = HeadlessDevice::new();
        assert!(matches!(
            dev.create_depth_target("shadow", 0),
            Err(RenderError::FramebufferIncomplete { .. })
        ));
        assert!(dev.create_depth_target("shadow", MAX_TARGET_SIZE + 1).is_err());
        let target = dev.create_depth_target("shadow", 1024).unwrap();
        assert_eq!(target.size, 1024);
    }

    #[test]
    fn texture_size_is_validated() {
        let mut dev = HeadlessDevice::new();
        let ok = TextureDesc::solid("sky", TextureKind::CubeMap, [10, 20, 30, 255]);
        assert!(dev.create_texture(&ok).is_ok());
        let bad = TextureDesc { pixels: vec![0; 3], ..ok };
        assert!(matches!(dev.create_texture(&bad), Err(RenderError::Texture { .. })));
    }

    #[test]
    fn draws_remember_the_bound_program() {
        let mut dev = HeadlessDevice::new();
        let log = dev.log();
        let mut shader = dev
            .create_shader(&source("lit", "void main() {}", "void main() {}"))
            .unwrap();
        let mesh = dev.create_mesh("cube", &MeshData::from_vertices(&crate::geometry::primitives::cube())).unwrap();
        mesh.draw();
        shader.bind();
        shader.set_bool("u_flag", true);
        mesh.draw();

        assert_eq!(log.draws_with("lit"), vec!["cube".to_owned()]);
        assert_eq!(log.last_uniform("lit", "u_flag"), Some(UniformValue::Bool(true)));
        assert!(log.commands().contains(&Command::Draw { mesh: "cube".into(), program: None, vertices: 36 }));
    }
}
