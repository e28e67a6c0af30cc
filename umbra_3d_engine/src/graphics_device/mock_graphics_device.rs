/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Every device call and every uniform upload is appended to a shared
/// command log as a short string, so tests can assert exact pass ordering.
/// A command prefix can be configured to fail, to exercise error paths.

use std::any::Any;
use std::sync::{Arc, Mutex};
use glam::Mat4;
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::graphics_device::{
    BlendState, ClearFlags, ColorWriteMask, CompareFunction, DepthTextureDesc, GraphicsDevice,
    OverlayShader, RenderTarget, Shader, ShaderBinding, ShadowShader, Texture, TextureInfo, Viewport,
};
use crate::resource::{LightSource, Mesh};

/// Shared, ordered record of device commands
pub type CommandLog = Arc<Mutex<Vec<String>>>;

fn push(log: &CommandLog, command: String) {
    log.lock().unwrap().push(command);
}

fn require_positions(mesh: &Mesh) -> Result<()> {
    if mesh.has_positions() {
        Ok(())
    } else {
        Err(Error::MissingVertexAttribute {
            mesh: mesh.name().to_string(),
            attribute: "position",
        })
    }
}

// ============================================================================
// Mock Texture / RenderTarget
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
    pub name: String,
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockRenderTarget {
    pub depth: Arc<dyn Texture>,
    pub name: String,
}

impl RenderTarget for MockRenderTarget {
    fn width(&self) -> u32 {
        self.depth.info().width
    }

    fn height(&self) -> u32 {
        self.depth.info().height
    }

    fn depth_texture(&self) -> Option<&Arc<dyn Texture>> {
        Some(&self.depth)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Shaders
// ============================================================================

/// Shading program recording its uniform uploads
///
/// With `requires_normals`, meshes without a normal stream are rejected like
/// a lit program would.
pub struct MockShader {
    pub name: String,
    pub requires_normals: bool,
    log: CommandLog,
}

impl MockShader {
    pub fn new(name: &str, log: CommandLog) -> Self {
        Self { name: name.to_string(), requires_normals: false, log }
    }

    pub fn requiring_normals(name: &str, log: CommandLog) -> Self {
        Self { name: name.to_string(), requires_normals: true, log }
    }
}

impl Shader for MockShader {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_world_transform(&self, mesh: &Mesh, _world: &Mat4) -> Result<()> {
        require_positions(mesh)?;
        if self.requires_normals && !mesh.has_normals() {
            return Err(Error::MissingVertexAttribute {
                mesh: mesh.name().to_string(),
                attribute: "normal",
            });
        }
        push(&self.log, format!("{}.set_world_transform({})", self.name, mesh.name()));
        Ok(())
    }

    fn set_camera(&self, _camera: &Camera) -> Result<()> {
        push(&self.log, format!("{}.set_camera", self.name));
        Ok(())
    }

    fn set_light_source(&self, light: &LightSource) -> Result<()> {
        push(&self.log, format!("{}.set_light_source({})", self.name, light.light.kind.label()));
        Ok(())
    }

    fn set_shadow_mapping(&self, _shadow_map: &Arc<dyn Texture>, _light_space: &Mat4) -> Result<()> {
        push(&self.log, format!("{}.set_shadow_mapping", self.name));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Depth-only program; keeps the last light-space matrix for inspection
pub struct MockShadowShader {
    pub last_light_space: Mutex<Option<Mat4>>,
    log: CommandLog,
}

impl ShadowShader for MockShadowShader {
    fn set_world_transform(&self, mesh: &Mesh, _world: &Mat4) -> Result<()> {
        require_positions(mesh)?;
        push(&self.log, format!("shadow.set_world_transform({})", mesh.name()));
        Ok(())
    }

    fn set_light_space_transform(&self, light_space: &Mat4) -> Result<()> {
        *self.last_light_space.lock().unwrap() = Some(*light_space);
        push(&self.log, "shadow.set_light_space_transform".to_string());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockOverlayShader {
    log: CommandLog,
}

impl OverlayShader for MockOverlayShader {
    fn set_texture(&self, texture: &Arc<dyn Texture>) -> Result<()> {
        let name = texture
            .as_any()
            .downcast_ref::<MockTexture>()
            .map_or("texture", |t| t.name.as_str());
        push(&self.log, format!("overlay.set_texture({})", name));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    log: CommandLog,
    fail_on: Option<String>,
    /// Shadow programs handed out, for light-space inspection
    pub shadow_shaders: Vec<Arc<MockShadowShader>>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
            shadow_shaders: Vec::new(),
        }
    }

    /// Shared log, also handed to programs created by this device
    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }

    /// Snapshot of the recorded commands
    pub fn commands(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    /// Make every command starting with `prefix` fail with a backend error
    pub fn fail_on(&mut self, prefix: &str) {
        self.fail_on = Some(prefix.to_string());
    }

    fn record(&self, command: String) -> Result<()> {
        if let Some(prefix) = &self.fail_on {
            if command.starts_with(prefix.as_str()) {
                crate::engine_bail!("umbra3d::MockGraphicsDevice", "{} failed", command);
            }
        }
        push(&self.log, command);
        Ok(())
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_mask(mask: ColorWriteMask) -> String {
    if mask == ColorWriteMask::ALL {
        "all".to_string()
    } else if mask.is_empty() {
        "none".to_string()
    } else {
        format!("{:#x}", mask.bits())
    }
}

fn describe_clear(flags: ClearFlags) -> String {
    let mut parts = Vec::new();
    if flags.contains(ClearFlags::COLOR) {
        parts.push("color");
    }
    if flags.contains(ClearFlags::DEPTH) {
        parts.push("depth");
    }
    parts.join("|")
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_depth_texture(&mut self, desc: DepthTextureDesc) -> Result<Arc<dyn Texture>> {
        self.record(format!("create_depth_texture({}x{})", desc.width, desc.height))?;
        Ok(Arc::new(MockTexture {
            info: TextureInfo::from_depth_desc(&desc),
            name: "shadow_depth".to_string(),
        }))
    }

    fn create_depth_render_target(&mut self, depth: &Arc<dyn Texture>) -> Result<Arc<dyn RenderTarget>> {
        self.record("create_depth_render_target".to_string())?;
        Ok(Arc::new(MockRenderTarget {
            depth: depth.clone(),
            name: "shadow".to_string(),
        }))
    }

    fn create_shadow_shader(&mut self) -> Result<Arc<dyn ShadowShader>> {
        self.record("create_shadow_shader".to_string())?;
        let shader = Arc::new(MockShadowShader {
            last_light_space: Mutex::new(None),
            log: self.log.clone(),
        });
        self.shadow_shaders.push(shader.clone());
        Ok(shader)
    }

    fn create_overlay_shader(&mut self) -> Result<Arc<dyn OverlayShader>> {
        self.record("create_overlay_shader".to_string())?;
        Ok(Arc::new(MockOverlayShader { log: self.log.clone() }))
    }

    fn set_clear_color(&mut self, color: [f32; 4]) -> Result<()> {
        self.record(format!("set_clear_color({:?})", color))
    }

    fn set_depth_test(&mut self, func: Option<CompareFunction>) -> Result<()> {
        match func {
            Some(func) => self.record(format!("set_depth_test({:?})", func)),
            None => self.record("set_depth_test(off)".to_string()),
        }
    }

    fn set_blend_state(&mut self, blend: Option<BlendState>) -> Result<()> {
        match blend {
            Some(BlendState::ADDITIVE) => self.record("set_blend_state(additive)".to_string()),
            Some(other) => self.record(format!("set_blend_state({:?})", other)),
            None => self.record("set_blend_state(off)".to_string()),
        }
    }

    fn set_depth_write(&mut self, enabled: bool) -> Result<()> {
        self.record(format!("set_depth_write({})", enabled))
    }

    fn set_color_write(&mut self, mask: ColorWriteMask) -> Result<()> {
        self.record(format!("set_color_write({})", describe_mask(mask)))
    }

    fn clear(&mut self, flags: ClearFlags) -> Result<()> {
        self.record(format!("clear({})", describe_clear(flags)))
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.record(format!(
            "set_viewport({}, {}, {}, {})",
            viewport.x, viewport.y, viewport.width, viewport.height
        ))
    }

    fn bind_render_target(&mut self, target: Option<Arc<dyn RenderTarget>>) -> Result<()> {
        let name = match &target {
            Some(target) => target
                .as_any()
                .downcast_ref::<MockRenderTarget>()
                .map_or("target".to_string(), |t| t.name.clone()),
            None => "window".to_string(),
        };
        self.record(format!("bind_render_target({})", name))
    }

    fn bind_program(&mut self, program: Option<ShaderBinding>) -> Result<()> {
        let label = program.as_ref().map_or("none".to_string(), ShaderBinding::label);
        self.record(format!("bind_program({})", label))
    }

    fn draw_mesh(&mut self, mesh: &Mesh) -> Result<()> {
        self.record(format!("draw_mesh({})", mesh.name()))
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
