/// Shader program traits
///
/// Programs are shared (`Arc`) between scene nodes and the device, so uniform
/// setters take `&self`; backends keep their uniform state behind a lock.
/// Setters must be called while the program is bound (see `ProgramGuard`).

use std::any::Any;
use std::sync::Arc;
use glam::Mat4;
use crate::camera::Camera;
use crate::error::Result;
use crate::graphics_device::Texture;
use crate::resource::{LightSource, Mesh};

/// Surface shading program attached to scene nodes
pub trait Shader: Send + Sync {
    /// Debug name used in warnings and traces
    fn name(&self) -> &str;

    /// Upload the model matrix for `mesh`
    ///
    /// # Errors
    ///
    /// `Error::MissingVertexAttribute` if `mesh` lacks a stream this program
    /// reads. Callers treat this as a per-entry configuration error.
    fn set_world_transform(&self, mesh: &Mesh, world: &Mat4) -> Result<()>;

    /// Upload view/projection and eye position
    fn set_camera(&self, camera: &Camera) -> Result<()>;

    /// Upload the light for the current accumulation pass
    fn set_light_source(&self, light: &LightSource) -> Result<()>;

    /// Bind the shadow depth texture and the matrix mapping world space into it
    fn set_shadow_mapping(&self, shadow_map: &Arc<dyn Texture>, light_space: &Mat4) -> Result<()>;

    /// Backend downcast hook
    fn as_any(&self) -> &dyn Any;
}

/// Depth-only program used by the shadow pass
pub trait ShadowShader: Send + Sync {
    /// Upload the model matrix for `mesh`
    ///
    /// # Errors
    ///
    /// `Error::MissingVertexAttribute` if `mesh` has no position stream.
    fn set_world_transform(&self, mesh: &Mesh, world: &Mat4) -> Result<()>;

    /// Upload `light_projection * light_view`
    fn set_light_space_transform(&self, light_space: &Mat4) -> Result<()>;

    /// Backend downcast hook
    fn as_any(&self) -> &dyn Any;
}

/// Screen-space program drawing a texture onto a quad
pub trait OverlayShader: Send + Sync {
    /// Texture to display; depth textures are shown as grayscale
    fn set_texture(&self, texture: &Arc<dyn Texture>) -> Result<()>;

    /// Backend downcast hook
    fn as_any(&self) -> &dyn Any;
}

/// Program bound with `GraphicsDevice::bind_program`
#[derive(Clone)]
pub enum ShaderBinding {
    Shading(Arc<dyn Shader>),
    Shadow(Arc<dyn ShadowShader>),
    Overlay(Arc<dyn OverlayShader>),
}

impl ShaderBinding {
    /// Short label for logs
    pub fn label(&self) -> String {
        match self {
            ShaderBinding::Shading(shader) => shader.name().to_string(),
            ShaderBinding::Shadow(_) => "shadow".to_string(),
            ShaderBinding::Overlay(_) => "overlay".to_string(),
        }
    }
}

impl std::fmt::Debug for ShaderBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ShaderBinding({})", self.label())
    }
}
