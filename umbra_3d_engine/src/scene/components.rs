//! Scene node components
//!
//! A node carries at most one component of each kind. The renderer reads them
//! and never mutates them.

use std::sync::Arc;
use glam::Mat4;
use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, Shader};
use crate::resource::{Light, Mesh};

/// Makes a node drawable
#[derive(Debug, Clone)]
pub struct RenderingComponent {
    mesh: Arc<Mesh>,
}

impl RenderingComponent {
    pub fn new(mesh: Arc<Mesh>) -> Self {
        Self { mesh }
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// Issue the draw call with whatever program and state are current
    pub fn render(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        device.draw_mesh(&self.mesh)
    }
}

/// Shading program used for the node in the depth pre-pass and light passes
#[derive(Clone)]
pub struct ShadingComponent {
    shader: Arc<dyn Shader>,
}

impl ShadingComponent {
    pub fn new(shader: Arc<dyn Shader>) -> Self {
        Self { shader }
    }

    pub fn shader(&self) -> &Arc<dyn Shader> {
        &self.shader
    }
}

impl std::fmt::Debug for ShadingComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadingComponent")
            .field("shader", &self.shader.name())
            .finish()
    }
}

/// Makes a node emit light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightComponent {
    light: Light,
}

impl LightComponent {
    pub fn new(light: Light) -> Self {
        Self { light }
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn set_light(&mut self, light: Light) {
        self.light = light;
    }
}

/// Projection of a camera node; its view comes from the node's world transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraComponent {
    projection: Mat4,
}

impl CameraComponent {
    pub fn new(projection: Mat4) -> Self {
        Self { projection }
    }

    /// Right-handed perspective with depth in [0, 1]
    pub fn perspective(fov_y_radians: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::new(Mat4::perspective_rh(fov_y_radians, aspect_ratio, z_near, z_far))
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }
}
