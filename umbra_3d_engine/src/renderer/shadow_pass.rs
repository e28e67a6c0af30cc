/// Shadow pass - depth-only rendering from a light into the shadow map.
///
/// There is a single `ShadowTarget` per renderer. Each directional light
/// rewrites it and the following light pass reads it, so per-light shadow
/// maps are never kept.

use std::sync::Arc;
use glam::Mat4;
use winit::dpi::PhysicalSize;
use crate::error::{Error, Result};
use crate::graphics_device::{
    ClearFlags, ColorWriteMask, DepthTextureDesc, GraphicsDevice, ProgramGuard, RenderTarget,
    RenderTargetGuard, ShaderBinding, ShadowShader, Texture, Viewport,
};
use crate::renderer::RenderEntry;
use crate::{engine_error, engine_info};

// ===== SHADOW TARGET =====

/// Depth texture, the render target writing into it, and the depth-only program
pub struct ShadowTarget {
    depth_texture: Arc<dyn Texture>,
    render_target: Arc<dyn RenderTarget>,
    shader: Arc<dyn ShadowShader>,
    width: u32,
    height: u32,
}

impl ShadowTarget {
    /// Allocate the shadow map resources on `device`
    ///
    /// # Errors
    ///
    /// `Error::InitializationFailed` for a zero-sized map; device errors are propagated.
    pub fn new(device: &mut dyn GraphicsDevice, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InitializationFailed(format!(
                "shadow map size must be non-zero, got {}x{}",
                width, height
            )));
        }

        let depth_texture = device.create_depth_texture(DepthTextureDesc::shadow_map(width, height))?;
        let render_target = device.create_depth_render_target(&depth_texture)?;
        let shader = device.create_shadow_shader()?;

        engine_info!("umbra3d::ShadowPass", "Shadow map allocated ({}x{})", width, height);

        Ok(Self {
            depth_texture,
            render_target,
            shader,
            width,
            height,
        })
    }

    pub fn depth_texture(&self) -> &Arc<dyn Texture> {
        &self.depth_texture
    }

    pub fn render_target(&self) -> &Arc<dyn RenderTarget> {
        &self.render_target
    }

    pub fn shader(&self) -> &Arc<dyn ShadowShader> {
        &self.shader
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Viewport covering the whole shadow map
    pub fn viewport(&self) -> Viewport {
        Viewport::full(self.width, self.height)
    }
}

// ===== SHADOW PASS =====

pub struct ShadowPass<'a> {
    target: &'a ShadowTarget,
}

impl<'a> ShadowPass<'a> {
    pub fn new(target: &'a ShadowTarget) -> Self {
        Self { target }
    }

    /// Render the depth of every caster into the shadow map
    ///
    /// Binds the shadow target, sets its viewport, enables depth writes and
    /// disables color writes, clears depth, then draws each caster with the
    /// depth-only program. On every exit path the viewport is restored to
    /// `window_size` before the window framebuffer is bound again. Blend state
    /// is left untouched. Returns the number of draw calls.
    ///
    /// # Errors
    ///
    /// `Error::MissingVertexAttribute` if a caster's mesh has no positions.
    pub fn render_depth(
        &self,
        device: &mut dyn GraphicsDevice,
        window_size: PhysicalSize<u32>,
        casters: &[RenderEntry<'_>],
        light_space: &Mat4,
    ) -> Result<usize> {
        let mut target = RenderTargetGuard::bind(
            device,
            self.target.render_target().clone(),
            Viewport::from_window(window_size),
        )?;

        {
            let device = target.device();
            device.set_viewport(self.target.viewport())?;
            device.set_depth_write(true)?;
            device.set_color_write(ColorWriteMask::empty())?;
            device.clear(ClearFlags::DEPTH)?;
        }

        let shader = self.target.shader();
        let mut draws = 0;
        for entry in casters {
            let mut program = ProgramGuard::bind(target.device(), ShaderBinding::Shadow(shader.clone()))?;
            shader
                .set_world_transform(entry.mesh(), &entry.world_transform)
                .map_err(|err| {
                    engine_error!("umbra3d::ShadowPass", "Cannot render shadow caster: {}", err);
                    err
                })?;
            shader.set_light_space_transform(light_space)?;
            entry.rendering.render(program.device())?;
            program.finish()?;
            draws += 1;
        }

        target.finish()?;
        Ok(draws)
    }
}

#[cfg(test)]
#[path = "shadow_pass_tests.rs"]
mod tests;
