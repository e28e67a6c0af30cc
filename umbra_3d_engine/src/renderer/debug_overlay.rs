/// Debug view of the shadow map in the lower-left corner of the window.

use std::sync::Arc;
use winit::dpi::PhysicalSize;
use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, OverlayShader, ProgramGuard, ShaderBinding, Texture, Viewport,
};
use crate::resource::Mesh;

pub struct ShadowMapOverlay {
    quad: Mesh,
    shader: Arc<dyn OverlayShader>,
    scale_divisor: u32,
}

impl ShadowMapOverlay {
    /// The overlay covers `1 / scale_divisor` of the window on each axis
    pub fn new(device: &mut dyn GraphicsDevice, scale_divisor: u32) -> Result<Self> {
        if scale_divisor == 0 {
            return Err(Error::InitializationFailed(
                "overlay scale divisor must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            quad: Mesh::quad(),
            shader: device.create_overlay_shader()?,
            scale_divisor,
        })
    }

    /// Viewport the overlay is drawn into
    pub fn viewport(&self, window_size: PhysicalSize<u32>) -> Viewport {
        Viewport {
            x: 0,
            y: 0,
            width: window_size.width / self.scale_divisor,
            height: window_size.height / self.scale_divisor,
        }
    }

    /// Draw `texture` on a quad, then restore the full-window viewport
    ///
    /// Depth testing and blending are disabled and left disabled; the next
    /// frame's setup turns them back on.
    pub fn render(
        &self,
        device: &mut dyn GraphicsDevice,
        window_size: PhysicalSize<u32>,
        texture: &Arc<dyn Texture>,
    ) -> Result<()> {
        device.set_depth_test(None)?;
        device.set_blend_state(None)?;
        device.set_viewport(self.viewport(window_size))?;

        let mut program = ProgramGuard::bind(device, ShaderBinding::Overlay(self.shader.clone()))?;
        self.shader.set_texture(texture)?;
        program.device().draw_mesh(&self.quad)?;
        program.finish()?;

        device.set_viewport(Viewport::from_window(window_size))
    }
}

#[cfg(test)]
#[path = "debug_overlay_tests.rs"]
mod tests;
