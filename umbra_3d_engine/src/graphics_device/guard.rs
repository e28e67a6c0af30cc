/// Scoped device bindings
///
/// Both guards undo their binding when dropped, so an early return through `?`
/// never leaves a program or an offscreen target bound. Call `finish()` on the
/// success path to surface errors from the release itself.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, RenderTarget, ShaderBinding, Viewport};

// ===== PROGRAM GUARD =====

/// Binds a program for the guard's lifetime
pub struct ProgramGuard<'a> {
    device: &'a mut dyn GraphicsDevice,
    released: bool,
}

impl<'a> ProgramGuard<'a> {
    /// Bind `program` on `device`
    pub fn bind(device: &'a mut dyn GraphicsDevice, program: ShaderBinding) -> Result<Self> {
        device.bind_program(Some(program))?;
        Ok(Self { device, released: false })
    }

    /// Device with the program bound
    pub fn device(&mut self) -> &mut dyn GraphicsDevice {
        &mut *self.device
    }

    /// Unbind the program
    pub fn finish(mut self) -> Result<()> {
        self.released = true;
        self.device.bind_program(None)
    }
}

impl Drop for ProgramGuard<'_> {
    fn drop(&mut self) {
        if !self.released {
            let _ = self.device.bind_program(None);
        }
    }
}

// ===== RENDER TARGET GUARD =====

/// Redirects rendering into an offscreen target for the guard's lifetime
///
/// On release the viewport is restored to `restore_viewport` first, then the
/// window framebuffer is bound again.
pub struct RenderTargetGuard<'a> {
    device: &'a mut dyn GraphicsDevice,
    restore_viewport: Viewport,
    released: bool,
}

impl<'a> RenderTargetGuard<'a> {
    /// Bind `target` on `device`
    pub fn bind(
        device: &'a mut dyn GraphicsDevice,
        target: Arc<dyn RenderTarget>,
        restore_viewport: Viewport,
    ) -> Result<Self> {
        device.bind_render_target(Some(target))?;
        Ok(Self { device, restore_viewport, released: false })
    }

    /// Device with the target bound
    pub fn device(&mut self) -> &mut dyn GraphicsDevice {
        &mut *self.device
    }

    /// Restore the viewport and unbind the target
    pub fn finish(mut self) -> Result<()> {
        self.released = true;
        self.device.set_viewport(self.restore_viewport)?;
        self.device.bind_render_target(None)
    }
}

impl Drop for RenderTargetGuard<'_> {
    fn drop(&mut self) {
        if !self.released {
            let _ = self.device.set_viewport(self.restore_viewport);
            let _ = self.device.bind_render_target(None);
        }
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
