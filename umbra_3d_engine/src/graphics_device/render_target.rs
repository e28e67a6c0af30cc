/// RenderTarget trait - an offscreen framebuffer bound in place of the window

use std::any::Any;
use std::sync::Arc;
use crate::graphics_device::Texture;

/// Render target trait
///
/// A target created by `GraphicsDevice::create_depth_render_target` writes
/// depth exclusively into its attached texture and has no color attachment.
pub trait RenderTarget: Send + Sync {
    /// Get the width of the render target in pixels
    fn width(&self) -> u32;

    /// Get the height of the render target in pixels
    fn height(&self) -> u32;

    /// Depth attachment, if any
    fn depth_texture(&self) -> Option<&Arc<dyn Texture>>;

    /// Backend downcast hook
    fn as_any(&self) -> &dyn Any;
}
