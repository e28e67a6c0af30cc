/// GraphicsDevice trait - the immediate-mode device state machine
///
/// Every pass of the renderer is a sequence of state changes, clears and
/// draws on this trait. All calls are fallible; backends build their errors
/// with `engine_err!` so the failing call and its parameters are logged.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    BlendState, ClearFlags, ColorWriteMask, CompareFunction, DepthTextureDesc,
    OverlayShader, RenderTarget, ShaderBinding, ShadowShader, Texture, Viewport,
};
use crate::resource::Mesh;

/// Graphics device trait
///
/// Implemented by backend plugins (software rasterizer, test mock). Shared as
/// `Arc<Mutex<dyn GraphicsDevice>>`; a frame holds the lock for its whole
/// duration.
pub trait GraphicsDevice: Send + Sync {
    // ===== RESOURCE CREATION =====

    /// Create a depth texture usable as a shadow map
    fn create_depth_texture(&mut self, desc: DepthTextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create a render target writing depth into `depth` and no color
    fn create_depth_render_target(&mut self, depth: &Arc<dyn Texture>) -> Result<Arc<dyn RenderTarget>>;

    /// Create the depth-only program used by shadow passes
    fn create_shadow_shader(&mut self) -> Result<Arc<dyn ShadowShader>>;

    /// Create the program used to display a texture on a quad
    fn create_overlay_shader(&mut self) -> Result<Arc<dyn OverlayShader>>;

    // ===== FIXED-FUNCTION STATE =====

    /// Color used by `clear(ClearFlags::COLOR)`
    fn set_clear_color(&mut self, color: [f32; 4]) -> Result<()>;

    /// Enable the depth test with `func`, or disable it with `None`
    fn set_depth_test(&mut self, func: Option<CompareFunction>) -> Result<()>;

    /// Enable blending with `blend`, or disable it with `None`
    fn set_blend_state(&mut self, blend: Option<BlendState>) -> Result<()>;

    /// Enable or disable depth buffer writes
    fn set_depth_write(&mut self, enabled: bool) -> Result<()>;

    /// Select the color channels written by draws and clears
    fn set_color_write(&mut self, mask: ColorWriteMask) -> Result<()>;

    /// Clear the selected buffers of the bound target (honors write masks)
    fn clear(&mut self, flags: ClearFlags) -> Result<()>;

    /// Set the viewport rectangle of the bound target
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    // ===== BINDING AND DRAWING =====

    /// Bind an offscreen target, or the window framebuffer with `None`
    fn bind_render_target(&mut self, target: Option<Arc<dyn RenderTarget>>) -> Result<()>;

    /// Bind a program, or unbind with `None`
    fn bind_program(&mut self, program: Option<ShaderBinding>) -> Result<()>;

    /// Draw `mesh` with the bound program and current state
    fn draw_mesh(&mut self, mesh: &Mesh) -> Result<()>;
}
