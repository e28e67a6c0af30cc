/*!
# Umbra 3D Engine - Software Renderer Backend

CPU implementation of the Umbra 3D `GraphicsDevice` trait.

Renders into an in-memory framebuffer with a triangle rasterizer, so frames
can be produced and inspected without a GPU or a window. Provides the
depth-only shadow program, a shadow-map overlay program and a Lambert
surface program that samples the shadow map for directional lights.
*/

// Software implementation modules
mod rasterizer;
mod software_device;
mod software_texture;
mod software_render_target;
mod software_shader;

// Main umbra3d namespace module
pub mod umbra3d {
    pub use crate::software_device::SoftwareGraphicsDevice;
    pub use crate::software_texture::SoftwareDepthTexture;
    pub use crate::software_render_target::SoftwareRenderTarget;
    pub use crate::software_shader::{
        SoftwareLambertShader, SoftwareOverlayShader, SoftwareShadowShader, DEFAULT_SHADOW_BIAS,
    };
}
