/// SoftwareGraphicsDevice - CPU implementation of the GraphicsDevice trait
///
/// Renders into an in-memory RGBA `f32` window framebuffer with a depth
/// buffer, or into a bound depth-only target. Follows the usual
/// fixed-function rules: the depth mask and color mask also apply to clears,
/// and a disabled depth test never writes depth. Color is clamped to [0, 1]
/// after blending. Rows are counted from the bottom of the window.

use std::sync::Arc;
use glam::Vec4;
use winit::dpi::PhysicalSize;
use umbra_3d_engine::umbra3d::device::{
    BlendFactor, BlendState, ClearFlags, ColorWriteMask, CompareFunction, DepthTextureDesc,
    GraphicsDevice, OverlayShader, RenderTarget, ShaderBinding, ShadowShader, Texture, Viewport,
};
use umbra_3d_engine::umbra3d::resource::Mesh;
use umbra_3d_engine::umbra3d::Result;
use umbra_3d_engine::{engine_bail, engine_err, engine_info, engine_trace};
use crate::rasterizer::{rasterize_triangle, ClipVertex, Fragment};
use crate::software_render_target::SoftwareRenderTarget;
use crate::software_shader::{
    DrawCall, Program, SoftwareLambertShader, SoftwareOverlayShader, SoftwareShadowShader,
};
use crate::software_texture::SoftwareDepthTexture;

/// Fixed-function state captured for one draw
#[derive(Debug, Clone, Copy)]
struct RasterState {
    depth_test: Option<CompareFunction>,
    depth_write: bool,
    color_write: ColorWriteMask,
    blend: Option<BlendState>,
    viewport: Viewport,
}

impl RasterState {
    fn passes_depth(&self, incoming: f32, stored: f32) -> bool {
        self.depth_test.map_or(true, |func| func.passes(incoming, stored))
    }

    fn writes_depth(&self) -> bool {
        self.depth_test.is_some() && self.depth_write
    }
}

fn blend_factor(factor: BlendFactor, src_alpha: f32) -> f32 {
    match factor {
        BlendFactor::Zero => 0.0,
        BlendFactor::One => 1.0,
        BlendFactor::SrcAlpha => src_alpha,
        BlendFactor::OneMinusSrcAlpha => 1.0 - src_alpha,
    }
}

fn write_color(dst: &mut [f32; 4], src: [f32; 4], blend: Option<BlendState>, mask: ColorWriteMask) {
    let src = Vec4::from_array(src);
    let blended = match blend {
        Some(state) => {
            src * blend_factor(state.src_factor, src.w)
                + Vec4::from_array(*dst) * blend_factor(state.dst_factor, src.w)
        }
        None => src,
    };
    let blended = blended.clamp(Vec4::ZERO, Vec4::ONE).to_array();
    let channels = [
        ColorWriteMask::RED,
        ColorWriteMask::GREEN,
        ColorWriteMask::BLUE,
        ColorWriteMask::ALPHA,
    ];
    for (i, channel) in channels.into_iter().enumerate() {
        if mask.contains(channel) {
            dst[i] = blended[i];
        }
    }
}

/// CPU rasterizing graphics device
pub struct SoftwareGraphicsDevice {
    width: u32,
    height: u32,
    color: Vec<[f32; 4]>,
    depth: Vec<f32>,

    clear_color: [f32; 4],
    depth_test: Option<CompareFunction>,
    depth_write: bool,
    color_write: ColorWriteMask,
    blend: Option<BlendState>,
    viewport: Viewport,

    target: Option<Arc<dyn RenderTarget>>,
    program: Option<ShaderBinding>,
    draw_calls: usize,
}

impl SoftwareGraphicsDevice {
    /// Create a device with a `width` x `height` window framebuffer
    ///
    /// Color starts transparent black and depth at 1.0. Depth test and
    /// blending start disabled, all write masks enabled.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        engine_info!("umbra3d::SoftwareGraphicsDevice", "Software device created ({}x{})", width, height);
        Self {
            width,
            height,
            color: vec![[0.0; 4]; len],
            depth: vec![1.0; len],
            clear_color: [0.0; 4],
            depth_test: None,
            depth_write: true,
            color_write: ColorWriteMask::ALL,
            blend: None,
            viewport: Viewport::full(width, height),
            target: None,
            program: None,
            draw_calls: 0,
        }
    }

    /// Window framebuffer size
    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.width, self.height)
    }

    /// Window color at (x, y), `None` outside the framebuffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.index(x, y).map(|i| self.color[i])
    }

    /// Window depth at (x, y), `None` outside the framebuffer
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Draw calls issued since creation, offscreen ones included
    pub fn draw_call_count(&self) -> usize {
        self.draw_calls
    }

    /// Currently bound viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    fn raster_state(&self) -> RasterState {
        RasterState {
            depth_test: self.depth_test,
            depth_write: self.depth_write,
            color_write: self.color_write,
            blend: self.blend,
            viewport: self.viewport,
        }
    }

    fn bound_depth_target(target: &Arc<dyn RenderTarget>) -> Result<&SoftwareDepthTexture> {
        target
            .as_any()
            .downcast_ref::<SoftwareRenderTarget>()
            .and_then(SoftwareRenderTarget::depth)
            .ok_or_else(|| {
                engine_err!("umbra3d::SoftwareGraphicsDevice", "Bound render target is not a software target")
            })
    }

    fn program(binding: &ShaderBinding) -> Result<&dyn Program> {
        let program: Option<&dyn Program> = match binding {
            ShaderBinding::Shading(shader) => shader
                .as_any()
                .downcast_ref::<SoftwareLambertShader>()
                .map(|p| p as &dyn Program),
            ShaderBinding::Shadow(shader) => shader
                .as_any()
                .downcast_ref::<SoftwareShadowShader>()
                .map(|p| p as &dyn Program),
            ShaderBinding::Overlay(shader) => shader
                .as_any()
                .downcast_ref::<SoftwareOverlayShader>()
                .map(|p| p as &dyn Program),
        };
        program.ok_or_else(|| {
            engine_err!(
                "umbra3d::SoftwareGraphicsDevice",
                "Program '{}' was not created for the software backend",
                binding.label()
            )
        })
    }
}

fn vertex<'a>(draw: &'a DrawCall, mesh: &Mesh, index: u32) -> Result<&'a ClipVertex> {
    draw.vertices.get(index as usize).ok_or_else(|| {
        engine_err!(
            "umbra3d::SoftwareGraphicsDevice",
            "draw_mesh('{}'): index {} out of range ({} vertices)",
            mesh.name(),
            index,
            draw.vertices.len()
        )
    })
}

/// Rasterize every triangle of `draw` into a depth buffer and optional color buffer
fn rasterize(
    mesh: &Mesh,
    draw: &DrawCall,
    state: &RasterState,
    surface: (u32, u32),
    depth: &mut [f32],
    mut color: Option<&mut [[f32; 4]]>,
) -> Result<()> {
    for [a, b, c] in mesh.triangles() {
        let triangle = [vertex(draw, mesh, a)?, vertex(draw, mesh, b)?, vertex(draw, mesh, c)?];

        let mut result = Ok(());
        rasterize_triangle(triangle, &state.viewport, surface, |fragment: Fragment| {
            if result.is_err() {
                return;
            }
            let index = (fragment.y * surface.0 + fragment.x) as usize;
            if !state.passes_depth(fragment.depth, depth[index]) {
                return;
            }
            match (draw.shade)(&fragment.varyings) {
                Ok(output) => {
                    if let (Some(src), Some(color)) = (output, color.as_deref_mut()) {
                        write_color(&mut color[index], src, state.blend, state.color_write);
                    }
                    if state.writes_depth() {
                        depth[index] = fragment.depth;
                    }
                }
                Err(err) => result = Err(err),
            }
        });
        result?;
    }
    Ok(())
}

impl GraphicsDevice for SoftwareGraphicsDevice {
    fn create_depth_texture(&mut self, desc: DepthTextureDesc) -> Result<Arc<dyn Texture>> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!(
                "umbra3d::SoftwareGraphicsDevice",
                "create_depth_texture({}x{}): size must be non-zero",
                desc.width,
                desc.height
            );
        }
        Ok(Arc::new(SoftwareDepthTexture::new(&desc)))
    }

    fn create_depth_render_target(&mut self, depth: &Arc<dyn Texture>) -> Result<Arc<dyn RenderTarget>> {
        match SoftwareRenderTarget::new(depth.clone()) {
            Some(target) => Ok(Arc::new(target)),
            None => engine_bail!(
                "umbra3d::SoftwareGraphicsDevice",
                "create_depth_render_target: texture was not created by the software backend"
            ),
        }
    }

    fn create_shadow_shader(&mut self) -> Result<Arc<dyn ShadowShader>> {
        Ok(Arc::new(SoftwareShadowShader::new()))
    }

    fn create_overlay_shader(&mut self) -> Result<Arc<dyn OverlayShader>> {
        Ok(Arc::new(SoftwareOverlayShader::new()))
    }

    fn set_clear_color(&mut self, color: [f32; 4]) -> Result<()> {
        self.clear_color = color;
        Ok(())
    }

    fn set_depth_test(&mut self, func: Option<CompareFunction>) -> Result<()> {
        self.depth_test = func;
        Ok(())
    }

    fn set_blend_state(&mut self, blend: Option<BlendState>) -> Result<()> {
        self.blend = blend;
        Ok(())
    }

    fn set_depth_write(&mut self, enabled: bool) -> Result<()> {
        self.depth_write = enabled;
        Ok(())
    }

    fn set_color_write(&mut self, mask: ColorWriteMask) -> Result<()> {
        self.color_write = mask;
        Ok(())
    }

    fn clear(&mut self, flags: ClearFlags) -> Result<()> {
        match &self.target {
            Some(target) => {
                if flags.contains(ClearFlags::DEPTH) && self.depth_write {
                    Self::bound_depth_target(target)?.texels()?.fill(1.0);
                }
            }
            None => {
                if flags.contains(ClearFlags::COLOR) {
                    let (clear_color, mask) = (self.clear_color, self.color_write);
                    for pixel in &mut self.color {
                        write_color(pixel, clear_color, None, mask);
                    }
                }
                if flags.contains(ClearFlags::DEPTH) && self.depth_write {
                    self.depth.fill(1.0);
                }
            }
        }
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.viewport = viewport;
        Ok(())
    }

    fn bind_render_target(&mut self, target: Option<Arc<dyn RenderTarget>>) -> Result<()> {
        if let Some(target) = &target {
            Self::bound_depth_target(target)?;
        }
        self.target = target;
        Ok(())
    }

    fn bind_program(&mut self, program: Option<ShaderBinding>) -> Result<()> {
        if let Some(binding) = &program {
            Self::program(binding)?;
        }
        self.program = program;
        Ok(())
    }

    fn draw_mesh(&mut self, mesh: &Mesh) -> Result<()> {
        let Some(binding) = self.program.clone() else {
            engine_bail!("umbra3d::SoftwareGraphicsDevice", "draw_mesh('{}') without a bound program", mesh.name());
        };
        let draw = Self::program(&binding)?.prepare_draw(mesh)?;
        let state = self.raster_state();

        match self.target.clone() {
            Some(target) => {
                let texture = Self::bound_depth_target(&target)?;
                let surface = (texture.info().width, texture.info().height);
                let mut texels = texture.texels()?;
                rasterize(mesh, &draw, &state, surface, &mut texels, None)?;
            }
            None => {
                let surface = (self.width, self.height);
                rasterize(mesh, &draw, &state, surface, &mut self.depth, Some(self.color.as_mut_slice()))?;
            }
        }

        self.draw_calls += 1;
        engine_trace!("umbra3d::SoftwareGraphicsDevice", "draw_mesh('{}') with '{}'", mesh.name(), binding.label());
        Ok(())
    }
}

#[cfg(test)]
#[path = "software_device_tests.rs"]
mod tests;
