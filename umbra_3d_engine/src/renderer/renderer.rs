/// Renderer - per-frame orchestration of the shadow and forward passes

use std::sync::{Arc, Mutex};
use glam::Mat4;
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::graphics_device::{
    BlendState, ClearFlags, ColorWriteMask, CompareFunction, GraphicsDevice,
};
use crate::renderer::{
    fit_orthographic, flatten, resolve_shading, BoundsCache, ForwardPass, RenderEntry,
    ShadedEntry, ShadowMapOverlay, ShadowMapping, ShadowPass, ShadowTarget,
    SHADOW_FRUSTUM_PADDING,
};
use crate::resource::LightSource;
use crate::scene::Scene;
use crate::window::WindowHost;
use crate::{engine_debug, engine_err, engine_error, engine_info};

// ============================================================================
// Configuration and statistics
// ============================================================================

/// Renderer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Color the window is cleared to at the start of each frame
    pub clear_color: [f32; 4],
    /// Shadow map resolution (width, height)
    pub shadow_map_size: (u32, u32),
    /// Padding around the fitted light-space bounds, on all three axes
    pub shadow_frustum_padding: f32,
    /// Draw the shadow map in the lower-left corner after the scene
    pub debug_shadow_overlay: bool,
    /// The overlay covers `1 / overlay_scale_divisor` of the window on each axis
    pub overlay_scale_divisor: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 0.0],
            shadow_map_size: (4096, 4096),
            shadow_frustum_padding: SHADOW_FRUSTUM_PADDING,
            debug_shadow_overlay: false,
            overlay_scale_divisor: 4,
        }
    }
}

/// Counters of the last rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Entries produced by scene traversal
    pub render_entries: usize,
    /// Entries excluded for lack of a shading program
    pub skipped_entries: usize,
    /// Lights found in the scene
    pub lights: usize,
    /// Shadow maps rendered
    pub shadow_passes: usize,
    /// Scene draw calls over every pass (the debug overlay is not counted)
    pub draw_calls: usize,
}

// ============================================================================
// Renderer
// ============================================================================

/// Multi-pass forward renderer with one shadow map reused per directional light
///
/// Each frame:
///
/// 1. Device setup (clear color, `LessEqual` depth test, additive blending)
///    and a color + depth clear
/// 2. Scene traversal into a flat render list
/// 3. With no lights, nothing else is drawn
/// 4. Depth pre-pass
/// 5. One additive pass per light; directional lights first render the
///    shadow map with a projection fitted to the casters
/// 6. Depth writes back on, then the optional shadow-map overlay
pub struct Renderer {
    device: Arc<Mutex<dyn GraphicsDevice>>,
    window: Arc<dyn WindowHost>,
    config: RendererConfig,
    shadow_target: ShadowTarget,
    overlay: ShadowMapOverlay,
    bounds_cache: BoundsCache,
    last_frame_stats: FrameStats,
}

impl Renderer {
    /// Create a renderer and allocate its shadow map and overlay resources
    ///
    /// # Errors
    ///
    /// `Error::InitializationFailed` for a zero shadow map size or overlay
    /// divisor; `Error::BackendError` if the device lock is poisoned or a
    /// resource cannot be created.
    pub fn new(
        device: Arc<Mutex<dyn GraphicsDevice>>,
        window: Arc<dyn WindowHost>,
        config: RendererConfig,
    ) -> Result<Self> {
        let (shadow_target, overlay) = {
            let mut guard = device
                .lock()
                .map_err(|_| engine_err!("umbra3d::Renderer", "Graphics device lock poisoned"))?;
            let (width, height) = config.shadow_map_size;
            let shadow_target = ShadowTarget::new(&mut *guard, width, height)?;
            let overlay = ShadowMapOverlay::new(&mut *guard, config.overlay_scale_divisor)?;
            (shadow_target, overlay)
        };

        engine_info!(
            "umbra3d::Renderer",
            "Renderer created (shadow map {}x{}, overlay {})",
            config.shadow_map_size.0,
            config.shadow_map_size.1,
            if config.debug_shadow_overlay { "on" } else { "off" }
        );

        Ok(Self {
            device,
            window,
            config,
            shadow_target,
            overlay,
            bounds_cache: BoundsCache::new(),
            last_frame_stats: FrameStats::default(),
        })
    }

    /// Render one frame of `scene` to the window
    ///
    /// # Errors
    ///
    /// - `Error::InvalidState` if the scene has lights but no active camera
    /// - `Error::MissingVertexAttribute` if no shadow caster has positions, or
    ///   the depth-only program rejects a caster
    /// - any device error, which ends the frame
    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        let device = Arc::clone(&self.device);
        let mut guard = device
            .lock()
            .map_err(|_| engine_err!("umbra3d::Renderer", "Graphics device lock poisoned"))?;
        let device: &mut dyn GraphicsDevice = &mut *guard;

        device.set_clear_color(self.config.clear_color)?;
        device.set_depth_test(Some(CompareFunction::LessEqual))?;
        device.set_blend_state(Some(BlendState::ADDITIVE))?;
        device.set_depth_write(true)?;
        device.set_color_write(ColorWriteMask::ALL)?;
        device.clear(ClearFlags::COLOR | ClearFlags::DEPTH)?;

        let list = flatten(scene, scene.root(), &Mat4::IDENTITY);
        let lights = scene.light_sources();
        let mut stats = FrameStats {
            render_entries: list.len(),
            lights: lights.len(),
            ..FrameStats::default()
        };

        if !lights.is_empty() {
            let camera = scene.active_camera().ok_or_else(|| {
                engine_error!("umbra3d::Renderer", "Scene has {} light(s) but no active camera", lights.len());
                Error::InvalidState("scene has lights but no active camera".to_string())
            })?;

            let shaded = resolve_shading(scene, &list);
            stats.skipped_entries = list.len() - shaded.len();

            stats.draw_calls += ForwardPass::depth_prepass(device, &shaded, &camera)?;
            for light in &lights {
                self.render_light(device, &shaded, &camera, light, &mut stats)?;
            }
            device.set_depth_write(true)?;
        }

        if self.config.debug_shadow_overlay {
            self.overlay.render(
                device,
                self.window.window_size(),
                self.shadow_target.depth_texture(),
            )?;
        }

        engine_debug!("umbra3d::Renderer", "Frame rendered: {:?}", stats);
        self.last_frame_stats = stats;
        Ok(())
    }

    fn render_light(
        &mut self,
        device: &mut dyn GraphicsDevice,
        shaded: &[ShadedEntry<'_>],
        camera: &Camera,
        light: &LightSource,
        stats: &mut FrameStats,
    ) -> Result<()> {
        let draws = if light.light.casts_shadows() {
            let casters: Vec<RenderEntry<'_>> = shaded.iter().map(|s| s.entry).collect();
            match self.render_shadow_map(device, &casters, light, stats)? {
                Some(light_space) => {
                    let shadow = ShadowMapping {
                        texture: self.shadow_target.depth_texture(),
                        light_space,
                    };
                    ForwardPass::accumulate_light(device, shaded, camera, light, Some(shadow))?
                }
                None => ForwardPass::accumulate_light(device, shaded, camera, light, None)?,
            }
        } else {
            ForwardPass::accumulate_light(device, shaded, camera, light, None)?
        };
        stats.draw_calls += draws;
        Ok(())
    }

    /// Fit the light frustum and fill the shadow map
    ///
    /// Returns the light-space matrix, or `None` when there is nothing to cast.
    fn render_shadow_map(
        &mut self,
        device: &mut dyn GraphicsDevice,
        casters: &[RenderEntry<'_>],
        light: &LightSource,
        stats: &mut FrameStats,
    ) -> Result<Option<Mat4>> {
        let Some(first) = casters.first() else {
            return Ok(None);
        };

        let light_view = light.view_matrix();
        let projection = fit_orthographic(
            &mut self.bounds_cache,
            casters,
            &light_view,
            self.config.shadow_frustum_padding,
        )
        .ok_or_else(|| {
            engine_error!(
                "umbra3d::Renderer",
                "No shadow caster exposes vertex positions (first caster: '{}')",
                first.mesh().name()
            );
            Error::MissingVertexAttribute {
                mesh: first.mesh().name().to_string(),
                attribute: "position",
            }
        })?;

        let light_space = projection * light_view;
        stats.draw_calls += ShadowPass::new(&self.shadow_target).render_depth(
            device,
            self.window.window_size(),
            casters,
            &light_space,
        )?;
        stats.shadow_passes += 1;
        Ok(Some(light_space))
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Toggle the shadow-map overlay from the next frame on
    pub fn set_debug_shadow_overlay(&mut self, enabled: bool) {
        self.config.debug_shadow_overlay = enabled;
    }

    pub fn bounds_cache(&self) -> &BoundsCache {
        &self.bounds_cache
    }

    pub fn shadow_target(&self) -> &ShadowTarget {
        &self.shadow_target
    }

    pub fn device(&self) -> &Arc<Mutex<dyn GraphicsDevice>> {
        &self.device
    }

    pub fn last_frame_stats(&self) -> FrameStats {
        self.last_frame_stats
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
