/// Forward shading - depth pre-pass and per-light additive passes.
///
/// The pre-pass fills the depth buffer with color writes off. Each light pass
/// then redraws every entry with depth writes off; with a `LessEqual` depth
/// test only the front-most surface of each pixel passes, and additive
/// blending sums the light contributions.
///
/// A shading program rejecting an entry with a configuration error (a mesh
/// lacking a stream the program reads) only skips that entry for that pass.
/// Device errors end the frame.

use std::sync::Arc;
use glam::Mat4;
use crate::camera::Camera;
use crate::error::Result;
use crate::graphics_device::{
    ColorWriteMask, GraphicsDevice, ProgramGuard, Shader, ShaderBinding, Texture,
};
use crate::renderer::{RenderEntry, RenderList};
use crate::resource::LightSource;
use crate::scene::Scene;
use crate::{engine_trace, engine_warn};

/// A render entry paired with the program its node is shaded with
#[derive(Clone, Copy)]
pub struct ShadedEntry<'a> {
    pub entry: RenderEntry<'a>,
    pub shader: &'a Arc<dyn Shader>,
}

/// Shadow map bound for a directional light pass
#[derive(Clone, Copy)]
pub struct ShadowMapping<'a> {
    pub texture: &'a Arc<dyn Texture>,
    pub light_space: Mat4,
}

/// Pair every entry with its node's shading program
///
/// Entries whose node has no `ShadingComponent` are dropped with one warning
/// each; callers resolve once per frame so the warning is not repeated per pass.
pub fn resolve_shading<'a>(scene: &'a Scene, list: &RenderList<'a>) -> Vec<ShadedEntry<'a>> {
    let mut shaded = Vec::with_capacity(list.len());
    for entry in list.iter() {
        let Some(node) = scene.node(entry.node) else {
            continue;
        };
        match node.shading() {
            Some(shading) => shaded.push(ShadedEntry {
                entry: *entry,
                shader: shading.shader(),
            }),
            None => engine_warn!(
                "umbra3d::ForwardPass",
                "Node '{}' (mesh '{}') has no shading program, skipping it this frame",
                node.name(),
                entry.mesh().name()
            ),
        }
    }
    shaded
}

pub struct ForwardPass;

impl ForwardPass {
    /// Depth-only draw of every entry with its own program
    ///
    /// Returns the number of draw calls issued.
    pub fn depth_prepass(
        device: &mut dyn GraphicsDevice,
        entries: &[ShadedEntry<'_>],
        camera: &Camera,
    ) -> Result<usize> {
        device.set_depth_write(true)?;
        device.set_color_write(ColorWriteMask::empty())?;
        Self::draw_all(device, entries, "depth pre-pass", |shader| shader.set_camera(camera))
    }

    /// Accumulate one light's contribution over every entry
    ///
    /// Depth writes are turned off and all color channels on. With
    /// `shadow`, each program also receives the shadow map and light-space
    /// matrix. Returns the number of draw calls issued.
    pub fn accumulate_light(
        device: &mut dyn GraphicsDevice,
        entries: &[ShadedEntry<'_>],
        camera: &Camera,
        light: &LightSource,
        shadow: Option<ShadowMapping<'_>>,
    ) -> Result<usize> {
        device.set_depth_write(false)?;
        device.set_color_write(ColorWriteMask::ALL)?;
        Self::draw_all(device, entries, light.light.kind.label(), |shader| {
            shader.set_camera(camera)?;
            shader.set_light_source(light)?;
            if let Some(shadow) = &shadow {
                shader.set_shadow_mapping(shadow.texture, &shadow.light_space)?;
            }
            Ok(())
        })
    }

    fn draw_all<F>(
        device: &mut dyn GraphicsDevice,
        entries: &[ShadedEntry<'_>],
        pass: &str,
        set_uniforms: F,
    ) -> Result<usize>
    where
        F: Fn(&dyn Shader) -> Result<()>,
    {
        let mut draws = 0;
        for shaded in entries {
            let shader = shaded.shader;
            let entry = &shaded.entry;
            let mut program = ProgramGuard::bind(device, ShaderBinding::Shading(shader.clone()))?;

            if let Err(err) = shader.set_world_transform(entry.mesh(), &entry.world_transform) {
                if err.is_configuration_error() {
                    engine_warn!(
                        "umbra3d::ForwardPass",
                        "Program '{}' rejected mesh '{}' in {} pass: {}",
                        shader.name(),
                        entry.mesh().name(),
                        pass,
                        err
                    );
                    continue;
                }
                return Err(err);
            }
            set_uniforms(&**shader)?;

            engine_trace!("umbra3d::ForwardPass", "{} pass: drawing '{}'", pass, entry.mesh().name());
            entry.rendering.render(program.device())?;
            program.finish()?;
            draws += 1;
        }
        Ok(draws)
    }
}

#[cfg(test)]
#[path = "forward_pass_tests.rs"]
mod tests;
