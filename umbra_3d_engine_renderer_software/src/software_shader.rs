/// Shader programs - software implementations of the program traits
///
/// Programs keep their uniforms behind a lock. When the device draws, the
/// bound program snapshots its uniforms into a `DrawCall`: transformed
/// vertices plus a fragment function run for every covered pixel.

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard};
use glam::{Mat3, Mat4, Vec2, Vec3};
use umbra_3d_engine::umbra3d::camera::Camera;
use umbra_3d_engine::umbra3d::device::{OverlayShader, Shader, ShadowShader, Texture};
use umbra_3d_engine::umbra3d::resource::{LightKind, LightSource, Mesh};
use umbra_3d_engine::umbra3d::{Error, Result};
use umbra_3d_engine::engine_err;
use crate::rasterizer::{ClipVertex, Varyings};
use crate::software_texture::SoftwareDepthTexture;

/// Depth offset applied before comparing against the shadow map
pub const DEFAULT_SHADOW_BIAS: f32 = 0.005;

/// Color output of a fragment; `None` writes depth only
pub(crate) type FragmentOutput = Result<Option<[f32; 4]>>;

/// Vertices and fragment function of one draw
pub(crate) struct DrawCall {
    pub vertices: Vec<ClipVertex>,
    pub shade: Box<dyn Fn(&Varyings) -> FragmentOutput>,
}

/// Program the device can draw with
pub(crate) trait Program {
    fn prepare_draw(&self, mesh: &Mesh) -> Result<DrawCall>;
}

fn lock<'a, T>(mutex: &'a Mutex<T>, program: &str) -> Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| engine_err!("umbra3d::SoftwareShader", "Uniform lock of '{}' poisoned", program))
}

fn positions(mesh: &Mesh) -> Result<&[Vec3]> {
    match mesh.positions() {
        Some(positions) if !positions.is_empty() => Ok(positions),
        _ => Err(Error::MissingVertexAttribute {
            mesh: mesh.name().to_string(),
            attribute: "position",
        }),
    }
}

fn normals(mesh: &Mesh) -> Result<&[Vec3]> {
    let count = positions(mesh)?.len();
    match mesh.normals() {
        Some(normals) if normals.len() == count => Ok(normals),
        Some(normals) => Err(engine_err!(
            "umbra3d::SoftwareShader",
            "Mesh '{}' has {} normals for {} positions",
            mesh.name(),
            normals.len(),
            count
        )),
        None => Err(Error::MissingVertexAttribute {
            mesh: mesh.name().to_string(),
            attribute: "normal",
        }),
    }
}

fn software_depth(texture: &Arc<dyn Texture>) -> Result<&SoftwareDepthTexture> {
    texture
        .as_any()
        .downcast_ref::<SoftwareDepthTexture>()
        .ok_or_else(|| engine_err!("umbra3d::SoftwareShader", "Texture was not created by the software backend"))
}

// ============================================================================
// Lambert shader
// ============================================================================

#[derive(Clone)]
struct LambertUniforms {
    world: Mat4,
    normal_matrix: Mat3,
    view_projection: Mat4,
    light: Option<LightSource>,
    shadow: Option<(Arc<dyn Texture>, Mat4)>,
}

impl LambertUniforms {
    fn visibility(&self, world: Vec3, bias: f32) -> Result<f32> {
        let Some((texture, light_space)) = &self.shadow else {
            return Ok(1.0);
        };
        let clip = *light_space * world.extend(1.0);
        if clip.w <= 0.0 {
            return Ok(1.0);
        }
        let ndc = clip.truncate() / clip.w;
        let uv = ndc.truncate() * 0.5 + Vec2::splat(0.5);
        if !(0.0..=1.0).contains(&uv.x) || !(0.0..=1.0).contains(&uv.y) || ndc.z > 1.0 {
            return Ok(1.0);
        }
        let occluder = software_depth(texture)?.sample(uv)?;
        Ok(if ndc.z - bias > occluder { 0.0 } else { 1.0 })
    }

    fn radiance(&self, varyings: &Varyings, diffuse: Vec3, bias: f32) -> Result<Vec3> {
        let Some(light) = &self.light else {
            return Ok(Vec3::ZERO);
        };
        let base = diffuse * light.light.color;
        let normal = varyings.normal.normalize_or_zero();
        Ok(match light.light.kind {
            LightKind::Ambient => base,
            LightKind::Directional => {
                let n_dot_l = normal.dot(-light.direction()).max(0.0);
                if n_dot_l == 0.0 {
                    Vec3::ZERO
                } else {
                    base * n_dot_l * self.visibility(varyings.world, bias)?
                }
            }
            LightKind::Point { attenuation } => {
                let to_light = light.position() - varyings.world;
                let distance = to_light.length();
                let n_dot_l = normal.dot(to_light.normalize_or_zero()).max(0.0);
                let falloff = attenuation.x + attenuation.y * distance + attenuation.z * distance * distance;
                if falloff <= 0.0 {
                    base * n_dot_l
                } else {
                    base * n_dot_l / falloff
                }
            }
        })
    }
}

/// Per-pixel diffuse shading with shadow-map lookups for directional lights
///
/// Reads positions and normals.
pub struct SoftwareLambertShader {
    name: String,
    diffuse: Vec3,
    shadow_bias: f32,
    uniforms: Mutex<LambertUniforms>,
}

impl SoftwareLambertShader {
    pub fn new(name: impl Into<String>, diffuse: Vec3, shadow_bias: f32) -> Self {
        Self {
            name: name.into(),
            diffuse,
            shadow_bias,
            uniforms: Mutex::new(LambertUniforms {
                world: Mat4::IDENTITY,
                normal_matrix: Mat3::IDENTITY,
                view_projection: Mat4::IDENTITY,
                light: None,
                shadow: None,
            }),
        }
    }

    pub fn diffuse(&self) -> Vec3 {
        self.diffuse
    }

    pub fn shadow_bias(&self) -> f32 {
        self.shadow_bias
    }
}

impl Shader for SoftwareLambertShader {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_world_transform(&self, mesh: &Mesh, world: &Mat4) -> Result<()> {
        normals(mesh)?;
        let mut uniforms = lock(&self.uniforms, &self.name)?;
        uniforms.world = *world;
        uniforms.normal_matrix = Mat3::from_mat4(*world).inverse().transpose();
        Ok(())
    }

    fn set_camera(&self, camera: &Camera) -> Result<()> {
        lock(&self.uniforms, &self.name)?.view_projection = camera.view_projection_matrix();
        Ok(())
    }

    fn set_light_source(&self, light: &LightSource) -> Result<()> {
        let mut uniforms = lock(&self.uniforms, &self.name)?;
        uniforms.light = Some(*light);
        // Only the directional pass that follows a shadow pass samples a map
        uniforms.shadow = None;
        Ok(())
    }

    fn set_shadow_mapping(&self, shadow_map: &Arc<dyn Texture>, light_space: &Mat4) -> Result<()> {
        software_depth(shadow_map)?;
        lock(&self.uniforms, &self.name)?.shadow = Some((shadow_map.clone(), *light_space));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Program for SoftwareLambertShader {
    fn prepare_draw(&self, mesh: &Mesh) -> Result<DrawCall> {
        let positions = positions(mesh)?;
        let normals = normals(mesh)?;
        let uniforms = lock(&self.uniforms, &self.name)?.clone();

        let vertices = positions
            .iter()
            .zip(normals)
            .map(|(p, n)| {
                let world = uniforms.world.transform_point3(*p);
                ClipVertex {
                    clip: uniforms.view_projection * world.extend(1.0),
                    varyings: Varyings {
                        world,
                        normal: uniforms.normal_matrix * *n,
                        uv: Vec2::ZERO,
                    },
                }
            })
            .collect();

        let (diffuse, bias) = (self.diffuse, self.shadow_bias);
        Ok(DrawCall {
            vertices,
            shade: Box::new(move |varyings: &Varyings| {
                let color = uniforms.radiance(varyings, diffuse, bias)?;
                Ok(Some([color.x, color.y, color.z, 1.0]))
            }),
        })
    }
}

// ============================================================================
// Shadow (depth-only) shader
// ============================================================================

/// Depth-only program rendering casters into the shadow map
pub struct SoftwareShadowShader {
    uniforms: Mutex<(Mat4, Mat4)>,
}

impl SoftwareShadowShader {
    pub fn new() -> Self {
        Self {
            uniforms: Mutex::new((Mat4::IDENTITY, Mat4::IDENTITY)),
        }
    }
}

impl Default for SoftwareShadowShader {
    fn default() -> Self {
        Self::new()
    }
}

impl ShadowShader for SoftwareShadowShader {
    fn set_world_transform(&self, mesh: &Mesh, world: &Mat4) -> Result<()> {
        positions(mesh)?;
        lock(&self.uniforms, "shadow")?.0 = *world;
        Ok(())
    }

    fn set_light_space_transform(&self, light_space: &Mat4) -> Result<()> {
        lock(&self.uniforms, "shadow")?.1 = *light_space;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Program for SoftwareShadowShader {
    fn prepare_draw(&self, mesh: &Mesh) -> Result<DrawCall> {
        let (world, light_space) = *lock(&self.uniforms, "shadow")?;
        let to_clip = light_space * world;
        let vertices = positions(mesh)?
            .iter()
            .map(|p| ClipVertex {
                clip: to_clip * p.extend(1.0),
                varyings: Varyings::default(),
            })
            .collect();
        Ok(DrawCall {
            vertices,
            shade: Box::new(|_: &Varyings| Ok(None)),
        })
    }
}

// ============================================================================
// Overlay shader
// ============================================================================

/// Draws a depth texture as grayscale on a quad given directly in clip space
pub struct SoftwareOverlayShader {
    texture: Mutex<Option<Arc<dyn Texture>>>,
}

impl SoftwareOverlayShader {
    pub fn new() -> Self {
        Self {
            texture: Mutex::new(None),
        }
    }
}

impl Default for SoftwareOverlayShader {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayShader for SoftwareOverlayShader {
    fn set_texture(&self, texture: &Arc<dyn Texture>) -> Result<()> {
        software_depth(texture)?;
        *lock(&self.texture, "overlay")? = Some(texture.clone());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Program for SoftwareOverlayShader {
    fn prepare_draw(&self, mesh: &Mesh) -> Result<DrawCall> {
        let texture = lock(&self.texture, "overlay")?
            .clone()
            .ok_or_else(|| engine_err!("umbra3d::SoftwareShader", "Overlay drawn without a texture"))?;
        let vertices = positions(mesh)?
            .iter()
            .map(|p| ClipVertex {
                clip: p.extend(1.0),
                varyings: Varyings {
                    uv: p.truncate() * 0.5 + Vec2::splat(0.5),
                    ..Varyings::default()
                },
            })
            .collect();
        Ok(DrawCall {
            vertices,
            shade: Box::new(move |varyings: &Varyings| {
                let depth = software_depth(&texture)?.sample(varyings.uv)?;
                Ok(Some([depth, depth, depth, 1.0]))
            }),
        })
    }
}

#[cfg(test)]
#[path = "software_shader_tests.rs"]
mod tests;
