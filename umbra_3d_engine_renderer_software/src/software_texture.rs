/// Texture - software implementation of the depth Texture trait

use std::any::Any;
use std::sync::{Mutex, MutexGuard};
use glam::Vec2;
use umbra_3d_engine::umbra3d::device::{
    AddressMode, DepthTextureDesc, FilterMode, Texture, TextureInfo,
};
use umbra_3d_engine::umbra3d::Result;
use umbra_3d_engine::engine_err;

/// Depth texture stored as one `f32` per texel, row 0 at the bottom
///
/// Only the base level is stored; `info().mip_levels` reports what was
/// requested.
pub struct SoftwareDepthTexture {
    info: TextureInfo,
    texels: Mutex<Vec<f32>>,
}

impl SoftwareDepthTexture {
    /// Create a texture cleared to the far plane (1.0)
    pub fn new(desc: &DepthTextureDesc) -> Self {
        let len = desc.width as usize * desc.height as usize;
        Self {
            info: TextureInfo::from_depth_desc(desc),
            texels: Mutex::new(vec![1.0; len]),
        }
    }

    pub(crate) fn texels(&self) -> Result<MutexGuard<'_, Vec<f32>>> {
        self.texels
            .lock()
            .map_err(|_| engine_err!("umbra3d::SoftwareTexture", "Depth texture lock poisoned"))
    }

    /// Stored depth at texel (x, y)
    pub fn read(&self, x: u32, y: u32) -> Result<f32> {
        if x >= self.info.width || y >= self.info.height {
            return Err(engine_err!(
                "umbra3d::SoftwareTexture",
                "Texel ({}, {}) outside {}x{} depth texture",
                x,
                y,
                self.info.width,
                self.info.height
            ));
        }
        let texels = self.texels()?;
        Ok(texels[(y * self.info.width + x) as usize])
    }

    /// Sample at normalized coordinates with the texture's address and filter modes
    pub fn sample(&self, uv: Vec2) -> Result<f32> {
        let texels = self.texels()?;
        Ok(sample_texels(&texels, &self.info, uv))
    }
}

fn address(coord: f32, mode: AddressMode) -> f32 {
    match mode {
        AddressMode::ClampToEdge => coord.clamp(0.0, 1.0),
        AddressMode::Repeat => coord - coord.floor(),
    }
}

fn texel_index(i: i64, size: u32, mode: AddressMode) -> u32 {
    match mode {
        AddressMode::ClampToEdge => i.clamp(0, size as i64 - 1) as u32,
        AddressMode::Repeat => i.rem_euclid(size as i64) as u32,
    }
}

pub(crate) fn sample_texels(texels: &[f32], info: &TextureInfo, uv: Vec2) -> f32 {
    if info.width == 0 || info.height == 0 {
        return 1.0;
    }
    let u = address(uv.x, info.address_mode) * info.width as f32;
    let v = address(uv.y, info.address_mode) * info.height as f32;
    let fetch = |x: i64, y: i64| {
        let x = texel_index(x, info.width, info.address_mode);
        let y = texel_index(y, info.height, info.address_mode);
        texels[(y * info.width + x) as usize]
    };

    match info.filter {
        FilterMode::Nearest => fetch(u.floor() as i64, v.floor() as i64),
        FilterMode::Linear => {
            let x = u - 0.5;
            let y = v - 0.5;
            let x0 = x.floor();
            let y0 = y.floor();
            let (fx, fy) = (x - x0, y - y0);
            let (x0, y0) = (x0 as i64, y0 as i64);
            let bottom = fetch(x0, y0) * (1.0 - fx) + fetch(x0 + 1, y0) * fx;
            let top = fetch(x0, y0 + 1) * (1.0 - fx) + fetch(x0 + 1, y0 + 1) * fx;
            bottom * (1.0 - fy) + top * fy
        }
    }
}

impl Texture for SoftwareDepthTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "software_texture_tests.rs"]
mod tests;
