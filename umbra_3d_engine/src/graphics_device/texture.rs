/// Texture trait, depth texture descriptor, and texture info

use std::any::Any;

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_UNORM,
    D32_FLOAT,
}

impl TextureFormat {
    /// Returns true for depth formats
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::D32_FLOAT)
    }
}

/// Sampler addressing outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    ClampToEdge,
    Repeat,
}

/// Sampler filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

// ===== DEPTH TEXTURE DESC =====

/// Descriptor for creating a depth texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthTextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Addressing for both axes
    pub address_mode: AddressMode,
    /// Minification and magnification filter
    pub filter: FilterMode,
    /// Whether a mip chain is allocated
    pub mipmaps: bool,
}

impl DepthTextureDesc {
    /// Shadow map sampler setup: clamp to edge, linear, no mipmaps
    pub fn shadow_map(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            address_mode: AddressMode::ClampToEdge,
            filter: FilterMode::Linear,
            mipmaps: false,
        }
    }
}

// ===== TEXTURE INFO =====

/// Read-only properties of a created texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Sampler addressing
    pub address_mode: AddressMode,
    /// Sampler filtering
    pub filter: FilterMode,
    /// Number of mip levels (1 = no mipmaps)
    pub mip_levels: u32,
}

impl TextureInfo {
    /// Info for a texture created from a depth descriptor
    pub fn from_depth_desc(desc: &DepthTextureDesc) -> Self {
        let mip_levels = if desc.mipmaps {
            32 - desc.width.max(desc.height).max(1).leading_zeros()
        } else {
            1
        };
        Self {
            width: desc.width,
            height: desc.height,
            format: TextureFormat::D32_FLOAT,
            address_mode: desc.address_mode,
            filter: desc.filter,
            mip_levels,
        }
    }
}

// ===== TEXTURE TRAIT =====

/// Texture resource trait
///
/// Implemented by backend-specific texture types. The texture is released
/// when the last `Arc` is dropped.
pub trait Texture: Send + Sync {
    /// Get the read-only properties of this texture
    fn info(&self) -> &TextureInfo;

    /// Backend downcast hook
    fn as_any(&self) -> &dyn Any;
}
