/// Fixed-function device state: depth test, blending, write masks, clears, viewport

use bitflags::bitflags;
use winit::dpi::PhysicalSize;

// ===== DEPTH TEST =====

/// Comparison function for the depth test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareFunction {
    /// Never passes
    Never,
    /// Passes if incoming < stored
    Less,
    /// Passes if incoming == stored
    Equal,
    /// Passes if incoming <= stored
    LessEqual,
    /// Passes if incoming > stored
    Greater,
    /// Passes if incoming != stored
    NotEqual,
    /// Passes if incoming >= stored
    GreaterEqual,
    /// Always passes
    Always,
}

impl CompareFunction {
    /// Evaluate the comparison for an incoming and a stored depth
    pub fn passes(&self, incoming: f32, stored: f32) -> bool {
        match self {
            CompareFunction::Never => false,
            CompareFunction::Less => incoming < stored,
            CompareFunction::Equal => incoming == stored,
            CompareFunction::LessEqual => incoming <= stored,
            CompareFunction::Greater => incoming > stored,
            CompareFunction::NotEqual => incoming != stored,
            CompareFunction::GreaterEqual => incoming >= stored,
            CompareFunction::Always => true,
        }
    }
}

// ===== BLENDING =====

/// Blend factor applied to source or destination color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// Blend equation `src * src_factor + dst * dst_factor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendState {
    /// Factor applied to the fragment color
    pub src_factor: BlendFactor,
    /// Factor applied to the framebuffer color
    pub dst_factor: BlendFactor,
}

impl BlendState {
    /// (One, One): each light pass adds its contribution
    pub const ADDITIVE: Self = Self {
        src_factor: BlendFactor::One,
        dst_factor: BlendFactor::One,
    };

    /// Standard alpha blending
    pub const ALPHA: Self = Self {
        src_factor: BlendFactor::SrcAlpha,
        dst_factor: BlendFactor::OneMinusSrcAlpha,
    };
}

// ===== MASKS =====

bitflags! {
    /// Color channels written by draws and clears.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorWriteMask: u32 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
        const ALL = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits() | Self::ALPHA.bits();
    }
}

bitflags! {
    /// Buffers affected by `GraphicsDevice::clear`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
    }
}

// ===== VIEWPORT =====

/// Viewport rectangle in pixels, origin at the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Viewport covering a whole surface of the given size
    pub fn full(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }

    /// Viewport covering the whole window
    pub fn from_window(size: PhysicalSize<u32>) -> Self {
        Self::full(size.width, size.height)
    }
}
