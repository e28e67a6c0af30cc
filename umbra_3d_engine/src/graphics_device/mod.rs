/// Graphics device module - device state machine, resources and shader programs

// Module declarations
pub mod graphics_device;
pub mod state;
pub mod texture;
pub mod render_target;
pub mod shader;
pub mod guard;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use state::*;
pub use texture::*;
pub use render_target::*;
pub use shader::*;
pub use guard::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
