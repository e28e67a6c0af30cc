/// Renderer module - frame orchestration and the individual render passes

// Module declarations
pub mod render_list;
pub mod bounds_cache;
pub mod light_frustum;
pub mod shadow_pass;
pub mod forward_pass;
pub mod debug_overlay;
pub mod renderer;

// Re-export everything from renderer.rs
pub use renderer::*;

// Re-export from other modules
pub use render_list::*;
pub use bounds_cache::*;
pub use light_frustum::*;
pub use shadow_pass::*;
pub use forward_pass::*;
pub use debug_overlay::*;
