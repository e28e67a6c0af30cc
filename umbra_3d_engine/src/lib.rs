/*!
# Umbra 3D Engine

Multi-pass shadow-mapping renderer core.

Each frame fills the depth buffer in a pre-pass, then accumulates one additive
pass per light. Directional lights first render a shadow map through an
orthographic frustum fitted to the shadow casters, and their pass samples it.
The renderer drives an immediate-mode device through the `GraphicsDevice`
trait; backends (such as the software rasterizer crate) implement it.

## Architecture

- **Scene**: node hierarchy with rendering, shading, light and camera components
- **Renderer**: per-frame orchestration and configuration
- **ShadowPass / ForwardPass**: the individual passes
- **BoundsCache**: object-space bounds per mesh, used to fit light frustums
- **GraphicsDevice**: device state machine, textures, render targets and programs
*/

// Internal modules
mod error;
mod engine;
mod window;
pub mod log;
pub mod graphics_device;
pub mod camera;
pub mod renderer;
pub mod resource;
pub mod scene;

// Main umbra3d namespace module
pub mod umbra3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Frame orchestration
    pub use crate::renderer::{FrameStats, Renderer, RendererConfig};

    // Host window
    pub use crate::window::WindowHost;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{format_entry, DefaultLogger, LogEntry, LogSeverity, Logger};
    }

    // Device sub-module with the backend-facing traits
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Render sub-module with the passes and their helpers
    pub mod render {
        pub use crate::renderer::*;
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
