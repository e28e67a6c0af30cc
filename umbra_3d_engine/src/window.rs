/// Window host abstraction
///
/// The renderer only needs the current drawable size of the host window to
/// restore the viewport after offscreen passes.

use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Host window queried once per offscreen pass
pub trait WindowHost: Send + Sync {
    /// Current drawable size in physical pixels
    fn window_size(&self) -> PhysicalSize<u32>;
}

impl WindowHost for Window {
    fn window_size(&self) -> PhysicalSize<u32> {
        self.inner_size()
    }
}

/// Fixed-size host (headless rendering, tests)
impl WindowHost for PhysicalSize<u32> {
    fn window_size(&self) -> PhysicalSize<u32> {
        *self
    }
}
