//! Resource module
//!
//! CPU-side geometry and light resources referenced by scene components.

pub mod mesh;
pub mod light;

pub use mesh::{Mesh, MeshId};
pub use light::{Light, LightKind, LightSource};
