//! Camera module - per-frame view/projection data.
//!
//! Cameras are built from the scene's active camera node; shading programs
//! read them, nothing else stores them.

mod camera;

pub use camera::Camera;
