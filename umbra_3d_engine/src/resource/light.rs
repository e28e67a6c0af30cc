//! Light resources.
//!
//! A `Light` describes what a light emits. Where it sits comes from the scene
//! node carrying it: position is the node's world translation and direction is
//! the node's world -Z axis, the same convention cameras use for their view.

use glam::{Mat4, Vec3};

/// Kind of light, dispatched once per light per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Parallel rays along the node's -Z axis. Casts shadows.
    Directional,
    /// Emits from the node's position.
    ///
    /// Intensity at distance `d` is `1 / (c + l * d + q * d^2)` with
    /// `attenuation = (c, l, q)`.
    Point { attenuation: Vec3 },
    /// Uniform light with no position or direction.
    Ambient,
}

impl LightKind {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            LightKind::Directional => "directional",
            LightKind::Point { .. } => "point",
            LightKind::Ambient => "ambient",
        }
    }
}

/// Light emitted by a scene node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Kind and kind-specific parameters
    pub kind: LightKind,
    /// Linear RGB color, intensity folded in
    pub color: Vec3,
}

impl Light {
    pub fn directional(color: Vec3) -> Self {
        Self { kind: LightKind::Directional, color }
    }

    pub fn point(color: Vec3, attenuation: Vec3) -> Self {
        Self { kind: LightKind::Point { attenuation }, color }
    }

    pub fn ambient(color: Vec3) -> Self {
        Self { kind: LightKind::Ambient, color }
    }

    /// Whether the renderer runs a shadow pass for this light
    pub fn casts_shadows(&self) -> bool {
        matches!(self.kind, LightKind::Directional)
    }
}

/// A light placed in the world, as collected from the scene for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub light: Light,
    /// Local-to-world matrix of the node carrying the light
    pub world_transform: Mat4,
}

impl LightSource {
    pub fn new(light: Light, world_transform: Mat4) -> Self {
        Self { light, world_transform }
    }

    /// World-space position
    pub fn position(&self) -> Vec3 {
        self.world_transform.transform_point3(Vec3::ZERO)
    }

    /// World-space direction the light points to (unit length)
    pub fn direction(&self) -> Vec3 {
        self.world_transform.transform_vector3(Vec3::NEG_Z).normalize_or_zero()
    }

    /// World-to-light view matrix used for shadow mapping
    pub fn view_matrix(&self) -> Mat4 {
        self.world_transform.inverse()
    }
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;
