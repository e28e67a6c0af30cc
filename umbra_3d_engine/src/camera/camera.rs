/// Camera - passive view/projection pair handed to shading programs.
///
/// The scene builds one per frame from the active camera node: the view
/// matrix is the inverse of the node's world transform and the projection
/// comes from its `CameraComponent`. The renderer never modifies it.

use glam::{Mat4, Vec3};

/// View and projection of the active camera for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    /// Create a new camera from explicit matrices.
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view_matrix: view,
            projection_matrix: projection,
        }
    }

    /// Create a camera placed by a local-to-world matrix.
    pub fn from_world_transform(world: &Mat4, projection: Mat4) -> Self {
        Self::new(world.inverse(), projection)
    }

    // ===== GETTERS =====

    /// View matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Projection matrix (perspective or orthographic).
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Eye position in world space.
    pub fn position(&self) -> Vec3 {
        self.view_matrix.inverse().transform_point3(Vec3::ZERO)
    }

    // ===== SETTERS =====

    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
