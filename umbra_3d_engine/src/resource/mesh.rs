//! Resource-level mesh type.
//!
//! A `Mesh` owns named vertex streams. Every stream is optional: a mesh
//! without positions is legal to build and attach, and it is the shading
//! programs that reject it when they need the stream.
//!
//! Meshes are shared between nodes through `Arc<Mesh>`. Each one gets a
//! process-unique `MeshId` at construction, which the renderer uses as a
//! cache key for per-mesh derived data.

use std::sync::atomic::{AtomicU64, Ordering};
use glam::Vec3;

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a mesh resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

impl MeshId {
    fn next() -> Self {
        Self(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    pub fn value(&self) -> u64 {
        self.0
    }
}

// ============================================================================
// MESH
// ============================================================================

/// Named CPU vertex data
#[derive(Debug)]
pub struct Mesh {
    id: MeshId,
    name: String,
    positions: Option<Vec<Vec3>>,
    normals: Option<Vec<Vec3>>,
    indices: Option<Vec<u32>>,
}

impl Mesh {
    /// Create a mesh with no vertex streams
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: MeshId::next(),
            name: name.into(),
            positions: None,
            normals: None,
            indices: None,
        }
    }

    /// Attach a position stream
    pub fn with_positions(mut self, positions: Vec<Vec3>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Attach a normal stream
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Attach a triangle index list
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    // ===== ACCESSORS =====

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_positions(&self) -> bool {
        self.positions.is_some()
    }

    pub fn positions(&self) -> Option<&[Vec3]> {
        self.positions.as_deref()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn normals(&self) -> Option<&[Vec3]> {
        self.normals.as_deref()
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    /// Number of vertices in the position stream (0 without positions)
    pub fn vertex_count(&self) -> usize {
        self.positions.as_ref().map_or(0, Vec::len)
    }

    /// Triangles as vertex index triples
    ///
    /// Indexed meshes use their index list; others take consecutive vertex
    /// triples. A trailing partial triangle is ignored.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
            None => {
                let count = (self.vertex_count() / 3) as u32;
                (0..count).map(|i| [i * 3, i * 3 + 1, i * 3 + 2]).collect()
            }
        }
    }

    // ===== PRIMITIVES =====

    /// Unit quad in the XY plane, spanning [-1, 1], facing +Z
    ///
    /// Covers the whole viewport when drawn without transforms.
    pub fn quad() -> Self {
        Self::new("quad")
            .with_positions(vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ])
            .with_normals(vec![Vec3::Z; 4])
            .with_indices(vec![0, 1, 2, 0, 2, 3])
    }

    /// Square in the XZ plane of side `size`, centered on the origin, facing +Y
    pub fn plane(size: f32) -> Self {
        let h = size * 0.5;
        Self::new("plane")
            .with_positions(vec![
                Vec3::new(-h, 0.0, h),
                Vec3::new(h, 0.0, h),
                Vec3::new(h, 0.0, -h),
                Vec3::new(-h, 0.0, -h),
            ])
            .with_normals(vec![Vec3::Y; 4])
            .with_indices(vec![0, 1, 2, 0, 2, 3])
    }

    /// Axis-aligned cube of side `size` centered on the origin
    ///
    /// 24 vertices so that each face carries its own normal.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        // (normal, tangent u, tangent v) with u x v == normal
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = positions.len() as u32;
            let center = normal * h;
            positions.push(center - u * h - v * h);
            positions.push(center + u * h - v * h);
            positions.push(center + u * h + v * h);
            positions.push(center - u * h + v * h);
            normals.extend_from_slice(&[normal; 4]);
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new("cube")
            .with_positions(positions)
            .with_normals(normals)
            .with_indices(indices)
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
