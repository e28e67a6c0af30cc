/// Object-space bounds per mesh, computed on first use and kept forever.
///
/// Meshes are immutable once shared, so an entry never goes stale. The cache
/// is keyed by `MeshId`; two nodes sharing one `Arc<Mesh>` share one entry.

use glam::Vec3;
use rustc_hash::FxHashMap;
use crate::resource::{Mesh, MeshId};

// ===== AABB =====

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Component-wise min/max of `points`, `None` when empty
    pub fn from_points(points: &[Vec3]) -> Option<AABB> {
        let (first, rest) = points.split_first()?;
        let mut bounds = AABB::new(*first, *first);
        for p in rest {
            bounds.include(*p);
        }
        Some(bounds)
    }

    /// Grow to contain `point`
    pub fn include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// The 8 corners, x varying fastest
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Grow by `padding` on every side
    pub fn expanded(&self, padding: f32) -> AABB {
        AABB::new(self.min - Vec3::splat(padding), self.max + Vec3::splat(padding))
    }
}

// ===== BOUNDS CACHE =====

#[derive(Debug, Default)]
pub struct BoundsCache {
    entries: FxHashMap<MeshId, AABB>,
    scans: usize,
}

impl BoundsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Object-space bounds of `mesh`
    ///
    /// The first query for a mesh scans its position stream once. Meshes
    /// without positions (or with an empty stream) return `None` and are not
    /// remembered.
    pub fn object_space_bounds(&mut self, mesh: &Mesh) -> Option<AABB> {
        if let Some(bounds) = self.entries.get(&mesh.id()) {
            return Some(*bounds);
        }

        let positions = mesh.positions().filter(|p| !p.is_empty())?;
        self.scans += 1;
        let bounds = AABB::from_points(positions)?;
        self.entries.insert(mesh.id(), bounds);
        Some(bounds)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of position-stream scans performed so far
    pub fn scan_count(&self) -> usize {
        self.scans
    }
}

#[cfg(test)]
#[path = "bounds_cache_tests.rs"]
mod tests;
