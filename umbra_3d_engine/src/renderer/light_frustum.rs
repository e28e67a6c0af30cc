/// Tight orthographic shadow frustum for a directional light
///
/// The light looks down its local -Z axis, so visible geometry has negative
/// light-space z. The fitted projection maps light-space `[min, max]` (after
/// padding) onto the clip volume, with near/far taken as `-max.z` / `-min.z`.

use glam::Mat4;
use crate::renderer::{BoundsCache, RenderEntry, AABB};

/// Padding added around the fitted light-space bounds on all three axes
pub const SHADOW_FRUSTUM_PADDING: f32 = 2.0;

/// Light-space bounds of every entry, folded from the 8 corners of each
/// object-space box
///
/// Entries whose mesh has no usable positions do not contribute. Returns
/// `None` if no entry contributed.
pub fn light_space_bounds(
    cache: &mut BoundsCache,
    entries: &[RenderEntry<'_>],
    light_view: &Mat4,
) -> Option<AABB> {
    let mut bounds: Option<AABB> = None;
    for entry in entries {
        let Some(object_bounds) = cache.object_space_bounds(entry.mesh()) else {
            continue;
        };
        let to_light = *light_view * entry.world_transform;
        for corner in object_bounds.corners() {
            let p = to_light.transform_point3(corner);
            match bounds.as_mut() {
                Some(b) => b.include(p),
                None => bounds = Some(AABB::new(p, p)),
            }
        }
    }
    bounds
}

/// Orthographic projection enclosing all `entries` as seen from `light_view`
///
/// Depth is mapped to [0, 1] like the rest of the pipeline.
pub fn fit_orthographic(
    cache: &mut BoundsCache,
    entries: &[RenderEntry<'_>],
    light_view: &Mat4,
    padding: f32,
) -> Option<Mat4> {
    let bounds = light_space_bounds(cache, entries, light_view)?.expanded(padding);
    Some(Mat4::orthographic_rh(
        bounds.min.x,
        bounds.max.x,
        bounds.min.y,
        bounds.max.y,
        -bounds.max.z,
        -bounds.min.z,
    ))
}

#[cfg(test)]
#[path = "light_frustum_tests.rs"]
mod tests;
