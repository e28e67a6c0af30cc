/// Rasterizer - triangle scan conversion for the software backend
///
/// Clip-space triangles are mapped through the viewport and covered with edge
/// functions evaluated at pixel centers, using the top-left fill rule so
/// adjacent triangles never cover a pixel twice. Attributes are interpolated
/// with perspective-correct barycentrics; depth is interpolated linearly in
/// screen space. Fragments outside the [0, 1] depth range are discarded.
///
/// Before the perspective divide, triangles are clipped against the near
/// plane (`z >= 0`) and the eye plane (`w >= MIN_CLIP_W`), so geometry
/// crossing the camera keeps its visible part.
///
/// Pixel rows are counted from the bottom of the surface.

use glam::{Vec2, Vec3, Vec4};
use umbra_3d_engine::umbra3d::device::Viewport;

/// Smallest clip-space w kept after clipping
const MIN_CLIP_W: f32 = 1e-5;

/// Per-vertex attributes handed to fragment shading
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Varyings {
    pub world: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Varyings {
    fn weighted(a: &Self, b: &Self, c: &Self, w: [f32; 3]) -> Self {
        Self {
            world: a.world * w[0] + b.world * w[1] + c.world * w[2],
            normal: a.normal * w[0] + b.normal * w[1] + c.normal * w[2],
            uv: a.uv * w[0] + b.uv * w[1] + c.uv * w[2],
        }
    }

    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            world: self.world.lerp(other.world, t),
            normal: self.normal.lerp(other.normal, t),
            uv: self.uv.lerp(other.uv, t),
        }
    }
}

/// Vertex after the vertex stage
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClipVertex {
    pub clip: Vec4,
    pub varyings: Varyings,
}

impl ClipVertex {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            clip: self.clip.lerp(other.clip, t),
            varyings: self.varyings.lerp(&other.varyings, t),
        }
    }
}

fn near_plane_distance(clip: &Vec4) -> f32 {
    clip.z
}

fn eye_plane_distance(clip: &Vec4) -> f32 {
    clip.w - MIN_CLIP_W
}

/// Signed distances to the clip planes; a vertex is kept when all are >= 0
const CLIP_PLANES: [fn(&Vec4) -> f32; 2] = [near_plane_distance, eye_plane_distance];

/// A covered pixel
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fragment {
    pub x: u32,
    pub y: u32,
    pub depth: f32,
    pub varyings: Varyings,
}

struct ScreenVertex {
    position: Vec2,
    depth: f32,
    inv_w: f32,
}

fn to_screen(vertex: &ClipVertex, viewport: &Viewport) -> Option<ScreenVertex> {
    let w = vertex.clip.w;
    if w <= 0.0 {
        return None;
    }
    let ndc = vertex.clip.truncate() / w;
    Some(ScreenVertex {
        position: Vec2::new(
            viewport.x as f32 + (ndc.x * 0.5 + 0.5) * viewport.width as f32,
            viewport.y as f32 + (ndc.y * 0.5 + 0.5) * viewport.height as f32,
        ),
        depth: ndc.z,
        inv_w: 1.0 / w,
    })
}

/// Signed doubled area of (a, b, p); positive when p is left of a -> b
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Top or left edge of a counter-clockwise triangle (y up)
fn is_top_left(a: Vec2, b: Vec2) -> bool {
    let d = b - a;
    d.y < 0.0 || (d.y == 0.0 && d.x < 0.0)
}

fn covers(weight: f32, top_left: bool) -> bool {
    weight > 0.0 || (weight == 0.0 && top_left)
}

/// Emit every fragment of one triangle inside the viewport and the surface
///
/// Both windings are rasterized. A triangle partly behind the near plane is
/// clipped to a polygon and rasterized as a fan.
pub(crate) fn rasterize_triangle<F>(
    triangle: [&ClipVertex; 3],
    viewport: &Viewport,
    surface: (u32, u32),
    mut emit: F,
) where
    F: FnMut(Fragment),
{
    let inside = |v: &ClipVertex| CLIP_PLANES.iter().all(|plane| plane(&v.clip) >= 0.0);
    if triangle.iter().all(|v| inside(*v)) {
        rasterize_clipped(triangle, viewport, surface, &mut emit);
        return;
    }

    let mut polygon: Vec<ClipVertex> = triangle.iter().map(|v| **v).collect();
    for plane in CLIP_PLANES {
        polygon = clip_polygon(&polygon, plane);
        if polygon.len() < 3 {
            return;
        }
    }
    for i in 1..polygon.len() - 1 {
        rasterize_clipped([&polygon[0], &polygon[i], &polygon[i + 1]], viewport, surface, &mut emit);
    }
}

/// Sutherland-Hodgman against one plane, interpolating in clip space
fn clip_polygon(polygon: &[ClipVertex], distance: fn(&Vec4) -> f32) -> Vec<ClipVertex> {
    let mut out = Vec::with_capacity(polygon.len() + 1);
    for (i, current) in polygon.iter().enumerate() {
        let next = &polygon[(i + 1) % polygon.len()];
        let (d_current, d_next) = (distance(&current.clip), distance(&next.clip));
        if d_current >= 0.0 {
            out.push(*current);
        }
        if (d_current >= 0.0) != (d_next >= 0.0) {
            out.push(current.lerp(next, d_current / (d_current - d_next)));
        }
    }
    out
}

fn rasterize_clipped<F>(
    triangle: [&ClipVertex; 3],
    viewport: &Viewport,
    surface: (u32, u32),
    emit: &mut F,
) where
    F: FnMut(Fragment),
{
    let [Some(s0), Some(mut s1), Some(mut s2)] = triangle.map(|v| to_screen(v, viewport)) else {
        return;
    };
    let [v0, mut v1, mut v2] = triangle;

    let mut area = edge(s0.position, s1.position, s2.position);
    if area == 0.0 {
        return;
    }
    if area < 0.0 {
        std::mem::swap(&mut s1, &mut s2);
        std::mem::swap(&mut v1, &mut v2);
        area = -area;
    }

    let min_x = viewport.x.max(0) as f32;
    let min_y = viewport.y.max(0) as f32;
    let max_x = ((viewport.x + viewport.width as i32) as f32).min(surface.0 as f32);
    let max_y = ((viewport.y + viewport.height as i32) as f32).min(surface.1 as f32);

    let lo = s0.position.min(s1.position).min(s2.position);
    let hi = s0.position.max(s1.position).max(s2.position);
    let x_start = lo.x.floor().max(min_x) as i64;
    let y_start = lo.y.floor().max(min_y) as i64;
    let x_end = hi.x.ceil().min(max_x) as i64;
    let y_end = hi.y.ceil().min(max_y) as i64;

    let top_left = [
        is_top_left(s1.position, s2.position),
        is_top_left(s2.position, s0.position),
        is_top_left(s0.position, s1.position),
    ];

    for y in y_start..y_end {
        for x in x_start..x_end {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(s1.position, s2.position, p);
            let w1 = edge(s2.position, s0.position, p);
            let w2 = edge(s0.position, s1.position, p);
            if !(covers(w0, top_left[0]) && covers(w1, top_left[1]) && covers(w2, top_left[2])) {
                continue;
            }

            let screen = [w0 / area, w1 / area, w2 / area];
            let depth = screen[0] * s0.depth + screen[1] * s1.depth + screen[2] * s2.depth;
            if !(0.0..=1.0).contains(&depth) {
                continue;
            }

            let persp = [
                screen[0] * s0.inv_w,
                screen[1] * s1.inv_w,
                screen[2] * s2.inv_w,
            ];
            let sum = persp[0] + persp[1] + persp[2];
            let weights = [persp[0] / sum, persp[1] / sum, persp[2] / sum];

            emit(Fragment {
                x: x as u32,
                y: y as u32,
                depth,
                varyings: Varyings::weighted(&v0.varyings, &v1.varyings, &v2.varyings, weights),
            });
        }
    }
}

#[cfg(test)]
#[path = "rasterizer_tests.rs"]
mod tests;
