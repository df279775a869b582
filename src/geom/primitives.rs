//! Stateless geometry helpers shared by every collision provider

use glam::Vec2;
use std::f32::consts::TAU;

/// Even-odd (ray casting) containment test
///
/// Casts a ray toward +x and counts edge crossings. Ties are broken with a
/// half-open rule so results stay consistent across calls:
/// - an edge counts only when exactly one endpoint has `y > point.y`
///   (horizontal edges never count)
/// - the crossing must lie strictly right of the point
///
/// For an axis-aligned rectangle this puts the min-x and min-y edges inside
/// and the max-x and max-y edges outside.
pub fn point_in_polygon(point: Vec2, vertices: &[Vec2]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[j];
        // Crossing test guarantees a.y != b.y, so the division is safe
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Shortest distance from `point` to the segment `a`-`b`
///
/// The projection is clamped to the segment, so points beyond either end
/// measure to the nearest endpoint. A zero-length segment measures to `a`.
pub fn distance_point_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq == 0.0 {
        return point.distance(a);
    }

    let t = ((point - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}

/// Points evenly spaced by angle around `center`, starting at angle 0
pub fn sample_circle_points(center: Vec2, radius: f32, count: usize) -> Vec<Vec2> {
    circle_points(center, radius, count).collect()
}

/// Allocation-free form of [`sample_circle_points`] for hot query paths
pub(crate) fn circle_points(
    center: Vec2,
    radius: f32,
    count: usize,
) -> impl Iterator<Item = Vec2> {
    let step = if count == 0 { 0.0 } else { TAU / count as f32 };
    (0..count).map(move |i| {
        let angle = step * i as f32;
        center + Vec2::new(angle.cos(), angle.sin()) * radius
    })
}

/// Twice the signed area of a closed outline (shoelace formula)
pub(crate) fn signed_area_x2(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum()
}
