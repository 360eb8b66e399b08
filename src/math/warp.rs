// Copyright @yucwang 2023

use super::constants::{ Float, Vector3f };

/// Maps `u` in [0, 1)^3 to a unit direction around `normal`. The direction
/// is `normal + offset` with each offset component uniform in
/// [-spread, spread], mirrored into the hemisphere of `normal` when it
/// falls below it.
pub fn sample_offset_direction(normal: &Vector3f, u: &Vector3f, spread: Float) -> Vector3f {
    let offset = (u * 2.0 - Vector3f::new(1.0, 1.0, 1.0)) * spread;
    let mut dir = normal + offset;

    let len = dir.norm();
    if !(len > 1e-6) {
        return *normal;
    }
    dir /= len;

    let cos_theta = dir.dot(normal);
    if cos_theta < 0.0 {
        dir -= 2.0 * cos_theta * normal;
    }

    dir
}

pub fn smoothstep(edge0: Float, edge1: Float, x: Float) -> Float {
    let t = ((x - edge0) / (edge1 - edge0)).max(0.0).min(1.0);
    t * t * (3.0 - 2.0 * t)
}
