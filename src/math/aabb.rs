// Copyright 2020 @TwoCookingMice

use super::constants::{ Int, Float, Vector3f,
                       FLOAT_MIN, FLOAT_MAX };
use super::ray::{ Ray3f };

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub p_min: Vector3f,
    pub p_max: Vector3f
}

impl Default for AABB {
    fn default() -> Self {
        Self { p_min: Vector3f::new(FLOAT_MAX, FLOAT_MAX, FLOAT_MAX),
               p_max: Vector3f::new(FLOAT_MIN, FLOAT_MIN, FLOAT_MIN) }
    }
}

impl AABB {
    pub fn new(p_min: Vector3f, p_max: Vector3f) -> Self {
        Self { p_min: p_min.inf(&p_max), p_max: p_max.sup(&p_min) }
    }

    pub fn center(&self) -> Vector3f {
        0.5f32 * self.p_min + 0.5f32 * self.p_max
    }

    pub fn expand_by_point(&mut self, p: &Vector3f) {
        self.p_min = self.p_min.inf(p);
        self.p_max = self.p_max.sup(p);
    }

    pub fn expand_by_aabb(&mut self, other: &AABB) {
        self.p_min = self.p_min.inf(&other.p_min);
        self.p_max = self.p_max.sup(&other.p_max);
    }

    /// Slab test against the ray's `[min_t, max_t]`. A ray parallel to an
    /// axis only needs its origin inside that slab, so zero-thickness boxes
    /// from flat triangles still work.
    pub fn ray_intersect(&self, ray: &Ray3f) -> bool {
        if !self.is_valid() {
            return false;
        }

        let (o, d) = (ray.origin(), ray.dir());
        let (mut enter, mut exit) = (ray.min_t, ray.max_t);
        for axis in 0..3 {
            let lo = self.p_min[axis] - o[axis];
            let hi = self.p_max[axis] - o[axis];
            if d[axis].abs() < 1e-8 {
                if lo > 0.0 || hi < 0.0 {
                    return false;
                }
                continue;
            }

            let inv = d[axis].recip();
            let (near, far) = if inv >= 0.0 { (lo * inv, hi * inv) } else { (hi * inv, lo * inv) };
            enter = enter.max(near);
            exit = exit.min(far);
            if exit < enter {
                return false;
            }
        }
        true
    }

    pub fn surface_area(&self) -> Float {
        let d = self.diagonal();
        2.0f32 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    pub fn max_extent(&self) -> Int {
        let diagonal = self.diagonal();
        if diagonal[0] > diagonal[1] && diagonal[0] > diagonal[2] {
            0
        } else if diagonal[1] > diagonal[2] {
            1
        } else {
            2
        }
    }

    pub fn is_valid(&self) -> bool {
        (0..3).all(|idx| self.p_min[idx] <= self.p_max[idx])
    }
}

/* Test for AABB */
