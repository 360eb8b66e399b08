// Copyright @yucwang 2023

use crate::core::geometry::Vertex;
use crate::math::aabb::AABB;
use crate::math::constants::{ DET_EPSILON, T_EPSILON, Float, Vector3f };
use crate::math::ray::Ray3f;

#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub a: Vector3f,
    pub b: Vector3f,
    pub c: Vector3f,

    pub na: Vector3f,
    pub nb: Vector3f,
    pub nc: Vector3f,

    pub ambient: Vector3f,
    pub diffuse: Vector3f,
    pub emissive: Vector3f,
}

impl Triangle {
    pub fn new(new_a: Vector3f, new_b: Vector3f, new_c: Vector3f) -> Self {
        let n = (new_b - new_a).cross(&(new_c - new_a));
        let n = if n.norm() > 0.0 { n.normalize() } else { Vector3f::new(0.0, 0.0, 1.0) };
        Triangle {
            a: new_a,
            b: new_b,
            c: new_c,
            na: n,
            nb: n,
            nc: n,
            ambient: Vector3f::zeros(),
            diffuse: Vector3f::zeros(),
            emissive: Vector3f::zeros(),
        }
    }

    pub fn from_vertices(va: &Vertex, vb: &Vertex, vc: &Vertex) -> Self {
        Triangle {
            a: va.position,
            b: vb.position,
            c: vc.position,
            na: va.normal,
            nb: vb.normal,
            nc: vc.normal,
            ambient: (va.ambient + vb.ambient + vc.ambient) / 3.0,
            diffuse: (va.diffuse + vb.diffuse + vc.diffuse) / 3.0,
            emissive: (va.emissive + vb.emissive + vc.emissive) / 3.0,
        }
    }

    pub fn with_emissive(mut self, emissive: Vector3f) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_diffuse(mut self, diffuse: Vector3f) -> Self {
        self.diffuse = diffuse;
        self
    }

    pub fn bounding_box(&self) -> AABB {
        let mut bound = AABB::new(self.a, self.b);
        bound.expand_by_point(&self.c);

        bound
    }

    /// Unnormalized; its length is twice the area. Counter-clockwise
    /// winding faces this way.
    pub fn face_normal(&self) -> Vector3f {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    pub fn geometric_normal(&self) -> Vector3f {
        self.face_normal().normalize()
    }

    pub fn surface_area(&self) -> Float {
        0.5 * self.face_normal().norm()
    }

    pub fn is_degenerate(&self) -> bool {
        let area = self.surface_area();
        !(area > 0.0) || !area.is_finite()
    }

    /// Shading normal at barycentric `bary` (weights of a, b, c).
    pub fn interpolate_normal(&self, bary: &Vector3f) -> Vector3f {
        let n = self.na * bary.x + self.nb * bary.y + self.nc * bary.z;
        let len = n.norm();
        if len > 1e-8 && len.is_finite() {
            n / len
        } else {
            self.geometric_normal()
        }
    }

    /// Möller-Trumbore. Returns `(t, bary)` with `bary` the weights of
    /// a, b, c. Only front faces (counter-clockwise as seen by the ray) are
    /// hit; back faces, parallel rays and zero-area triangles all fall under
    /// `det < DET_EPSILON`. Edges and vertices count as inside.
    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<(Float, Vector3f)> {
        let edge0 = self.b - self.a;
        let edge1 = self.c - self.a;
        let dir = ray.dir();

        let pvec = dir.cross(&edge1);
        let det = edge0.dot(&pvec);
        if !(det >= DET_EPSILON) {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.origin() - self.a;
        let u = tvec.dot(&pvec) * inv_det;
        if u < 0.0 || u > 1.0 {
            return None;
        }

        let qvec = tvec.cross(&edge0);
        let v = dir.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge1.dot(&qvec) * inv_det;
        if !(t > T_EPSILON) || !ray.test_segment(t) {
            return None;
        }

        Some((t, Vector3f::new(1.0 - u - v, u, v)))
    }

    pub fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.ray_intersection(ray).is_some()
    }
}
