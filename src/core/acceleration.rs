// Copyright @yucwang 2026

use crate::core::bvh::BVH;
use crate::core::error::{RenderError, Result};
use crate::core::geometry::GeometryBuffer;
use crate::core::payload::Payload;
use crate::math::aabb::AABB;
use crate::math::ray::Ray3f;
use crate::shapes::triangle::Triangle;

/// Nearest or first intersection found by a query.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub payload: Payload,
    pub triangle: &'a Triangle,
}

/// Read-only triangle index shared by every tracer of a render. There is no
/// `&mut self` method: once built it can only be queried.
pub struct AccelerationStructure {
    triangles: Vec<Triangle>,
    bvh: BVH,
}

impl AccelerationStructure {
    pub fn build(geometry: &GeometryBuffer) -> Result<Self> {
        let mut triangles: Vec<Triangle> = Vec::new();
        triangles
            .try_reserve_exact(geometry.triangle_count())
            .map_err(|e| RenderError::Allocation(format!("{} triangles: {}", geometry.triangle_count(), e)))?;

        let mut skipped = 0usize;
        for (shape_idx, shape) in geometry.shapes().iter().enumerate() {
            if shape.indices.len() % 3 != 0 {
                log::warn!("Shape {} has {} indices, dropping the trailing partial triangle.",
                           shape_idx, shape.indices.len());
            }

            let vertex_count = shape.vertices.len();
            let vertex = |index: u32| {
                shape.vertices.get(index as usize).ok_or_else(|| RenderError::InvalidGeometry {
                    shape: shape_idx,
                    index: index as usize,
                    vertex_count,
                })
            };

            for face in shape.indices.chunks_exact(3) {
                let tri = Triangle::from_vertices(vertex(face[0])?, vertex(face[1])?, vertex(face[2])?);
                if tri.is_degenerate() {
                    skipped += 1;
                    continue;
                }
                triangles.push(tri);
            }
        }
        if skipped > 0 {
            log::debug!("Skipped {} degenerate triangles.", skipped);
        }

        Ok(Self::from_triangles(triangles))
    }

    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let mut prim_bounds = Vec::with_capacity(triangles.len());
        let mut prim_centroids = Vec::with_capacity(triangles.len());
        for tri in &triangles {
            let bounds = tri.bounding_box();
            prim_centroids.push(bounds.center());
            prim_bounds.push(bounds);
        }

        let bvh = BVH::new(prim_bounds, prim_centroids);
        log::info!("Acceleration structure built: {} triangles, {} BVH nodes.",
                   triangles.len(), bvh.node_count());

        Self { triangles, bvh }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn bounds(&self) -> AABB {
        self.bvh.bounds()
    }

    pub fn intersect_closest(&self, ray: &Ray3f) -> Option<Hit<'_>> {
        self.bvh
            .ray_intersection(ray, |prim_idx, ray| {
                self.triangles[prim_idx].ray_intersection(ray).map(|hit| (hit, hit.0))
            })
            .map(|(idx, (t, bary))| Hit { payload: Payload::hit(t, bary), triangle: &self.triangles[idx] })
    }

    pub fn intersect_any(&self, ray: &Ray3f) -> Option<Hit<'_>> {
        self.bvh
            .ray_intersection_any(ray, |prim_idx, ray| self.triangles[prim_idx].ray_intersection(ray))
            .map(|(idx, (t, bary))| Hit { payload: Payload::hit(t, bary), triangle: &self.triangles[idx] })
    }

    pub fn is_occluded(&self, ray: &Ray3f) -> bool {
        self.intersect_any(ray).is_some()
    }
}
