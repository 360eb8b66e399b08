// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;

const SAH_BUCKETS: usize = 12;
const MAX_LEAF_SIZE: usize = 4;

#[derive(Clone, Copy)]
enum NodeKind {
    Leaf { start: usize, count: usize },
    Interior { left: usize, right: usize },
}

#[derive(Clone, Copy)]
struct BVHNode {
    bounds: AABB,
    kind: NodeKind,
}

/// Bounding volume hierarchy over primitive indices. It only knows bounds
/// and centroids; callers test the primitives themselves in a callback.
pub struct BVH {
    nodes: Vec<BVHNode>,
    indices: Vec<usize>,
    prim_bounds: Vec<AABB>,
    prim_centroids: Vec<Vector3f>,
    max_leaf_size: usize,
}

impl BVH {
    pub fn new(prim_bounds: Vec<AABB>, prim_centroids: Vec<Vector3f>) -> Self {
        Self::with_max_leaf_size(prim_bounds, prim_centroids, MAX_LEAF_SIZE)
    }

    pub fn with_max_leaf_size(prim_bounds: Vec<AABB>,
                              prim_centroids: Vec<Vector3f>,
                              max_leaf_size: usize) -> Self {
        let prim_count = prim_bounds.len();
        let mut bvh = Self {
            nodes: Vec::with_capacity(2 * prim_count),
            indices: (0..prim_count).collect(),
            prim_bounds,
            prim_centroids,
            max_leaf_size: max_leaf_size.max(1),
        };

        if prim_count > 0 {
            let (bounds, centroid_bounds) = bvh.compute_bounds(0, prim_count);
            bvh.build(0, prim_count, bounds, centroid_bounds);
        }
        bvh
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn bounds(&self) -> AABB {
        self.nodes.first().map(|n| n.bounds).unwrap_or_default()
    }

    /// Closest hit reported by `hit_fn`. The callback sees a ray whose
    /// `max_t` has already been shortened to the best hit so far.
    pub fn ray_intersection<F, T>(&self, ray: &Ray3f, mut hit_fn: F) -> Option<(usize, T)>
    where
        F: FnMut(usize, &Ray3f) -> Option<(T, Float)>,
    {
        let mut ray = *ray;
        let mut closest = None;
        self.traverse(&mut ray, |prims, ray| {
            for &prim_idx in prims {
                if let Some((hit, t)) = hit_fn(prim_idx, ray) {
                    if ray.update(t) {
                        closest = Some((prim_idx, hit));
                    }
                }
            }
            true
        });
        closest
    }

    /// First hit the traversal meets; stops searching right away.
    pub fn ray_intersection_any<F, T>(&self, ray: &Ray3f, mut hit_fn: F) -> Option<(usize, T)>
    where
        F: FnMut(usize, &Ray3f) -> Option<T>,
    {
        let mut ray = *ray;
        let mut found = None;
        self.traverse(&mut ray, |prims, ray| {
            for &prim_idx in prims {
                if let Some(hit) = hit_fn(prim_idx, ray) {
                    found = Some((prim_idx, hit));
                    return false;
                }
            }
            true
        });
        found
    }

    // Depth-first over nodes whose box overlaps the current ray segment.
    // `visit` gets each leaf's primitives and returns false to stop.
    fn traverse<V>(&self, ray: &mut Ray3f, mut visit: V)
    where
        V: FnMut(&[usize], &mut Ray3f) -> bool,
    {
        if self.nodes.is_empty() {
            return;
        }

        let mut stack = Vec::with_capacity(64);
        stack.push(0usize);
        while let Some(node_idx) = stack.pop() {
            let node = self.nodes[node_idx];
            if !node.bounds.ray_intersect(ray) {
                continue;
            }
            match node.kind {
                NodeKind::Leaf { start, count } => {
                    if !visit(&self.indices[start..start + count], ray) {
                        return;
                    }
                }
                NodeKind::Interior { left, right } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
    }

    fn push_leaf(&mut self, bounds: AABB, start: usize, count: usize) -> usize {
        self.nodes.push(BVHNode { bounds, kind: NodeKind::Leaf { start, count } });
        self.nodes.len() - 1
    }

    fn build(&mut self, start: usize, end: usize, bounds: AABB, centroid_bounds: AABB) -> usize {
        let count = end - start;
        if count <= self.max_leaf_size {
            return self.push_leaf(bounds, start, count);
        }

        let axis = centroid_bounds.max_extent() as usize;
        let lo = centroid_bounds.p_min[axis];
        let extent = centroid_bounds.p_max[axis] - lo;
        // Coincident centroids cannot be separated by any plane.
        if extent.abs() < 1e-6 {
            return self.push_leaf(bounds, start, count);
        }

        let bucket_of = |c: Float| -> usize {
            (((c - lo) / extent * SAH_BUCKETS as Float) as usize).min(SAH_BUCKETS - 1)
        };

        let mut counts = [0usize; SAH_BUCKETS];
        let mut boxes = [AABB::default(); SAH_BUCKETS];
        for &idx in &self.indices[start..end] {
            let b = bucket_of(self.prim_centroids[idx][axis]);
            counts[b] += 1;
            boxes[b].expand_by_aabb(&self.prim_bounds[idx]);
        }

        // Suffix sweep, then a prefix sweep scoring each of the
        // SAH_BUCKETS - 1 split planes.
        let mut right_cost = [0.0 as Float; SAH_BUCKETS];
        let mut acc_box = AABB::default();
        let mut acc_count = 0usize;
        for b in (1..SAH_BUCKETS).rev() {
            acc_box.expand_by_aabb(&boxes[b]);
            acc_count += counts[b];
            if acc_count > 0 {
                right_cost[b - 1] = acc_count as Float * acc_box.surface_area();
            }
        }

        let inv_area = 1.0 / bounds.surface_area().max(1e-6);
        let mut best = (Float::MAX, 0usize);
        acc_box = AABB::default();
        acc_count = 0;
        for b in 0..(SAH_BUCKETS - 1) {
            acc_box.expand_by_aabb(&boxes[b]);
            acc_count += counts[b];
            let left_cost = if acc_count > 0 { acc_count as Float * acc_box.surface_area() } else { 0.0 };
            let cost = 1.0 + (left_cost + right_cost[b]) * inv_area;
            if cost < best.0 {
                best = (cost, b);
            }
        }
        let (best_cost, split) = best;

        if best_cost >= count as Float && count <= 4 * self.max_leaf_size {
            return self.push_leaf(bounds, start, count);
        }

        let mut mid = start;
        for i in start..end {
            if bucket_of(self.prim_centroids[self.indices[i]][axis]) <= split {
                self.indices.swap(i, mid);
                mid += 1;
            }
        }
        if mid == start || mid == end {
            return self.push_leaf(bounds, start, count);
        }

        let (left_bounds, left_centroids) = self.compute_bounds(start, mid);
        let (right_bounds, right_centroids) = self.compute_bounds(mid, end);
        // Reserve the parent slot so children land after it.
        let node_idx = self.push_leaf(bounds, 0, 0);
        let left = self.build(start, mid, left_bounds, left_centroids);
        let right = self.build(mid, end, right_bounds, right_centroids);
        self.nodes[node_idx].kind = NodeKind::Interior { left, right };
        node_idx
    }

    fn compute_bounds(&self, start: usize, end: usize) -> (AABB, AABB) {
        self.indices[start..end].iter().fold(
            (AABB::default(), AABB::default()),
            |(mut bounds, mut centroids), &idx| {
                bounds.expand_by_aabb(&self.prim_bounds[idx]);
                centroids.expand_by_point(&self.prim_centroids[idx]);
                (bounds, centroids)
            },
        )
    }
}
