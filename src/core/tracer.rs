// Copyright @yucwang 2026

use crate::core::acceleration::AccelerationStructure;
use crate::core::payload::Payload;
use crate::core::rng::LcgRng;
use crate::core::shader::{Shader, Trace, TraceContext};
use crate::math::ray::Ray3f;

use std::sync::Arc;

/// Hard ceiling on recursion, whatever the configuration asks for.
pub const MAX_TRACE_DEPTH: u32 = 8;

pub struct RayTracer<S> {
    index: Arc<AccelerationStructure>,
    shader: S,
    max_depth: u32,
}

impl<S: Shader> RayTracer<S> {
    pub fn new(index: Arc<AccelerationStructure>, shader: S, max_depth: u32) -> Self {
        Self { index, shader, max_depth: max_depth.min(MAX_TRACE_DEPTH) }
    }

    /// Another tracer over the same index, e.g. a visibility-only one.
    pub fn with_shader<T: Shader>(&self, shader: T) -> RayTracer<T> {
        RayTracer::new(Arc::clone(&self.index), shader, self.max_depth)
    }

    pub fn index(&self) -> &Arc<AccelerationStructure> {
        &self.index
    }

    pub fn shader(&self) -> &S {
        &self.shader
    }
}

impl<S: Shader> Trace for RayTracer<S> {
    fn trace_ray(&self, ray: &Ray3f, depth: u32, rng: &mut LcgRng) -> Payload {
        if depth > self.max_depth {
            return self.shader.miss(ray);
        }

        match self.index.intersect_closest(ray) {
            Some(hit) => {
                let mut ctx = TraceContext::new(self, rng);
                self.shader.closest_hit(&mut ctx, ray, hit.payload, hit.triangle, depth)
            }
            None => self.shader.miss(ray),
        }
    }

    fn trace_shadow_ray(&self, ray: &Ray3f) -> Payload {
        match self.index.intersect_any(ray) {
            Some(hit) => self.shader.any_hit(ray, hit.payload, hit.triangle),
            None => self.shader.miss(ray),
        }
    }

    fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
