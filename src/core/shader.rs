// Copyright @yucwang 2026

use crate::core::payload::Payload;
use crate::core::rng::LcgRng;
use crate::math::ray::Ray3f;
use crate::shapes::triangle::Triangle;

/// Callback set invoked by a tracer. `miss` gets no trace context, so it
/// cannot spawn rays.
pub trait Shader: Send + Sync {
    fn miss(&self, ray: &Ray3f) -> Payload;

    fn closest_hit(&self,
                   ctx: &mut TraceContext<'_>,
                   ray: &Ray3f,
                   payload: Payload,
                   triangle: &Triangle,
                   depth: u32) -> Payload;

    fn any_hit(&self, _ray: &Ray3f, payload: Payload, _triangle: &Triangle) -> Payload {
        payload
    }
}

/// What a shader may call back into.
pub trait Trace: Sync {
    fn trace_ray(&self, ray: &Ray3f, depth: u32, rng: &mut LcgRng) -> Payload;
    fn trace_shadow_ray(&self, ray: &Ray3f) -> Payload;
    fn max_depth(&self) -> u32;
}

pub struct TraceContext<'a> {
    tracer: &'a dyn Trace,
    rng: &'a mut LcgRng,
}

impl<'a> TraceContext<'a> {
    pub fn new(tracer: &'a dyn Trace, rng: &'a mut LcgRng) -> Self {
        Self { tracer, rng }
    }

    pub fn trace_ray(&mut self, ray: &Ray3f, depth: u32) -> Payload {
        self.tracer.trace_ray(ray, depth, &mut *self.rng)
    }

    pub fn trace_shadow_ray(&self, ray: &Ray3f) -> Payload {
        self.tracer.trace_shadow_ray(ray)
    }

    /// Whether a ray spawned at `depth + 1` would still be traced.
    pub fn can_recurse(&self, depth: u32) -> bool {
        depth < self.tracer.max_depth()
    }

    pub fn rng(&mut self) -> &mut LcgRng {
        self.rng
    }
}
