// Copyright @yucwang 2026

use super::background::Background;
use super::basic::VisibilityShader;
use crate::core::payload::Payload;
use crate::core::shader::{Shader, Trace, TraceContext};
use crate::core::tracer::RayTracer;
use crate::math::constants::{Float, Vector3f, RAY_OFFSET};
use crate::math::ray::Ray3f;
use crate::math::spectrum::is_black;
use crate::math::warp::sample_offset_direction;
use crate::shapes::triangle::Triangle;

pub const DEFAULT_SAMPLES: usize = 10;
pub const DEFAULT_SPREAD: Float = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3f,
    pub color: Vector3f,
}

impl PointLight {
    pub fn new(position: Vector3f, color: Vector3f) -> Self {
        Self { position, color }
    }
}

/// Emissive term plus a Monte Carlo estimate of light arriving from the
/// hemisphere around the shading normal, and optional point lights tested
/// with shadow rays.
pub struct DirectLightShader {
    background: Background,
    samples: usize,
    spread: Float,
    lights: Vec<PointLight>,
    shadow_tracer: Option<RayTracer<VisibilityShader>>,
}

impl Default for DirectLightShader {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLES)
    }
}

impl DirectLightShader {
    pub fn new(samples: usize) -> Self {
        Self {
            background: Background::Black,
            samples,
            spread: DEFAULT_SPREAD,
            lights: Vec::new(),
            shadow_tracer: None,
        }
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn with_spread(mut self, spread: Float) -> Self {
        self.spread = spread.max(0.0);
        self
    }

    pub fn with_lights(mut self, lights: Vec<PointLight>) -> Self {
        self.lights = lights;
        self
    }

    /// Without one, shadow rays go through the calling tracer.
    pub fn with_shadow_tracer(mut self, tracer: RayTracer<VisibilityShader>) -> Self {
        self.shadow_tracer = Some(tracer);
        self
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    fn occluded(&self, ctx: &TraceContext<'_>, ray: &Ray3f) -> bool {
        let payload = match &self.shadow_tracer {
            Some(tracer) => tracer.trace_shadow_ray(ray),
            None => ctx.trace_shadow_ray(ray),
        };
        !payload.is_miss()
    }
}

impl Shader for DirectLightShader {
    fn miss(&self, ray: &Ray3f) -> Payload {
        self.background.miss(ray)
    }

    fn closest_hit(&self,
                   ctx: &mut TraceContext<'_>,
                   ray: &Ray3f,
                   mut payload: Payload,
                   triangle: &Triangle,
                   depth: u32) -> Payload {
        let position = ray.at(payload.t);
        let mut normal = triangle.interpolate_normal(&payload.bary);
        if normal.dot(&triangle.geometric_normal()) < 0.0 {
            normal = -normal;
        }
        let origin = position + normal * RAY_OFFSET;

        let mut color = triangle.emissive;

        if ctx.can_recurse(depth) {
            for _ in 0..self.samples {
                let u = ctx.rng().next_vector3();
                let direction = sample_offset_direction(&normal, &u, self.spread);
                let sample_ray = Ray3f::new(origin, direction, None, None);
                let incoming = ctx.trace_ray(&sample_ray, depth + 1);
                color += triangle.diffuse.component_mul(&incoming.color) * normal.dot(&direction).max(0.0);
            }
        }

        for light in self.lights.iter().filter(|l| !is_black(&l.color)) {
            let to_light = light.position - origin;
            let distance = to_light.norm();
            if !(distance > RAY_OFFSET) {
                continue;
            }
            let direction = to_light / distance;
            let cos_theta = normal.dot(&direction);
            if cos_theta <= 0.0 {
                continue;
            }
            let shadow_ray = Ray3f::new(origin, direction, None, Some(distance));
            if !self.occluded(ctx, &shadow_ray) {
                color += triangle.diffuse.component_mul(&light.color) * cos_theta;
            }
        }

        payload.color = color;
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::acceleration::AccelerationStructure;
    use crate::core::rng::LcgRng;
    use std::sync::Arc;

    // Large floor in the y = 0 plane facing +y.
    fn floor() -> Triangle {
        Triangle::new(Vector3f::new(-100.0, 0.0, -100.0),
                      Vector3f::new(0.0, 0.0, 100.0),
                      Vector3f::new(100.0, 0.0, -100.0))
            .with_diffuse(Vector3f::new(0.5, 0.5, 0.5))
            .with_emissive(Vector3f::new(0.1, 0.0, 0.0))
    }

    // Small blocker facing down, between the floor and a light at y = 4.
    fn blocker() -> Triangle {
        Triangle::new(Vector3f::new(-1.0, 2.0, -1.0),
                      Vector3f::new(1.0, 2.0, -1.0),
                      Vector3f::new(0.0, 2.0, 1.0))
    }

    fn down_ray() -> Ray3f {
        Ray3f::new(Vector3f::new(0.0, 5.0, 0.0), Vector3f::new(0.0, -1.0, 0.0), None, None)
    }

    #[test]
    fn test_floor_faces_up() {
        assert!(floor().geometric_normal().y > 0.99);
        assert!(blocker().geometric_normal().y < -0.99);
    }

    #[test]
    fn test_open_sky_estimate() {
        let index = Arc::new(AccelerationStructure::from_triangles(vec![floor()]));
        let white = Vector3f::new(1.0, 1.0, 1.0);
        let shader = DirectLightShader::new(10).with_background(Background::Constant(white));
        let tracer = RayTracer::new(index, shader, 1);
        let mut rng = LcgRng::new(3);

        let payload = tracer.trace_ray(&down_ray(), 0, &mut rng);
        assert!((payload.t - 5.0).abs() < 1e-4);
        // Every sample escapes: emissive + 10 * 0.5 * cos, cos in (0, 1].
        let lit = payload.color - Vector3f::new(0.1, 0.0, 0.0);
        assert!(lit.y > 0.0 && lit.y <= 5.0 + 1e-4);
        assert!((lit.x - lit.y).abs() < 1e-5);
    }

    #[test]
    fn test_zero_spread_samples_along_normal() {
        let index = Arc::new(AccelerationStructure::from_triangles(vec![floor()]));
        let shader = DirectLightShader::new(10)
            .with_spread(0.0)
            .with_background(Background::Constant(Vector3f::new(1.0, 1.0, 1.0)));
        let tracer = RayTracer::new(index, shader, 1);
        let mut rng = LcgRng::new(3);
        let color = tracer.trace_ray(&down_ray(), 0, &mut rng).color;
        assert!((color - Vector3f::new(5.1, 5.0, 5.0)).norm() < 1e-4);
    }

    #[test]
    fn test_depth_limit_leaves_only_emission() {
        let index = Arc::new(AccelerationStructure::from_triangles(vec![floor()]));
        let shader = DirectLightShader::new(10).with_background(Background::Constant(Vector3f::new(1.0, 1.0, 1.0)));
        let tracer = RayTracer::new(index, shader, 0);
        let mut rng = LcgRng::new(3);
        let payload = tracer.trace_ray(&down_ray(), 0, &mut rng);
        assert_eq!(payload.color, Vector3f::new(0.1, 0.0, 0.0));
    }

    #[test]
    fn test_point_light_shadowing() {
        let light = PointLight::new(Vector3f::new(0.0, 4.0, 0.0), Vector3f::new(1.0, 1.0, 1.0));
        let lit_index = Arc::new(AccelerationStructure::from_triangles(vec![floor()]));
        let shadowed_index = Arc::new(AccelerationStructure::from_triangles(vec![floor(), blocker()]));

        let lit = RayTracer::new(lit_index, DirectLightShader::new(0).with_lights(vec![light]), 1);
        let shadowed_tracer = RayTracer::new(Arc::clone(&shadowed_index), VisibilityShader, 1);
        let shadowed = RayTracer::new(shadowed_index,
                                      DirectLightShader::new(0)
                                          .with_lights(vec![light])
                                          .with_shadow_tracer(shadowed_tracer),
                                      1);

        let mut rng = LcgRng::new(9);
        let lit_color = lit.trace_ray(&down_ray(), 0, &mut rng).color;
        assert!((lit_color - Vector3f::new(0.6, 0.5, 0.5)).norm() < 1e-4);

        // The down ray passes the blocker from behind, so only the floor is hit.
        let shadowed_color = shadowed.trace_ray(&down_ray(), 0, &mut rng).color;
        assert_eq!(shadowed_color, Vector3f::new(0.1, 0.0, 0.0));
    }

    #[test]
    fn test_point_light_without_dedicated_shadow_tracer() {
        let light = PointLight::new(Vector3f::new(0.0, 4.0, 0.0), Vector3f::new(1.0, 1.0, 1.0));
        let index = Arc::new(AccelerationStructure::from_triangles(vec![floor(), blocker()]));
        let tracer = RayTracer::new(index, DirectLightShader::new(0).with_lights(vec![light]), 1);
        let mut rng = LcgRng::new(9);
        assert_eq!(tracer.trace_ray(&down_ray(), 0, &mut rng).color, Vector3f::new(0.1, 0.0, 0.0));
    }
}
