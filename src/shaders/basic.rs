// Copyright @yucwang 2026

use super::background::Background;
use crate::core::payload::Payload;
use crate::core::shader::{Shader, TraceContext};
use crate::math::constants::Vector3f;
use crate::math::ray::Ray3f;
use crate::shapes::triangle::Triangle;

/// Hit color is the triangle's emissive term, untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmissiveShader {
    pub background: Background,
}

impl Shader for EmissiveShader {
    fn miss(&self, ray: &Ray3f) -> Payload {
        self.background.miss(ray)
    }

    fn closest_hit(&self, _ctx: &mut TraceContext<'_>, _ray: &Ray3f,
                   mut payload: Payload, triangle: &Triangle, _depth: u32) -> Payload {
        payload.color = triangle.emissive;
        payload
    }
}

/// Same color for every ray.
#[derive(Debug, Clone, Copy)]
pub struct ConstantShader {
    pub color: Vector3f,
}

impl Shader for ConstantShader {
    fn miss(&self, _ray: &Ray3f) -> Payload {
        Payload::with_color(self.color)
    }

    fn closest_hit(&self, _ctx: &mut TraceContext<'_>, _ray: &Ray3f,
                   mut payload: Payload, _triangle: &Triangle, _depth: u32) -> Payload {
        payload.color = self.color;
        payload
    }
}

/// Policy for shadow tracers: only whether something was hit matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityShader;

impl Shader for VisibilityShader {
    fn miss(&self, _ray: &Ray3f) -> Payload {
        Payload::miss()
    }

    fn closest_hit(&self, _ctx: &mut TraceContext<'_>, _ray: &Ray3f,
                   payload: Payload, _triangle: &Triangle, _depth: u32) -> Payload {
        payload
    }

    fn any_hit(&self, _ray: &Ray3f, payload: Payload, _triangle: &Triangle) -> Payload {
        payload
    }
}
