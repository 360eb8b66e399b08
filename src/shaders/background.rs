// Copyright @yucwang 2026

use crate::core::payload::Payload;
use crate::math::constants::Vector3f;
use crate::math::ray::Ray3f;
use crate::math::warp::smoothstep;

/// Miss policy shared by the shipped shaders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Black,
    Constant(Vector3f),
    /// Ground-to-sky blend on the ray's vertical component.
    SkyGradient,
}

impl Default for Background {
    fn default() -> Self {
        Background::Black
    }
}

impl Background {
    pub fn color(&self, ray: &Ray3f) -> Vector3f {
        match self {
            Background::Black => Vector3f::zeros(),
            Background::Constant(c) => *c,
            Background::SkyGradient => {
                let ground = Vector3f::new(0.8, 0.7, 0.7);
                let sky = Vector3f::new(77.0, 174.0, 219.0) / 255.0;
                let t = smoothstep(0.0, 0.5, ray.dir().y + 0.5);
                ground * (1.0 - t) + sky * t
            }
        }
    }

    pub fn miss(&self, ray: &Ray3f) -> Payload {
        Payload::with_color(self.color(ray))
    }
}
