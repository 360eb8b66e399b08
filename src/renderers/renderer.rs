// Copyright @yucwang 2021

use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;

/// A rendering backend. Returns the finished render target, which stays
/// untouched until the next call.
pub trait Renderer {
    fn render(&mut self, camera: &dyn Sensor) -> &Bitmap;
}
