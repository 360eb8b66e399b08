// Copyright @yucwang 2026

use crate::math::constants::{Vector2f, Vector3f};
use crate::math::ray::Ray3f;

pub trait Sensor: Sync {
    /// Primary ray through film position `u` in [0, 1]^2, top-left origin.
    fn sample_ray(&self, u: &Vector2f) -> Ray3f;
    fn position(&self) -> Vector3f;
    fn direction(&self) -> Vector3f;
    fn right(&self) -> Vector3f;
    fn up(&self) -> Vector3f;
    fn describe(&self) -> String {
        String::from("Sensor")
    }
}
