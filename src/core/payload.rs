// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};

pub const MISS_T: Float = -1.0;

/// Per-ray result carried through one `trace_ray` call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Payload {
    pub t: Float,
    pub bary: Vector3f,
    pub color: Vector3f,
}

impl Default for Payload {
    fn default() -> Self {
        Self { t: MISS_T, bary: Vector3f::zeros(), color: Vector3f::zeros() }
    }
}

impl Payload {
    pub fn miss() -> Self {
        Self::default()
    }

    pub fn with_color(color: Vector3f) -> Self {
        Self { color, ..Self::default() }
    }

    pub fn hit(t: Float, bary: Vector3f) -> Self {
        Self { t, bary, color: Vector3f::zeros() }
    }

    pub fn is_miss(&self) -> bool {
        self.t < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_miss() {
        let p = Payload::default();
        assert_eq!(p.t, MISS_T);
        assert!(p.is_miss());
        assert!(!Payload::hit(2.0, Vector3f::new(1.0, 0.0, 0.0)).is_miss());
    }
}
