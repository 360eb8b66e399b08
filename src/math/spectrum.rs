// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

/// 8-bit-per-channel color handed to output sinks.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct UnsignedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl UnsignedColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Clamps each channel to [0, 1] and rounds to the nearest 8-bit step.
    /// NaN maps to zero.
    pub fn from_float3(rgb: &Vector3f) -> Self {
        Self {
            r: quantize(rgb.x),
            g: quantize(rgb.y),
            b: quantize(rgb.z),
        }
    }

    pub fn to_float3(&self) -> Vector3f {
        Vector3f::new(self.r as Float, self.g as Float, self.b as Float) / 255.0
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

fn quantize(v: Float) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.max(0.0).min(1.0) * 255.0).round() as u8
}

pub fn is_black(rgb: &Vector3f) -> bool {
    rgb.iter().all(|c| *c == 0.0)
}

pub fn luminance(rgb: &Vector3f) -> Float {
    0.2126 * rgb.x + 0.7152 * rgb.y + 0.0722 * rgb.z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_color_quantization() {
        let c = UnsignedColor::from_float3(&Vector3f::new(1.5, 0.5, -0.2));
        assert_eq!(c, UnsignedColor::new(255, 128, 0));

        let nan = UnsignedColor::from_float3(&Vector3f::new(Float::NAN, 0.0, 1.0));
        assert_eq!(nan.to_array(), [0, 0, 255]);
    }

    #[test]
    fn test_unsigned_color_round_trip_exact_steps() {
        let c = UnsignedColor::new(77, 174, 219);
        assert_eq!(UnsignedColor::from_float3(&c.to_float3()), c);
    }

    #[test]
    fn test_is_black() {
        assert!(is_black(&Vector3f::zeros()));
        assert!(!is_black(&Vector3f::new(0.0, 0.1, 0.0)));
    }
}
