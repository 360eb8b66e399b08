// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Vector3f };
use super::spectrum::UnsignedColor;

use std::ops;
use std::vec::Vec;

/// Row-major grid of linear RGB values. Used as the accumulation buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    data: Vec<Vector3f>,
    height: usize,
    width: usize
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = Vector3f;

    fn index(&self, index: (usize, usize)) -> &Vector3f {
        assert!(index.0 < self.width && index.1 < self.height);
        &self.data[index.0 + self.width * index.1]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Vector3f {
        assert!(index.0 < self.width && index.1 < self.height);
        &mut self.data[index.0 + self.width * index.1]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        let pixel_number = width * height;
        Self { data: vec!(Vector3f::zeros(); pixel_number),
               width,
               height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Vector3f] {
        &self.data
    }

    pub fn fill(&mut self, color: Vector3f) {
        for p in self.data.iter_mut() {
            *p = color;
        }
    }

    /// Splits the grid into disjoint bands of `rows` full rows each.
    /// The last band may be shorter.
    pub fn bands_mut(&mut self, rows: usize) -> std::slice::ChunksMut<'_, Vector3f> {
        let band = (rows.max(1) * self.width).max(1);
        self.data.chunks_mut(band)
    }

    pub fn to_unsigned(&self) -> Vec<UnsignedColor> {
        self.data.iter().map(UnsignedColor::from_float3).collect()
    }
}

/// Running-mean update. With `weight = 1 / (k + 1)` on the k-th sample the
/// cell is the mean of all samples so far, and a constant sample leaves the
/// cell unchanged bit for bit.
pub fn blend(cell: &mut Vector3f, sample: &Vector3f, weight: Float) {
    *cell += (sample - *cell) * weight;
}

/* Test for Bitmap */
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_basic_functions() {
        let mut bitmap = Bitmap::new(256usize, 256usize);
        assert_eq!(bitmap.width(), 256);
        assert_eq!(bitmap.height(), 256);

        bitmap[(5, 6)] = Vector3f::new(1.0, 0.5, 0.6);
        assert_eq!(bitmap[(5, 6)][0], 1.0);
        assert_eq!(bitmap[(2, 6)][0], 0.0);
        assert_eq!(bitmap.pixels()[5 + 256 * 6], Vector3f::new(1.0, 0.5, 0.6));
    }

    #[test]
    fn test_bands_cover_every_cell_once() {
        let mut bitmap = Bitmap::new(3, 5);
        let mut lengths = Vec::new();
        for band in bitmap.bands_mut(2) {
            lengths.push(band.len());
            for p in band.iter_mut() {
                *p += Vector3f::new(1.0, 1.0, 1.0);
            }
        }
        assert_eq!(lengths, vec![6, 6, 3]);
        assert!(bitmap.pixels().iter().all(|p| *p == Vector3f::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_blend_is_running_mean() {
        let samples = [0.2f32, 0.9, 0.4, 0.1, 0.7];
        let mut cell = Vector3f::zeros();
        for (k, s) in samples.iter().enumerate() {
            blend(&mut cell, &Vector3f::new(*s, *s, *s), 1.0 / (k as Float + 1.0));
        }
        let mean: Float = samples.iter().sum::<Float>() / samples.len() as Float;
        assert!((cell.x - mean).abs() < 1e-6);
    }

    #[test]
    fn test_blend_constant_is_exact() {
        let c = Vector3f::new(0.3, 0.7, 0.11);
        let mut cell = Vector3f::zeros();
        for k in 0..50 {
            blend(&mut cell, &c, 1.0 / (k as Float + 1.0));
            assert_eq!(cell, c);
        }
    }
}
