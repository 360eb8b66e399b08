// Copyright @yucwang 2026

use crate::core::error::Result;
use crate::math::bitmap::Bitmap;

use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;

/// Quantizes the bitmap into an 8-bit RGB image.
pub fn to_rgb_image(bitmap: &Bitmap) -> RgbImage {
    let pixels = bitmap.to_unsigned();
    let width = bitmap.width();
    ImageBuffer::from_fn(width as u32, bitmap.height() as u32, |x, y| {
        Rgb(pixels[y as usize * width + x as usize].to_array())
    })
}

/// Writes the bitmap as an 8-bit image. The format follows the extension.
pub fn write_png<P: AsRef<Path>>(bitmap: &Bitmap, path: P) -> Result<()> {
    let path = path.as_ref();
    log::info!("Writing {}x{} image to: {}.", bitmap.width(), bitmap.height(), path.display());
    to_rgb_image(bitmap).save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;

    #[test]
    fn test_quantized_layout() {
        let mut bitmap = Bitmap::new(3, 2);
        bitmap[(2, 1)] = Vector3f::new(1.0, 0.5, 2.0);
        bitmap[(0, 1)] = Vector3f::new(-1.0, 0.0, 0.25);

        let image = to_rgb_image(&bitmap);
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1), &Rgb([255, 128, 255]));
        assert_eq!(image.get_pixel(0, 1), &Rgb([0, 0, 64]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_write_and_read_back() {
        let mut bitmap = Bitmap::new(4, 4);
        bitmap.fill(Vector3f::new(0.0, 1.0, 0.0));
        let path = std::env::temp_dir().join("trirender_image_utils_test.png");

        write_png(&bitmap, &path).expect("write png");
        let loaded = image::open(&path).expect("read png").to_rgb8();
        assert_eq!(loaded.get_pixel(3, 3), &Rgb([0, 255, 0]));
        let _ = std::fs::remove_file(&path);
    }
}
