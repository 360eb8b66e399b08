/* Copyright 2020 @TwoCookingMice */

use crate::core::error::{RenderError, Result};
use crate::math::bitmap::Bitmap;

use exr::prelude::*;
use std::path::Path;

// Write the unclamped accumulation buffer as an RGB OpenEXR image
pub fn write_exr_to_file<P: AsRef<Path>>(bitmap: &Bitmap, file_path: P) -> Result<()> {
    let file_path = file_path.as_ref();
    log::info!("Starting writing openexr images: {}.", file_path.display());

    let width = bitmap.width();
    let pixels = bitmap.pixels();
    write_rgb_file(file_path, width, bitmap.height(), |x, y| {
        let p = pixels[y * width + x];
        (p.x, p.y, p.z)
    }).map_err(|e| RenderError::Exr(e.to_string()))?;

    log::info!("EXR written to: {}.", file_path.display());
    Ok(())
}
