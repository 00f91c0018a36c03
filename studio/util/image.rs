//! Image preprocessing for studio uploads.
//!
//! Decodes PNG/JPEG/BMP/GIF bytes, resizes to a square, converts to
//! grayscale and normalizes pixels to [0, 1] for network inference.

use image::ImageResult;

/// Returns a flat row-major `Vec<f32>` of length `side * side`.
pub fn image_bytes_to_grayscale_input(bytes: &[u8], side: u32) -> ImageResult<Vec<f32>> {
    let img = image::load_from_memory(bytes)?;
    let resized = img.resize_exact(side, side, image::imageops::FilterType::Lanczos3);
    let gray = resized.to_luma8();
    Ok(gray.pixels().map(|p| p.0[0] as f32 / 255.0).collect())
}
