//! Framebuffer export.
//!
//! Radiance is mapped to bytes with a [`ToneMap`] and handed to the `image`
//! crate, which writes the uncompressed 24-bit bitmap (and every other
//! format). The framebuffer keeps channels in B, G, R order, so pixels are
//! swapped back to R, G, B on the way out.

use crate::{BitmapError, FrameBuffer, CHANNELS};
use image::codecs::bmp::BmpEncoder;
use image::{ColorType, ImageFormat, RgbImage};
use std::path::Path;

/// File header (14 bytes) plus BITMAPINFOHEADER (40 bytes).
pub const BMP_HEADER_SIZE: usize = 54;

/// How radiance values become bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneMap {
    /// Multiply by the factor and clamp; `Scale(255.0)` maps 1.0 to full brightness
    Scale(f64),
    /// Stretch so the brightest channel value becomes 255
    Normalize,
}

impl ToneMap {
    pub fn apply(self, data: &[f64]) -> Vec<u8> {
        match self {
            ToneMap::Scale(scale) => map_to_bytes(data, scale),
            ToneMap::Normalize => map_to_bytes_normalized(data),
        }
    }
}

impl Default for ToneMap {
    fn default() -> Self {
        ToneMap::Scale(255.0)
    }
}

/// Scale each value by `scale` and clamp into a byte.
pub fn map_to_bytes(data: &[f64], scale: f64) -> Vec<u8> {
    data.iter()
        .map(|&v| (v * scale).clamp(0.0, 255.0) as u8)
        .collect()
}

/// Map so the brightest value becomes 255. An all-dark buffer maps to zeros.
pub fn map_to_bytes_normalized(data: &[f64]) -> Vec<u8> {
    let max = data.iter().copied().fold(0.0f64, f64::max);
    if max <= 0.0 {
        return vec![0; data.len()];
    }
    map_to_bytes(data, 255.0 / max)
}

/// Tone-mapped bytes in R, G, B order, plus the dimensions as `u32`.
fn rgb_bytes(
    data: &[f64],
    width: usize,
    height: usize,
    tone: ToneMap,
) -> Result<(Vec<u8>, u32, u32), BitmapError> {
    let expected = width * height * CHANNELS;
    if data.len() != expected {
        return Err(BitmapError::SizeMismatch {
            width,
            height,
            expected,
            actual: data.len(),
        });
    }

    let too_large = || BitmapError::TooLarge { width, height };
    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(height).map_err(|_| too_large())?;

    let mut bytes = tone.apply(data);
    for pixel in bytes.chunks_exact_mut(CHANNELS) {
        pixel.swap(0, 2);
    }
    Ok((bytes, w, h))
}

/// Encode raw framebuffer values (top row first, B, G, R) as a 24-bit bitmap.
pub fn encode_bmp(
    data: &[f64],
    width: usize,
    height: usize,
    tone: ToneMap,
) -> Result<Vec<u8>, BitmapError> {
    let (bytes, w, h) = rgb_bytes(data, width, height, tone)?;
    let mut out = Vec::with_capacity(BMP_HEADER_SIZE + bytes.len() + 3 * height);
    BmpEncoder::new(&mut out).encode(&bytes, w, h, ColorType::Rgb8)?;
    Ok(out)
}

/// Convert a framebuffer to an 8-bit RGB image.
pub fn to_rgb_image(image: &FrameBuffer, tone: ToneMap) -> Result<RgbImage, BitmapError> {
    let (width, height) = (image.width(), image.height());
    let (bytes, w, h) = rgb_bytes(&image.to_vec(), width, height, tone)?;
    RgbImage::from_raw(w, h, bytes).ok_or(BitmapError::TooLarge { width, height })
}

/// Write a framebuffer to `path` as a 24-bit bitmap.
pub fn save_bmp(path: impl AsRef<Path>, image: &FrameBuffer, tone: ToneMap) -> Result<(), BitmapError> {
    let path = path.as_ref();
    to_rgb_image(image, tone)?.save_with_format(path, ImageFormat::Bmp)?;
    log::info!(
        "Saved {}x{} bitmap to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}
