//! JPEG encoding.
//!
//! JPEG has no alpha channel, so pixels are first composited onto black,
//! the same way a browser canvas flattens transparency when exporting.

use super::{EncodeError, ExportFormat};
use crate::buffer::{PixelBuffer, CHANNELS};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::io::Cursor;

/// Encode `buffer` as a baseline JPEG at `quality` (1-100).
pub(super) fn encode_jpeg(buffer: &PixelBuffer, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let rgb = flatten_onto_black(buffer.pixels());
    let quality = quality.clamp(1, 100);

    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(&rgb, buffer.width(), buffer.height(), ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: ExportFormat::Jpeg,
            message: e.to_string(),
        })?;

    Ok(out.into_inner())
}

/// Drop alpha by compositing straight RGBA onto opaque black.
fn flatten_onto_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / CHANNELS * 3);
    for px in rgba.chunks_exact(CHANNELS) {
        let a = px[3] as u32;
        for &c in &px[..3] {
            rgb.push(mul_div255(c as u32, a));
        }
    }
    rgb
}

#[inline]
fn mul_div255(x: u32, y: u32) -> u8 {
    ((x * y + 127) / 255) as u8
}
