//! Vignette compositor.
//!
//! Darkens the image toward its edges by compositing a black radial gradient
//! over the buffer. The gradient is centered on the image with an outer
//! radius of `0.7 * max(width, height)`; it is fully transparent inside 30%
//! of that radius and reaches `strength * 0.7` alpha at the outer radius,
//! holding that value beyond it.

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::color::blend_over;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outer radius as a fraction of the longer image side.
const OUTER_RADIUS_FRACTION: f32 = 0.7;

/// Inner (transparent) radius as a fraction of the outer radius.
const INNER_RADIUS_FRACTION: f32 = 0.3;

/// Alpha reached at the outer radius for strength 1.0.
const MAX_ALPHA: f32 = 0.7;

/// Geometry of the vignette gradient for one image size.
#[derive(Debug, Clone, Copy)]
struct Gradient {
    cx: f32,
    cy: f32,
    inner: f32,
    outer: f32,
    max_alpha: f32,
}

impl Gradient {
    fn new(width: u32, height: u32, strength: f32) -> Self {
        let outer = width.max(height) as f32 * OUTER_RADIUS_FRACTION;
        Self {
            cx: width as f32 / 2.0,
            cy: height as f32 / 2.0,
            inner: outer * INNER_RADIUS_FRACTION,
            outer,
            max_alpha: strength.clamp(0.0, 1.0) * MAX_ALPHA,
        }
    }

    /// Black overlay alpha at canvas coordinate `(x, y)`.
    #[inline]
    fn alpha_at(&self, x: f32, y: f32) -> f32 {
        let dist = (x - self.cx).hypot(y - self.cy);
        let span = (self.outer - self.inner).max(f32::EPSILON);
        let t = ((dist - self.inner) / span).clamp(0.0, 1.0);
        t * self.max_alpha
    }

    fn shade_row(&self, row: &mut [u8], y: u32) {
        let py = y as f32 + 0.5;
        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let alpha = self.alpha_at(x as f32 + 0.5, py);
            if alpha > 0.0 {
                blend_over(px, [0, 0, 0], alpha);
            }
        }
    }
}

/// Overlay alpha the vignette applies at pixel `(x, y)` of a
/// `width` x `height` image, sampled at the pixel center.
pub(crate) fn vignette_alpha(x: u32, y: u32, width: u32, height: u32, strength: f32) -> f32 {
    Gradient::new(width, height, strength).alpha_at(x as f32 + 0.5, y as f32 + 0.5)
}

/// Composite the vignette over `buffer` in place.
///
/// `strength` is the vignette control divided by 100 and is clamped to
/// [0, 1]. A strength of 0 (or less) leaves the buffer untouched.
pub fn apply_vignette(buffer: &mut PixelBuffer, strength: f32) {
    if strength.is_nan() || strength <= 0.0 {
        return;
    }
    let (width, height) = (buffer.width(), buffer.height());
    debug!(width, height, strength, "Applying vignette");

    let gradient = Gradient::new(width, height, strength);
    let stride = buffer.stride();

    #[cfg(feature = "parallel")]
    buffer
        .pixels_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| gradient.shade_row(row, y as u32));

    #[cfg(not(feature = "parallel"))]
    for (y, row) in buffer.pixels_mut().chunks_exact_mut(stride).enumerate() {
        gradient.shade_row(row, y as u32);
    }
}
