//! Tone/color engine.
//!
//! Applies the per-pixel adjustments of [`AdjustmentValues`] to RGBA pixel
//! data in place. Every step reads the channel values already modified by
//! the steps before it, so the order below is part of the contract.
//!
//! ## Adjustment Order
//! 1. Exposure
//! 2. Brightness
//! 3. Contrast
//! 4. Black point
//! 5. Highlights / Shadows (luminance-gated, mutually exclusive per pixel)
//! 6. Brilliance
//! 7. Warmth
//! 8. Tint
//! 9. Saturation
//! 10. Vibrance
//!
//! Channels are kept unnormalized (0-255 floats) through the whole chain,
//! then clamped to [0, 255] and rounded half away from zero on write-back.
//! Alpha is never modified. `sharpness`, `definition` and `noise_reduction`
//! have no per-pixel effect. Vignette is a separate post-pass, see
//! [`crate::vignette`].

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::luminance::luminance;
use crate::params::AdjustmentValues;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Contrast factor at contrast = 100, the largest legal value.
pub const CONTRAST_FACTOR_MAX: f32 = 129.5;

/// Pixels per work unit when the `parallel` feature is on.
#[cfg(feature = "parallel")]
const PARALLEL_CHUNK_PIXELS: usize = 16 * 1024;

/// Apply all tone/color adjustments to a buffer in place.
///
/// Values outside their documented ranges are clamped first (see
/// [`AdjustmentValues::clamped`]).
pub fn apply_adjustments(buffer: &mut PixelBuffer, adjustments: &AdjustmentValues) {
    debug!(
        width = buffer.width(),
        height = buffer.height(),
        "Applying tone/color adjustments"
    );
    apply_adjustments_rgba(buffer.pixels_mut(), adjustments);
}

/// Apply all tone/color adjustments to raw RGBA bytes in place.
///
/// # Panics
/// Panics if `pixels.len()` is not a multiple of 4. A partial pixel means
/// the caller handed over a buffer with the wrong layout.
pub fn apply_adjustments_rgba(pixels: &mut [u8], adjustments: &AdjustmentValues) {
    assert!(
        pixels.len() % CHANNELS == 0,
        "RGBA pixel data length {} is not a multiple of 4",
        pixels.len()
    );

    let pipeline = ColorPipeline::new(&adjustments.clamped());
    if pipeline.is_identity() {
        trace!("all color adjustments neutral, skipping pixel loop");
        return;
    }

    #[cfg(feature = "parallel")]
    pixels
        .par_chunks_mut(PARALLEL_CHUNK_PIXELS * CHANNELS)
        .for_each(|chunk| pipeline.run(chunk));

    #[cfg(not(feature = "parallel"))]
    pipeline.run(pixels);
}

/// Pre-computed factors for one run of the engine.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColorPipeline {
    adj: AdjustmentValues,
    exposure_factor: f32,
    brightness_delta: f32,
    contrast_factor: f32,
    black_point_level: f32,
    highlights_factor: f32,
    shadows_factor: f32,
    brilliance_factor: f32,
    warmth_shift: f32,
    tint_shift: f32,
    saturation_factor: f32,
    vibrance_factor: f32,
}

impl ColorPipeline {
    /// `adj` must already be clamped.
    pub(crate) fn new(adj: &AdjustmentValues) -> Self {
        Self {
            adj: *adj,
            exposure_factor: 1.0 + adj.exposure / 100.0,
            brightness_delta: adj.brightness * 2.55,
            contrast_factor: contrast_factor(adj.contrast),
            black_point_level: adj.black_point * 2.55,
            highlights_factor: adj.highlights / 100.0,
            shadows_factor: adj.shadows / 100.0,
            brilliance_factor: adj.brilliance / 100.0,
            warmth_shift: adj.warmth * 0.5,
            tint_shift: adj.tint * 0.3,
            saturation_factor: 1.0 + adj.saturation / 100.0,
            vibrance_factor: adj.vibrance / 100.0,
        }
    }

    /// True when no color-affecting field is set.
    fn is_identity(&self) -> bool {
        let a = &self.adj;
        a.exposure == 0.0
            && a.brightness == 0.0
            && a.contrast == 0.0
            && a.black_point == 0.0
            && a.highlights == 0.0
            && a.shadows == 0.0
            && a.brilliance == 0.0
            && a.warmth == 0.0
            && a.tint == 0.0
            && a.saturation == 0.0
            && a.vibrance == 0.0
    }

    fn run(&self, pixels: &mut [u8]) {
        for px in pixels.chunks_exact_mut(CHANNELS) {
            let (r, g, b) = self.apply_pixel(px[0] as f32, px[1] as f32, px[2] as f32);
            px[0] = to_channel(r);
            px[1] = to_channel(g);
            px[2] = to_channel(b);
        }
    }

    /// Run the full chain on one pixel, without clamping.
    #[inline]
    pub(crate) fn apply_pixel(&self, r: f32, g: f32, b: f32) -> (f32, f32, f32) {
        let a = &self.adj;
        let (mut r, mut g, mut b) = (r, g, b);

        if a.exposure != 0.0 {
            (r, g, b) = apply_exposure(r, g, b, self.exposure_factor);
        }
        if a.brightness != 0.0 {
            (r, g, b) = apply_brightness(r, g, b, self.brightness_delta);
        }
        if a.contrast != 0.0 {
            (r, g, b) = apply_contrast(r, g, b, self.contrast_factor);
        }
        if a.black_point != 0.0 {
            (r, g, b) = apply_black_point(r, g, b, self.black_point_level);
        }
        if a.highlights != 0.0 || a.shadows != 0.0 {
            (r, g, b) = apply_highlights_shadows(
                r,
                g,
                b,
                (a.highlights != 0.0).then_some(self.highlights_factor),
                (a.shadows != 0.0).then_some(self.shadows_factor),
            );
        }
        if a.brilliance != 0.0 {
            (r, g, b) = apply_brilliance(r, g, b, self.brilliance_factor);
        }
        if a.warmth != 0.0 {
            r += self.warmth_shift;
            b -= self.warmth_shift;
        }
        if a.tint != 0.0 {
            g += self.tint_shift;
        }
        if a.saturation != 0.0 {
            (r, g, b) = apply_saturation(r, g, b, self.saturation_factor);
        }
        if a.vibrance != 0.0 {
            (r, g, b) = apply_vibrance(r, g, b, self.vibrance_factor);
        }

        (r, g, b)
    }
}

/// Clamp to [0, 255] and round half away from zero.
#[inline]
fn to_channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

/// Classic contrast-correction factor for contrast in [-100, 100].
///
/// `259 * (C + 255) / (255 * (259 - C))` with `C = contrast * 2.55`. The
/// denominator stays positive over the legal range; the result is still
/// clamped to `[0, CONTRAST_FACTOR_MAX]`.
pub fn contrast_factor(contrast: f32) -> f32 {
    let c = contrast * 2.55;
    let denom = 255.0 * (259.0 - c);
    if denom <= f32::EPSILON {
        return CONTRAST_FACTOR_MAX;
    }
    (259.0 * (c + 255.0) / denom).clamp(0.0, CONTRAST_FACTOR_MAX)
}

/// `c *= 1 + exposure/100`
#[inline]
fn apply_exposure(r: f32, g: f32, b: f32, factor: f32) -> (f32, f32, f32) {
    (r * factor, g * factor, b * factor)
}

/// Adds `brightness * 2.55` to every channel.
#[inline]
fn apply_brightness(r: f32, g: f32, b: f32, delta: f32) -> (f32, f32, f32) {
    (r + delta, g + delta, b + delta)
}

#[inline]
fn apply_contrast(r: f32, g: f32, b: f32, factor: f32) -> (f32, f32, f32) {
    (
        factor * (r - 128.0) + 128.0,
        factor * (g - 128.0) + 128.0,
        factor * (b - 128.0) + 128.0,
    )
}

/// Raises the floor: `c = c * (1 - bp/255) + bp`.
#[inline]
fn apply_black_point(r: f32, g: f32, b: f32, level: f32) -> (f32, f32, f32) {
    let scale = 1.0 - level / 255.0;
    (r * scale + level, g * scale + level, b * scale + level)
}

/// Highlights act on pixels with luminance above 128, shadows below.
///
/// Luminance is taken once from the incoming values, so at most one of the
/// two fires for a given pixel.
#[inline]
fn apply_highlights_shadows(
    r: f32,
    g: f32,
    b: f32,
    highlights: Option<f32>,
    shadows: Option<f32>,
) -> (f32, f32, f32) {
    let lum = luminance(r, g, b);
    let mut delta = 0.0;

    if let Some(factor) = highlights {
        if lum > 128.0 {
            let amount = (lum - 128.0) / 127.0;
            delta += factor * amount * 50.0;
        }
    }
    if let Some(factor) = shadows {
        if lum < 128.0 {
            let amount = 1.0 - lum / 128.0;
            delta += factor * amount * 50.0;
        }
    }

    (r + delta, g + delta, b + delta)
}

/// Adaptive lift that is strongest on dark pixels.
#[inline]
fn apply_brilliance(r: f32, g: f32, b: f32, factor: f32) -> (f32, f32, f32) {
    let lum = (r + g + b) / 3.0;
    let delta = (1.0 - lum / 255.0) * factor * 80.0;
    (r + delta, g + delta, b + delta)
}

/// Scale chroma around the pixel's luminance.
#[inline]
fn apply_saturation(r: f32, g: f32, b: f32, factor: f32) -> (f32, f32, f32) {
    let gray = luminance(r, g, b);
    (
        gray + factor * (r - gray),
        gray + factor * (g - gray),
        gray + factor * (b - gray),
    )
}

/// Saturation boost scaled down for pixels that are already saturated.
#[inline]
fn apply_vibrance(r: f32, g: f32, b: f32, vibrance: f32) -> (f32, f32, f32) {
    let max_c = r.max(g).max(b);
    let min_c = r.min(g).min(b);
    let sat = if max_c > 0.0 {
        (max_c - min_c) / max_c
    } else {
        0.0
    };
    let boost = (1.0 - sat) * vibrance;
    apply_saturation(r, g, b, 1.0 + boost)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
