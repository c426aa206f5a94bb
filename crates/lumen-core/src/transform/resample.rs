//! Crop, rotate and flip with bilinear or Lanczos3 interpolation.
//!
//! The output canvas always has the crop's dimensions. The crop is drawn
//! centered on that canvas after rotating about the center and mirroring,
//! so rotated corners that fall outside the crop rectangle come out
//! transparent.
//!
//! # Algorithm
//!
//! Inverse mapping: every destination pixel center is pushed through the
//! inverse of
//!
//! ```text
//! forward = T(w/2, h/2) * R(rotation) * S(flip_h ? -1 : 1, flip_v ? -1 : 1) * T(-w/2, -h/2)
//! ```
//!
//! giving a continuous coordinate in crop-local space. Points outside
//! `[0, w) x [0, h)` are transparent; everything else is interpolated from
//! the crop's pixels with neighbor taps clamped to the crop rectangle.
//! Interpolation runs on premultiplied color so transparent texels never
//! bleed dark fringes into their neighbors.

use super::crop::{CropState, TransformError};
use crate::buffer::{PixelBuffer, CHANNELS};
use kurbo::{Affine, Point};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Interpolation filter for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation - good for preview rendering.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation - good for export.
    Lanczos3,
}

/// Crop rectangle in source pixels.
#[derive(Debug, Clone, Copy)]
struct Region {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl Region {
    fn of(crop: &CropState) -> Self {
        Self {
            x: crop.x,
            y: crop.y,
            width: crop.width,
            height: crop.height,
        }
    }

    #[inline]
    fn contains(&self, u: f64, v: f64) -> bool {
        u >= 0.0 && v >= 0.0 && u < self.width as f64 && v < self.height as f64
    }

    /// Fetch a crop-local texel, clamping to the crop edges.
    #[inline]
    fn texel(&self, source: &PixelBuffer, px: i64, py: i64) -> [u8; 4] {
        let x = px.clamp(0, self.width as i64 - 1) as u32 + self.x;
        let y = py.clamp(0, self.height as i64 - 1) as u32 + self.y;
        let i = source.index(x, y);
        let p = &source.pixels()[i..i + CHANNELS];
        [p[0], p[1], p[2], p[3]]
    }
}

/// Realize `crop` against `source`.
///
/// Returns a new buffer of `crop.width` x `crop.height`. Fails if the crop
/// rectangle is empty or extends past the source, or if the rotation is not
/// finite.
pub fn apply_transform(
    source: &PixelBuffer,
    crop: &CropState,
    filter: InterpolationFilter,
) -> Result<PixelBuffer, TransformError> {
    crop.validate(source.width(), source.height())?;
    debug!(
        x = crop.x,
        y = crop.y,
        width = crop.width,
        height = crop.height,
        rotation = crop.rotation,
        flip_h = crop.flip_h,
        flip_v = crop.flip_v,
        ?filter,
        "Applying transform"
    );

    let region = Region::of(crop);
    if crop.is_axis_aligned() {
        trace!("Axis-aligned crop, copying rows");
        return Ok(copy_region(source, region));
    }

    Ok(resample(source, region, sampling_matrix(crop), filter))
}

/// Map from destination canvas coordinates to crop-local coordinates.
///
/// Positive rotation turns the image clockwise on screen (y axis down).
pub fn sampling_matrix(crop: &CropState) -> Affine {
    let (cx, cy) = (crop.width as f64 / 2.0, crop.height as f64 / 2.0);
    let mirror = Affine::scale_non_uniform(
        if crop.flip_h { -1.0 } else { 1.0 },
        if crop.flip_v { -1.0 } else { 1.0 },
    );
    let forward = Affine::translate((cx, cy))
        * Affine::rotate(crop.rotation.to_radians())
        * mirror
        * Affine::translate((-cx, -cy));
    forward.inverse()
}

/// Plain row copy for crops without rotation or flips.
fn copy_region(source: &PixelBuffer, region: Region) -> PixelBuffer {
    let mut output = PixelBuffer::transparent(region.width, region.height);
    let row_bytes = region.width as usize * CHANNELS;

    for (row, dst) in output.pixels_mut().chunks_exact_mut(row_bytes).enumerate() {
        let start = source.index(region.x, region.y + row as u32);
        dst.copy_from_slice(&source.pixels()[start..start + row_bytes]);
    }

    output
}

/// Fill a `region`-sized canvas by sampling `source` through `to_local`.
fn resample(
    source: &PixelBuffer,
    region: Region,
    to_local: Affine,
    filter: InterpolationFilter,
) -> PixelBuffer {
    let mut output = PixelBuffer::transparent(region.width, region.height);
    let stride = output.stride();

    let render_row = |(y, row): (usize, &mut [u8])| {
        let cy = y as f64 + 0.5;
        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let local = to_local * Point::new(x as f64 + 0.5, cy);
            if !region.contains(local.x, local.y) {
                continue;
            }
            let sample = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(source, &region, local),
                InterpolationFilter::Lanczos3 => sample_lanczos3(source, &region, local),
            };
            px.copy_from_slice(&sample);
        }
    };

    #[cfg(feature = "parallel")]
    output
        .pixels_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(render_row);

    #[cfg(not(feature = "parallel"))]
    output
        .pixels_mut()
        .chunks_exact_mut(stride)
        .enumerate()
        .for_each(render_row);

    output
}

/// Weighted sum of texels in premultiplied space.
#[derive(Debug, Default)]
struct Accumulator {
    premultiplied: [f64; 3],
    straight: [f64; 3],
    alpha: f64,
    weight: f64,
}

impl Accumulator {
    #[inline]
    fn add(&mut self, texel: [u8; 4], weight: f64) {
        let a = texel[3] as f64;
        for i in 0..3 {
            let c = texel[i] as f64;
            self.premultiplied[i] += c * a * weight;
            self.straight[i] += c * weight;
        }
        self.alpha += a * weight;
        self.weight += weight;
    }

    fn finish(&self) -> [u8; 4] {
        if self.weight <= 0.0 {
            return [0; 4];
        }

        let mut out = [0u8; 4];
        for i in 0..3 {
            // Fully transparent neighborhoods keep their straight color
            let c = if self.alpha > 0.0 {
                self.premultiplied[i] / self.alpha
            } else {
                self.straight[i] / self.weight
            };
            out[i] = c.clamp(0.0, 255.0).round() as u8;
        }
        out[3] = (self.alpha / self.weight).clamp(0.0, 255.0).round() as u8;
        out
    }
}

/// Sample with bilinear interpolation between the four nearest pixel centers.
fn sample_bilinear(source: &PixelBuffer, region: &Region, at: Point) -> [u8; 4] {
    // Pixel centers sit at integer + 0.5
    let fx = at.x - 0.5;
    let fy = at.y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let mut acc = Accumulator::default();
    acc.add(region.texel(source, x0, y0), (1.0 - tx) * (1.0 - ty));
    acc.add(region.texel(source, x0 + 1, y0), tx * (1.0 - ty));
    acc.add(region.texel(source, x0, y0 + 1), (1.0 - tx) * ty);
    acc.add(region.texel(source, x0 + 1, y0 + 1), tx * ty);
    acc.finish()
}

/// Sample with a 6x6 Lanczos3 kernel.
fn sample_lanczos3(source: &PixelBuffer, region: &Region, at: Point) -> [u8; 4] {
    let fx = at.x - 0.5;
    let fy = at.y - 0.5;
    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;

    let mut acc = Accumulator::default();
    for ky in -2..=3 {
        let py = y0 + ky;
        let wy = lanczos_weight(fy - py as f64, 3.0);
        for kx in -2..=3 {
            let px = x0 + kx;
            let weight = lanczos_weight(fx - px as f64, 3.0) * wy;
            acc.add(region.texel(source, px, py), weight);
        }
    }
    acc.finish()
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn buffer(max: u32) -> impl Strategy<Value = PixelBuffer> {
        (1..max, 1..max).prop_flat_map(|(w, h)| {
            prop::collection::vec(any::<u8>(), (w * h * 4) as usize)
                .prop_map(move |pixels| PixelBuffer::new(w, h, pixels).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_full_crop_identity(img in buffer(24)) {
            let crop = CropState::full(img.width(), img.height());
            let out = apply_transform(&img, &crop, InterpolationFilter::Bilinear).unwrap();
            prop_assert_eq!(out, img);
        }

        #[test]
        fn prop_double_flip_identity(img in buffer(24), flip_h: bool, flip_v: bool) {
            let crop = CropState {
                flip_h,
                flip_v,
                ..CropState::full(img.width(), img.height())
            };
            let once = apply_transform(&img, &crop, InterpolationFilter::Bilinear).unwrap();
            let twice = apply_transform(&once, &crop, InterpolationFilter::Bilinear).unwrap();
            prop_assert_eq!(twice, img);
        }

        #[test]
        fn prop_output_matches_crop_dims(
            img in buffer(32),
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
            rotation in -360.0f64..360.0,
            lanczos: bool,
        ) {
            let x = (fx * img.width() as f64) as u32 % img.width();
            let y = (fy * img.height() as f64) as u32 % img.height();
            let crop = CropState {
                x,
                y,
                width: img.width() - x,
                height: img.height() - y,
                rotation,
                ..CropState::full(0, 0)
            };
            let filter = if lanczos {
                InterpolationFilter::Lanczos3
            } else {
                InterpolationFilter::Bilinear
            };
            let out = apply_transform(&img, &crop, filter).unwrap();
            prop_assert_eq!(out.width(), crop.width);
            prop_assert_eq!(out.height(), crop.height);
        }
    }
}
