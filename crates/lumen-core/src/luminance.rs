//! Luminance calculation using ITU-R BT.601 coefficients.
//!
//! The tone/color engine works on unnormalized 0-255 channel values, so the
//! helpers here take and return that scale directly.

/// BT.601 coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// BT.601 coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// BT.601 coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Perceptual luminance of an RGB triple on the 0-255 scale.
///
/// Inputs may lie outside 0-255 mid-pipeline; no clamping is applied.
#[inline]
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b
}

/// Luminance of an 8-bit pixel, rounded back to 8 bits.
#[inline]
pub fn luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    luminance(r as f32, g as f32, b as f32)
        .clamp(0.0, 255.0)
        .round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        let sum = LUMINANCE_R + LUMINANCE_G + LUMINANCE_B;
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_gray_preserves_value() {
        for v in [0u8, 1, 64, 128, 200, 255] {
            assert_eq!(luminance_u8(v, v, v), v);
        }
    }

    #[test]
    fn test_primaries() {
        // 0.299 * 255 = 76.2, 0.587 * 255 = 149.7, 0.114 * 255 = 29.1
        assert_eq!(luminance_u8(255, 0, 0), 76);
        assert_eq!(luminance_u8(0, 255, 0), 150);
        assert_eq!(luminance_u8(0, 0, 255), 29);
    }

    #[test]
    fn test_unclamped_float_input() {
        let lum = luminance(300.0, 300.0, 300.0);
        assert!((lum - 300.0).abs() < 1e-3);
    }
}
