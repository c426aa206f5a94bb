//! Crop state and aspect-ratio helpers.
//!
//! A [`CropState`] selects a rectangle of the source in pixel coordinates and
//! carries the rotation and flips the transform engine realizes. The
//! `aspect_ratio` field is advisory: the UI uses it to constrain the crop
//! gesture, but [`super::apply_transform`] never enforces it.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left pixel of the source
//! - `x + width <= source_width` and `y + height <= source_height`

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a crop cannot be realized.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Crop rectangle extends past the source buffer
    #[error(
        "Crop rectangle ({x}, {y}, {width}x{height}) exceeds source bounds {source_width}x{source_height}"
    )]
    CropOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        source_width: u32,
        source_height: u32,
    },

    /// Crop rectangle has zero area
    #[error("Crop rectangle must be non-empty, got {width}x{height}")]
    EmptyCrop { width: u32, height: u32 },

    /// Rotation angle is NaN or infinite
    #[error("Invalid rotation angle: {0}")]
    InvalidRotation(f64),
}

/// Crop, rotation and flip applied to a source image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropState {
    /// Left edge in source pixels
    pub x: u32,
    /// Top edge in source pixels
    pub y: u32,
    /// Crop width in pixels (also the output width)
    pub width: u32,
    /// Crop height in pixels (also the output height)
    pub height: u32,
    /// Rotation in degrees, positive = clockwise on screen
    #[serde(default)]
    pub rotation: f64,
    /// Mirror horizontally
    #[serde(default)]
    pub flip_h: bool,
    /// Mirror vertically
    #[serde(default)]
    pub flip_v: bool,
    /// Advisory width/height ratio for the crop gesture, `None` = free
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
}

impl CropState {
    /// A crop covering the whole source with no rotation or flips.
    pub fn full(source_width: u32, source_height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: source_width,
            height: source_height,
            rotation: 0.0,
            flip_h: false,
            flip_v: false,
            aspect_ratio: None,
        }
    }

    /// Check the rectangle against the source dimensions.
    pub fn validate(&self, source_width: u32, source_height: u32) -> Result<(), TransformError> {
        if self.width == 0 || self.height == 0 {
            return Err(TransformError::EmptyCrop {
                width: self.width,
                height: self.height,
            });
        }

        // u64 so x + width cannot overflow
        let right = self.x as u64 + self.width as u64;
        let bottom = self.y as u64 + self.height as u64;
        if right > source_width as u64 || bottom > source_height as u64 {
            return Err(TransformError::CropOutOfBounds {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                source_width,
                source_height,
            });
        }

        if !self.rotation.is_finite() {
            return Err(TransformError::InvalidRotation(self.rotation));
        }

        Ok(())
    }

    /// True when realizing this crop is a plain rectangular copy.
    pub fn is_axis_aligned(&self) -> bool {
        self.rotation.rem_euclid(360.0) == 0.0 && !self.flip_h && !self.flip_v
    }

    /// Largest rectangle with the advisory aspect ratio that fits inside the
    /// current crop, centered on it.
    ///
    /// Returns an unchanged copy when `aspect_ratio` is `None` or not a
    /// positive finite number.
    pub fn constrained_to_aspect(&self) -> Self {
        let ratio = match self.aspect_ratio {
            Some(r) if r.is_finite() && r > 0.0 => r,
            _ => return self.clone(),
        };

        let (cw, ch) = (self.width as f64, self.height as f64);
        let (w, h) = if cw / ch > ratio {
            // Too wide: keep height
            (ch * ratio, ch)
        } else {
            (cw, cw / ratio)
        };

        let w = (w.round() as u32).clamp(1, self.width.max(1));
        let h = (h.round() as u32).clamp(1, self.height.max(1));

        Self {
            x: self.x + (self.width - w) / 2,
            y: self.y + (self.height - h) / 2,
            width: w,
            height: h,
            ..self.clone()
        }
    }
}

/// A named aspect ratio offered by the crop tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AspectRatio {
    pub label: &'static str,
    /// width / height, `None` = free
    pub value: Option<f64>,
}

/// Aspect ratios offered by the crop tool, in display order.
pub const ASPECT_RATIOS: [AspectRatio; 8] = [
    AspectRatio {
        label: "Free",
        value: None,
    },
    AspectRatio {
        label: "Square",
        value: Some(1.0),
    },
    AspectRatio {
        label: "16:9",
        value: Some(16.0 / 9.0),
    },
    AspectRatio {
        label: "9:16",
        value: Some(9.0 / 16.0),
    },
    AspectRatio {
        label: "4:3",
        value: Some(4.0 / 3.0),
    },
    AspectRatio {
        label: "3:4",
        value: Some(3.0 / 4.0),
    },
    AspectRatio {
        label: "3:2",
        value: Some(3.0 / 2.0),
    },
    AspectRatio {
        label: "2:3",
        value: Some(2.0 / 3.0),
    },
];
