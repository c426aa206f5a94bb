//! Geometric transforms: crop, rotate and flip.
//!
//! Transforms run first in the render pipeline, before any tone or color
//! work, so later stages only ever see the cropped canvas.
//!
//! # Coordinate System
//!
//! - Crop coordinates are integer source pixels, origin top-left
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Output dimensions always equal the crop dimensions

mod crop;
mod resample;

pub use crop::{AspectRatio, CropState, TransformError, ASPECT_RATIOS};
pub use resample::{apply_transform, sampling_matrix, InterpolationFilter};
