//! Lumen Core - Photo editing engine
//!
//! This crate provides the pixel work behind the Lumen editor: the
//! adjustment parameter model and presets, the tone/color engine, the
//! vignette, crop/rotate/flip, ink and text annotations, and export
//! encoding. Everything operates on straight-alpha RGBA8 [`PixelBuffer`]s.
//!
//! # Pipeline
//!
//! [`pipeline::render`] realizes a complete [`EditRecipe`]:
//! transform, then adjustments, then vignette, then strokes and text.
//! Each stage is also usable on its own.

pub mod adjustments;
pub mod annotate;
pub mod buffer;
pub mod color;
pub mod export;
pub mod luminance;
pub mod params;
pub mod pipeline;
pub mod presets;
pub mod transform;
pub mod vignette;

pub use adjustments::{apply_adjustments, apply_adjustments_rgba};
pub use annotate::{
    render_strokes, render_text_overlays, DrawStroke, FontBook, FontError, Point, StrokeTool,
    TextOverlay,
};
pub use buffer::{BufferError, PixelBuffer};
pub use color::{Color, ColorParseError};
pub use export::{encode, EncodeError, EncodedImage, ExportFormat, ExportOptions};
pub use params::{AdjustmentField, AdjustmentValues, PartialAdjustments};
pub use pipeline::{render, render_and_encode, EditRecipe, PipelineError};
pub use presets::{preset_by_id, presets, FilterPreset};
pub use transform::{apply_transform, CropState, InterpolationFilter, TransformError};
pub use vignette::apply_vignette;
