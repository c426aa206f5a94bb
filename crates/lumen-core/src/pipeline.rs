//! End-to-end edit rendering.
//!
//! An [`EditRecipe`] is everything the editor knows about one photo's edit.
//! [`render`] realizes it against the untouched source in a fixed order:
//!
//! 1. Crop / rotate / flip (if a crop is present)
//! 2. Tone and color adjustments
//! 3. Vignette (if `vignette > 0`)
//! 4. Ink strokes
//! 5. Text overlays
//!
//! Strokes and overlays are in post-transform canvas coordinates, since
//! that is the canvas the user drew on.

use crate::adjustments::apply_adjustments;
use crate::annotate::{render_strokes, render_text_overlays, DrawStroke, FontBook, TextOverlay};
use crate::buffer::PixelBuffer;
use crate::export::{encode, EncodeError, EncodedImage, ExportOptions};
use crate::params::AdjustmentValues;
use crate::transform::{apply_transform, CropState, InterpolationFilter, TransformError};
use crate::vignette::apply_vignette;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from a full render or export.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Serializable description of a complete edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditRecipe {
    pub adjustments: AdjustmentValues,
    pub crop: Option<CropState>,
    pub strokes: Vec<DrawStroke>,
    pub overlays: Vec<TextOverlay>,
}

impl EditRecipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the recipe carries no edits at all.
    ///
    /// A recipe with a full-frame crop is not considered identity, since the
    /// source dimensions are not known here.
    pub fn is_identity(&self) -> bool {
        self.adjustments.clamped().is_neutral()
            && self.crop.is_none()
            && self.strokes.is_empty()
            && self.overlays.is_empty()
    }
}

/// Render `recipe` against `source`.
pub fn render(
    source: &PixelBuffer,
    recipe: &EditRecipe,
    fonts: &FontBook,
    filter: InterpolationFilter,
) -> Result<PixelBuffer, PipelineError> {
    debug!(
        width = source.width(),
        height = source.height(),
        crop = recipe.crop.is_some(),
        strokes = recipe.strokes.len(),
        overlays = recipe.overlays.len(),
        "Rendering edit"
    );

    let mut working = match &recipe.crop {
        Some(crop) => apply_transform(source, crop, filter)?,
        None => source.clone(),
    };

    let adjustments = recipe.adjustments.clamped();
    apply_adjustments(&mut working, &adjustments);
    if adjustments.vignette > 0.0 {
        apply_vignette(&mut working, adjustments.vignette / 100.0);
    }

    render_strokes(&mut working, &recipe.strokes);
    render_text_overlays(&mut working, &recipe.overlays, fonts);
    Ok(working)
}

/// Render `recipe` and encode the result for export.
///
/// Export always resamples with Lanczos3.
pub fn render_and_encode(
    source: &PixelBuffer,
    recipe: &EditRecipe,
    fonts: &FontBook,
    options: &ExportOptions,
) -> Result<EncodedImage, PipelineError> {
    let rendered = render(source, recipe, fonts, InterpolationFilter::Lanczos3)?;
    Ok(encode(&rendered, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{Point, StrokeTool};
    use crate::color::Color;
    use crate::export::ExportFormat;

    fn gray(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::filled(width, height, [120, 120, 120, 255])
    }

    fn render_default(source: &PixelBuffer, recipe: &EditRecipe) -> PixelBuffer {
        render(source, recipe, &FontBook::new(), InterpolationFilter::Bilinear).unwrap()
    }

    #[test]
    fn test_empty_recipe_is_identity() {
        let src = gray(16, 9);
        let recipe = EditRecipe::new();
        assert!(recipe.is_identity());
        assert_eq!(render_default(&src, &recipe), src);
    }

    #[test]
    fn test_crop_sets_output_size() {
        let src = gray(40, 30);
        let recipe = EditRecipe {
            crop: Some(CropState {
                x: 5,
                y: 5,
                width: 20,
                height: 10,
                ..CropState::full(0, 0)
            }),
            ..EditRecipe::default()
        };
        assert!(!recipe.is_identity());
        let out = render_default(&src, &recipe);
        assert_eq!((out.width(), out.height()), (20, 10));
    }

    #[test]
    fn test_bad_crop_is_an_error() {
        let src = gray(10, 10);
        let recipe = EditRecipe {
            crop: Some(CropState::full(20, 20)),
            ..EditRecipe::default()
        };
        let err = render(&src, &recipe, &FontBook::new(), InterpolationFilter::Bilinear);
        assert!(matches!(err, Err(PipelineError::Transform(_))));
    }

    #[test]
    fn test_vignette_runs_after_adjustments() {
        let src = gray(100, 100);
        let mut recipe = EditRecipe::new();
        recipe.adjustments.vignette = 100.0;
        let out = render_default(&src, &recipe);
        assert_eq!(out.pixel(50, 50), Some([120, 120, 120, 255]));
        // 0.7 black over 120
        assert_eq!(out.pixel(0, 0), Some([36, 36, 36, 255]));
    }

    #[test]
    fn test_strokes_drawn_after_adjustments() {
        let src = gray(40, 40);
        let mut recipe = EditRecipe::new();
        recipe.adjustments.brightness = 100.0;
        recipe.strokes.push(DrawStroke {
            tool: StrokeTool::Pen,
            color: Color::BLACK,
            size: 4.0,
            points: vec![Point::new(5.0, 20.0), Point::new(35.0, 20.0), Point::new(35.0, 20.0)],
        });
        let out = render_default(&src, &recipe);
        // Ink is not brightened
        assert_eq!(out.pixel(20, 20), Some([0, 0, 0, 255]));
        assert_eq!(out.pixel(20, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let src = gray(8, 8);
        let mut wild = EditRecipe::new();
        wild.adjustments.exposure = 1e9;
        let mut max = EditRecipe::new();
        max.adjustments.exposure = 100.0;
        assert_eq!(render_default(&src, &wild), render_default(&src, &max));
    }

    #[test]
    fn test_render_and_encode() {
        let src = gray(32, 24);
        let encoded = render_and_encode(
            &src,
            &EditRecipe::new(),
            &FontBook::new(),
            &ExportOptions::default(),
        )
        .unwrap();
        assert_eq!(encoded.format, ExportFormat::Jpeg);
        assert_eq!(&encoded.bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_recipe_from_json() {
        let recipe: EditRecipe = serde_json::from_str(
            r##"{
                "adjustments": {"exposure": 20, "blackPoint": -5},
                "crop": {"x": 0, "y": 0, "width": 10, "height": 10, "flipH": true},
                "strokes": [{"tool": "pen", "color": "#000", "size": 3, "points": []}],
                "overlays": []
            }"##,
        )
        .unwrap();
        assert_eq!(recipe.adjustments.exposure, 20.0);
        assert_eq!(recipe.adjustments.black_point, -5.0);
        assert!(recipe.crop.as_ref().unwrap().flip_h);
        assert_eq!(recipe.strokes.len(), 1);

        let empty: EditRecipe = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, EditRecipe::default());
    }
}
