//! Whole-recipe rendering bindings.
//!
//! A recipe is the UI's complete edit state:
//! `{adjustments, crop, strokes, overlays}`. Rendering always starts from
//! the untouched source image.

use crate::annotate::JsFontBook;
use crate::encode::{options_from_js, JsEncodedImage};
use crate::transform::filter_for;
use crate::types::{from_js, to_js_error, JsPixelBuffer};
use lumen_core::{EditRecipe, PipelineError};
use wasm_bindgen::prelude::*;

pub(crate) fn render_with(
    source: &JsPixelBuffer,
    recipe: &EditRecipe,
    fonts: &JsFontBook,
    use_lanczos: bool,
) -> Result<JsPixelBuffer, PipelineError> {
    lumen_core::render(source.buffer(), recipe, fonts.inner(), filter_for(use_lanczos))
        .map(JsPixelBuffer::from_buffer)
}

/// Render a full edit recipe for display.
///
/// # Errors
/// Returns an error if the recipe is malformed or its crop does not fit
/// the source.
#[wasm_bindgen]
pub fn render_recipe(
    source: &JsPixelBuffer,
    recipe: JsValue,
    fonts: &JsFontBook,
    use_lanczos: bool,
) -> Result<JsPixelBuffer, JsValue> {
    let recipe: EditRecipe = from_js(recipe, "edit recipe")?;
    render_with(source, &recipe, fonts, use_lanczos).map_err(to_js_error)
}

/// Render a recipe at export quality and encode it in one step.
#[wasm_bindgen]
pub fn export_recipe(
    source: &JsPixelBuffer,
    recipe: JsValue,
    fonts: &JsFontBook,
    options: JsValue,
) -> Result<JsEncodedImage, JsValue> {
    let recipe: EditRecipe = from_js(recipe, "edit recipe")?;
    let options = options_from_js(options)?;
    lumen_core::render_and_encode(source.buffer(), &recipe, fonts.inner(), &options)
        .map(JsEncodedImage::from_encoded)
        .map_err(to_js_error)
}
