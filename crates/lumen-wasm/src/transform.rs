//! WASM bindings for crop, rotate and flip.
//!
//! The crop record is passed as the UI's plain object
//! (`{x, y, width, height, rotation, flipH, flipV, aspectRatio}`).

use crate::types::{from_js, to_js, to_js_error, JsPixelBuffer};
use lumen_core::transform::{apply_transform as core_transform, ASPECT_RATIOS};
use lumen_core::{CropState, InterpolationFilter, TransformError};
use wasm_bindgen::prelude::*;

pub(crate) fn filter_for(use_lanczos: bool) -> InterpolationFilter {
    if use_lanczos {
        InterpolationFilter::Lanczos3
    } else {
        InterpolationFilter::Bilinear
    }
}

pub(crate) fn transform_image(
    image: &JsPixelBuffer,
    crop: &CropState,
    use_lanczos: bool,
) -> Result<JsPixelBuffer, TransformError> {
    core_transform(image.buffer(), crop, filter_for(use_lanczos)).map(JsPixelBuffer::from_buffer)
}

/// Realize a crop/rotation/flip against an image.
///
/// The output has exactly the crop's dimensions; corners swept out by
/// rotation are transparent.
///
/// # Example (TypeScript)
///
/// ```typescript
/// // Preview (fast, bilinear)
/// const view = apply_transform(source, { x: 0, y: 0, width: 800, height: 600, rotation: 90 }, false);
///
/// // Export (high quality, lanczos)
/// const exported = apply_transform(source, crop, true);
/// ```
///
/// # Errors
/// Returns an error if the crop object is malformed, empty, or extends past
/// the image.
#[wasm_bindgen]
pub fn apply_transform(
    image: &JsPixelBuffer,
    crop: JsValue,
    use_lanczos: bool,
) -> Result<JsPixelBuffer, JsValue> {
    let crop: CropState = from_js(crop, "crop")?;
    transform_image(image, &crop, use_lanczos).map_err(to_js_error)
}

/// Shrink a crop to its advisory aspect ratio, keeping it centered.
#[wasm_bindgen]
pub fn constrain_crop(crop: JsValue) -> Result<JsValue, JsValue> {
    let crop: CropState = from_js(crop, "crop")?;
    to_js(&crop.constrained_to_aspect())
}

/// The crop tool's aspect ratio choices as `[{label, value}]`.
#[wasm_bindgen]
pub fn aspect_ratios() -> Result<JsValue, JsValue> {
    to_js(&ASPECT_RATIOS)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_apply_transform_from_object() {
        let img = JsPixelBuffer::try_new(4, 4, vec![255u8; 64]).unwrap();
        let crop = js_sys::JSON::parse(r#"{"x":1,"y":1,"width":2,"height":3,"flipV":true}"#).unwrap();
        let out = apply_transform(&img, crop, false).unwrap();
        assert_eq!((out.width(), out.height()), (2, 3));
    }

    #[wasm_bindgen_test]
    fn test_apply_transform_error_message() {
        let img = JsPixelBuffer::try_new(4, 4, vec![255u8; 64]).unwrap();
        let crop = js_sys::JSON::parse(r#"{"x":3,"y":0,"width":2,"height":4}"#).unwrap();
        let err = apply_transform(&img, crop, false).unwrap_err();
        assert!(err.as_string().unwrap_or_default().contains("exceeds source bounds"));
    }

    #[wasm_bindgen_test]
    fn test_aspect_ratios() {
        let array = js_sys::Array::from(&aspect_ratios().unwrap());
        assert_eq!(array.length(), 8);
    }
}
