//! Export encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_image } from '@lumen/wasm';
//!
//! const encoded = encode_image(image, { format: "jpeg", quality: 0.92 });
//! const blob = new Blob([encoded.bytes()], { type: encoded.mime_type });
//! ```

use crate::types::{from_js, to_js_error, JsPixelBuffer};
use lumen_core::{EncodeError, EncodedImage, ExportOptions};
use wasm_bindgen::prelude::*;

/// An encoded export file.
#[wasm_bindgen]
pub struct JsEncodedImage {
    inner: EncodedImage,
}

#[wasm_bindgen]
impl JsEncodedImage {
    /// Encoded file bytes as a Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// Size of the encoded file in bytes
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.bytes.len()
    }

    /// `image/jpeg` or `image/png`
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type().to_string()
    }

    /// Suggested file extension without the dot
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.inner.format.extension().to_string()
    }

    /// The file as a `data:` URL, for `<img src>` or download links.
    pub fn to_data_url(&self) -> String {
        self.inner.to_data_url()
    }
}

impl JsEncodedImage {
    pub(crate) fn from_encoded(inner: EncodedImage) -> Self {
        Self { inner }
    }
}

/// Read export options, treating `undefined`/`null` as the defaults.
pub(crate) fn options_from_js(options: JsValue) -> Result<ExportOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ExportOptions::default())
    } else {
        from_js(options, "export options")
    }
}

pub(crate) fn encode_with(
    image: &JsPixelBuffer,
    options: &ExportOptions,
) -> Result<JsEncodedImage, EncodeError> {
    lumen_core::encode(image.buffer(), options).map(JsEncodedImage::from_encoded)
}

/// Encode an image as JPEG (default, quality 0.92) or PNG.
///
/// # Arguments
///
/// * `image` - The image to encode
/// * `options` - `{format: "jpeg" | "png", quality: 0..1}`, or `undefined` for defaults
///
/// # Errors
///
/// Returns an error if the options are malformed or encoding fails.
#[wasm_bindgen]
pub fn encode_image(image: &JsPixelBuffer, options: JsValue) -> Result<JsEncodedImage, JsValue> {
    let options = options_from_js(options)?;
    encode_with(image, &options).map_err(to_js_error)
}
