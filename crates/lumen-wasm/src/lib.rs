//! Lumen WASM - WebAssembly bindings for Lumen
//!
//! This crate exposes the lumen-core editing engine to the browser editor.
//! Images cross the boundary as RGBA8 pixel data straight from canvas
//! `ImageData`; edit records cross as plain JavaScript objects with the same
//! camelCase shapes the UI stores.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `adjustments` - Adjustment values, presets and slider metadata
//! - `transform` - Crop, rotate and flip
//! - `annotate` - Ink strokes, text overlays and the font registry
//! - `encode` - JPEG/PNG export
//! - `pipeline` - Whole-recipe rendering
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsPixelBuffer, JsAdjustmentValues, apply_adjustments } from '@lumen/wasm';
//!
//! await init();
//!
//! const data = ctx.getImageData(0, 0, canvas.width, canvas.height);
//! const image = new JsPixelBuffer(data.width, data.height, new Uint8Array(data.data.buffer));
//! const adj = new JsAdjustmentValues();
//! adj.apply_preset("vivid");
//! const edited = apply_adjustments(image, adj);
//! ```

use wasm_bindgen::prelude::*;

mod adjustments;
mod annotate;
mod encode;
mod pipeline;
mod transform;
mod types;

// Re-export public types
pub use adjustments::{adjustment_fields, apply_adjustments, list_presets, JsAdjustmentValues};
pub use annotate::{render_strokes, render_text_overlays, JsFontBook};
pub use encode::{encode_image, JsEncodedImage};
pub use pipeline::{export_recipe, render_recipe};
pub use transform::{apply_transform, aspect_ratios, constrain_crop};
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
