//! Annotation WASM bindings: ink strokes and text labels.
//!
//! Fonts are not read from the system. The page fetches font files and
//! registers them in a [`JsFontBook`].
//!
//! # Example
//!
//! ```typescript
//! const fonts = new JsFontBook();
//! fonts.register("Inter", new Uint8Array(await (await fetch("/fonts/Inter.ttf")).arrayBuffer()));
//!
//! let out = render_strokes(image, strokes);
//! out = render_text_overlays(out, overlays, fonts);
//! ```

use crate::types::{from_js, to_js_error, JsPixelBuffer};
use lumen_core::{DrawStroke, FontBook, TextOverlay};
use wasm_bindgen::prelude::*;

/// Font registry for text overlays.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsFontBook {
    inner: FontBook,
}

#[wasm_bindgen]
impl JsFontBook {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font file bytes (TTF/OTF) under a family name.
    ///
    /// The first registered family is used when an overlay's family list
    /// matches nothing.
    pub fn register(&mut self, family: &str, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.inner.register(family, bytes).map_err(to_js_error)
    }

    /// Choose the family used when nothing else matches.
    pub fn set_fallback(&mut self, family: &str) -> Result<(), JsValue> {
        self.inner.set_fallback(family).map_err(to_js_error)
    }

    /// Number of registered families
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.inner.len()
    }

    /// Registered family names (lowercased)
    pub fn families(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.families().map(str::to_string).collect();
        names.sort();
        names
    }
}

impl JsFontBook {
    pub(crate) fn inner(&self) -> &FontBook {
        &self.inner
    }

    #[cfg(test)]
    fn try_register(&mut self, family: &str, bytes: Vec<u8>) -> Result<(), lumen_core::FontError> {
        self.inner.register(family, bytes)
    }
}

pub(crate) fn strokes_onto(image: &JsPixelBuffer, strokes: &[DrawStroke]) -> JsPixelBuffer {
    let mut buffer = image.buffer().clone();
    lumen_core::render_strokes(&mut buffer, strokes);
    JsPixelBuffer::from_buffer(buffer)
}

pub(crate) fn text_onto(
    image: &JsPixelBuffer,
    overlays: &[TextOverlay],
    fonts: &JsFontBook,
) -> JsPixelBuffer {
    let mut buffer = image.buffer().clone();
    lumen_core::render_text_overlays(&mut buffer, overlays, fonts.inner());
    JsPixelBuffer::from_buffer(buffer)
}

/// Burn ink strokes (`[{tool, color, size, points}]`) into a copy of `image`.
#[wasm_bindgen]
pub fn render_strokes(image: &JsPixelBuffer, strokes: JsValue) -> Result<JsPixelBuffer, JsValue> {
    let strokes: Vec<DrawStroke> = from_js(strokes, "strokes")?;
    Ok(strokes_onto(image, &strokes))
}

/// Draw text overlays (`[{text, x, y, fontSize, color, fontFamily}]`) into a
/// copy of `image`.
#[wasm_bindgen]
pub fn render_text_overlays(
    image: &JsPixelBuffer,
    overlays: JsValue,
    fonts: &JsFontBook,
) -> Result<JsPixelBuffer, JsValue> {
    let overlays: Vec<TextOverlay> = from_js(overlays, "text overlays")?;
    Ok(text_onto(image, &overlays, fonts))
}
