//! Adjustment and preset WASM bindings.
//!
//! This module provides JavaScript bindings for [`AdjustmentValues`], the
//! preset catalog and the slider metadata, allowing edit parameters to be
//! manipulated from TypeScript.

use crate::types::{from_js, to_js, JsPixelBuffer};
use lumen_core::{apply_vignette, preset_by_id, presets, AdjustmentField, AdjustmentValues};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Adjustment values wrapper for JavaScript.
///
/// Property names match the UI's camelCase keys (`blackPoint`,
/// `noiseReduction`).
#[wasm_bindgen]
pub struct JsAdjustmentValues {
    inner: AdjustmentValues,
}

/// Generates a getter/setter pair per adjustment field.
macro_rules! adjustment_accessors {
    ($($field:ident, $setter:ident, $js:ident;)*) => {
        #[wasm_bindgen]
        impl JsAdjustmentValues {
            $(
                #[wasm_bindgen(getter = $js)]
                pub fn $field(&self) -> f32 {
                    self.inner.$field
                }

                #[wasm_bindgen(setter = $js)]
                pub fn $setter(&mut self, value: f32) {
                    self.inner.$field = value;
                }
            )*
        }
    };
}

adjustment_accessors! {
    exposure, set_exposure, exposure;
    brilliance, set_brilliance, brilliance;
    highlights, set_highlights, highlights;
    shadows, set_shadows, shadows;
    contrast, set_contrast, contrast;
    brightness, set_brightness, brightness;
    black_point, set_black_point, blackPoint;
    saturation, set_saturation, saturation;
    vibrance, set_vibrance, vibrance;
    warmth, set_warmth, warmth;
    tint, set_tint, tint;
    sharpness, set_sharpness, sharpness;
    definition, set_definition, definition;
    noise_reduction, set_noise_reduction, noiseReduction;
    vignette, set_vignette, vignette;
}

#[wasm_bindgen]
impl JsAdjustmentValues {
    /// Create new adjustment values, all neutral
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: AdjustmentValues::new(),
        }
    }

    /// Check if every adjustment is at its neutral value
    pub fn is_neutral(&self) -> bool {
        self.inner.is_neutral()
    }

    /// Reset every adjustment to neutral
    pub fn reset(&mut self) {
        self.inner = AdjustmentValues::new();
    }

    /// Merge a preset onto the current values.
    ///
    /// Returns `false` (and leaves the values untouched) if `id` is not a
    /// known preset.
    pub fn apply_preset(&mut self, id: &str) -> bool {
        match preset_by_id(id) {
            Some(preset) => {
                self.inner = preset.apply_to(&self.inner);
                true
            }
            None => false,
        }
    }

    /// Serialize to JSON for storage
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner)
    }

    /// Deserialize from JSON; missing fields are neutral
    pub fn from_json(value: JsValue) -> Result<JsAdjustmentValues, JsValue> {
        let inner: AdjustmentValues = from_js(value, "adjustments")?;
        Ok(Self { inner })
    }
}

impl Default for JsAdjustmentValues {
    fn default() -> Self {
        Self::new()
    }
}

impl JsAdjustmentValues {
    pub(crate) fn inner(&self) -> &AdjustmentValues {
        &self.inner
    }
}

/// Apply tone, color and vignette adjustments to an image.
///
/// Returns a new image; the source is not modified.
///
/// # Example (TypeScript)
/// ```typescript
/// const adj = new JsAdjustmentValues();
/// adj.exposure = 20;
/// adj.vignette = 40;
///
/// const adjusted = apply_adjustments(sourceImage, adj);
/// ctx.putImageData(new ImageData(new Uint8ClampedArray(adjusted.pixels()), adjusted.width), 0, 0);
/// ```
#[wasm_bindgen]
pub fn apply_adjustments(image: &JsPixelBuffer, adjustments: &JsAdjustmentValues) -> JsPixelBuffer {
    let values = adjustments.inner().clamped();
    let mut buffer = image.buffer().clone();
    lumen_core::apply_adjustments(&mut buffer, &values);
    if values.vignette > 0.0 {
        apply_vignette(&mut buffer, values.vignette / 100.0);
    }
    JsPixelBuffer::from_buffer(buffer)
}

/// The preset catalog as `[{id, name, adjustments}]`.
#[wasm_bindgen]
pub fn list_presets() -> Result<JsValue, JsValue> {
    to_js(presets())
}

/// Slider metadata for one adjustment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct FieldInfo {
    key: &'static str,
    label: &'static str,
    min: f32,
    max: f32,
}

pub(crate) fn field_infos() -> Vec<FieldInfo> {
    AdjustmentField::ALL
        .iter()
        .map(|&field| {
            let (min, max) = field.range();
            FieldInfo {
                key: field.key(),
                label: field.label(),
                min,
                max,
            }
        })
        .collect()
}

/// Slider metadata as `[{key, label, min, max}]`, in display order.
#[wasm_bindgen]
pub fn adjustment_fields() -> Result<JsValue, JsValue> {
    to_js(&field_infos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(value: u8) -> JsPixelBuffer {
        JsPixelBuffer::try_new(10, 10, [value, value, value, 255].repeat(100)).unwrap()
    }

    #[test]
    fn test_accessors() {
        let mut adj = JsAdjustmentValues::new();
        assert!(adj.is_neutral());

        adj.set_black_point(-20.0);
        adj.set_noise_reduction(40.0);
        assert_eq!(adj.black_point(), -20.0);
        assert_eq!(adj.noise_reduction(), 40.0);
        assert!(!adj.is_neutral());

        adj.reset();
        assert!(adj.is_neutral());
    }

    #[test]
    fn test_apply_preset() {
        let mut adj = JsAdjustmentValues::new();
        adj.set_exposure(10.0);
        assert!(adj.apply_preset("mono"));
        assert_eq!(adj.saturation(), -100.0);
        assert_eq!(adj.exposure(), 10.0);

        assert!(!adj.apply_preset("does-not-exist"));
        assert_eq!(adj.saturation(), -100.0);
    }

    #[test]
    fn test_apply_adjustments_identity() {
        let img = gray(128);
        let result = apply_adjustments(&img, &JsAdjustmentValues::new());
        assert_eq!(result.pixels(), img.pixels());
    }

    #[test]
    fn test_apply_adjustments_does_not_modify_original() {
        let img = gray(128);
        let original = img.pixels();
        let mut adj = JsAdjustmentValues::new();
        adj.set_brightness(50.0);

        let result = apply_adjustments(&img, &adj);
        assert_eq!(img.pixels(), original);
        assert!(result.pixels()[0] > 128);
    }

    #[test]
    fn test_apply_adjustments_includes_vignette() {
        let img = gray(200);
        let mut adj = JsAdjustmentValues::new();
        adj.set_vignette(100.0);

        let result = apply_adjustments(&img, &adj);
        let pixels = result.pixels();
        assert!(pixels[0] < 200, "corner should darken");
    }

    #[test]
    fn test_field_infos() {
        let infos = field_infos();
        assert_eq!(infos.len(), 15);
        assert_eq!(infos[0].key, "exposure");
        let sharpness = infos.iter().find(|i| i.key == "sharpness").unwrap();
        assert_eq!((sharpness.min, sharpness.max), (0.0, 100.0));
        assert!(infos.iter().any(|i| i.key == "noiseReduction"));
    }
}
