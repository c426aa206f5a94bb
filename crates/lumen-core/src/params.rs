//! Adjustment parameter model.
//!
//! [`AdjustmentValues`] is the fixed schema of 15 tone/color controls that
//! the editor exposes as sliders. [`AdjustmentField`] enumerates the same
//! controls with their slider metadata, and [`PartialAdjustments`] is the
//! sparse form used by presets, where unspecified fields are left alone.
//!
//! ## Range policy
//! Out-of-range values are clamped silently to the field's documented range
//! and non-finite values are treated as neutral (0). The policy is applied
//! uniformly by [`AdjustmentValues::clamped`], which the engine calls before
//! touching any pixel.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Every tone/color control the editor exposes.
///
/// All fields are neutral at 0. Serialized with camelCase keys
/// (`blackPoint`, `noiseReduction`) to match the UI's JSON shape; missing
/// keys deserialize as neutral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdjustmentValues {
    /// Exposure (-100 to 100), multiplies channels by `1 + exposure/100`
    pub exposure: f32,
    /// Brilliance (-100 to 100), lifts darker pixels more than bright ones
    pub brilliance: f32,
    /// Highlights (-100 to 100)
    pub highlights: f32,
    /// Shadows (-100 to 100)
    pub shadows: f32,
    /// Contrast (-100 to 100)
    pub contrast: f32,
    /// Brightness (-100 to 100)
    pub brightness: f32,
    /// Black point (-100 to 100)
    pub black_point: f32,
    /// Saturation (-100 to 100)
    pub saturation: f32,
    /// Vibrance (-100 to 100)
    pub vibrance: f32,
    /// Warmth (-100 to 100), shifts red against blue
    pub warmth: f32,
    /// Tint (-100 to 100), shifts green
    pub tint: f32,
    /// Sharpness (0 to 100). Stored only, no pixel effect.
    pub sharpness: f32,
    /// Definition (-100 to 100). Stored only, no pixel effect.
    pub definition: f32,
    /// Noise reduction (0 to 100). Stored only, no pixel effect.
    pub noise_reduction: f32,
    /// Vignette (0 to 100), applied as a post-pass
    pub vignette: f32,
}

impl AdjustmentValues {
    /// Create a new AdjustmentValues with all-neutral values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if every field is neutral
    pub fn is_neutral(&self) -> bool {
        AdjustmentField::ALL.iter().all(|&f| self.get(f) == 0.0)
    }

    pub fn get(&self, field: AdjustmentField) -> f32 {
        match field {
            AdjustmentField::Exposure => self.exposure,
            AdjustmentField::Brilliance => self.brilliance,
            AdjustmentField::Highlights => self.highlights,
            AdjustmentField::Shadows => self.shadows,
            AdjustmentField::Contrast => self.contrast,
            AdjustmentField::Brightness => self.brightness,
            AdjustmentField::BlackPoint => self.black_point,
            AdjustmentField::Saturation => self.saturation,
            AdjustmentField::Vibrance => self.vibrance,
            AdjustmentField::Warmth => self.warmth,
            AdjustmentField::Tint => self.tint,
            AdjustmentField::Sharpness => self.sharpness,
            AdjustmentField::Definition => self.definition,
            AdjustmentField::NoiseReduction => self.noise_reduction,
            AdjustmentField::Vignette => self.vignette,
        }
    }

    pub fn set(&mut self, field: AdjustmentField, value: f32) {
        let slot = match field {
            AdjustmentField::Exposure => &mut self.exposure,
            AdjustmentField::Brilliance => &mut self.brilliance,
            AdjustmentField::Highlights => &mut self.highlights,
            AdjustmentField::Shadows => &mut self.shadows,
            AdjustmentField::Contrast => &mut self.contrast,
            AdjustmentField::Brightness => &mut self.brightness,
            AdjustmentField::BlackPoint => &mut self.black_point,
            AdjustmentField::Saturation => &mut self.saturation,
            AdjustmentField::Vibrance => &mut self.vibrance,
            AdjustmentField::Warmth => &mut self.warmth,
            AdjustmentField::Tint => &mut self.tint,
            AdjustmentField::Sharpness => &mut self.sharpness,
            AdjustmentField::Definition => &mut self.definition,
            AdjustmentField::NoiseReduction => &mut self.noise_reduction,
            AdjustmentField::Vignette => &mut self.vignette,
        };
        *slot = value;
    }

    /// Return a copy with every field forced into its documented range.
    ///
    /// Non-finite values become 0. Emits a `warn!` per corrected field.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for &field in AdjustmentField::ALL.iter() {
            let value = self.get(field);
            let fixed = field.clamp(value);
            if fixed != value {
                warn!(field = field.key(), value, clamped = fixed, "adjustment out of range");
                out.set(field, fixed);
            }
        }
        out
    }

    /// Shallow-merge a partial override. Fields that are `None` in
    /// `partial` keep their current value.
    pub fn merge(&self, partial: &PartialAdjustments) -> Self {
        let mut out = *self;
        for &field in AdjustmentField::ALL.iter() {
            if let Some(value) = partial.get(field) {
                out.set(field, value);
            }
        }
        out
    }
}

/// Identifies one adjustment control, with the UI slider metadata for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdjustmentField {
    Exposure,
    Brilliance,
    Highlights,
    Shadows,
    Contrast,
    Brightness,
    BlackPoint,
    Saturation,
    Vibrance,
    Warmth,
    Tint,
    Sharpness,
    Definition,
    NoiseReduction,
    Vignette,
}

impl AdjustmentField {
    /// All fields in slider display order.
    pub const ALL: [AdjustmentField; 15] = [
        AdjustmentField::Exposure,
        AdjustmentField::Brilliance,
        AdjustmentField::Highlights,
        AdjustmentField::Shadows,
        AdjustmentField::Contrast,
        AdjustmentField::Brightness,
        AdjustmentField::BlackPoint,
        AdjustmentField::Saturation,
        AdjustmentField::Vibrance,
        AdjustmentField::Warmth,
        AdjustmentField::Tint,
        AdjustmentField::Sharpness,
        AdjustmentField::Definition,
        AdjustmentField::NoiseReduction,
        AdjustmentField::Vignette,
    ];

    /// JSON key, matching the serialized form of [`AdjustmentValues`].
    pub fn key(self) -> &'static str {
        match self {
            AdjustmentField::Exposure => "exposure",
            AdjustmentField::Brilliance => "brilliance",
            AdjustmentField::Highlights => "highlights",
            AdjustmentField::Shadows => "shadows",
            AdjustmentField::Contrast => "contrast",
            AdjustmentField::Brightness => "brightness",
            AdjustmentField::BlackPoint => "blackPoint",
            AdjustmentField::Saturation => "saturation",
            AdjustmentField::Vibrance => "vibrance",
            AdjustmentField::Warmth => "warmth",
            AdjustmentField::Tint => "tint",
            AdjustmentField::Sharpness => "sharpness",
            AdjustmentField::Definition => "definition",
            AdjustmentField::NoiseReduction => "noiseReduction",
            AdjustmentField::Vignette => "vignette",
        }
    }

    /// Human-readable slider label.
    pub fn label(self) -> &'static str {
        match self {
            AdjustmentField::Exposure => "Exposure",
            AdjustmentField::Brilliance => "Brilliance",
            AdjustmentField::Highlights => "Highlights",
            AdjustmentField::Shadows => "Shadows",
            AdjustmentField::Contrast => "Contrast",
            AdjustmentField::Brightness => "Brightness",
            AdjustmentField::BlackPoint => "Black Point",
            AdjustmentField::Saturation => "Saturation",
            AdjustmentField::Vibrance => "Vibrance",
            AdjustmentField::Warmth => "Warmth",
            AdjustmentField::Tint => "Tint",
            AdjustmentField::Sharpness => "Sharpness",
            AdjustmentField::Definition => "Definition",
            AdjustmentField::NoiseReduction => "Noise Reduction",
            AdjustmentField::Vignette => "Vignette",
        }
    }

    /// Inclusive `(min, max)` range of the slider.
    pub fn range(self) -> (f32, f32) {
        match self {
            AdjustmentField::Sharpness
            | AdjustmentField::NoiseReduction
            | AdjustmentField::Vignette => (0.0, 100.0),
            _ => (-100.0, 100.0),
        }
    }

    /// Look a field up by its JSON key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Apply the range policy to a single value.
    #[inline]
    pub fn clamp(self, value: f32) -> f32 {
        if !value.is_finite() {
            return 0.0;
        }
        let (min, max) = self.range();
        value.clamp(min, max)
    }
}

/// Sparse override of [`AdjustmentValues`]; `None` means "leave unchanged".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialAdjustments {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brilliance: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadows: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub black_point: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vibrance: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warmth: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharpness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_reduction: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vignette: Option<f32>,
}

impl PartialAdjustments {
    /// Override nothing.
    pub const EMPTY: PartialAdjustments = PartialAdjustments {
        exposure: None,
        brilliance: None,
        highlights: None,
        shadows: None,
        contrast: None,
        brightness: None,
        black_point: None,
        saturation: None,
        vibrance: None,
        warmth: None,
        tint: None,
        sharpness: None,
        definition: None,
        noise_reduction: None,
        vignette: None,
    };

    pub fn get(&self, field: AdjustmentField) -> Option<f32> {
        match field {
            AdjustmentField::Exposure => self.exposure,
            AdjustmentField::Brilliance => self.brilliance,
            AdjustmentField::Highlights => self.highlights,
            AdjustmentField::Shadows => self.shadows,
            AdjustmentField::Contrast => self.contrast,
            AdjustmentField::Brightness => self.brightness,
            AdjustmentField::BlackPoint => self.black_point,
            AdjustmentField::Saturation => self.saturation,
            AdjustmentField::Vibrance => self.vibrance,
            AdjustmentField::Warmth => self.warmth,
            AdjustmentField::Tint => self.tint,
            AdjustmentField::Sharpness => self.sharpness,
            AdjustmentField::Definition => self.definition,
            AdjustmentField::NoiseReduction => self.noise_reduction,
            AdjustmentField::Vignette => self.vignette,
        }
    }

    /// Fields this override touches, in slider order.
    pub fn fields(&self) -> impl Iterator<Item = AdjustmentField> + '_ {
        AdjustmentField::ALL
            .into_iter()
            .filter(move |&f| self.get(f).is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_neutral() {
        let adj = AdjustmentValues::new();
        assert!(adj.is_neutral());
    }

    #[test]
    fn test_not_neutral() {
        let mut adj = AdjustmentValues::new();
        adj.tint = 1.0;
        assert!(!adj.is_neutral());
    }

    #[test]
    fn test_get_set_every_field() {
        let mut adj = AdjustmentValues::new();
        for (i, &field) in AdjustmentField::ALL.iter().enumerate() {
            adj.set(field, i as f32 + 1.0);
        }
        for (i, &field) in AdjustmentField::ALL.iter().enumerate() {
            assert_eq!(adj.get(field), i as f32 + 1.0, "{}", field.key());
        }
    }

    #[test]
    fn test_clamped_applies_ranges() {
        let mut adj = AdjustmentValues::new();
        adj.exposure = 250.0;
        adj.contrast = -180.0;
        adj.vignette = -20.0;
        adj.sharpness = 101.0;
        adj.warmth = 42.0;

        let c = adj.clamped();
        assert_eq!(c.exposure, 100.0);
        assert_eq!(c.contrast, -100.0);
        assert_eq!(c.vignette, 0.0);
        assert_eq!(c.sharpness, 100.0);
        assert_eq!(c.warmth, 42.0);
    }

    #[test]
    fn test_clamped_neutralizes_non_finite() {
        let mut adj = AdjustmentValues::new();
        adj.saturation = f32::NAN;
        adj.brightness = f32::INFINITY;
        adj.shadows = f32::NEG_INFINITY;

        let c = adj.clamped();
        assert!(c.is_neutral());
    }

    #[test]
    fn test_field_metadata() {
        assert_eq!(AdjustmentField::BlackPoint.key(), "blackPoint");
        assert_eq!(AdjustmentField::NoiseReduction.label(), "Noise Reduction");
        assert_eq!(AdjustmentField::Vignette.range(), (0.0, 100.0));
        assert_eq!(AdjustmentField::Definition.range(), (-100.0, 100.0));
        assert_eq!(
            AdjustmentField::from_key("noiseReduction"),
            Some(AdjustmentField::NoiseReduction)
        );
        assert_eq!(AdjustmentField::from_key("whites"), None);
    }

    #[test]
    fn test_keys_match_serde() {
        let mut adj = AdjustmentValues::new();
        for &field in AdjustmentField::ALL.iter() {
            adj.set(field, 1.0);
        }
        let json = serde_json::to_value(adj).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 15);
        for &field in AdjustmentField::ALL.iter() {
            assert!(obj.contains_key(field.key()), "missing {}", field.key());
        }
    }

    #[test]
    fn test_deserialize_missing_fields_are_neutral() {
        let adj: AdjustmentValues =
            serde_json::from_str(r#"{"blackPoint": 12, "noiseReduction": 40}"#).unwrap();
        assert_eq!(adj.black_point, 12.0);
        assert_eq!(adj.noise_reduction, 40.0);
        assert_eq!(adj.exposure, 0.0);
    }

    #[test]
    fn test_merge_keeps_unspecified() {
        let mut base = AdjustmentValues::new();
        base.exposure = 20.0;
        base.saturation = 5.0;

        let partial = PartialAdjustments {
            saturation: Some(30.0),
            ..PartialAdjustments::EMPTY
        };
        let merged = base.merge(&partial);
        assert_eq!(merged.exposure, 20.0);
        assert_eq!(merged.saturation, 30.0);
    }

    #[test]
    fn test_merge_empty_is_identity() {
        let mut base = AdjustmentValues::new();
        base.tint = -7.0;
        assert_eq!(base.merge(&PartialAdjustments::EMPTY), base);
    }

    #[test]
    fn test_partial_serde_skips_none() {
        let partial = PartialAdjustments {
            black_point: Some(20.0),
            ..PartialAdjustments::default()
        };
        let json = serde_json::to_string(&partial).unwrap();
        assert_eq!(json, r#"{"blackPoint":20.0}"#);
        assert_eq!(partial.fields().collect::<Vec<_>>(), vec![AdjustmentField::BlackPoint]);
        assert!(PartialAdjustments::EMPTY.is_empty());
    }
}
