//! Built-in filter presets.
//!
//! A preset is a named [`PartialAdjustments`]. Applying one is a shallow
//! merge onto the current values, never a replace: fields the preset does
//! not mention keep whatever the user already dialed in.

use crate::params::{AdjustmentValues, PartialAdjustments};
use serde::Serialize;

/// A named, immutable adjustment override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterPreset {
    /// Stable identifier (`"vivid-warm"`)
    pub id: &'static str,
    /// Display name (`"Vivid Warm"`)
    pub name: &'static str,
    /// Fields this preset sets
    pub adjustments: PartialAdjustments,
}

impl FilterPreset {
    /// Merge this preset onto `current`.
    pub fn apply_to(&self, current: &AdjustmentValues) -> AdjustmentValues {
        current.merge(&self.adjustments)
    }
}

const E: PartialAdjustments = PartialAdjustments::EMPTY;

static PRESETS: [FilterPreset; 10] = [
    FilterPreset {
        id: "original",
        name: "Original",
        adjustments: E,
    },
    FilterPreset {
        id: "vivid",
        name: "Vivid",
        adjustments: PartialAdjustments {
            saturation: Some(30.0),
            contrast: Some(15.0),
            vibrance: Some(25.0),
            ..E
        },
    },
    FilterPreset {
        id: "vivid-warm",
        name: "Vivid Warm",
        adjustments: PartialAdjustments {
            saturation: Some(25.0),
            contrast: Some(10.0),
            warmth: Some(25.0),
            vibrance: Some(20.0),
            ..E
        },
    },
    FilterPreset {
        id: "vivid-cool",
        name: "Vivid Cool",
        adjustments: PartialAdjustments {
            saturation: Some(25.0),
            contrast: Some(10.0),
            warmth: Some(-20.0),
            tint: Some(-10.0),
            vibrance: Some(20.0),
            ..E
        },
    },
    FilterPreset {
        id: "dramatic",
        name: "Dramatic",
        adjustments: PartialAdjustments {
            contrast: Some(40.0),
            highlights: Some(-20.0),
            shadows: Some(20.0),
            saturation: Some(-10.0),
            definition: Some(30.0),
            ..E
        },
    },
    FilterPreset {
        id: "dramatic-warm",
        name: "Dramatic Warm",
        adjustments: PartialAdjustments {
            contrast: Some(35.0),
            highlights: Some(-15.0),
            shadows: Some(15.0),
            warmth: Some(20.0),
            saturation: Some(-5.0),
            definition: Some(25.0),
            ..E
        },
    },
    FilterPreset {
        id: "dramatic-cool",
        name: "Dramatic Cool",
        adjustments: PartialAdjustments {
            contrast: Some(35.0),
            highlights: Some(-20.0),
            shadows: Some(15.0),
            warmth: Some(-15.0),
            saturation: Some(-5.0),
            definition: Some(25.0),
            ..E
        },
    },
    FilterPreset {
        id: "mono",
        name: "Mono",
        adjustments: PartialAdjustments {
            saturation: Some(-100.0),
            contrast: Some(10.0),
            ..E
        },
    },
    FilterPreset {
        id: "silvertone",
        name: "Silvertone",
        adjustments: PartialAdjustments {
            saturation: Some(-100.0),
            contrast: Some(20.0),
            brightness: Some(10.0),
            highlights: Some(-10.0),
            ..E
        },
    },
    FilterPreset {
        id: "noir",
        name: "Noir",
        adjustments: PartialAdjustments {
            saturation: Some(-100.0),
            contrast: Some(45.0),
            black_point: Some(20.0),
            shadows: Some(-20.0),
            ..E
        },
    },
];

/// The full preset catalog in display order.
pub fn presets() -> &'static [FilterPreset] {
    &PRESETS
}

/// Find a preset by its identifier.
pub fn preset_by_id(id: &str) -> Option<&'static FilterPreset> {
    PRESETS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::AdjustmentField;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_order_and_size() {
        let ids: Vec<_> = presets().iter().map(|p| p.id).collect();
        assert_eq!(
            ids,
            vec![
                "original",
                "vivid",
                "vivid-warm",
                "vivid-cool",
                "dramatic",
                "dramatic-warm",
                "dramatic-cool",
                "mono",
                "silvertone",
                "noir"
            ]
        );
    }

    #[test]
    fn test_ids_unique() {
        let ids: HashSet<_> = presets().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), presets().len());
    }

    #[test]
    fn test_vivid_on_defaults_touches_exactly_three_fields() {
        let vivid = preset_by_id("vivid").unwrap();
        let result = vivid.apply_to(&AdjustmentValues::default());

        let changed: Vec<_> = AdjustmentField::ALL
            .iter()
            .copied()
            .filter(|&f| result.get(f) != 0.0)
            .collect();
        assert_eq!(
            changed,
            vec![
                AdjustmentField::Contrast,
                AdjustmentField::Saturation,
                AdjustmentField::Vibrance
            ]
        );
        assert_eq!(result.saturation, 30.0);
        assert_eq!(result.contrast, 15.0);
        assert_eq!(result.vibrance, 25.0);
    }

    #[test]
    fn test_original_is_noop_merge() {
        let mut current = AdjustmentValues::default();
        current.exposure = 33.0;
        let result = preset_by_id("original").unwrap().apply_to(&current);
        assert_eq!(result, current);
    }

    #[test]
    fn test_preset_merge_preserves_user_values() {
        let mut current = AdjustmentValues::default();
        current.exposure = 12.0;
        current.saturation = 50.0;

        let result = preset_by_id("noir").unwrap().apply_to(&current);
        assert_eq!(result.exposure, 12.0, "untouched field kept");
        assert_eq!(result.saturation, -100.0, "preset field overrides");
        assert_eq!(result.black_point, 20.0);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(preset_by_id("sepia").is_none());
    }

    #[test]
    fn test_all_presets_within_ranges() {
        for preset in presets() {
            for field in preset.adjustments.fields() {
                let v = preset.adjustments.get(field).unwrap();
                assert_eq!(field.clamp(v), v, "{}.{}", preset.id, field.key());
            }
        }
    }
}
