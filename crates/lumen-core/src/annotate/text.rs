//! Text labels.
//!
//! Overlays are single-line labels anchored at their alphabetic baseline.
//! Font files are supplied by the caller through a [`FontBook`]; nothing is
//! loaded from the system.

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::color::{blend_over, Color};
use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Largest em size drawn, as a multiple of the buffer's longer side.
const MAX_FONT_SIZE_FACTOR: f32 = 4.0;

/// Errors raised while registering fonts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontError {
    /// Bytes are not a parseable TrueType/OpenType font
    #[error("Invalid font data for family {0:?}")]
    InvalidFont(String),

    /// Fallback names a family that was never registered
    #[error("Unknown font family: {0:?}")]
    UnknownFamily(String),
}

/// A text label anchored at `(x, y)` on its baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Em size in pixels
    pub font_size: f32,
    pub color: Color,
    /// CSS family list, e.g. `"'Helvetica Neue', Arial, sans-serif"`
    #[serde(default)]
    pub font_family: String,
}

/// Registry of caller-supplied fonts keyed by family name.
#[derive(Debug, Clone, Default)]
pub struct FontBook {
    fonts: HashMap<String, FontArc>,
    fallback: Option<String>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font under `family`, replacing any previous entry.
    ///
    /// The first registered family becomes the fallback unless one has been
    /// set explicitly.
    pub fn register(&mut self, family: &str, bytes: Vec<u8>) -> Result<(), FontError> {
        let font =
            FontArc::try_from_vec(bytes).map_err(|_| FontError::InvalidFont(family.to_string()))?;
        let key = normalize_family(family);
        debug!(family = %key, "Registered font");
        if self.fallback.is_none() {
            self.fallback = Some(key.clone());
        }
        self.fonts.insert(key, font);
        Ok(())
    }

    /// Use `family` when an overlay's family list matches nothing.
    pub fn set_fallback(&mut self, family: &str) -> Result<(), FontError> {
        let key = normalize_family(family);
        if !self.fonts.contains_key(&key) {
            return Err(FontError::UnknownFamily(family.to_string()));
        }
        self.fallback = Some(key);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Registered family names (normalized), in no particular order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    /// Resolve a CSS family list to a registered font.
    pub fn resolve(&self, family_list: &str) -> Option<&FontArc> {
        family_list
            .split(',')
            .map(normalize_family)
            .find_map(|name| self.fonts.get(&name))
            .or_else(|| self.fallback.as_ref().and_then(|f| self.fonts.get(f)))
    }
}

/// Lowercase a family name and strip surrounding whitespace and quotes.
fn normalize_family(name: &str) -> String {
    name.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_lowercase()
}

/// Draw `overlays` over `buffer` in order.
pub fn render_text_overlays(buffer: &mut PixelBuffer, overlays: &[TextOverlay], fonts: &FontBook) {
    if overlays.is_empty() {
        return;
    }
    debug!(count = overlays.len(), "Rendering text overlays");

    for overlay in overlays {
        render_overlay(buffer, overlay, fonts);
    }
}

fn render_overlay(buffer: &mut PixelBuffer, overlay: &TextOverlay, fonts: &FontBook) {
    let alpha = overlay.color.alpha();
    let size = overlay.font_size;
    if overlay.text.is_empty() || alpha <= 0.0 || !(size.is_finite() && size > 0.0) {
        return;
    }
    if !(overlay.x.is_finite() && overlay.y.is_finite()) {
        return;
    }
    let Some(font) = fonts.resolve(&overlay.font_family) else {
        warn!(family = %overlay.font_family, "No font available for text overlay, skipping");
        return;
    };

    let size = clamp_font_size(size, buffer.width(), buffer.height());
    let scale = em_scale(font, size);
    let scaled = font.as_scaled(scale);
    let rgb = overlay.color.rgb_array();
    let (width, height) = (buffer.width() as i64, buffer.height() as i64);

    let mut caret = overlay.x;
    let mut previous: Option<GlyphId> = None;
    for ch in overlay.text.chars() {
        // Canvas text has no line breaks
        let ch = if ch.is_whitespace() { ' ' } else { ch };
        let id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, overlay.y));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        if bounds.max.x <= 0.0
            || bounds.max.y <= 0.0
            || bounds.min.x >= width as f32
            || bounds.min.y >= height as f32
        {
            continue;
        }
        let (left, top) = (bounds.min.x as i64, bounds.min.y as i64);
        outlined.draw(|gx, gy, coverage| {
            let x = left + gx as i64;
            let y = top + gy as i64;
            if coverage <= 0.0 || x < 0 || y < 0 || x >= width || y >= height {
                return;
            }
            let i = buffer.index(x as u32, y as u32);
            blend_over(
                &mut buffer.pixels_mut()[i..i + CHANNELS],
                rgb,
                coverage.min(1.0) * alpha,
            );
        });
    }
    trace!(text = %overlay.text, advance = caret - overlay.x, "Drew text overlay");
}

/// Cap the em size so a single glyph stays proportional to the buffer.
fn clamp_font_size(size: f32, width: u32, height: u32) -> f32 {
    let max = width.max(height) as f32 * MAX_FONT_SIZE_FACTOR;
    if size > max {
        warn!(font_size = size, clamped = max, "font size exceeds canvas, clamping");
        max
    } else {
        size
    }
}

/// Scale giving an em box of `size` pixels.
///
/// `PxScale` measures ascent-to-descent height, which is larger than the em
/// for most fonts.
fn em_scale(font: &FontArc, size: f32) -> PxScale {
    match font.units_per_em() {
        Some(units) if units > 0.0 => PxScale::from(size * font.height_unscaled() / units),
        _ => PxScale::from(size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU: &[u8] = include_bytes!("../../tests/fixtures/DejaVuSans.ttf");

    fn book() -> FontBook {
        let mut fonts = FontBook::new();
        fonts.register("DejaVu Sans", DEJAVU.to_vec()).unwrap();
        fonts
    }

    fn overlay(text: &str, color: Color) -> TextOverlay {
        TextOverlay {
            text: text.to_string(),
            x: 10.0,
            y: 40.0,
            font_size: 32.0,
            color,
            font_family: "DejaVu Sans".to_string(),
        }
    }

    fn inked(buf: &PixelBuffer) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                if buf.pixel(x, y) != Some([255, 255, 255, 255]) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_register_invalid_font() {
        let mut fonts = FontBook::new();
        assert_eq!(
            fonts.register("Broken", vec![0, 1, 2, 3]),
            Err(FontError::InvalidFont("Broken".to_string()))
        );
        assert!(fonts.is_empty());
    }

    #[test]
    fn test_resolve_css_family_list() {
        let fonts = book();
        assert!(fonts
            .resolve("'Helvetica Neue', \"dejavu sans\", sans-serif")
            .is_some());
        assert_eq!(fonts.families().collect::<Vec<_>>(), vec!["dejavu sans"]);
    }

    #[test]
    fn test_first_font_is_fallback() {
        let fonts = book();
        assert!(fonts.resolve("Comic Sans MS").is_some());
        assert!(fonts.resolve("").is_some());
    }

    #[test]
    fn test_set_fallback_requires_registered_family() {
        let mut fonts = book();
        assert_eq!(
            fonts.set_fallback("Arial"),
            Err(FontError::UnknownFamily("Arial".to_string()))
        );
        assert!(fonts.set_fallback("'DejaVu Sans'").is_ok());
    }

    #[test]
    fn test_empty_book_skips_overlay() {
        let mut buf = PixelBuffer::filled(100, 60, [255, 255, 255, 255]);
        let before = buf.clone();
        render_text_overlays(&mut buf, &[overlay("Hi", Color::BLACK)], &FontBook::new());
        assert_eq!(buf, before);
    }

    #[test]
    fn test_text_drawn_above_baseline_right_of_anchor() {
        let mut buf = PixelBuffer::filled(120, 60, [255, 255, 255, 255]);
        render_text_overlays(&mut buf, &[overlay("Hi", Color::BLACK)], &book());

        let ink = inked(&buf);
        assert!(!ink.is_empty(), "text should leave ink");
        // Capitals sit on the baseline, so nothing below y = 40
        assert!(ink.iter().all(|&(_, y)| y < 41 && y > 40 - 32));
        assert!(ink.iter().all(|&(x, _)| x >= 10 && x < 10 + 64));
        // Stem of the H is solid black
        assert!(ink.iter().any(|&(x, y)| buf.pixel(x, y) == Some([0, 0, 0, 255])));
    }

    #[test]
    fn test_whitespace_becomes_space() {
        let fonts = book();
        let mut a = PixelBuffer::filled(200, 60, [255, 255, 255, 255]);
        let mut b = a.clone();
        render_text_overlays(&mut a, &[overlay("a\nb", Color::BLACK)], &fonts);
        render_text_overlays(&mut b, &[overlay("a b", Color::BLACK)], &fonts);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_and_invisible_overlays() {
        let fonts = book();
        let mut buf = PixelBuffer::filled(100, 60, [255, 255, 255, 255]);
        let before = buf.clone();
        let mut zero_size = overlay("Hi", Color::BLACK);
        zero_size.font_size = 0.0;
        render_text_overlays(
            &mut buf,
            &[
                overlay("", Color::BLACK),
                overlay("Hi", Color::rgba(0, 0, 0, 0)),
                zero_size,
            ],
            &fonts,
        );
        assert_eq!(buf, before);
    }

    #[test]
    fn test_later_overlays_draw_over_earlier() {
        let fonts = book();
        let mut buf = PixelBuffer::transparent(120, 60);
        render_text_overlays(
            &mut buf,
            &[
                overlay("Hi", Color::rgb(255, 0, 0)),
                overlay("Hi", Color::rgb(0, 0, 255)),
            ],
            &fonts,
        );
        assert!(buf
            .pixels()
            .chunks_exact(4)
            .filter(|p| p[3] > 0)
            .all(|p| p[2] >= p[0]));
    }

    #[test]
    fn test_text_clipped_at_canvas_edge() {
        let fonts = book();
        let mut buf = PixelBuffer::filled(20, 20, [255, 255, 255, 255]);
        let mut o = overlay("Wide text that runs off", Color::BLACK);
        o.x = -5.0;
        o.y = 15.0;
        render_text_overlays(&mut buf, &[o], &fonts);
        assert!(!inked(&buf).is_empty());
    }

    #[test]
    fn test_clamp_font_size() {
        assert_eq!(clamp_font_size(32.0, 100, 60), 32.0);
        assert_eq!(clamp_font_size(8000.0, 10, 10), 40.0);
        assert_eq!(clamp_font_size(8000.0, 30, 2000), 8000.0);
    }

    #[test]
    fn test_huge_font_on_tiny_canvas() {
        let fonts = book();
        let mut buf = PixelBuffer::filled(10, 10, [255, 255, 255, 255]);
        let mut o = overlay("H", Color::BLACK);
        o.x = -5.0;
        o.y = 5.0;
        o.font_size = 1.0e7;
        render_text_overlays(&mut buf, &[o], &fonts);
        assert!(!inked(&buf).is_empty());
    }

    #[test]
    fn test_glyphs_past_canvas_are_skipped() {
        let fonts = book();
        let mut buf = PixelBuffer::filled(40, 40, [255, 255, 255, 255]);
        let before = buf.clone();
        let mut above = overlay("Hi", Color::BLACK);
        above.y = -50.0;
        let mut right = overlay("Hi", Color::BLACK);
        right.x = 60.0;
        render_text_overlays(&mut buf, &[above, right], &fonts);
        assert_eq!(buf, before);
    }

    #[test]
    fn test_em_scale_exceeds_font_size() {
        let font = FontArc::try_from_slice(DEJAVU).unwrap();
        let scale = em_scale(&font, 32.0);
        assert!(scale.y > 32.0);
    }

    #[test]
    fn test_serde_shape() {
        let o: TextOverlay = serde_json::from_str(
            r##"{"text":"Hello","x":5,"y":30,"fontSize":24,"color":"#ffffff","fontFamily":"Inter, sans-serif"}"##,
        )
        .unwrap();
        assert_eq!(o.font_size, 24.0);
        assert_eq!(o.color, Color::WHITE);
        assert_eq!(o.font_family, "Inter, sans-serif");
    }
}
