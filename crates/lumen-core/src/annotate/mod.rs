//! Annotation rendering: freehand strokes and text labels.
//!
//! Annotations are burned in last, over whatever buffer is on screen, and
//! are drawn strictly in sequence order. Strokes and labels use the same
//! straight-alpha compositing as the vignette.

mod stroke;
mod text;

pub use stroke::{render_strokes, DrawStroke, Point, StrokeTool};
pub use text::{render_text_overlays, FontBook, FontError, TextOverlay};
