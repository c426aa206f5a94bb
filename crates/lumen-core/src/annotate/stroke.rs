//! Freehand ink strokes.
//!
//! Each stroke is smoothed into a chain of quadratic curves (control point
//! at the earlier sample, endpoint at the midpoint of each pair), flattened
//! to line segments and rasterized as an anti-aliased, round-capped coverage
//! mask. The mask is composited once per stroke so a path that crosses
//! itself does not darken where it overlaps.

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::color::{blend_over, Color};
use kurbo::{BezPath, Point as KPoint};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Flattening tolerance in pixels.
const FLATTEN_TOLERANCE: f64 = 0.1;

/// Width used when a stroke's effective width is not a positive number.
const DEFAULT_LINE_WIDTH: f64 = 1.0;

/// Markup tool that drew a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeTool {
    #[default]
    Pen,
    Highlighter,
    Pencil,
}

impl StrokeTool {
    /// Opacity the whole stroke is composited with.
    pub fn opacity(self) -> f32 {
        match self {
            StrokeTool::Pen => 1.0,
            StrokeTool::Highlighter => 0.35,
            StrokeTool::Pencil => 0.6,
        }
    }

    /// Line width relative to the stroke's nominal size.
    pub fn width_multiplier(self) -> f64 {
        match self {
            StrokeTool::Pen => 1.0,
            StrokeTool::Highlighter => 3.0,
            StrokeTool::Pencil => 0.7,
        }
    }
}

/// A sample point in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Point> for KPoint {
    fn from(p: Point) -> Self {
        KPoint::new(p.x, p.y)
    }
}

/// One freehand stroke as captured by the markup UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawStroke {
    #[serde(default)]
    pub tool: StrokeTool,
    pub color: Color,
    /// Nominal line width in pixels
    pub size: f64,
    pub points: Vec<Point>,
}

impl DrawStroke {
    /// Line width after the tool multiplier.
    pub fn line_width(&self) -> f64 {
        let width = self.size * self.tool.width_multiplier();
        if width.is_finite() && width > 0.0 {
            width
        } else {
            DEFAULT_LINE_WIDTH
        }
    }

    /// Smoothed centerline, or `None` if fewer than two usable points.
    pub fn path(&self) -> Option<BezPath> {
        let points: Vec<KPoint> = self
            .points
            .iter()
            .filter(|p| p.is_finite())
            .map(|&p| p.into())
            .collect();
        smoothed_path(&points)
    }
}

/// Build the midpoint-smoothed path through `points`.
fn smoothed_path(points: &[KPoint]) -> Option<BezPath> {
    if points.len() < 2 {
        return None;
    }

    let mut path = BezPath::new();
    path.move_to(points[0]);
    for pair in points.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        path.quad_to(prev, prev.midpoint(curr));
    }
    Some(path)
}

/// Composite `strokes` over `buffer` in order.
pub fn render_strokes(buffer: &mut PixelBuffer, strokes: &[DrawStroke]) {
    if strokes.is_empty() {
        return;
    }
    debug!(count = strokes.len(), "Rendering strokes");

    for stroke in strokes {
        render_stroke(buffer, stroke);
    }
}

fn render_stroke(buffer: &mut PixelBuffer, stroke: &DrawStroke) {
    let Some(path) = stroke.path() else {
        trace!(points = stroke.points.len(), "Skipping short stroke");
        return;
    };
    let alpha = stroke.tool.opacity() * stroke.color.alpha();
    if alpha <= 0.0 {
        return;
    }

    let segments = flatten(&path);
    let half_width = stroke.line_width() / 2.0;
    let Some(mut mask) = CoverageMask::around(&segments, half_width, buffer) else {
        return;
    };
    for &(a, b) in &segments {
        mask.add_segment(a, b, half_width);
    }
    mask.composite(buffer, stroke.color.rgb_array(), alpha);
}

/// Flatten a path into its line segments.
fn flatten(path: &BezPath) -> Vec<(KPoint, KPoint)> {
    use kurbo::PathEl;

    let mut segments = Vec::new();
    let mut last = KPoint::ZERO;
    kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => last = p,
        PathEl::LineTo(p) => {
            segments.push((last, p));
            last = p;
        }
        _ => {}
    });
    segments
}

/// Distance from `p` to the segment `a`-`b`.
fn distance_to_segment(p: KPoint, a: KPoint, b: KPoint) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    let t = if len2 > 0.0 {
        ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (p - (a + ab * t)).hypot()
}

/// Per-pixel stroke coverage over a clipped bounding box.
struct CoverageMask {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    coverage: Vec<f32>,
}

impl CoverageMask {
    /// Mask spanning the stroke's bounds, clipped to the buffer.
    fn around(segments: &[(KPoint, KPoint)], half_width: f64, buffer: &PixelBuffer) -> Option<Self> {
        let pad = half_width + 1.0;
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(a, b) in segments {
            for p in [a, b] {
                min_x = min_x.min(p.x);
                min_y = min_y.min(p.y);
                max_x = max_x.max(p.x);
                max_y = max_y.max(p.y);
            }
        }

        let x0 = (min_x - pad).floor().max(0.0);
        let y0 = (min_y - pad).floor().max(0.0);
        let x1 = (max_x + pad).ceil().min(buffer.width() as f64);
        let y1 = (max_y + pad).ceil().min(buffer.height() as f64);
        if !(x1 > x0 && y1 > y0) {
            return None;
        }

        let (width, height) = ((x1 - x0) as u32, (y1 - y0) as u32);
        Some(Self {
            x0: x0 as u32,
            y0: y0 as u32,
            width,
            height,
            coverage: vec![0.0; width as usize * height as usize],
        })
    }

    /// Raise coverage to the segment's round-capped footprint.
    fn add_segment(&mut self, a: KPoint, b: KPoint, half_width: f64) {
        let reach = half_width + 0.5;
        let lo_x = ((a.x.min(b.x) - reach).floor() - self.x0 as f64).max(0.0) as u32;
        let lo_y = ((a.y.min(b.y) - reach).floor() - self.y0 as f64).max(0.0) as u32;
        let hi_x = ((a.x.max(b.x) + reach).ceil() - self.x0 as f64).clamp(0.0, self.width as f64) as u32;
        let hi_y = ((a.y.max(b.y) + reach).ceil() - self.y0 as f64).clamp(0.0, self.height as f64) as u32;

        for my in lo_y..hi_y {
            let cy = (self.y0 + my) as f64 + 0.5;
            for mx in lo_x..hi_x {
                let center = KPoint::new((self.x0 + mx) as f64 + 0.5, cy);
                let cov = (reach - distance_to_segment(center, a, b)).clamp(0.0, 1.0) as f32;
                let slot = &mut self.coverage[(my * self.width + mx) as usize];
                if cov > *slot {
                    *slot = cov;
                }
            }
        }
    }

    fn composite(&self, buffer: &mut PixelBuffer, rgb: [u8; 3], alpha: f32) {
        for my in 0..self.height {
            let row = &self.coverage[(my * self.width) as usize..((my + 1) * self.width) as usize];
            let start = buffer.index(self.x0, self.y0 + my);
            let end = start + self.width as usize * CHANNELS;
            let pixels = &mut buffer.pixels_mut()[start..end];
            for (px, &cov) in pixels.chunks_exact_mut(CHANNELS).zip(row) {
                if cov > 0.0 {
                    blend_over(px, rgb, cov * alpha);
                }
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn point() -> impl Strategy<Value = Point> {
        (-10.0f64..50.0, -10.0f64..50.0).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        #[test]
        fn prop_short_stroke_is_noop(points in prop::collection::vec(point(), 0..2), size in 0.0f64..20.0) {
            let mut buf = PixelBuffer::filled(40, 40, [10, 20, 30, 255]);
            let before = buf.clone();
            let s = DrawStroke { tool: StrokeTool::Pen, color: Color::BLACK, size, points };
            render_strokes(&mut buf, &[s]);
            prop_assert_eq!(buf, before);
        }

        #[test]
        fn prop_strokes_never_reduce_alpha(points in prop::collection::vec(point(), 2..8), size in 0.5f64..10.0) {
            let mut buf = PixelBuffer::filled(40, 40, [0, 0, 0, 128]);
            let s = DrawStroke { tool: StrokeTool::Highlighter, color: Color::WHITE, size, points };
            render_strokes(&mut buf, &[s]);
            prop_assert!(buf.pixels().chunks_exact(4).all(|p| p[3] >= 128));
        }
    }
}
