//! Text labels along a straight baseline or a circular arc.
//!
//! Layout is computed from glyph advances alone ([`layout_straight`],
//! [`layout_curved`]) so it can be reasoned about without a font. Rendering turns
//! each glyph outline into a vector path and fills it, optionally over a black
//! outline stroke.
use ab_glyph::{Font, FontArc, GlyphId, OutlineCurve, ScaleFont};
use glam::Vec2;
use tiny_skia::{
    Color, FillRule, LineJoin, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};
use tracing::{trace, warn};

use super::assets::SELECTION_COLOR;
use crate::color::Rgba8;

/// Arc radius is this divided by the curvature.
pub const ARC_RADIUS_SCALE: f32 = 10_000.0;
/// Outline stroke width is the font size divided by this.
pub const OUTLINE_DIVISOR: f32 = 4.0;
const SELECTION_PADDING: f32 = 4.0;

/// One placed text label.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct Label {
    pub id: String,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub rotation_degrees: f32,
    /// Zero draws a straight baseline.
    pub curvature: f32,
    #[cfg_attr(feature = "serde", serde(alias = "size"))]
    pub size_px: f32,
    pub color: Rgba8,
    pub has_outline: bool,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            id: String::new(),
            text: String::new(),
            x: 0.0,
            y: 0.0,
            rotation_degrees: 0.0,
            curvature: 0.0,
            size_px: 24.0,
            color: Rgba8::BLACK,
            has_outline: false,
        }
    }
}

impl Label {
    pub fn new(id: impl Into<String>, text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size_px: f32) -> Self {
        self.size_px = size_px;
        self
    }

    pub fn with_curvature(mut self, curvature: f32) -> Self {
        self.curvature = curvature;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }

    pub fn with_outline(mut self, outline: bool) -> Self {
        self.has_outline = outline;
        self
    }

    /// Radius of the baseline arc, `None` for straight labels.
    pub fn arc_radius(&self) -> Option<f32> {
        if self.curvature == 0.0 || !self.curvature.is_finite() {
            None
        } else {
            Some(ARC_RADIUS_SCALE / self.curvature)
        }
    }
}

/// Where one glyph goes, relative to the label anchor before label rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphPlacement {
    /// Horizontal center of the glyph on its (vertically centered) baseline.
    pub center: Vec2,
    /// Glyph rotation in radians.
    pub angle: f32,
}

/// Glyphs side by side, the run centered on the anchor.
pub fn layout_straight(advances: &[f32]) -> Vec<GlyphPlacement> {
    let total: f32 = advances.iter().sum();
    let mut x = -total * 0.5;
    advances
        .iter()
        .map(|&a| {
            let center = Vec2::new(x + a * 0.5, 0.0);
            x += a;
            GlyphPlacement { center, angle: 0.0 }
        })
        .collect()
}

/// Glyphs along an arc of `radius` whose center lies `radius` below the anchor.
///
/// Each glyph spans `advance / radius` radians; the run is centered on the
/// anchor. A negative radius bends the other way.
pub fn layout_curved(advances: &[f32], radius: f32) -> Vec<GlyphPlacement> {
    let total: f32 = advances.iter().sum();
    let mut angle = -(total / radius) * 0.5;
    advances
        .iter()
        .map(|&a| {
            let half = a / radius * 0.5;
            angle += half;
            let placement = GlyphPlacement {
                center: Vec2::new(radius * angle.sin(), radius - radius * angle.cos()),
                angle,
            };
            angle += half;
            placement
        })
        .collect()
}

/// Glyph ids and advances (kerning folded into the preceding advance).
fn shape(font: &FontArc, text: &str, size: f32) -> Vec<(GlyphId, f32)> {
    let scaled = font.as_scaled(size);
    let mut glyphs: Vec<(GlyphId, f32)> = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last_mut() {
            prev.1 += scaled.kern(prev.0, id);
        }
        glyphs.push((id, scaled.h_advance(id)));
    }
    glyphs
}

/// Outline of one glyph, horizontally centered on the origin with the text's
/// vertical middle at `y = 0`.
fn glyph_path(font: &FontArc, id: GlyphId, size: f32, advance: f32) -> Option<Path> {
    let outline = font.outline(id)?;
    let scaled = font.as_scaled(size);
    let (sx, sy) = (scaled.h_scale_factor(), scaled.v_scale_factor());
    let baseline = (scaled.ascent() + scaled.descent()) * 0.5;
    let dx = -advance * 0.5;
    let map = |p: ab_glyph::Point| (p.x * sx + dx, baseline - p.y * sy);

    let mut pb = PathBuilder::new();
    let mut last: Option<ab_glyph::Point> = None;
    for curve in &outline.curves {
        let start = match curve {
            OutlineCurve::Line(p0, _) | OutlineCurve::Quad(p0, _, _) => *p0,
            OutlineCurve::Cubic(p0, _, _, _) => *p0,
        };
        if last != Some(start) {
            if last.is_some() {
                pb.close();
            }
            let (x, y) = map(start);
            pb.move_to(x, y);
        }
        match curve {
            OutlineCurve::Line(_, p1) => {
                let (x, y) = map(*p1);
                pb.line_to(x, y);
                last = Some(*p1);
            }
            OutlineCurve::Quad(_, p1, p2) => {
                let (x1, y1) = map(*p1);
                let (x, y) = map(*p2);
                pb.quad_to(x1, y1, x, y);
                last = Some(*p2);
            }
            OutlineCurve::Cubic(_, p1, p2, p3) => {
                let (x1, y1) = map(*p1);
                let (x2, y2) = map(*p2);
                let (x, y) = map(*p3);
                pb.cubic_to(x1, y1, x2, y2, x, y);
                last = Some(*p3);
            }
        }
    }
    if last.is_some() {
        pb.close();
    }
    pb.finish()
}

/// Redraws `layer` from scratch with every label.
///
/// Without a font the layer is only cleared.
pub fn render_labels(
    layer: &mut Pixmap,
    labels: &[Label],
    selected: Option<&str>,
    font: Option<&FontArc>,
) {
    layer.fill(Color::TRANSPARENT);
    if labels.is_empty() {
        return;
    }
    let Some(font) = font else {
        warn!(count = labels.len(), "no font set, labels skipped");
        return;
    };
    for label in labels {
        draw_label(layer, label, font);
        if selected == Some(label.id.as_str()) {
            draw_selection(layer, label, font);
        }
    }
    trace!(count = labels.len(), "labels redrawn");
}

fn draw_label(layer: &mut Pixmap, label: &Label, font: &FontArc) {
    if label.text.is_empty() || label.size_px <= 0.0 {
        return;
    }
    let glyphs = shape(font, &label.text, label.size_px);
    let advances: Vec<f32> = glyphs.iter().map(|g| g.1).collect();
    let placements = match label.arc_radius() {
        Some(radius) => layout_curved(&advances, radius),
        None => layout_straight(&advances),
    };

    let base = Transform::from_translate(label.x, label.y).pre_rotate(label.rotation_degrees);
    let paths: Vec<(Path, Transform)> = glyphs
        .iter()
        .zip(&placements)
        .filter_map(|(&(id, advance), placement)| {
            let path = glyph_path(font, id, label.size_px, advance)?;
            let ts = base
                .pre_translate(placement.center.x, placement.center.y)
                .pre_rotate(placement.angle.to_degrees());
            Some((path, ts))
        })
        .collect();

    if label.has_outline {
        let mut paint = Paint::default();
        paint.set_color(Color::BLACK);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: label.size_px / OUTLINE_DIVISOR,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        for (path, ts) in &paths {
            layer.stroke_path(path, &paint, &stroke, *ts, None);
        }
    }

    let mut paint = Paint::default();
    paint.set_color(label.color.to_skia());
    paint.anti_alias = true;
    for (path, ts) in &paths {
        layer.fill_path(path, &paint, FillRule::Winding, *ts, None);
    }
}

/// Axis-aligned box around the label, ignoring its rotation.
fn draw_selection(layer: &mut Pixmap, label: &Label, font: &FontArc) {
    let width: f32 = shape(font, &label.text, label.size_px)
        .iter()
        .map(|g| g.1)
        .sum();
    let (w, h) = (
        width + SELECTION_PADDING * 2.0,
        label.size_px + SELECTION_PADDING * 2.0,
    );
    let Some(rect) = Rect::from_xywh(label.x - w * 0.5, label.y - h * 0.5, w, h) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(SELECTION_COLOR.to_skia());
    let stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };
    layer.stroke_path(
        &PathBuilder::from_rect(rect),
        &paint,
        &stroke,
        Transform::identity(),
        None,
    );
}
