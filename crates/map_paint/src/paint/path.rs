//! Dotted and dashed path strokes with spacing carried across segments.
use glam::Vec2;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};
use tracing::trace;

use crate::color::Rgba8;
use crate::config::PathStyle;

/// Segments shorter than this are ignored.
pub const MIN_SEGMENT_LENGTH: f32 = 0.5;
/// Dash thickness is the brush size divided by this.
pub const DASH_THICKNESS_DIVISOR: f32 = 2.5;

/// One mark along a path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathMark {
    pub center: Vec2,
    /// Segment direction in radians.
    pub angle: f32,
}

/// Appearance of the marks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathPen {
    pub style: PathStyle,
    pub size: f32,
    pub spacing_factor: f32,
    pub color: Rgba8,
}

impl PathPen {
    /// Distance between consecutive marks, never below one pixel.
    pub fn spacing(&self) -> f32 {
        (self.size * self.spacing_factor).max(1.0)
    }
}

/// Places marks along successive drag segments of one stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PathTracer {
    remainder: f32,
}

impl PathTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset into the next segment where the next mark falls.
    pub fn remainder(&self) -> f32 {
        self.remainder
    }

    /// Called at stroke start and end.
    pub fn reset(&mut self) {
        self.remainder = 0.0;
    }

    /// Computes the marks for a segment and advances the carried remainder.
    pub fn marks(&mut self, from: Vec2, to: Vec2, spacing: f32) -> Vec<PathMark> {
        let delta = to - from;
        let length = delta.length();
        if length < MIN_SEGMENT_LENGTH {
            return Vec::new();
        }
        let dir = delta / length;
        let angle = dir.y.atan2(dir.x);
        let spacing = spacing.max(1.0);

        let mut marks = Vec::new();
        let mut d = self.remainder;
        while d <= length {
            marks.push(PathMark {
                center: from + dir * d,
                angle,
            });
            d += spacing;
        }
        self.remainder = d - length;
        marks
    }

    /// Draws the marks of one segment onto `layer`.
    pub fn draw_segment(&mut self, layer: &mut Pixmap, from: Vec2, to: Vec2, pen: &PathPen) {
        let marks = self.marks(from, to, pen.spacing());
        if marks.is_empty() {
            return;
        }
        let mut paint = Paint::default();
        paint.set_color(pen.color.to_skia());
        paint.anti_alias = true;

        for mark in &marks {
            draw_mark(layer, mark, pen, &paint);
        }
        trace!(count = marks.len(), remainder = self.remainder, "path marks");
    }
}

fn draw_mark(layer: &mut Pixmap, mark: &PathMark, pen: &PathPen, paint: &Paint<'_>) {
    match pen.style {
        PathStyle::Dots => {
            if let Some(circle) =
                PathBuilder::from_circle(mark.center.x, mark.center.y, pen.size * 0.5)
            {
                layer.fill_path(&circle, paint, FillRule::Winding, Transform::identity(), None);
            }
        }
        PathStyle::Dashed => {
            let thickness = pen.size / DASH_THICKNESS_DIVISOR;
            let Some(rect) = Rect::from_xywh(-pen.size * 0.5, -thickness * 0.5, pen.size, thickness)
            else {
                return;
            };
            let transform = Transform::from_translate(mark.center.x, mark.center.y)
                .pre_rotate(mark.angle.to_degrees());
            layer.fill_rect(rect, paint, transform, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(marks: &[PathMark]) -> Vec<f32> {
        marks.iter().map(|m| m.center.x).collect()
    }

    #[test]
    fn dots_every_spacing_including_both_ends() {
        let pen = PathPen {
            style: PathStyle::Dots,
            size: 10.0,
            spacing_factor: 2.5,
            color: Rgba8::BLACK,
        };
        assert_eq!(pen.spacing(), 25.0);

        let mut tracer = PathTracer::new();
        let marks = tracer.marks(Vec2::ZERO, Vec2::new(100.0, 0.0), pen.spacing());
        assert_eq!(offsets(&marks), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(tracer.remainder(), 25.0);
    }

    #[test]
    fn split_segments_place_the_same_marks() {
        let spacing = 7.0;
        let mut whole = PathTracer::new();
        let expected = offsets(&whole.marks(Vec2::ZERO, Vec2::new(100.0, 0.0), spacing));

        for split in [1.0, 13.5, 49.0, 50.0, 99.25] {
            let mut tracer = PathTracer::new();
            let mut got = offsets(&tracer.marks(Vec2::ZERO, Vec2::new(split, 0.0), spacing));
            got.extend(offsets(&tracer.marks(
                Vec2::new(split, 0.0),
                Vec2::new(100.0, 0.0),
                spacing,
            )));
            assert_eq!(got.len(), expected.len(), "split at {split}");
            for (a, b) in got.iter().zip(&expected) {
                assert!((a - b).abs() < 1e-3, "split at {split}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn degenerate_segments_are_skipped() {
        let mut tracer = PathTracer::new();
        tracer.marks(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0);
        let before = tracer.remainder();
        assert!(tracer
            .marks(Vec2::new(10.0, 0.0), Vec2::new(10.3, 0.0), 4.0)
            .is_empty());
        assert_eq!(tracer.remainder(), before);
    }

    #[test]
    fn spacing_never_drops_below_one_pixel() {
        let pen = PathPen {
            style: PathStyle::Dots,
            size: 0.1,
            spacing_factor: 0.5,
            color: Rgba8::BLACK,
        };
        assert_eq!(pen.spacing(), 1.0);
    }

    #[test]
    fn reset_zeroes_remainder() {
        let mut tracer = PathTracer::new();
        tracer.marks(Vec2::ZERO, Vec2::new(3.0, 0.0), 5.0);
        assert!(tracer.remainder() > 0.0);
        tracer.reset();
        assert_eq!(tracer.remainder(), 0.0);
    }

    #[test]
    fn dash_marks_follow_segment_direction() {
        let mut tracer = PathTracer::new();
        let marks = tracer.marks(Vec2::ZERO, Vec2::new(0.0, 30.0), 10.0);
        assert!(marks
            .iter()
            .all(|m| (m.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6));
    }

    #[test]
    fn draws_dashes_rotated_along_the_segment() {
        let mut layer = Pixmap::new(40, 40).unwrap();
        let pen = PathPen {
            style: PathStyle::Dashed,
            size: 10.0,
            spacing_factor: 100.0,
            color: Rgba8::BLACK,
        };
        let mut tracer = PathTracer::new();
        tracer.draw_segment(&mut layer, Vec2::new(20.0, 20.0), Vec2::new(20.0, 39.0), &pen);
        // Vertical dash: tall, thin.
        assert!(layer.pixel(20, 23).unwrap().alpha() > 0);
        assert_eq!(layer.pixel(25, 20).unwrap().alpha(), 0);
    }

    #[test]
    fn draws_dots() {
        let mut layer = Pixmap::new(40, 40).unwrap();
        let pen = PathPen {
            style: PathStyle::Dots,
            size: 6.0,
            spacing_factor: 2.0,
            color: Rgba8::rgb(10, 20, 30),
        };
        let mut tracer = PathTracer::new();
        tracer.draw_segment(&mut layer, Vec2::new(5.0, 5.0), Vec2::new(35.0, 5.0), &pen);
        assert_eq!(layer.pixel(5, 5).unwrap().alpha(), 255);
        assert_eq!(layer.pixel(11, 5).unwrap().alpha(), 0);
        assert_eq!(layer.pixel(17, 5).unwrap().alpha(), 255);
    }
}
