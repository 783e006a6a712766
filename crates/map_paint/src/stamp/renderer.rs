//! Tinting and compositing of cached stamps.
use rand::Rng;
use tiny_skia::{BlendMode, FilterQuality, Pixmap, PixmapPaint, Rect, Transform};
use tracing::trace;

use super::{StampGenerator, StampKey};
use crate::color::Rgba8;
use crate::random::rand_rotation;

/// Compositing operator applied when a tinted stamp lands on a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Composite {
    /// Paint over existing content.
    #[default]
    Over,
    /// Remove existing content where the stamp is opaque.
    Erase,
    /// Paint only where the layer already has content.
    ClipToContent,
}

impl Composite {
    pub fn blend_mode(self) -> BlendMode {
        match self {
            Composite::Over => BlendMode::SourceOver,
            Composite::Erase => BlendMode::DestinationOut,
            Composite::ClipToContent => BlendMode::SourceAtop,
        }
    }
}

/// One brush application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dab {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Rgba8,
    /// Global alpha multiplier in `[0, 1]`.
    pub opacity: f32,
    pub roughness_percent: f32,
    pub falloff_width_percent: f32,
    /// Degrees. Drawn at random when `None`.
    pub rotation: Option<f32>,
}

impl Dab {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            radius,
            color: Rgba8::WHITE,
            opacity: 1.0,
            roughness_percent: 0.0,
            falloff_width_percent: 100.0,
            rotation: None,
        }
    }

    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_shape(mut self, roughness_percent: f32, falloff_width_percent: f32) -> Self {
        self.roughness_percent = roughness_percent;
        self.falloff_width_percent = falloff_width_percent;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn key(&self) -> StampKey {
        StampKey::new(self.radius, self.roughness_percent, self.falloff_width_percent)
    }
}

/// Draws tinted stamps. Owns the stamp cache and a reusable tint buffer.
#[derive(Default)]
pub struct StampRenderer {
    generator: StampGenerator,
    tint: Option<Pixmap>,
}

impl StampRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generator(&self) -> &StampGenerator {
        &self.generator
    }

    /// Tints the stamp for `dab` and composites it onto `target` with `composite`.
    ///
    /// Returns the rotation actually used so coupled layers can reuse it.
    pub fn draw_stamp(
        &mut self,
        target: &mut Pixmap,
        dab: &Dab,
        composite: Composite,
        rng: &mut dyn Rng,
    ) -> Option<f32> {
        let rotation = dab.rotation.unwrap_or_else(|| rand_rotation(rng));
        let stamp = self.generator.generate(dab.key(), rng)?;
        let side = stamp.width();

        let grow = match &self.tint {
            Some(t) => t.width() < side,
            None => true,
        };
        if grow {
            self.tint = Some(Pixmap::new(side, side)?);
        }
        let tint = self.tint.as_mut()?;
        tint.fill(tiny_skia::Color::TRANSPARENT);

        // Solid color over the stamp's box, then keep it only where the stamp is opaque.
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(dab.color.to_skia());
        paint.blend_mode = BlendMode::Source;
        paint.anti_alias = false;
        let rect = Rect::from_xywh(0.0, 0.0, side as f32, side as f32)?;
        tint.fill_rect(rect, &paint, Transform::identity(), None);
        tint.draw_pixmap(
            0,
            0,
            stamp.as_ref(),
            &PixmapPaint {
                opacity: 1.0,
                blend_mode: BlendMode::DestinationIn,
                quality: FilterQuality::Nearest,
            },
            Transform::identity(),
            None,
        );

        let half = side as f32 * 0.5;
        let transform = Transform::from_translate(dab.x, dab.y)
            .pre_rotate(rotation)
            .pre_translate(-half, -half);
        target.draw_pixmap(
            0,
            0,
            tint.as_ref(),
            &PixmapPaint {
                opacity: dab.opacity.clamp(0.0, 1.0),
                blend_mode: composite.blend_mode(),
                quality: FilterQuality::Bilinear,
            },
            transform,
            None,
        );
        trace!(x = dab.x, y = dab.y, radius = dab.radius, rotation, ?composite, "stamp");
        Some(rotation)
    }
}
