//! Procedural brush stamps.
//!
//! A stamp is a square white pixmap whose alpha describes one organic brush
//! footprint. [`StampGenerator`] keeps exactly one generated stamp and rebuilds it
//! only when the [`StampKey`] changes, which during a stroke is almost never.
//! [`StampRenderer`] tints the cached stamp and composites it onto a layer.
use std::f32::consts::TAU;

use rand::Rng;
use tiny_skia::{
    Color, FillRule, GradientStop, Paint, PathBuilder, Pixmap, Point, RadialGradient, SpreadMode,
    Transform,
};
use tracing::{trace, warn};

use crate::random::rand01;

pub mod renderer;

pub use renderer::{Composite, Dab, StampRenderer};

/// Number of vertices on a rough silhouette.
pub const ROUGH_POINTS: usize = 40;
/// A jittered radius is held for this many consecutive vertices.
pub const JITTER_HOLD: usize = 3;
/// Falloff at or above this percentage yields a hard edge.
pub const HARD_EDGE_FALLOFF: f32 = 95.0;
/// Full-scale jitter amplitude as a multiple of the radius (`±0.75 r` at 100%).
const ROUGHNESS_SCALE: f32 = 1.5;

/// Identity of a generated stamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StampKey {
    pub radius: f32,
    pub roughness_percent: f32,
    pub falloff_width_percent: f32,
}

impl StampKey {
    pub fn new(radius: f32, roughness_percent: f32, falloff_width_percent: f32) -> Self {
        Self {
            radius,
            roughness_percent,
            falloff_width_percent,
        }
    }

    /// Side length of the square stamp raster.
    pub fn side(&self) -> u32 {
        let extent = self.radius * ROUGHNESS_SCALE + self.radius;
        (extent * 2.0).ceil().max(1.0) as u32
    }

    /// Jitter amplitude in pixels.
    fn roughness_px(&self) -> f32 {
        self.radius * ROUGHNESS_SCALE * (self.roughness_percent / 100.0)
    }

    fn is_hard_edged(&self) -> bool {
        self.falloff_width_percent >= HARD_EDGE_FALLOFF
    }
}

/// Single-slot stamp cache.
#[derive(Default)]
pub struct StampGenerator {
    cached: Option<(StampKey, Pixmap)>,
    generations: u64,
}

impl StampGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stamp for `key`, generating it only if the cached key differs.
    ///
    /// Returns `None` when `key.radius` is not positive.
    pub fn generate(&mut self, key: StampKey, rng: &mut dyn Rng) -> Option<&Pixmap> {
        let hit = matches!(&self.cached, Some((cached, _)) if *cached == key);
        if !hit {
            if key.radius.is_nan() || key.radius <= 0.0 {
                warn!(radius = key.radius, "stamp radius must be positive");
                return None;
            }
            let pixmap = build_stamp(&key, rng)?;
            self.generations += 1;
            trace!(?key, side = pixmap.width(), "generated stamp");
            self.cached = Some((key, pixmap));
        }
        self.cached.as_ref().map(|(_, p)| p)
    }

    /// Key of the cached stamp, if any.
    pub fn cached_key(&self) -> Option<StampKey> {
        self.cached.as_ref().map(|(k, _)| *k)
    }

    /// How many stamps were built so far.
    pub fn generations(&self) -> u64 {
        self.generations
    }

    pub fn clear(&mut self) {
        self.cached = None;
    }
}

/// Silhouette radius for each of the [`ROUGH_POINTS`] vertices.
///
/// Every third vertex draws a new offset in `±roughness_px / 2`; the next two reuse it.
pub fn rough_radii(radius: f32, roughness_px: f32, rng: &mut dyn Rng) -> Vec<f32> {
    let mut radii = Vec::with_capacity(ROUGH_POINTS);
    let mut offset = 0.0;
    for i in 0..ROUGH_POINTS {
        if i % JITTER_HOLD == 0 {
            offset = (rand01(rng) - 0.5) * roughness_px;
        }
        radii.push(radius + offset);
    }
    radii
}

fn build_stamp(key: &StampKey, rng: &mut dyn Rng) -> Option<Pixmap> {
    let side = key.side();
    let mut pixmap = Pixmap::new(side, side)?;
    let c = side as f32 * 0.5;

    let path = if key.roughness_percent > 0.0 {
        let radii = rough_radii(key.radius, key.roughness_px(), rng);
        let mut pb = PathBuilder::new();
        for (i, r) in radii.iter().enumerate() {
            let angle = i as f32 / ROUGH_POINTS as f32 * TAU;
            let (x, y) = (c + angle.cos() * r, c + angle.sin() * r);
            if i == 0 {
                pb.move_to(x, y);
            } else {
                pb.line_to(x, y);
            }
        }
        pb.close();
        pb.finish()?
    } else {
        PathBuilder::from_circle(c, c, key.radius)?
    };

    let mut paint = Paint::default();
    paint.anti_alias = true;
    if key.is_hard_edged() {
        paint.set_color(Color::WHITE);
    } else {
        let solid_until = (1.0 - key.falloff_width_percent / 100.0).clamp(0.0, 0.999);
        let center = Point::from_xy(c, c);
        // Fade out at the furthest jittered vertex so outward bumps stay visible.
        let outer = key.radius + key.roughness_px() * 0.5;
        match RadialGradient::new(
            center,
            center,
            outer,
            vec![
                GradientStop::new(0.0, Color::WHITE),
                GradientStop::new(solid_until, Color::WHITE),
                GradientStop::new(1.0, Color::TRANSPARENT),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        ) {
            Some(shader) => paint.shader = shader,
            None => paint.set_color(Color::WHITE),
        }
    }
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    Some(pixmap)
}
