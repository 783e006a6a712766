//! Coastal shallow-water halo derived from the land silhouette.
//!
//! Two bands, both colored by the glow color: a near shelf that stays almost
//! solid for `shelf_width` pixels off the coast, and a soft fade reaching out to
//! `fade_width`. Distances come from an exact distance transform of the land mask.
use tiny_skia::{Color, Pixmap};
use tracing::debug;

use super::edt::distance_to_opaque;
use crate::color::Rgba8;
use crate::config::ShallowWaterParams;

/// Land mask alpha at or above this counts as land.
pub const LAND_THRESHOLD: u8 = 128;

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Halo coverage at `distance` pixels from the coast.
pub fn halo_alpha(distance: f32, params: &ShallowWaterParams) -> f32 {
    let near = params.shelf_opacity
        * (1.0 - smoothstep(params.shelf_width * 0.5, params.shelf_width * 1.5, distance));
    let far = params.fade_opacity * (1.0 - smoothstep(0.0, params.fade_width, distance));
    near.max(far)
}

/// Rebuilds the shallow-water layer.
pub struct ShallowWaterSynthesizer {
    params: ShallowWaterParams,
}

impl ShallowWaterSynthesizer {
    pub fn new(params: ShallowWaterParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ShallowWaterParams {
        &self.params
    }

    /// Clears `layer`, then, if `enabled`, paints the halo around `land_mask`.
    pub fn update(&self, layer: &mut Pixmap, land_mask: &Pixmap, glow: Rgba8, enabled: bool) {
        layer.fill(Color::TRANSPARENT);
        if !enabled {
            return;
        }
        if layer.width() != land_mask.width() || layer.height() != land_mask.height() {
            return;
        }
        if !land_mask.pixels().iter().any(|p| p.alpha() >= LAND_THRESHOLD) {
            return;
        }

        let distances = distance_to_opaque(land_mask, LAND_THRESHOLD);
        let reach = self.params.fade_width.max(self.params.shelf_width * 1.5);
        let mut painted = 0usize;
        for (px, d) in layer.pixels_mut().iter_mut().zip(&distances) {
            if *d >= reach {
                continue;
            }
            let a = halo_alpha(*d, &self.params);
            if a > 0.0 {
                *px = glow.premultiplied(a);
                painted += 1;
            }
        }
        debug!(painted, "shallow water halo");
    }
}

impl Default for ShallowWaterSynthesizer {
    fn default() -> Self {
        Self::new(ShallowWaterParams::default())
    }
}

#[cfg(test)]
mod tests {
    use tiny_skia::{FillRule, Paint, PathBuilder, Transform};

    use super::*;

    fn island(size: u32, radius: f32) -> Pixmap {
        let mut p = Pixmap::new(size, size).unwrap();
        let mut paint = Paint::default();
        paint.set_color(Color::WHITE);
        let c = size as f32 / 2.0;
        let path = PathBuilder::from_circle(c, c, radius).unwrap();
        p.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        p
    }

    #[test]
    fn halo_has_solid_shelf_then_soft_fade() {
        let params = ShallowWaterParams::default();
        let at_coast = halo_alpha(0.0, &params);
        let in_shelf = halo_alpha(params.shelf_width * 0.4, &params);
        let past_shelf = halo_alpha(params.shelf_width * 2.0, &params);
        let outside = halo_alpha(params.fade_width + 1.0, &params);

        assert_eq!(at_coast, params.shelf_opacity);
        assert_eq!(in_shelf, params.shelf_opacity);
        assert!(past_shelf > 0.0 && past_shelf < params.fade_opacity);
        assert_eq!(outside, 0.0);
    }

    #[test]
    fn halo_never_increases_with_distance() {
        let params = ShallowWaterParams::default();
        let mut prev = f32::MAX;
        for i in 0..200 {
            let a = halo_alpha(i as f32 * 0.5, &params);
            assert!(a <= prev + 1e-6);
            prev = a;
        }
    }

    #[test]
    fn disabled_clears_the_layer() {
        let land = island(64, 10.0);
        let mut layer = Pixmap::new(64, 64).unwrap();
        layer.fill(Color::BLACK);
        ShallowWaterSynthesizer::default().update(&mut layer, &land, Rgba8::WHITE, false);
        assert!(layer.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn halo_follows_the_coast_and_takes_glow_color() {
        let land = island(128, 20.0);
        let mut layer = Pixmap::new(128, 128).unwrap();
        let glow = Rgba8::rgb(100, 200, 250);
        let synth = ShallowWaterSynthesizer::default();
        synth.update(&mut layer, &land, glow, true);

        let near = layer.pixel(64 + 24, 64).unwrap();
        let far = layer.pixel(64 + 45, 64).unwrap();
        let corner = layer.pixel(0, 0).unwrap();
        assert!(near.alpha() > far.alpha());
        assert!(far.alpha() > 0);
        assert_eq!(corner.alpha(), 0);

        let c = near.demultiply();
        assert!((c.red() as i32 - 100).abs() <= 2);
        assert!((c.green() as i32 - 200).abs() <= 2);
    }

    #[test]
    fn no_land_means_no_halo() {
        let land = Pixmap::new(32, 32).unwrap();
        let mut layer = Pixmap::new(32, 32).unwrap();
        ShallowWaterSynthesizer::default().update(&mut layer, &land, Rgba8::WHITE, true);
        assert!(layer.pixels().iter().all(|p| p.alpha() == 0));
    }
}
