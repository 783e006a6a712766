//! Visible texture fill: pattern x texture mask x land mask.
use tiny_skia::{IntRect, Pixmap, PremultipliedColorU8};
use tracing::trace;

use crate::layers::{clear_rect, DirtyRegion, LayerStack};

/// Recomputes the visible texture layer, optionally only inside a dirty square.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextureCompositor;

impl TextureCompositor {
    pub fn new() -> Self {
        Self
    }

    /// Rebuilds `layers.texture` from `pattern` clipped by both masks.
    ///
    /// With no `dirty` region the whole canvas is recomputed. A region entirely
    /// off-canvas is a no-op. Without a pattern the affected area is cleared.
    pub fn render(
        &self,
        layers: &mut LayerStack,
        pattern: Option<&Pixmap>,
        dirty: Option<DirtyRegion>,
    ) {
        let (w, h) = (layers.width(), layers.height());
        let rect = match dirty {
            Some(region) => match region.clip(w, h) {
                Some(r) => r,
                None => return,
            },
            None => match layers.bounds() {
                Some(r) => r,
                None => return,
            },
        };

        let LayerStack {
            texture,
            texture_mask,
            land_mask,
            ..
        } = layers;

        clear_rect(texture, rect);
        let Some(pattern) = pattern.filter(|p| p.width() > 0 && p.height() > 0) else {
            return;
        };
        tile_pattern(texture, pattern, rect);
        retain_where(texture, texture_mask, rect);
        retain_where(texture, land_mask, rect);
        trace!(
            x = rect.x(),
            y = rect.y(),
            w = rect.width(),
            h = rect.height(),
            "texture layer recomputed"
        );
    }
}

/// Copies `pattern` tiled from the canvas origin into `rect`.
fn tile_pattern(target: &mut Pixmap, pattern: &Pixmap, rect: IntRect) {
    let tw = target.width() as usize;
    let (pw, ph) = (pattern.width() as usize, pattern.height() as usize);
    let src = pattern.pixels();
    let dst = target.pixels_mut();
    for y in rect.top() as usize..rect.bottom() as usize {
        let src_row = (y % ph) * pw;
        let dst_row = y * tw;
        for x in rect.left() as usize..rect.right() as usize {
            dst[dst_row + x] = src[src_row + x % pw];
        }
    }
}

/// Destination-in: scales every pixel of `target` in `rect` by the alpha of `mask`.
fn retain_where(target: &mut Pixmap, mask: &Pixmap, rect: IntRect) {
    let tw = target.width() as usize;
    let mw = mask.width() as usize;
    let mask_px = mask.pixels();
    let dst = target.pixels_mut();
    for y in rect.top() as usize..rect.bottom() as usize {
        for x in rect.left() as usize..rect.right() as usize {
            let a = mask_px.get(y * mw + x).map(|p| p.alpha()).unwrap_or(0);
            let px = &mut dst[y * tw + x];
            *px = match a {
                255 => *px,
                0 => PremultipliedColorU8::TRANSPARENT,
                _ => scale_premultiplied(*px, a),
            };
        }
    }
}

#[inline]
fn mul_div_255(c: u8, a: u8) -> u8 {
    let prod = c as u32 * a as u32 + 128;
    ((prod + (prod >> 8)) >> 8) as u8
}

fn scale_premultiplied(px: PremultipliedColorU8, a: u8) -> PremultipliedColorU8 {
    // Scaling every channel by the same factor keeps color <= alpha.
    PremultipliedColorU8::from_rgba(
        mul_div_255(px.red(), a),
        mul_div_255(px.green(), a),
        mul_div_255(px.blue(), a),
        mul_div_255(px.alpha(), a),
    )
    .unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

#[cfg(test)]
mod tests {
    use tiny_skia::{Color, Paint, Rect, Transform};

    use super::*;

    fn checker() -> Pixmap {
        let mut p = Pixmap::new(4, 4).unwrap();
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(200, 40, 40, 255));
        p.fill(Color::from_rgba8(40, 200, 40, 255));
        p.fill_rect(
            Rect::from_xywh(0.0, 0.0, 2.0, 2.0).unwrap(),
            &paint,
            Transform::identity(),
            None,
        );
        p
    }

    fn fill_rect(p: &mut Pixmap, x: f32, y: f32, w: f32, h: f32) {
        let mut paint = Paint::default();
        paint.set_color(Color::WHITE);
        p.fill_rect(
            Rect::from_xywh(x, y, w, h).unwrap(),
            &paint,
            Transform::identity(),
            None,
        );
    }

    fn painted_stack() -> LayerStack {
        let mut layers = LayerStack::new(32, 24).unwrap();
        fill_rect(&mut layers.land_mask, 2.0, 2.0, 20.0, 18.0);
        fill_rect(&mut layers.texture_mask, 8.0, 0.0, 20.0, 24.0);
        layers
    }

    #[test]
    fn retains_only_where_both_masks_are_set() {
        let mut layers = painted_stack();
        let pattern = checker();
        TextureCompositor.render(&mut layers, Some(&pattern), None);

        // Land and texture
        assert_eq!(layers.texture.pixel(10, 10).unwrap().alpha(), 255);
        // Texture but not land
        assert_eq!(layers.texture.pixel(25, 10).unwrap().alpha(), 0);
        // Land but not texture
        assert_eq!(layers.texture.pixel(4, 10).unwrap().alpha(), 0);
    }

    #[test]
    fn pattern_is_anchored_at_origin() {
        let mut layers = LayerStack::new(16, 16).unwrap();
        layers.land_mask.fill(Color::WHITE);
        layers.texture_mask.fill(Color::WHITE);
        let pattern = checker();
        TextureCompositor.render(
            &mut layers,
            Some(&pattern),
            Some(DirtyRegion::new(9.0, 9.0, 3.0)),
        );

        for (x, y) in [(8, 8), (9, 10), (11, 11), (6, 7)] {
            let expected = pattern.pixel(x % 4, y % 4).unwrap();
            assert_eq!(layers.texture.pixel(x, y).unwrap(), expected, "({x},{y})");
        }
        // Outside the dirty square nothing was drawn.
        assert_eq!(layers.texture.pixel(1, 1).unwrap().alpha(), 0);
    }

    #[test]
    fn covering_dirty_region_matches_full_recompute() {
        let pattern = checker();
        let mut full = painted_stack();
        TextureCompositor.render(&mut full, Some(&pattern), None);

        let mut partial = painted_stack();
        partial.texture.fill(Color::BLACK);
        TextureCompositor.render(
            &mut partial,
            Some(&pattern),
            Some(DirtyRegion::new(16.0, 12.0, 100.0)),
        );

        assert_eq!(full.texture.data(), partial.texture.data());
    }

    #[test]
    fn off_canvas_region_is_a_no_op() {
        let mut layers = painted_stack();
        layers.texture.fill(Color::BLACK);
        let before = layers.texture.data().to_vec();
        TextureCompositor.render(
            &mut layers,
            Some(&checker()),
            Some(DirtyRegion::new(-100.0, -100.0, 10.0)),
        );
        assert_eq!(layers.texture.data(), &before[..]);
    }

    #[test]
    fn no_pattern_clears_only_the_region() {
        let mut layers = painted_stack();
        layers.texture.fill(Color::BLACK);
        TextureCompositor.render(&mut layers, None, Some(DirtyRegion::new(5.0, 5.0, 2.0)));
        assert_eq!(layers.texture.pixel(5, 5).unwrap().alpha(), 0);
        assert_eq!(layers.texture.pixel(20, 20).unwrap().alpha(), 255);
    }

    #[test]
    fn partial_mask_alpha_scales_the_fill() {
        let px = PremultipliedColorU8::from_rgba(200, 100, 50, 255).unwrap();
        let half = scale_premultiplied(px, 128);
        assert_eq!(half.alpha(), 128);
        assert!(half.red() <= half.alpha());
        assert_eq!(mul_div_255(255, 255), 255);
        assert_eq!(mul_div_255(0, 200), 0);
    }
}
