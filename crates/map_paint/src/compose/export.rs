//! Flattening the layer stack into a single encoded image.
use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use tiny_skia::{
    FilterQuality, Paint, Pattern, Pixmap, PixmapPaint, Rect, SpreadMode, Transform,
};
use tracing::info;

use crate::color::Rgba8;
use crate::error::{Error, Result};
use crate::layers::{LayerKind, LayerStack};

/// Bottom-to-top order of the layers drawn over the ocean background.
pub const COMPOSITE_ORDER: [LayerKind; 6] = [
    LayerKind::ShallowWater,
    LayerKind::Terrain,
    LayerKind::Texture,
    LayerKind::Path,
    LayerKind::Assets,
    LayerKind::Text,
];

/// Output encoding of an exported map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Lossy, opaque.
    Jpeg { quality: u8 },
    Png,
}

/// Ocean under all layers.
#[derive(Clone, Copy)]
pub struct Background<'a> {
    pub color: Rgba8,
    /// Tiled from the canvas origin over the color when present.
    pub pattern: Option<&'a Pixmap>,
}

impl<'a> Background<'a> {
    pub fn color(color: Rgba8) -> Self {
        Self {
            color,
            pattern: None,
        }
    }

    pub fn with_pattern(mut self, pattern: &'a Pixmap) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

/// Draws every visible layer over the background into a new pixmap.
pub fn flatten(layers: &LayerStack, background: &Background<'_>) -> Result<Pixmap> {
    let (w, h) = (layers.width(), layers.height());
    let mut out = Pixmap::new(w, h).ok_or(Error::InvalidDimensions {
        width: w,
        height: h,
    })?;
    out.fill(background.color.to_skia());

    if let Some(pattern) = background.pattern {
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, w as f32, h as f32) {
            let mut paint = Paint::default();
            paint.shader = Pattern::new(
                pattern.as_ref(),
                SpreadMode::Repeat,
                FilterQuality::Nearest,
                1.0,
                Transform::identity(),
            );
            out.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    let paint = PixmapPaint::default();
    for kind in COMPOSITE_ORDER {
        out.draw_pixmap(0, 0, layers.get(kind).as_ref(), &paint, Transform::identity(), None);
    }
    Ok(out)
}

/// Flattens and encodes the map.
pub fn export(
    layers: &LayerStack,
    background: &Background<'_>,
    format: ExportFormat,
) -> Result<Vec<u8>> {
    let flat = flatten(layers, background)?;
    let bytes = encode(&flat, format)?;
    info!(
        width = flat.width(),
        height = flat.height(),
        bytes = bytes.len(),
        ?format,
        "exported composite"
    );
    Ok(bytes)
}

fn encode(pixmap: &Pixmap, format: ExportFormat) -> Result<Vec<u8>> {
    let (w, h) = (pixmap.width(), pixmap.height());
    let mut buf = Vec::new();
    match format {
        ExportFormat::Jpeg { quality } => {
            let rgb: Vec<u8> = pixmap
                .pixels()
                .iter()
                .flat_map(|p| {
                    let c = p.demultiply();
                    [c.red(), c.green(), c.blue()]
                })
                .collect();
            let img = RgbImage::from_raw(w, h, rgb)
                .ok_or_else(|| Error::Encode("rgb buffer size mismatch".into()))?;
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
            DynamicImage::ImageRgb8(img)
                .write_with_encoder(encoder)
                .map_err(|e| Error::Encode(e.to_string()))?;
        }
        ExportFormat::Png => {
            let rgba: Vec<u8> = pixmap
                .pixels()
                .iter()
                .flat_map(|p| {
                    let c = p.demultiply();
                    [c.red(), c.green(), c.blue(), c.alpha()]
                })
                .collect();
            let img = RgbaImage::from_raw(w, h, rgba)
                .ok_or_else(|| Error::Encode("rgba buffer size mismatch".into()))?;
            DynamicImage::ImageRgba8(img)
                .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                .map_err(|e| Error::Encode(e.to_string()))?;
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use tiny_skia::Color;

    use super::*;

    #[test]
    fn layers_stack_in_fixed_order() {
        let mut layers = LayerStack::new(4, 4).unwrap();
        layers.shallow_water.fill(Color::from_rgba8(0, 0, 255, 255));
        layers.terrain.fill(Color::from_rgba8(0, 255, 0, 255));
        let flat = flatten(&layers, &Background::color(Rgba8::rgb(255, 0, 0))).unwrap();
        let p = flat.pixel(1, 1).unwrap();
        assert_eq!((p.red(), p.green(), p.blue()), (0, 255, 0));

        layers.text.fill(Color::from_rgba8(9, 9, 9, 255));
        let flat = flatten(&layers, &Background::color(Rgba8::rgb(255, 0, 0))).unwrap();
        assert_eq!(flat.pixel(1, 1).unwrap().red(), 9);
    }

    #[test]
    fn background_pattern_tiles_from_origin() {
        let layers = LayerStack::new(6, 2).unwrap();
        let mut pattern = Pixmap::new(3, 1).unwrap();
        pattern.fill(Color::from_rgba8(10, 20, 30, 255));
        let flat = flatten(
            &layers,
            &Background::color(Rgba8::WHITE).with_pattern(&pattern),
        )
        .unwrap();
        assert_eq!(flat.pixel(5, 1).unwrap().green(), 20);
    }

    #[test]
    fn jpeg_export_decodes_to_same_size() {
        let mut layers = LayerStack::new(16, 8).unwrap();
        layers.terrain.fill(Color::from_rgba8(120, 160, 80, 255));
        let bytes = export(
            &layers,
            &Background::color(Rgba8::rgb(30, 60, 120)),
            ExportFormat::Jpeg { quality: 90 },
        )
        .unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn png_export_is_lossless() {
        let mut layers = LayerStack::new(3, 3).unwrap();
        layers.path.fill(Color::from_rgba8(1, 2, 3, 255));
        let bytes = export(&layers, &Background::color(Rgba8::BLACK), ExportFormat::Png).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(2, 2).0, [1, 2, 3, 255]);
    }
}
