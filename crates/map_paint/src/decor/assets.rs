//! Decorative image stamps placed from a declarative list.
use tiny_skia::{
    Color, FilterQuality, Paint, PathBuilder, Pattern, Pixmap, Rect, SpreadMode, Stroke,
    StrokeDash, Transform,
};
use tracing::trace;

use super::images::ImageCache;
use crate::color::Rgba8;

/// Color of the dashed selection rectangle.
pub const SELECTION_COLOR: Rgba8 = Rgba8::rgb(0x3b, 0x82, 0xf6);
/// Selection stroke width in screen pixels.
pub const SELECTION_STROKE: f32 = 2.0;
const SELECTION_DASH: [f32; 2] = [6.0, 4.0];

/// One placed image.
///
/// `width`/`height` are filled in by the caller once the source has loaded;
/// zero means the image size is not known yet.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct Asset {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(alias = "src"))]
    pub image_source: String,
    pub x: f32,
    pub y: f32,
    pub rotation_degrees: f32,
    pub scale: f32,
    pub flip_x: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for Asset {
    fn default() -> Self {
        Self {
            id: String::new(),
            image_source: String::new(),
            x: 0.0,
            y: 0.0,
            rotation_degrees: 0.0,
            scale: 1.0,
            flip_x: false,
            width: 0,
            height: 0,
        }
    }
}

impl Asset {
    pub fn new(id: impl Into<String>, image_source: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            image_source: image_source.into(),
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_flip_x(mut self, flip: bool) -> Self {
        self.flip_x = flip;
        self
    }

    pub fn is_placeholder(&self) -> bool {
        self.width == 0
    }

    /// Image space to canvas: centered on `(x, y)`, rotated, then scaled.
    pub fn transform(&self) -> Transform {
        let sx = if self.flip_x { -self.scale } else { self.scale };
        Transform::from_translate(self.x, self.y)
            .pre_rotate(self.rotation_degrees)
            .pre_scale(sx, self.scale)
    }
}

/// Redraws `layer` from scratch with every asset, in list order.
pub fn render_assets(
    layer: &mut Pixmap,
    assets: &[Asset],
    selected: Option<&str>,
    images: &mut ImageCache,
) {
    layer.fill(Color::TRANSPARENT);
    for asset in assets {
        if asset.scale == 0.0 || !asset.scale.is_finite() {
            continue;
        }
        let Some(image) = images.get_or_load(&asset.image_source) else {
            continue;
        };
        let pixmap: &Pixmap = &image;
        let (w, h) = if asset.is_placeholder() {
            (pixmap.width() as f32, pixmap.height() as f32)
        } else {
            (asset.width as f32, asset.height as f32)
        };
        let Some(rect) = Rect::from_xywh(-w * 0.5, -h * 0.5, w, h) else {
            continue;
        };
        let transform = asset.transform();

        let sx = w / pixmap.width() as f32;
        let sy = h / pixmap.height() as f32;
        let mut paint = Paint::default();
        paint.shader = Pattern::new(
            pixmap.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bilinear,
            1.0,
            Transform::from_translate(-w * 0.5, -h * 0.5).pre_scale(sx, sy),
        );
        layer.fill_rect(rect, &paint, transform, None);

        if selected == Some(asset.id.as_str()) {
            draw_selection(layer, rect, asset.scale.abs(), transform);
        }
    }
    trace!(count = assets.len(), "assets redrawn");
}

/// Dashed rectangle whose stroke stays `SELECTION_STROKE` wide after scaling.
fn draw_selection(layer: &mut Pixmap, rect: Rect, scale: f32, transform: Transform) {
    let path = PathBuilder::from_rect(rect);
    let mut paint = Paint::default();
    paint.set_color(SELECTION_COLOR.to_skia());
    paint.anti_alias = true;
    let stroke = Stroke {
        width: SELECTION_STROKE / scale,
        dash: StrokeDash::new(SELECTION_DASH.iter().map(|d| d / scale).collect(), 0.0),
        ..Stroke::default()
    };
    layer.stroke_path(&path, &paint, &stroke, transform, None);
}
