//! The fixed stack of map-sized raster layers.
//!
//! Masks are stored as white pixmaps where only alpha carries meaning. All layers
//! share one size and are reallocated together; resizing discards content.
use tiny_skia::{IntRect, Pixmap};
use tracing::info;

use crate::error::{Error, Result};

/// Largest accepted canvas side in pixels.
pub const MAX_CANVAS_SIDE: u32 = 16_384;
/// Largest accepted canvas area in pixels, per layer.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 25;

/// Rejects empty canvases and ones too large to allocate the whole stack for.
pub fn check_dimensions(width: u32, height: u32) -> Result<()> {
    let area = u64::from(width) * u64::from(height);
    if width == 0
        || height == 0
        || width > MAX_CANVAS_SIDE
        || height > MAX_CANVAS_SIDE
        || area > MAX_CANVAS_PIXELS
    {
        return Err(Error::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Identifies one layer of the [`LayerStack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Authoritative land silhouette.
    LandMask,
    /// Where the user painted a texture fill.
    TextureMask,
    Terrain,
    Texture,
    ShallowWater,
    Path,
    Assets,
    Text,
}

impl LayerKind {
    pub const ALL: [LayerKind; 8] = [
        LayerKind::LandMask,
        LayerKind::TextureMask,
        LayerKind::Terrain,
        LayerKind::Texture,
        LayerKind::ShallowWater,
        LayerKind::Path,
        LayerKind::Assets,
        LayerKind::Text,
    ];
}

/// Square region around a dab that needs recomputation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirtyRegion {
    pub x: f32,
    pub y: f32,
    /// Half the side of the square.
    pub radius: f32,
}

impl DirtyRegion {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }

    /// Intersects the square with a `width` x `height` canvas. `None` when fully off-canvas.
    pub fn clip(&self, width: u32, height: u32) -> Option<IntRect> {
        let left = (self.x - self.radius).floor().max(0.0);
        let top = (self.y - self.radius).floor().max(0.0);
        let right = (self.x + self.radius).ceil().min(width as f32);
        let bottom = (self.y + self.radius).ceil().min(height as f32);
        if right <= left || bottom <= top {
            return None;
        }
        IntRect::from_ltrb(left as i32, top as i32, right as i32, bottom as i32)
    }
}

/// Every raster the engine owns, all sized `width` x `height`.
#[derive(Clone)]
pub struct LayerStack {
    width: u32,
    height: u32,
    pub land_mask: Pixmap,
    pub texture_mask: Pixmap,
    pub terrain: Pixmap,
    pub texture: Pixmap,
    pub shallow_water: Pixmap,
    pub path: Pixmap,
    pub assets: Pixmap,
    pub text: Pixmap,
}

impl LayerStack {
    /// Allocates a transparent stack of the given size.
    ///
    /// Fails with [`Error::InvalidDimensions`] outside the limits of [`check_dimensions`].
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        let alloc = || Pixmap::new(width, height).ok_or(Error::InvalidDimensions { width, height });
        Ok(Self {
            width,
            height,
            land_mask: alloc()?,
            texture_mask: alloc()?,
            terrain: alloc()?,
            texture: alloc()?,
            shallow_water: alloc()?,
            path: alloc()?,
            assets: alloc()?,
            text: alloc()?,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Full-canvas rectangle.
    pub fn bounds(&self) -> Option<IntRect> {
        IntRect::from_xywh(0, 0, self.width, self.height)
    }

    /// Reallocates every layer. Content is discarded even if the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        *self = Self::new(width, height)?;
        info!(width, height, "resized layer stack");
        Ok(())
    }

    /// Makes every layer fully transparent.
    pub fn clear(&mut self) {
        for kind in LayerKind::ALL {
            self.get_mut(kind).fill(tiny_skia::Color::TRANSPARENT);
        }
    }

    pub fn get(&self, kind: LayerKind) -> &Pixmap {
        match kind {
            LayerKind::LandMask => &self.land_mask,
            LayerKind::TextureMask => &self.texture_mask,
            LayerKind::Terrain => &self.terrain,
            LayerKind::Texture => &self.texture,
            LayerKind::ShallowWater => &self.shallow_water,
            LayerKind::Path => &self.path,
            LayerKind::Assets => &self.assets,
            LayerKind::Text => &self.text,
        }
    }

    pub fn get_mut(&mut self, kind: LayerKind) -> &mut Pixmap {
        match kind {
            LayerKind::LandMask => &mut self.land_mask,
            LayerKind::TextureMask => &mut self.texture_mask,
            LayerKind::Terrain => &mut self.terrain,
            LayerKind::Texture => &mut self.texture,
            LayerKind::ShallowWater => &mut self.shallow_water,
            LayerKind::Path => &mut self.path,
            LayerKind::Assets => &mut self.assets,
            LayerKind::Text => &mut self.text,
        }
    }

    /// Alpha of a mask or layer at a pixel, `0` outside the canvas.
    pub fn alpha_at(&self, kind: LayerKind, x: u32, y: u32) -> u8 {
        self.get(kind)
            .pixel(x, y)
            .map(|p| p.alpha())
            .unwrap_or(0)
    }
}

/// Zeroes every pixel of `rect`. The rectangle must lie inside the pixmap.
pub(crate) fn clear_rect(pixmap: &mut Pixmap, rect: IntRect) {
    let w = pixmap.width() as usize;
    let (x0, x1) = (rect.left() as usize, rect.right() as usize);
    let pixels = pixmap.pixels_mut();
    for y in rect.top() as usize..rect.bottom() as usize {
        let row = y * w;
        pixels[row + x0..row + x1].fill(tiny_skia::PremultipliedColorU8::TRANSPARENT);
    }
}
