//! Opaque capture/restore of the paintable layers.
//!
//! A [`Snapshot`] holds the land mask, texture mask, terrain and path layers as
//! independent PNG blobs. Assets and labels are not included; they are redrawn
//! from their own lists.
use tiny_skia::{Pixmap, PixmapPaint, Transform};

use crate::error::{Error, Result};
use crate::layers::LayerStack;

/// Four independently decodable PNG blobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub land_mask: Vec<u8>,
    /// Missing in data saved before texture masks existed.
    pub texture_mask: Option<Vec<u8>>,
    pub terrain: Vec<u8>,
    pub path: Vec<u8>,
}

/// Rasters decoded from a [`Snapshot`], ready to be applied.
pub(crate) struct DecodedSnapshot {
    land_mask: Pixmap,
    texture_mask: Option<Pixmap>,
    terrain: Pixmap,
    path: Pixmap,
}

impl Snapshot {
    /// Encodes the paintable layers of `layers`.
    pub fn capture(layers: &LayerStack) -> Result<Self> {
        Ok(Self {
            land_mask: encode(&layers.land_mask)?,
            texture_mask: Some(encode(&layers.texture_mask)?),
            terrain: encode(&layers.terrain)?,
            path: encode(&layers.path)?,
        })
    }

    /// Total encoded size in bytes.
    pub fn byte_len(&self) -> usize {
        self.land_mask.len()
            + self.texture_mask.as_ref().map_or(0, Vec::len)
            + self.terrain.len()
            + self.path.len()
    }

    /// Decodes every blob; fails on the first one that does not decode.
    pub(crate) fn decode(&self) -> Result<DecodedSnapshot> {
        Ok(DecodedSnapshot {
            land_mask: decode("landMask", &self.land_mask)?,
            texture_mask: self
                .texture_mask
                .as_deref()
                .map(|bytes| decode("textureMask", bytes))
                .transpose()?,
            terrain: decode("terrain", &self.terrain)?,
            path: decode("path", &self.path)?,
        })
    }
}

impl DecodedSnapshot {
    /// Draws each raster at the origin of a freshly cleared stack.
    pub(crate) fn apply(self, layers: &mut LayerStack) {
        layers.clear();
        let paint = PixmapPaint::default();
        let id = Transform::identity();
        layers
            .land_mask
            .draw_pixmap(0, 0, self.land_mask.as_ref(), &paint, id, None);
        if let Some(mask) = &self.texture_mask {
            layers
                .texture_mask
                .draw_pixmap(0, 0, mask.as_ref(), &paint, id, None);
        }
        layers
            .terrain
            .draw_pixmap(0, 0, self.terrain.as_ref(), &paint, id, None);
        layers
            .path
            .draw_pixmap(0, 0, self.path.as_ref(), &paint, id, None);
    }
}

fn encode(pixmap: &Pixmap) -> Result<Vec<u8>> {
    pixmap.encode_png().map_err(|e| Error::Encode(e.to_string()))
}

fn decode(layer: &str, bytes: &[u8]) -> Result<Pixmap> {
    Pixmap::decode_png(bytes).map_err(|e| Error::Decode {
        layer: layer.to_owned(),
        message: e.to_string(),
    })
}
