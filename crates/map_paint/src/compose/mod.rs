//! Layers derived from the masks, and the flattened export.
//!
//! - texture: pattern fill clipped to texture and land masks, full or dirty-rect
//! - shallow: coastal halo from a distance transform of the land mask
//! - export: fixed z-order composite encoded as JPEG or PNG
pub mod edt;
pub mod export;
pub mod shallow;
pub mod texture;

pub use export::{Background, ExportFormat};
pub use shallow::ShallowWaterSynthesizer;
pub use texture::TextureCompositor;
