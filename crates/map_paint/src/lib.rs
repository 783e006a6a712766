#![forbid(unsafe_code)]
//! map_paint: Layered raster painting of hand-drawn looking maps.
//!
//! Modules:
//! - stamp: procedural brush footprints (organic blobs, soft or hard edges) and their compositing
//! - paint: the engine applying terrain, river and texture dabs plus dotted/dashed paths
//! - compose: texture fill, shallow-water halo and the flattened export
//! - decor: image assets and straight or curved text labels
//! - snapshot / project: capture and restore of the paintable layers
//!
//! For examples and docs, see README and docs.rs.
pub mod color;
pub mod compose;
pub mod config;
pub mod decor;
pub mod error;
pub mod layers;
pub mod paint;
#[cfg(feature = "serde")]
pub mod project;
mod random;
pub mod snapshot;
pub mod stamp;

/// Convenient re-exports for common types. Import with `use map_paint::prelude::*;`.
pub mod prelude {
    pub use crate::color::Rgba8;
    pub use crate::compose::{Background, ExportFormat, ShallowWaterSynthesizer, TextureCompositor};
    pub use crate::config::{
        EngineConfig, PaintMode, PathStyle, RiverParams, ShallowWaterParams, ToolConfig,
    };
    pub use crate::decor::{Asset, FsImageLoader, ImageCache, ImageLoader, Label};
    pub use crate::error::{Error, Result};
    pub use crate::layers::{DirtyRegion, LayerKind, LayerStack};
    pub use crate::paint::{PaintEngine, PathTracer, RiverState};
    #[cfg(feature = "serde")]
    pub use crate::project::ProjectFile;
    pub use crate::snapshot::Snapshot;
    pub use crate::stamp::{Composite, Dab, StampGenerator, StampKey, StampRenderer};
}
