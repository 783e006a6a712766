//! Decorative overlays redrawn from declarative lists: image assets and text labels.
pub mod assets;
pub mod images;
pub mod labels;

pub use assets::{render_assets, Asset};
pub use images::{FsImageLoader, ImageCache, ImageLoader};
pub use labels::{render_labels, GlyphPlacement, Label};
