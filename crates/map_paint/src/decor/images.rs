//! Load-once image cache for patterns, textures and asset sources.
//!
//! - Provide bytes by implementing [`ImageLoader`] (or use [`FsImageLoader`]).
//! - Sources are keyed by their string identity and decoded at most once.
//! - A source that fails to load or decode resolves to a 1x1 transparent image.
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use tiny_skia::{ColorU8, Pixmap};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Fetches raw encoded image bytes for a source identifier.
pub trait ImageLoader: Send + Sync {
    fn fetch(&self, source: &str) -> std::io::Result<Vec<u8>>;
}

/// Reads sources as file paths, relative to `root` unless absolute.
#[derive(Clone, Debug, Default)]
pub struct FsImageLoader {
    root: PathBuf,
}

impl FsImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageLoader for FsImageLoader {
    fn fetch(&self, source: &str) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.root.join(source))
    }
}

/// Decodes any supported encoded image into a premultiplied pixmap.
pub fn decode_pixmap(bytes: &[u8]) -> std::result::Result<Pixmap, String> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| e.to_string())?
        .to_rgba8();
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| format!("invalid image dimensions {width}x{height}"))?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Cache of decoded images keyed by source identity.
pub struct ImageCache {
    loader: Box<dyn ImageLoader>,
    images: HashMap<String, Arc<Pixmap>>,
    failed: HashSet<String>,
    /// Shared by every failed source, built on the first failure.
    blank: Option<Arc<Pixmap>>,
}

impl ImageCache {
    pub fn new(loader: impl ImageLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            images: HashMap::new(),
            failed: HashSet::new(),
            blank: None,
        }
    }

    /// Returns the number of cached sources, failed ones included.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn contains(&self, source: &str) -> bool {
        self.images.contains_key(source)
    }

    /// Inserts an already decoded image, replacing any cached entry.
    pub fn register(&mut self, source: impl Into<String>, pixmap: Pixmap) {
        let source = source.into();
        self.failed.remove(&source);
        self.images.insert(source, Arc::new(pixmap));
    }

    /// Returns the cached image without attempting a load.
    pub fn get(&self, source: &str) -> Option<Arc<Pixmap>> {
        self.images.get(source).cloned()
    }

    /// Returns the image for `source`, loading and decoding it on first use.
    ///
    /// A broken source is logged and cached as a shared 1x1 transparent image.
    /// `None` only if that placeholder cannot be allocated.
    pub fn get_or_load(&mut self, source: &str) -> Option<Arc<Pixmap>> {
        if let Some(image) = self.images.get(source) {
            return Some(Arc::clone(image));
        }
        let image = match self.load(source) {
            Ok(pixmap) => {
                debug!(
                    source,
                    width = pixmap.width(),
                    height = pixmap.height(),
                    "image loaded"
                );
                Arc::new(pixmap)
            }
            Err(err) => {
                warn!(source, %err, "image load failed, using blank image");
                self.failed.insert(source.to_owned());
                self.blank()?
            }
        };
        self.images.insert(source.to_owned(), Arc::clone(&image));
        Some(image)
    }

    /// Pixel size of a cached image, for filling in asset dimensions.
    pub fn dimensions(&self, source: &str) -> Option<(u32, u32)> {
        self.images.get(source).map(|p| (p.width(), p.height()))
    }

    /// Sources whose load or decode failed, sorted.
    pub fn failed_sources(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.failed.iter().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.failed.clear();
    }

    fn blank(&mut self) -> Option<Arc<Pixmap>> {
        if self.blank.is_none() {
            self.blank = Pixmap::new(1, 1).map(Arc::new);
        }
        self.blank.clone()
    }

    fn load(&self, source: &str) -> Result<Pixmap> {
        let bytes = self.loader.fetch(source)?;
        decode_pixmap(&bytes).map_err(|message| Error::ImageLoad {
            source_id: source.to_owned(),
            message,
        })
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(FsImageLoader::default())
    }
}
