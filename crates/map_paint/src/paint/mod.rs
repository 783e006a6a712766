//! The paint engine: applies dabs and path segments to the layer stack and keeps
//! the derived layers (texture fill, shallow water) in sync.
//!
//! Every draw entry point is a silent no-op until [`PaintEngine::init`] has bound
//! a layer stack. Stroke-scoped state (river width walk, path remainder) is reset
//! by [`PaintEngine::begin_stroke`] and [`PaintEngine::end_stroke`]; calls within
//! one stroke must arrive in pointer order.
pub mod path;
pub mod river;

use std::sync::Arc;

use ab_glyph::FontArc;
use glam::Vec2;
use rand::rngs::StdRng;
use tiny_skia::Pixmap;
use tracing::{debug, info, trace, warn};

pub use path::{PathMark, PathPen, PathTracer};
pub use river::RiverState;

use crate::color::Rgba8;
use crate::compose::export::{self, Background, ExportFormat};
use crate::compose::{ShallowWaterSynthesizer, TextureCompositor};
use crate::config::{EngineConfig, PaintMode, ToolConfig};
use crate::decor::{self, Asset, ImageCache, ImageLoader, Label};
use crate::error::{Error, Result};
use crate::layers::{DirtyRegion, LayerStack};
use crate::random::{make_rng, rand_rotation};
use crate::snapshot::Snapshot;
use crate::stamp::{Composite, Dab, StampRenderer};

/// Dirty square half-side as a multiple of the dab radius.
pub const DIRTY_RADIUS_FACTOR: f32 = 3.0;
/// Texture brushes always use hard-edged stamps.
pub const TEXTURE_FALLOFF_PERCENT: f32 = 100.0;

/// Owns every layer and applies brush input to them.
pub struct PaintEngine {
    config: EngineConfig,
    layers: Option<LayerStack>,
    stamps: StampRenderer,
    river: RiverState,
    path: PathTracer,
    texture: TextureCompositor,
    shallow: ShallowWaterSynthesizer,
    images: ImageCache,
    active_texture: Option<String>,
    font: Option<FontArc>,
    shallow_color: Rgba8,
    shallow_enabled: bool,
    rng: StdRng,
}

impl PaintEngine {
    /// Creates an uninitialized engine. Fails if `config` is invalid.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let defaults = ToolConfig::default();
        Ok(Self {
            rng: make_rng(config.seed),
            shallow: ShallowWaterSynthesizer::new(config.shallow_water),
            config,
            layers: None,
            stamps: StampRenderer::new(),
            river: RiverState::new(),
            path: PathTracer::new(),
            texture: TextureCompositor::new(),
            images: ImageCache::default(),
            active_texture: None,
            font: None,
            shallow_color: defaults.shallow_water_color,
            shallow_enabled: defaults.is_shallow_water_enabled,
        })
    }

    /// Replaces the image cache with one reading through `loader`.
    pub fn with_image_loader(mut self, loader: impl ImageLoader + 'static) -> Self {
        self.images = ImageCache::new(loader);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Allocates the layer stack. Existing content is discarded.
    pub fn init(&mut self, width: u32, height: u32) -> Result<()> {
        self.layers = Some(LayerStack::new(width, height)?);
        self.river.reset();
        self.path.reset();
        info!(width, height, "paint engine initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.layers.is_some()
    }

    pub fn layers(&self) -> Option<&LayerStack> {
        self.layers.as_ref()
    }

    /// Reallocates every layer at the new size, discarding content.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        match self.layers.as_mut() {
            Some(layers) => layers.resize(width, height),
            None => self.init(width, height),
        }
    }

    /// Clears every layer for a new map.
    pub fn clear(&mut self) {
        if let Some(layers) = self.layers.as_mut() {
            layers.clear();
            debug!("layers cleared");
        }
        self.river.reset();
        self.path.reset();
    }

    pub fn river_state(&self) -> &RiverState {
        &self.river
    }

    pub fn path_tracer(&self) -> &PathTracer {
        &self.path
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut ImageCache {
        &mut self.images
    }

    pub fn active_texture(&self) -> Option<&str> {
        self.active_texture.as_deref()
    }

    /// Resets the river walk and the path remainder.
    pub fn begin_stroke(&mut self) {
        self.river.reset();
        self.path.reset();
        debug!("stroke begin");
    }

    /// Resets the path remainder and refreshes the halo from the final coastline.
    pub fn end_stroke(&mut self) {
        self.path.reset();
        if self.shallow_enabled {
            self.refresh_shallow_water();
        }
        debug!("stroke end");
    }

    /// Applies one dab at `pos` according to `tool.paint_mode`.
    ///
    /// Modes other than terrain, river and texture leave the layers untouched.
    /// The dab position is always recorded for the next distance calculation.
    pub fn apply_paint(&mut self, pos: Vec2, tool: &ToolConfig) {
        if self.layers.is_none() {
            return;
        }
        self.shallow_color = tool.shallow_water_color;
        self.shallow_enabled = tool.is_shallow_water_enabled;
        if tool.paint_mode == PaintMode::Texture {
            self.set_active_texture(tool.active_texture_source.as_deref());
        }
        let pattern = self.active_pattern();
        let Some(layers) = self.layers.as_mut() else {
            return;
        };

        let radius = tool.radius();
        let base = Dab::new(pos.x, pos.y, radius)
            .with_opacity(tool.opacity())
            .with_shape(tool.edge_roughness_percent, tool.falloff_width_percent);

        match tool.paint_mode {
            PaintMode::Terrain => {
                let dab = base.with_rotation(rand_rotation(&mut self.rng));
                self.stamps.draw_stamp(
                    &mut layers.land_mask,
                    &dab.with_color(Rgba8::WHITE),
                    Composite::Over,
                    &mut self.rng,
                );
                self.stamps.draw_stamp(
                    &mut layers.terrain,
                    &dab.with_color(tool.terrain_color),
                    Composite::Over,
                    &mut self.rng,
                );
                let dirty = DirtyRegion::new(pos.x, pos.y, radius * DIRTY_RADIUS_FACTOR);
                self.texture.render(layers, pattern.as_deref(), Some(dirty));
            }
            PaintMode::River => {
                let factor = if tool.is_organic_river_enabled {
                    self.river.advance(pos, &self.config.river, &mut self.rng)
                } else {
                    1.0
                };
                let width = radius * factor;
                let mut dab = base.with_rotation(rand_rotation(&mut self.rng));
                dab.radius = width;
                self.stamps
                    .draw_stamp(&mut layers.land_mask, &dab, Composite::Erase, &mut self.rng);
                self.stamps
                    .draw_stamp(&mut layers.terrain, &dab, Composite::Erase, &mut self.rng);
                let dirty = DirtyRegion::new(pos.x, pos.y, width * DIRTY_RADIUS_FACTOR);
                self.texture.render(layers, pattern.as_deref(), Some(dirty));
                trace!(factor, width, "river dab");
            }
            PaintMode::Texture => match pattern {
                Some(pattern) => {
                    let dab = base.with_shape(tool.edge_roughness_percent, TEXTURE_FALLOFF_PERCENT);
                    let composite = if tool.is_texture_eraser {
                        Composite::Erase
                    } else {
                        Composite::Over
                    };
                    self.stamps
                        .draw_stamp(&mut layers.texture_mask, &dab, composite, &mut self.rng);
                    let dirty = DirtyRegion::new(pos.x, pos.y, radius * DIRTY_RADIUS_FACTOR);
                    self.texture.render(layers, Some(&*pattern), Some(dirty));
                }
                None => {
                    let dab = base.with_color(tool.selected_flat_color);
                    self.stamps.draw_stamp(
                        &mut layers.terrain,
                        &dab,
                        Composite::ClipToContent,
                        &mut self.rng,
                    );
                }
            },
            PaintMode::Sea | PaintMode::Path | PaintMode::Text | PaintMode::Asset => {}
        }
        self.river.last = Some(pos);
    }

    /// Draws dots or dashes from `from` to `to`, continuing the stroke's spacing.
    pub fn draw_path_segment(&mut self, from: Vec2, to: Vec2, tool: &ToolConfig) {
        let Some(layers) = self.layers.as_mut() else {
            return;
        };
        let pen = PathPen {
            style: tool.path_style,
            size: tool.brush_size,
            spacing_factor: tool.path_spacing_factor,
            color: tool.path_color,
        };
        self.path.draw_segment(&mut layers.path, from, to, &pen);
    }

    /// Switches the texture pattern. A change recomputes the whole texture layer.
    pub fn set_active_texture(&mut self, source: Option<&str>) {
        if self.active_texture.as_deref() == source {
            return;
        }
        self.active_texture = source.map(str::to_owned);
        if let Some(source) = source {
            self.images.get_or_load(source);
        }
        debug!(source = ?self.active_texture, "active texture changed");
        self.render_texture_layer(None);
    }

    /// Recomputes the texture layer in `dirty`, or everywhere when `None`.
    pub fn render_texture_layer(&mut self, dirty: Option<DirtyRegion>) {
        let pattern = self.active_pattern();
        if let Some(layers) = self.layers.as_mut() {
            self.texture.render(layers, pattern.as_deref(), dirty);
        }
    }

    /// Stores the shallow-water settings and rebuilds the halo.
    pub fn update_shallow_water(&mut self, color: Rgba8, enabled: bool) {
        self.shallow_color = color;
        self.shallow_enabled = enabled;
        self.refresh_shallow_water();
    }

    fn refresh_shallow_water(&mut self) {
        if let Some(layers) = self.layers.as_mut() {
            self.shallow.update(
                &mut layers.shallow_water,
                &layers.land_mask,
                self.shallow_color,
                self.shallow_enabled,
            );
        }
    }

    /// Redraws the asset layer. `selected` is the id of the selected asset.
    pub fn render_assets(&mut self, assets: &[Asset], selected: Option<&str>) {
        if let Some(layers) = self.layers.as_mut() {
            decor::render_assets(&mut layers.assets, assets, selected, &mut self.images);
        }
    }

    /// Redraws the text layer. Without a font the layer is cleared.
    pub fn render_labels(&mut self, labels: &[Label], selected: Option<&str>) {
        if let Some(layers) = self.layers.as_mut() {
            decor::render_labels(&mut layers.text, labels, selected, self.font.as_ref());
        }
    }

    pub fn set_font(&mut self, font: FontArc) {
        self.font = Some(font);
    }

    /// Parses a TrueType/OpenType font for labels.
    pub fn load_font(&mut self, bytes: Vec<u8>) -> Result<()> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| Error::InvalidConfig(format!("invalid font: {e}")))?;
        self.font = Some(font);
        Ok(())
    }

    /// Encodes the paintable layers. `None` before initialization.
    pub fn capture(&self) -> Result<Option<Snapshot>> {
        self.layers.as_ref().map(Snapshot::capture).transpose()
    }

    /// Replaces the paintable layers with `snapshot`, at `width` x `height`.
    ///
    /// All blobs are decoded before anything changes; on error the engine is left
    /// as it was. Derived layers are recomputed once afterwards.
    pub fn restore(&mut self, snapshot: &Snapshot, width: u32, height: u32) -> Result<()> {
        let decoded = snapshot.decode()?;
        let mut layers = LayerStack::new(width, height)?;
        decoded.apply(&mut layers);
        self.layers = Some(layers);
        self.river.reset();
        self.path.reset();
        self.render_texture_layer(None);
        self.refresh_shallow_water();
        info!(width, height, bytes = snapshot.byte_len(), "snapshot restored");
        Ok(())
    }

    /// JPEG at the configured quality.
    pub fn default_export_format(&self) -> ExportFormat {
        ExportFormat::Jpeg {
            quality: self.config.jpeg_quality,
        }
    }

    /// Flattens every layer over the ocean and encodes it. `None` before initialization.
    pub fn export_composite(
        &mut self,
        ocean: Rgba8,
        ocean_pattern: Option<&str>,
        format: ExportFormat,
    ) -> Result<Option<Vec<u8>>> {
        let pattern = ocean_pattern.and_then(|source| self.images.get_or_load(source));
        let Some(layers) = self.layers.as_ref() else {
            warn!("export requested before initialization");
            return Ok(None);
        };
        let mut background = Background::color(ocean);
        if let Some(pattern) = pattern.as_deref() {
            background = background.with_pattern(pattern);
        }
        export::export(layers, &background, format).map(Some)
    }

    fn active_pattern(&self) -> Option<Arc<Pixmap>> {
        self.active_texture
            .as_deref()
            .and_then(|source| self.images.get(source))
    }
}
