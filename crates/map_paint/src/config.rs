//! Configuration bundles: the per-call tool configuration supplied by the UI and
//! the engine-wide tuning constants.
use crate::color::Rgba8;
use crate::error::{Error, Result};

/// Which layers a dab mutates.
///
/// `Sea`, `Path`, `Text` and `Asset` exist in the UI tool model but do not paint
/// through [`crate::paint::PaintEngine::apply_paint`]; a dab in those modes is ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PaintMode {
    #[default]
    Terrain,
    River,
    Texture,
    Sea,
    Path,
    Text,
    Asset,
}

/// Mark shape placed along a path stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PathStyle {
    #[default]
    Dots,
    Dashed,
}

/// Tool parameters sent with every paint call.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct ToolConfig {
    /// Brush diameter in pixels.
    pub brush_size: f32,
    pub brush_opacity_percent: f32,
    /// Width of the soft edge; `>= 95` means a hard edge.
    pub falloff_width_percent: f32,
    /// Edge jitter; `0` means a perfect circle.
    pub edge_roughness_percent: f32,
    pub paint_mode: PaintMode,
    pub terrain_color: Rgba8,
    /// Flat fill used by texture mode when no pattern is active.
    pub selected_flat_color: Rgba8,
    /// Image source of the active texture pattern.
    pub active_texture_source: Option<String>,
    pub is_texture_eraser: bool,
    pub path_color: Rgba8,
    pub path_spacing_factor: f32,
    pub path_style: PathStyle,
    pub is_organic_river_enabled: bool,
    pub shallow_water_color: Rgba8,
    pub is_shallow_water_enabled: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            brush_size: 40.0,
            brush_opacity_percent: 100.0,
            falloff_width_percent: 30.0,
            edge_roughness_percent: 40.0,
            paint_mode: PaintMode::Terrain,
            terrain_color: Rgba8::rgb(0xd8, 0xc9, 0x9b),
            selected_flat_color: Rgba8::rgb(0x4a, 0x7a, 0x3b),
            active_texture_source: None,
            is_texture_eraser: false,
            path_color: Rgba8::rgb(0x5b, 0x3a, 0x1e),
            path_spacing_factor: 2.5,
            path_style: PathStyle::Dots,
            is_organic_river_enabled: true,
            shallow_water_color: Rgba8::rgb(0x9f, 0xd8, 0xe6),
            is_shallow_water_enabled: true,
        }
    }
}

impl ToolConfig {
    /// Stamp radius derived from the brush diameter.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.brush_size * 0.5
    }

    /// Brush opacity as a `[0, 1]` multiplier.
    #[inline]
    pub fn opacity(&self) -> f32 {
        (self.brush_opacity_percent / 100.0).clamp(0.0, 1.0)
    }

    pub fn with_mode(mut self, mode: PaintMode) -> Self {
        self.paint_mode = mode;
        self
    }

    pub fn with_brush_size(mut self, size: f32) -> Self {
        self.brush_size = size;
        self
    }

    pub fn with_texture(mut self, source: impl Into<String>) -> Self {
        self.active_texture_source = Some(source.into());
        self
    }

    pub fn with_texture_eraser(mut self, eraser: bool) -> Self {
        self.is_texture_eraser = eraser;
        self
    }

    pub fn with_path_style(mut self, style: PathStyle, spacing_factor: f32) -> Self {
        self.path_style = style;
        self.path_spacing_factor = spacing_factor;
        self
    }

    /// Reads the tool configuration out of a UI state object, ignoring unknown keys.
    #[cfg(feature = "serde")]
    pub fn from_state(state: &serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(state.clone())?)
    }
}

/// Tuning constants for the organic river width walk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiverParams {
    /// Travel distance range before a new width target is picked.
    pub change_distance: (f32, f32),
    /// Range of width factors a new target is drawn from.
    pub width_factor: (f32, f32),
    /// Fraction of the remaining gap closed per dab.
    pub blend_rate: f32,
}

impl Default for RiverParams {
    fn default() -> Self {
        Self {
            change_distance: (20.0, 60.0),
            width_factor: (0.6, 1.1),
            blend_rate: 0.15,
        }
    }
}

/// Shape of the coastal halo.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShallowWaterParams {
    /// Distance in pixels over which the solid shelf holds before fading.
    pub shelf_width: f32,
    pub shelf_opacity: f32,
    /// Distance in pixels at which the soft outer fade reaches zero.
    pub fade_width: f32,
    pub fade_opacity: f32,
}

impl Default for ShallowWaterParams {
    fn default() -> Self {
        Self {
            shelf_width: 10.0,
            shelf_opacity: 0.85,
            fade_width: 45.0,
            fade_opacity: 0.45,
        }
    }
}

/// Engine-wide configuration.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Seed for stamp jitter and dab rotation. Time-derived when `None`.
    pub seed: Option<u64>,
    pub river: RiverParams,
    pub shallow_water: ShallowWaterParams,
    /// Quality used for lossy composite export.
    pub jpeg_quality: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            river: RiverParams::default(),
            shallow_water: ShallowWaterParams::default(),
            jpeg_quality: 92,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a fixed random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the river walk parameters.
    pub fn with_river(mut self, river: RiverParams) -> Self {
        self.river = river;
        self
    }

    /// Sets the halo shape.
    pub fn with_shallow_water(mut self, shallow_water: ShallowWaterParams) -> Self {
        self.shallow_water = shallow_water;
        self
    }

    /// Sets the JPEG export quality.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        let r = &self.river;
        if !(r.change_distance.0 > 0.0 && r.change_distance.0 <= r.change_distance.1) {
            return Err(Error::InvalidConfig(
                "river change_distance must satisfy 0 < min <= max".into(),
            ));
        }
        if !(r.width_factor.0 > 0.0 && r.width_factor.0 <= r.width_factor.1) {
            return Err(Error::InvalidConfig(
                "river width_factor must satisfy 0 < min <= max".into(),
            ));
        }
        if !(r.blend_rate > 0.0 && r.blend_rate <= 1.0) {
            return Err(Error::InvalidConfig(
                "river blend_rate must be in (0, 1]".into(),
            ));
        }
        let s = &self.shallow_water;
        if s.shelf_width < 0.0 || s.fade_width <= 0.0 {
            return Err(Error::InvalidConfig(
                "shallow water widths must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&s.shelf_opacity) || !(0.0..=1.0).contains(&s.fade_opacity) {
            return Err(Error::InvalidConfig(
                "shallow water opacities must be in [0, 1]".into(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::InvalidConfig("jpeg_quality must be in 1..=100".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_width_range() {
        let cfg = EngineConfig::new().with_river(RiverParams {
            width_factor: (1.2, 0.6),
            ..RiverParams::default()
        });
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_blend_rate_and_bad_quality() {
        let cfg = EngineConfig::new().with_river(RiverParams {
            blend_rate: 0.0,
            ..RiverParams::default()
        });
        assert!(cfg.validate().is_err());
        assert!(EngineConfig::new().with_jpeg_quality(0).validate().is_err());
    }

    #[test]
    fn radius_is_half_the_brush_size() {
        let cfg = ToolConfig::default().with_brush_size(30.0);
        assert_eq!(cfg.radius(), 15.0);
    }

    #[test]
    fn opacity_is_clamped() {
        let cfg = ToolConfig {
            brush_opacity_percent: 150.0,
            ..ToolConfig::default()
        };
        assert_eq!(cfg.opacity(), 1.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn reads_camel_case_ui_state() {
        let state = serde_json::json!({
            "brushSize": 24,
            "paintMode": "river",
            "terrainColor": "#112233",
            "pathStyle": "dashed",
            "isOrganicRiverEnabled": false,
            "zoom": 2.0
        });
        let cfg = ToolConfig::from_state(&state).unwrap();
        assert_eq!(cfg.brush_size, 24.0);
        assert_eq!(cfg.paint_mode, PaintMode::River);
        assert_eq!(cfg.terrain_color, Rgba8::rgb(0x11, 0x22, 0x33));
        assert_eq!(cfg.path_style, PathStyle::Dashed);
        assert!(!cfg.is_organic_river_enabled);
        assert_eq!(cfg.path_spacing_factor, 2.5);
    }
}
