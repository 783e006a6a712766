use glam::Vec2;
use map_paint::prelude::*;
use map_paint_examples::{init_tracing, line_stroke, paint_stroke, write_export};
use tiny_skia::{Color, Pixmap};

const GRASS: &str = "grass";

/// 16x16 two-tone checker used as the texture pattern.
fn grass_pattern() -> anyhow::Result<Pixmap> {
    let mut p = Pixmap::new(16, 16).ok_or_else(|| anyhow::anyhow!("pattern allocation"))?;
    p.fill(Color::from_rgba8(70, 130, 50, 255));
    let dark = Color::from_rgba8(50, 100, 40, 255).premultiply().to_color_u8();
    for y in 0..16 {
        for x in 0..16 {
            if (x / 4 + y / 4) % 2 == 0 {
                p.pixels_mut()[y * 16 + x] = dark;
            }
        }
    }
    Ok(p)
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut engine = PaintEngine::new(EngineConfig::new().with_seed(3))?;
    engine.images_mut().register(GRASS, grass_pattern()?);
    engine.init(640, 400)?;

    let land = ToolConfig {
        brush_size: 200.0,
        edge_roughness_percent: 35.0,
        ..ToolConfig::default()
    };
    paint_stroke(
        &mut engine,
        &line_stroke(Vec2::new(180.0, 200.0), Vec2::new(460.0, 200.0), 12),
        &land,
    );

    // Texture spills over the coast but only shows on land.
    let texture = ToolConfig::default()
        .with_mode(PaintMode::Texture)
        .with_brush_size(120.0)
        .with_texture(GRASS);
    paint_stroke(
        &mut engine,
        &line_stroke(Vec2::new(100.0, 200.0), Vec2::new(540.0, 200.0), 24),
        &texture,
    );

    // Erase a band through the middle.
    let eraser = texture.clone().with_brush_size(50.0).with_texture_eraser(true);
    paint_stroke(
        &mut engine,
        &line_stroke(Vec2::new(320.0, 60.0), Vec2::new(320.0, 340.0), 20),
        &eraser,
    );

    write_export(
        &mut engine,
        Rgba8::rgb(0x2d, 0x5d, 0x8a),
        ExportFormat::Png,
        "texture-fill-and-eraser.png",
    )?;
    Ok(())
}
