use glam::Vec2;
use map_paint::prelude::*;
use map_paint_examples::{init_tracing, paint_stroke, path_stroke, wavy_stroke, write_export};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut engine = PaintEngine::new(EngineConfig::new().with_seed(7))?;
    engine.init(600, 300)?;

    let ground = ToolConfig {
        brush_size: 500.0,
        falloff_width_percent: 100.0,
        edge_roughness_percent: 10.0,
        is_shallow_water_enabled: false,
        ..ToolConfig::default()
    };
    paint_stroke(&mut engine, &[Vec2::new(300.0, 150.0)], &ground);

    // Many short segments, as a pointer would deliver them; spacing carries across.
    let trail = wavy_stroke(Vec2::new(40.0, 90.0), Vec2::new(560.0, 90.0), 25.0, 2.0, 120);
    let dots = ToolConfig::default()
        .with_mode(PaintMode::Path)
        .with_brush_size(6.0)
        .with_path_style(PathStyle::Dots, 2.5);
    path_stroke(&mut engine, &trail, &dots);

    let road = wavy_stroke(Vec2::new(40.0, 210.0), Vec2::new(560.0, 210.0), 25.0, 2.0, 120);
    let dashes = ToolConfig {
        path_color: Rgba8::rgb(0x80, 0x20, 0x20),
        ..dots.clone().with_path_style(PathStyle::Dashed, 1.6).with_brush_size(12.0)
    };
    path_stroke(&mut engine, &road, &dashes);

    write_export(
        &mut engine,
        Rgba8::rgb(0x2d, 0x5d, 0x8a),
        ExportFormat::Png,
        "paths-dots-vs-dashes.png",
    )?;
    Ok(())
}
