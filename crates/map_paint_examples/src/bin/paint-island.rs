use glam::Vec2;
use map_paint::prelude::*;
use map_paint_examples::{circle_stroke, init_tracing, paint_stroke, wavy_stroke, write_export};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let (w, h) = (800, 600);
    let mut engine = PaintEngine::new(EngineConfig::new().with_seed(42))?;
    engine.init(w, h)?;

    // Land: a soft, rough main island plus a hard-edged islet.
    let land = ToolConfig {
        brush_size: 140.0,
        edge_roughness_percent: 45.0,
        falloff_width_percent: 25.0,
        ..ToolConfig::default()
    };
    paint_stroke(&mut engine, &circle_stroke(Vec2::new(380.0, 300.0), 120.0, 48), &land);
    paint_stroke(
        &mut engine,
        &[Vec2::new(380.0, 300.0), Vec2::new(330.0, 280.0)],
        &land.clone().with_brush_size(220.0),
    );
    let islet = ToolConfig {
        falloff_width_percent: 100.0,
        ..land.clone().with_brush_size(60.0)
    };
    paint_stroke(&mut engine, &[Vec2::new(640.0, 140.0)], &islet);

    // A winding organic river through the main island.
    let river = ToolConfig::default()
        .with_mode(PaintMode::River)
        .with_brush_size(22.0);
    let course = wavy_stroke(Vec2::new(250.0, 120.0), Vec2::new(480.0, 480.0), 30.0, 1.5, 90);
    paint_stroke(&mut engine, &course, &river);

    engine.update_shallow_water(Rgba8::rgb(0x9f, 0xd8, 0xe6), true);

    let ocean = Rgba8::rgb(0x2d, 0x5d, 0x8a);
    let jpeg = engine.default_export_format();
    write_export(&mut engine, ocean, jpeg, "paint-island.jpg")?;
    write_export(&mut engine, ocean, ExportFormat::Png, "paint-island.png")?;
    Ok(())
}
