use glam::Vec2;
use map_paint::prelude::*;
use map_paint_examples::{circle_stroke, init_tracing, paint_stroke, path_stroke, write_export};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let (w, h) = (480, 360);
    let mut engine = PaintEngine::new(EngineConfig::new().with_seed(5))?;
    engine.init(w, h)?;

    let tool = ToolConfig {
        brush_size: 90.0,
        ..ToolConfig::default()
    };
    paint_stroke(&mut engine, &circle_stroke(Vec2::new(240.0, 180.0), 80.0, 32), &tool);
    let trail = ToolConfig::default()
        .with_mode(PaintMode::Path)
        .with_brush_size(5.0);
    path_stroke(
        &mut engine,
        &[Vec2::new(160.0, 180.0), Vec2::new(240.0, 140.0), Vec2::new(320.0, 190.0)],
        &trail,
    );

    // Save: snapshot + UI state into a project document.
    let snapshot = engine
        .capture()?
        .ok_or_else(|| anyhow::anyhow!("engine not initialized"))?;
    let state = serde_json::json!({
        "brushSize": tool.brush_size,
        "paintMode": "terrain",
        "isShallowWaterEnabled": true,
    });
    let json = ProjectFile::from_snapshot(&snapshot, w, h, "Round Trip", state).to_json()?;
    std::fs::write("project-roundtrip.json", &json)?;
    info!(bytes = json.len(), "saved project");

    // Load into a fresh engine.
    let project = ProjectFile::from_json(&std::fs::read_to_string("project-roundtrip.json")?)?;
    let restored_tool = ToolConfig::from_state(&project.state)?;
    let mut restored = PaintEngine::new(EngineConfig::new().with_seed(5))?;
    restored.restore(&project.to_snapshot()?, project.meta.width, project.meta.height)?;
    restored.update_shallow_water(
        restored_tool.shallow_water_color,
        restored_tool.is_shallow_water_enabled,
    );

    write_export(
        &mut restored,
        Rgba8::rgb(0x2d, 0x5d, 0x8a),
        ExportFormat::Png,
        "project-roundtrip.png",
    )?;
    Ok(())
}
