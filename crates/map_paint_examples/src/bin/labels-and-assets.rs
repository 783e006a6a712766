use glam::Vec2;
use map_paint::prelude::*;
use map_paint_examples::{init_tracing, paint_stroke, write_export};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Transform};
use tracing::warn;

const DEFAULT_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

/// A small tree icon drawn procedurally.
fn tree_icon() -> anyhow::Result<Pixmap> {
    let mut p = Pixmap::new(24, 32).ok_or_else(|| anyhow::anyhow!("icon allocation"))?;
    let mut paint = Paint::default();
    paint.anti_alias = true;

    paint.set_color(Color::from_rgba8(90, 60, 30, 255));
    if let Some(trunk) = tiny_skia::Rect::from_xywh(10.0, 22.0, 4.0, 10.0) {
        p.fill_rect(trunk, &paint, Transform::identity(), None);
    }
    paint.set_color(Color::from_rgba8(30, 110, 50, 255));
    let mut pb = PathBuilder::new();
    pb.move_to(12.0, 0.0);
    pb.line_to(24.0, 24.0);
    pb.line_to(0.0, 24.0);
    pb.close();
    if let Some(crown) = pb.finish() {
        p.fill_path(&crown, &paint, FillRule::Winding, Transform::identity(), None);
    }
    Ok(p)
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut engine = PaintEngine::new(EngineConfig::new().with_seed(11))?;
    engine.images_mut().register("tree", tree_icon()?);
    engine.init(640, 420)?;

    let font_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_FONT.to_owned());
    match std::fs::read(&font_path) {
        Ok(bytes) => engine.load_font(bytes)?,
        Err(err) => warn!(%font_path, %err, "font not found, labels will be skipped"),
    }

    let land = ToolConfig {
        brush_size: 260.0,
        edge_roughness_percent: 40.0,
        ..ToolConfig::default()
    };
    paint_stroke(
        &mut engine,
        &[Vec2::new(260.0, 230.0), Vec2::new(380.0, 220.0)],
        &land,
    );

    let mut assets = Vec::new();
    for (i, (x, y)) in [(220.0, 200.0), (250.0, 260.0), (300.0, 190.0), (340.0, 250.0)]
        .into_iter()
        .enumerate()
    {
        let asset = Asset::new(format!("tree-{i}"), "tree", x, y)
            .with_scale(1.0 + i as f32 * 0.2)
            .with_rotation(i as f32 * 6.0 - 9.0)
            .with_flip_x(i % 2 == 1);
        assets.push(asset);
    }
    // The caller fills in loaded dimensions.
    if let Some((w, h)) = engine.images().dimensions("tree") {
        for asset in &mut assets {
            asset.width = w;
            asset.height = h;
        }
    }
    engine.render_assets(&assets, Some("tree-2"));

    let labels = [
        Label::new("title", "The Verdant Isle", 320.0, 60.0)
            .with_size(36.0)
            .with_curvature(25.0)
            .with_color(Rgba8::rgb(250, 240, 210))
            .with_outline(true),
        Label::new("bay", "Quiet Bay", 520.0, 340.0)
            .with_size(20.0)
            .with_rotation(-12.0)
            .with_color(Rgba8::rgb(230, 240, 255)),
        Label::new("reef", "Sunken Reef", 120.0, 360.0)
            .with_size(18.0)
            .with_curvature(-40.0)
            .with_color(Rgba8::rgb(230, 240, 255)),
    ];
    engine.render_labels(&labels, Some("bay"));

    write_export(
        &mut engine,
        Rgba8::rgb(0x2d, 0x5d, 0x8a),
        ExportFormat::Png,
        "labels-and-assets.png",
    )?;
    Ok(())
}
