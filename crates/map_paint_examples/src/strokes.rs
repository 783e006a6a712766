//! Synthetic pointer input and output helpers shared by the example binaries.
use std::f32::consts::TAU;
use std::path::Path;

use glam::Vec2;
use map_paint::prelude::*;
use tracing::info;

/// Installs a formatting subscriber at INFO (overridable through `RUST_LOG`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Evenly spaced samples from `from` to `to`, both ends included.
pub fn line_stroke(from: Vec2, to: Vec2, samples: usize) -> Vec<Vec2> {
    let n = samples.max(2);
    (0..n)
        .map(|i| from.lerp(to, i as f32 / (n - 1) as f32))
        .collect()
}

/// Samples along a sine wave running from `from` to `to`.
pub fn wavy_stroke(from: Vec2, to: Vec2, amplitude: f32, waves: f32, samples: usize) -> Vec<Vec2> {
    let dir = to - from;
    let normal = dir.perp().normalize_or_zero();
    line_stroke(from, to, samples)
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let t = i as f32 / (samples.max(2) - 1) as f32;
            p + normal * (t * waves * TAU).sin() * amplitude
        })
        .collect()
}

/// Samples around a circle, closed.
pub fn circle_stroke(center: Vec2, radius: f32, samples: usize) -> Vec<Vec2> {
    let n = samples.max(3);
    (0..=n)
        .map(|i| {
            let a = i as f32 / n as f32 * TAU;
            center + Vec2::new(a.cos(), a.sin()) * radius
        })
        .collect()
}

/// One stroke of dabs: begin, one dab per sample, end.
pub fn paint_stroke(engine: &mut PaintEngine, points: &[Vec2], tool: &ToolConfig) {
    engine.begin_stroke();
    for &p in points {
        engine.apply_paint(p, tool);
    }
    engine.end_stroke();
}

/// One path stroke: consecutive samples become segments.
pub fn path_stroke(engine: &mut PaintEngine, points: &[Vec2], tool: &ToolConfig) {
    engine.begin_stroke();
    for pair in points.windows(2) {
        engine.draw_path_segment(pair[0], pair[1], tool);
    }
    engine.end_stroke();
}

/// Exports the composite over `ocean` and writes it to `path`.
pub fn write_export(
    engine: &mut PaintEngine,
    ocean: Rgba8,
    format: ExportFormat,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let bytes = engine
        .export_composite(ocean, None, format)?
        .ok_or_else(|| anyhow::anyhow!("engine not initialized"))?;
    std::fs::write(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote export");
    Ok(())
}
