#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec2;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub const CANVAS: (u32, u32) = (1024, 768);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

pub fn pixels_throughput(width: u32, height: u32) -> Throughput {
    Throughput::Elements((width as u64 * height as u64).max(1))
}

/// Dab positions along a wavy horizontal stroke across the canvas.
pub fn wavy_stroke(samples: usize, width: f32, height: f32) -> Vec<Vec2> {
    (0..samples)
        .map(|i| {
            let t = i as f32 / samples.max(2).saturating_sub(1) as f32;
            let x = width * (0.1 + 0.8 * t);
            let y = height * 0.5 + (t * std::f32::consts::TAU * 2.0).sin() * height * 0.2;
            Vec2::new(x, y)
        })
        .collect()
}
