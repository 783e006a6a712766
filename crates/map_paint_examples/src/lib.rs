#![forbid(unsafe_code)]

mod strokes;

pub use strokes::{
    circle_stroke, init_tracing, line_stroke, paint_stroke, path_stroke, wavy_stroke,
    write_export,
};
