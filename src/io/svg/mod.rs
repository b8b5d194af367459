//! SVG format writing operations for visualization export.

mod color;
mod writer;

pub use color::{sequential_color, Rgb};
pub use writer::write_grid_svg;
