//! Histogram rendering: ASCII for the terminal, SVG for a chart file.

pub mod ascii;
pub mod histogram;
pub mod svg;

pub use ascii::render_ascii_histogram;
pub use histogram::{Band, Histogram};
pub use svg::{DEFAULT_CHART_BINS, HistogramChart};
