//! ASCII histogram for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid, one column per bin), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Bar glyphs:
//! - below the reference price: `:`
//! - above the reference price: `#`
//! - bull scenario: `*`

use crate::plot::histogram::{Band, Histogram};

/// Render a histogram of `values`, one column per bin.
pub fn render_ascii_histogram(
    values: &[f64],
    reference_price: f64,
    bull_threshold: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(3);

    let Some(hist) = Histogram::new(values, width) else {
        return "Histogram: no data\n".to_string();
    };

    let bands = hist.bands(reference_price, bull_threshold);
    let max_count = hist.max_count().max(1);

    let mut grid = vec![vec![' '; width]; height];
    for (x, (&count, band)) in hist.counts.iter().zip(&bands).enumerate() {
        let rows = bar_rows(count, max_count, height);
        let ch = glyph(*band);
        for row in grid.iter_mut().rev().take(rows) {
            row[x] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Histogram: price=[{:.2}, {:.2}] | bins={} | peak={}\n",
        hist.min,
        hist.max,
        hist.counts.len(),
        hist.max_count()
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out.push_str(&format!(
        "Legend: ':' <= {reference_price:.0} < '#' <= {bull_threshold:.0} < '*'\n"
    ));
    out
}

/// Scale a count to rows; any non-zero bin shows at least one row.
fn bar_rows(count: usize, max_count: usize, height: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let rows = (count as f64 / max_count as f64 * height as f64).round() as usize;
    rows.clamp(1, height)
}

fn glyph(band: Band) -> char {
    match band {
        Band::BelowReference => ':',
        Band::AboveReference => '#',
        Band::Bull => '*',
    }
}
