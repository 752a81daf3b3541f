//! SVG histogram chart rendered with Plotters.
//!
//! Colours match the terminal legend: red below the reference price, blue
//! above it, amber for the bull scenario. The x axis is labelled in currency
//! and a summary box sits in the top-right corner. Text goes out as SVG
//! `<text>` elements, so no font backend is compiled in.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::SummaryStatistics;
use crate::error::AppError;
use crate::io::StagedOutputs;
use crate::plot::histogram::{Band, Histogram};
use crate::report::fmt_money;

pub const DEFAULT_CHART_BINS: usize = 75;

const BELOW_COLOR: RGBColor = RGBColor(0xfe, 0x5a, 0x5b);
const ABOVE_COLOR: RGBColor = RGBColor(0x10, 0x5c, 0x9c);
const BULL_COLOR: RGBColor = RGBColor(0xff, 0xc1, 0x07);

const FONT: &str = "sans-serif";

/// A banded histogram of simulated prices, annotated with its statistics.
///
/// Bands are taken from the reference price and bull threshold recorded in
/// `statistics`.
#[derive(Debug, Clone, Copy)]
pub struct HistogramChart<'a> {
    pub values: &'a [f64],
    pub statistics: &'a SummaryStatistics,
    pub currency: &'a str,
    pub bins: usize,
    pub size: (u32, u32),
}

impl HistogramChart<'_> {
    /// Write the chart to `path` on its own.
    pub fn write(&self, path: &Path) -> Result<(), AppError> {
        let mut outputs = StagedOutputs::new();
        self.stage(&mut outputs, path)?;
        outputs.commit()
    }

    /// Add the chart to a batch of outputs committed together.
    pub fn stage(&self, outputs: &mut StagedOutputs, path: &Path) -> Result<(), AppError> {
        let hist = Histogram::new(self.values, self.bins)
            .ok_or_else(|| AppError::empty_result_set("No values to chart."))?;
        outputs.stage_with(path, |tmp| {
            self.draw(tmp, &hist)
                .map_err(|e| AppError::io(format!("Failed to render chart '{}': {e}", path.display())))
        })
    }

    fn draw(&self, path: &Path, hist: &Histogram) -> Result<(), Box<dyn std::error::Error>> {
        let root = SVGBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let y_max = hist.max_count().max(1) as f64 * 1.05;
        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(hist.min..hist.max, 0.0..y_max)?;

        let currency = self.currency;
        let price_label = |x: &f64| fmt_money(*x, currency);
        let count_label = |y: &f64| format!("{y:.0}");
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(8)
            .y_labels(6)
            .x_label_formatter(&price_label)
            .y_label_formatter(&count_label)
            .label_style((FONT, 14).into_font())
            .draw()?;

        let width = hist.bin_width();
        let bands = hist.bands(self.statistics.reference_price, self.statistics.bull_threshold);
        chart.draw_series(hist.counts.iter().zip(&bands).enumerate().map(|(i, (&count, band))| {
            let center = hist.bin_center(i);
            // 90% bar width leaves a small gap between bins.
            let half = width * 0.45;
            Rectangle::new(
                [(center - half, 0.0), (center + half, count as f64)],
                band_color(*band).mix(0.8).filled(),
            )
        }))?;

        self.draw_summary_box(&root)?;

        root.present()?;
        Ok(())
    }

    fn draw_summary_box<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, plotters::coord::Shift>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let lines = summary_lines(self.statistics, self.currency);

        let line_height = 18;
        let box_width = 260;
        let box_height = line_height * lines.len() as i32 + 12;
        let x0 = self.size.0 as i32 - box_width - 30;
        let y0 = 30;
        let corners = [(x0, y0), (x0 + box_width, y0 + box_height)];

        root.draw(&Rectangle::new(corners, WHITE.mix(0.9).filled()))?;
        root.draw(&Rectangle::new(corners, BLACK.stroke_width(1)))?;

        let style = (FONT, 14).into_font().color(&BLACK);
        for (i, line) in lines.iter().enumerate() {
            let pos = (x0 + 8, y0 + 6 + i as i32 * line_height);
            root.draw(&Text::new(line.as_str(), pos, style.clone()))?;
        }
        Ok(())
    }
}

fn summary_lines(stats: &SummaryStatistics, currency: &str) -> Vec<String> {
    vec![
        "Statistics Summary:".to_string(),
        format!("Target Price Mean: {}", fmt_money(stats.mean, currency)),
        format!("Mean Upside: {:.1}%", stats.mean_upside_percent),
        format!("10% Upside: {:.1}%", stats.prob_above_10pct_upside * 100.0),
        format!("Bull Scenario: {:.1}%", stats.prob_bull_scenario * 100.0),
    ]
}

fn band_color(band: Band) -> RGBColor {
    match band {
        Band::BelowReference => BELOW_COLOR,
        Band::AboveReference => ABOVE_COLOR,
        Band::Bull => BULL_COLOR,
    }
}
