//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads or builds the run configuration
//! - runs the simulation and aggregation
//! - prints reports/plots
//! - writes the output files (only after everything above succeeded)

use clap::Parser;

use crate::cli::{Command, InitConfigArgs, PlotArgs, PlotOptions, RunArgs, SummarizeArgs};
use crate::domain::{RunMetadata, SimulationConfig, StatisticsFile, SummaryStatistics};
use crate::error::AppError;
use crate::io::{StagedOutputs, TOOL_NAME};
use crate::plot::{DEFAULT_CHART_BINS, HistogramChart};

pub mod pipeline;

const CHART_SIZE: (u32, u32) = (1200, 800);

/// Entry point for the `sotp` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    crate::logging::init_tracing();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Summarize(args) => handle_summarize(args),
        Command::Plot(args) => handle_plot(args),
        Command::InitConfig(args) => handle_init_config(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = config_from_args(&args)?;
    let run = pipeline::run_simulation(&config)?;

    // Print terminal output.
    print!(
        "{}",
        crate::report::format_run_summary(&run.results, run.mode, run.seed, config.threads)
    );
    println!("{}", crate::report::format_statistics(&run.statistics, &config.currency));

    let positive: Vec<f64> = run.results.values().iter().copied().filter(|v| *v > 0.0).collect();
    print_plot(&positive, config.reference_price, config.bull_threshold, &args.plot);

    // Persist outputs: stage everything, then commit as one batch.
    let mut outputs = StagedOutputs::new();
    crate::io::stage_results_csv(&mut outputs, &args.results, run.results.values())?;
    crate::io::stage_statistics_json(&mut outputs, &args.stats, &run.statistics_file(&config))?;
    if let Some(path) = &args.chart {
        chart(&positive, &run.statistics, &config.currency).stage(&mut outputs, path)?;
    }
    outputs.commit()?;

    tracing::info!(path = %args.results.display(), "wrote results");
    tracing::info!(path = %args.stats.display(), "wrote statistics");
    if let Some(path) = &args.chart {
        tracing::info!(path = %path.display(), "wrote chart");
    }
    Ok(())
}

fn handle_summarize(args: SummarizeArgs) -> Result<(), AppError> {
    let prices = crate::io::read_results_csv(&args.results)?;
    let statistics = crate::stats::summarize(&prices, args.reference_price, args.bull_threshold)?;

    println!("{}", crate::report::format_statistics(&statistics, &args.currency));

    if let Some(path) = &args.stats {
        let record = StatisticsFile {
            tool: TOOL_NAME.to_string(),
            run: RunMetadata {
                generated_at: chrono::Utc::now(),
                mode: None,
                seed: None,
                attempted: None,
                rejected: None,
                currency: args.currency.clone(),
            },
            statistics,
        };
        crate::io::write_statistics_json(path, &record)?;
        tracing::info!(path = %path.display(), "wrote statistics");
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let prices = crate::io::read_results_csv(&args.results)?;
    let statistics = crate::stats::summarize(&prices, args.reference_price, args.bull_threshold)?;
    let positive: Vec<f64> = prices.into_iter().filter(|v| v.is_finite() && *v > 0.0).collect();

    print_plot(&positive, args.reference_price, args.bull_threshold, &args.plot);
    if let Some(path) = &args.chart {
        chart(&positive, &statistics, &args.currency).write(path)?;
        tracing::info!(path = %path.display(), "wrote chart");
    }
    Ok(())
}

fn handle_init_config(args: InitConfigArgs) -> Result<(), AppError> {
    let config = crate::config::preset(args.mode);
    crate::io::write_atomically(&args.output, |out| {
        serde_json::to_writer_pretty(&mut *out, &config)
            .map_err(|e| AppError::io(format!("Failed to write config '{}': {e}", args.output.display())))
    })?;
    println!("Wrote {} config to '{}'.", args.mode.display_name(), args.output.display());
    Ok(())
}

/// Load the config file (or preset) and apply CLI overrides.
pub fn config_from_args(args: &RunArgs) -> Result<SimulationConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => crate::config::load_config(path)?,
        None => crate::config::preset(args.mode),
    };
    if let Some(n) = args.iterations {
        config.iterations = n;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(division) = args.division {
        config.division = division;
    }
    Ok(config)
}

fn print_plot(values: &[f64], reference_price: f64, bull_threshold: f64, opts: &PlotOptions) {
    if opts.no_plot {
        return;
    }
    let plot = crate::plot::render_ascii_histogram(values, reference_price, bull_threshold, opts.width, opts.height);
    println!("{plot}");
}

fn chart<'a>(values: &'a [f64], statistics: &'a SummaryStatistics, currency: &'a str) -> HistogramChart<'a> {
    HistogramChart {
        values,
        statistics,
        currency,
        bins: DEFAULT_CHART_BINS,
        size: CHART_SIZE,
    }
}
