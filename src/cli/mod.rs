//! Command-line parsing for the SOTP Monte Carlo valuation tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the simulation/statistics code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DistributionMode, DivisionPolicy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sotp", version, about = "Sum-of-the-parts share price Monte Carlo")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Simulate, print statistics and a histogram, then write the output files.
    Run(RunArgs),
    /// Summarize a previously written results CSV.
    Summarize(SummarizeArgs),
    /// Plot a previously written results CSV.
    Plot(PlotArgs),
    /// Write a built-in configuration to a JSON file for editing.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// JSON config file. Without it, the built-in preset for `--mode` is used.
    #[arg(short = 'c', long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Built-in preset to use when no config file is given.
    #[arg(long, value_enum, default_value_t = DistributionMode::Discrete)]
    pub mode: DistributionMode,

    /// Override the iteration count.
    #[arg(short = 'n', long)]
    pub iterations: Option<usize>,

    /// Override the random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the worker count (1 = sequential).
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Override how the aggregate value is divided by the share count.
    #[arg(long, value_enum)]
    pub division: Option<DivisionPolicy>,

    /// Results CSV output path.
    #[arg(long, default_value = "data/monte_carlo_sotp_results.csv")]
    pub results: PathBuf,

    /// Statistics JSON output path.
    #[arg(long, default_value = "data/monte_carlo_statistics.json")]
    pub stats: PathBuf,

    /// Optional SVG chart output path.
    #[arg(long, value_name = "SVG")]
    pub chart: Option<PathBuf>,

    #[command(flatten)]
    pub plot: PlotOptions,
}

#[derive(Debug, Args, Clone)]
pub struct SummarizeArgs {
    /// Results CSV produced by `sotp run`.
    #[arg(long, value_name = "CSV")]
    pub results: PathBuf,

    /// Current market price the upside is measured against.
    #[arg(long, default_value_t = 7_700.0)]
    pub reference_price: f64,

    /// Bull scenario threshold.
    #[arg(long, default_value_t = 11_500.0)]
    pub bull_threshold: f64,

    /// Currency label for the report.
    #[arg(long, default_value = "Rp")]
    pub currency: String,

    /// Also write the statistics record here.
    #[arg(long, value_name = "JSON")]
    pub stats: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Results CSV produced by `sotp run`.
    #[arg(long, value_name = "CSV")]
    pub results: PathBuf,

    #[arg(long, default_value_t = 7_700.0)]
    pub reference_price: f64,

    #[arg(long, default_value_t = 11_500.0)]
    pub bull_threshold: f64,

    /// Currency label for chart axes.
    #[arg(long, default_value = "Rp")]
    pub currency: String,

    /// Optional SVG chart output path.
    #[arg(long, value_name = "SVG")]
    pub chart: Option<PathBuf>,

    #[command(flatten)]
    pub plot: PlotOptions,
}

/// Terminal histogram options.
#[derive(Debug, Args, Clone)]
pub struct PlotOptions {
    /// Disable the terminal histogram.
    #[arg(long)]
    pub no_plot: bool,

    /// Histogram width (columns = bins).
    #[arg(long, default_value_t = 75)]
    pub width: usize,

    /// Histogram height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct InitConfigArgs {
    #[arg(long, value_enum, default_value_t = DistributionMode::Discrete)]
    pub mode: DistributionMode,

    /// Where to write the config.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub output: PathBuf,
}
