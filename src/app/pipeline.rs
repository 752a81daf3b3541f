//! Shared simulation pipeline used by the CLI front-end and integration tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate config -> seed random source -> run driver -> summarize
//!
//! Nothing here touches the filesystem; callers persist the outputs only after
//! the whole pipeline succeeded.

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::validate;
use crate::domain::{DistributionMode, RunMetadata, SimulationConfig, StatisticsFile, SummaryStatistics};
use crate::error::AppError;
use crate::io::TOOL_NAME;
use crate::sim::{CancelToken, Rejection, ResultSet, RunSpec, run_parallel, run_with_cancel};
use crate::stats::summarize;

/// Rejection rates above this are logged as a configuration smell.
const HIGH_REJECTION_RATE: f64 = 0.5;

/// All computed outputs of a single `sotp run`.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub mode: DistributionMode,
    pub seed: u64,
    pub results: ResultSet,
    pub statistics: SummaryStatistics,
}

impl RunOutput {
    pub fn statistics_file(&self, config: &SimulationConfig) -> StatisticsFile {
        StatisticsFile {
            tool: TOOL_NAME.to_string(),
            run: RunMetadata {
                generated_at: Utc::now(),
                mode: Some(self.mode),
                seed: Some(self.seed),
                attempted: Some(self.results.attempted()),
                rejected: Some(self.results.rejected()),
                currency: config.currency.clone(),
            },
            statistics: self.statistics.clone(),
        }
    }
}

/// Execute the full simulation and return the computed outputs.
pub fn run_simulation(config: &SimulationConfig) -> Result<RunOutput, AppError> {
    run_simulation_with_cancel(config, &CancelToken::new())
}

pub fn run_simulation_with_cancel(config: &SimulationConfig, cancel: &CancelToken) -> Result<RunOutput, AppError> {
    // 1) Validate before any iteration runs.
    let mode = validate(config)?;

    // 2) Resolve the seed so every run is reproducible after the fact.
    let seed = config.seed.unwrap_or_else(rand::random);

    tracing::info!(
        iterations = config.iterations,
        mode = mode.display_name(),
        seed,
        threads = config.threads,
        "starting simulation"
    );

    // 3) Draw and value.
    let spec = RunSpec {
        iterations: config.iterations,
        params: &config.params,
        specs: &config.variables,
        mode,
        division: config.division,
    };
    let results = if config.threads > 1 {
        run_parallel(&spec, seed, config.threads, cancel)?
    } else {
        let mut rng = StdRng::seed_from_u64(seed);
        run_with_cancel(&spec, &mut rng, cancel)?
    };

    log_rejections(&results);

    // 4) Aggregate.
    let statistics = summarize(results.values(), config.reference_price, config.bull_threshold)?;

    Ok(RunOutput {
        mode,
        seed,
        results,
        statistics,
    })
}

fn log_rejections(results: &ResultSet) {
    tracing::info!(valid = results.len(), rejected = results.rejected(), "simulation finished");
    for reason in Rejection::ALL {
        let n = results.rejected_for(reason);
        if n > 0 {
            tracing::debug!(reason = reason.display_name(), count = n, "rejected draws");
        }
    }
    if results.rejection_rate() > HIGH_REJECTION_RATE {
        tracing::warn!(
            rate = results.rejection_rate(),
            "more than half of all draws were rejected; check the random-variable config"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::preset;
    use crate::domain::RandomVariableSpec;
    use crate::error::ErrorKind;

    fn small(mode: DistributionMode) -> SimulationConfig {
        let mut config = preset(mode);
        config.iterations = 2_000;
        config.seed = Some(42);
        config
    }

    #[test]
    fn discrete_preset_runs_every_iteration() {
        let out = run_simulation(&small(DistributionMode::Discrete)).unwrap();
        assert_eq!(out.mode, DistributionMode::Discrete);
        assert_eq!(out.results.len(), 2_000);
        assert_eq!(out.statistics.trials, 2_000);
        assert!(out.statistics.percentile_25 <= out.statistics.median);
        assert!(out.statistics.median <= out.statistics.percentile_75);
    }

    #[test]
    fn same_seed_same_statistics() {
        let a = run_simulation(&small(DistributionMode::Normal)).unwrap();
        let b = run_simulation(&small(DistributionMode::Normal)).unwrap();
        assert_eq!(a.results, b.results);
        assert_eq!(a.statistics, b.statistics);
    }

    #[test]
    fn parallel_run_uses_all_iterations() {
        let mut config = small(DistributionMode::Discrete);
        config.threads = 3;
        let out = run_simulation(&config).unwrap();
        assert_eq!(out.results.attempted(), 2_000);
        assert_eq!(out.results.len(), 2_000);
    }

    #[test]
    fn all_rejected_surfaces_empty_result_set() {
        let mut config = small(DistributionMode::Normal);
        config.variables.growth_rate = RandomVariableSpec::normal(0.5, 0.0);
        let err = run_simulation(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResultSet);
    }

    #[test]
    fn statistics_file_carries_run_metadata() {
        let config = small(DistributionMode::Discrete);
        let out = run_simulation(&config).unwrap();
        let record = out.statistics_file(&config);
        assert_eq!(record.run.seed, Some(42));
        assert_eq!(record.run.attempted, Some(2_000));
        assert_eq!(record.run.rejected, Some(0));
        assert_eq!(record.statistics, out.statistics);
    }
}
