//! End-to-end: simulate, persist through the results file, summarize from disk.

use sotp_montecarlo::app::pipeline::run_simulation;
use sotp_montecarlo::config::preset;
use sotp_montecarlo::domain::{DistributionMode, DivisionPolicy, RandomVariableSpec};
use sotp_montecarlo::error::ErrorKind;
use sotp_montecarlo::io::{read_results_csv, read_statistics_json, write_results_csv, write_statistics_json};
use sotp_montecarlo::stats::summarize;

#[test]
fn results_file_boundary_preserves_statistics() {
    let mut config = preset(DistributionMode::Discrete);
    config.iterations = 3_000;
    config.seed = Some(2024);

    let run = run_simulation(&config).unwrap();
    assert_eq!(run.results.len(), 3_000);

    let dir = tempfile::tempdir().unwrap();
    let results_path = dir.path().join("data/results.csv");
    let stats_path = dir.path().join("data/stats.json");
    write_results_csv(&results_path, run.results.values()).unwrap();
    write_statistics_json(&stats_path, &run.statistics_file(&config)).unwrap();

    let prices = read_results_csv(&results_path).unwrap();
    let from_disk = summarize(&prices, config.reference_price, config.bull_threshold).unwrap();
    assert_eq!(from_disk, run.statistics);

    let record = read_statistics_json(&stats_path).unwrap();
    assert_eq!(record.statistics, run.statistics);
    assert_eq!(record.run.seed, Some(2024));
}

#[test]
fn indf_discrete_case_lands_in_a_plausible_range() {
    let mut config = preset(DistributionMode::Discrete);
    config.iterations = 5_000;
    config.seed = Some(7);

    let stats = run_simulation(&config).unwrap().statistics;
    // Scenario extremes price at roughly Rp 7,494 and Rp 15,156.
    assert!(stats.mean > 7_000.0 && stats.mean < 17_000.0, "mean {}", stats.mean);
    assert!(stats.percentile_25 < stats.percentile_75);
    assert!(stats.std_dev > 0.0);
    assert!((0.0..=1.0).contains(&stats.prob_bull_scenario));
    assert!(stats.prob_above_10pct_upside >= stats.prob_bull_scenario);
}

#[test]
fn legacy_floor_division_yields_whole_prices() {
    let mut config = preset(DistributionMode::Discrete);
    config.iterations = 500;
    config.seed = Some(1);
    config.division = DivisionPolicy::LegacyFloor;

    let run = run_simulation(&config).unwrap();
    assert!(run.results.values().iter().all(|v| v.fract() == 0.0));
}

#[test]
fn invalid_weights_abort_before_any_output() {
    let mut config = preset(DistributionMode::Discrete);
    config.variables.holding_discount = RandomVariableSpec::discrete(&[0.55, 0.5, 0.45], &[0.3, 0.4, 0.4]);

    let err = run_simulation(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSpec);
    assert_eq!(err.exit_code(), 2);
}
