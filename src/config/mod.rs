//! Run configuration: built-in presets, JSON loading, validation.
//!
//! The presets reproduce the INDF case study (ICBP DCF, Bogasari and
//! Distribution on EV/EBIT multiples, Agribusiness at a fixed EV). Monetary
//! inputs are in millions of rupiah and shares in millions, so prices come
//! out in rupiah per share.

use std::fs::File;
use std::path::Path;

use crate::domain::{
    DistributionMode, DivisionPolicy, RandomVariableSpec, SimulationConfig, ValuationParameters,
    VariableSpecs,
};
use crate::error::AppError;

pub const DEFAULT_ITERATIONS: usize = 10_000;

/// Probabilities may drift from 1 by this much before a spec is rejected.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

const SCENARIO_WEIGHTS: [f64; 5] = [0.10, 0.20, 0.40, 0.20, 0.10];

pub fn indf_parameters() -> ValuationParameters {
    ValuationParameters {
        fcf_projections: vec![11_407_755.0, 11_617_793.0, 12_197_554.0, 12_806_424.0, 13_445_846.0],
        total_net_debt: 20_239_000.0,
        unit_b_ebit: 2_567_040.0,
        unit_c_ebit: 490_000.0,
        fixed_unit_ev: 11_107_642.0,
        shares_outstanding: 8_780.0,
    }
}

/// Weighted scenario lists.
pub fn indf_discrete_variables() -> VariableSpecs {
    VariableSpecs {
        discount_rate: RandomVariableSpec::discrete(
            &[0.0914, 0.0964, 0.1014, 0.1064, 0.1114],
            &SCENARIO_WEIGHTS,
        ),
        growth_rate: RandomVariableSpec::discrete(&[0.02, 0.025, 0.03, 0.035, 0.04], &SCENARIO_WEIGHTS),
        multiple_b: RandomVariableSpec::discrete(&[7.045, 7.545, 8.045, 8.545, 9.045], &SCENARIO_WEIGHTS),
        multiple_c: RandomVariableSpec::discrete(&[7.96, 8.46, 8.96, 9.46, 9.96], &SCENARIO_WEIGHTS),
        holding_discount: RandomVariableSpec::discrete(&[0.55, 0.50, 0.45], &[0.3, 0.4, 0.3]),
    }
}

/// Normal approximations of the discrete lists (same means, similar spread).
pub fn indf_normal_variables() -> VariableSpecs {
    VariableSpecs {
        discount_rate: RandomVariableSpec::normal(0.1014, 0.0055),
        growth_rate: RandomVariableSpec::normal(0.03, 0.0055),
        multiple_b: RandomVariableSpec::normal(8.045, 0.55),
        multiple_c: RandomVariableSpec::normal(8.96, 0.55),
        holding_discount: RandomVariableSpec::normal(0.50, 0.04),
    }
}

/// Built-in configuration for the given sampling mode.
pub fn preset(mode: DistributionMode) -> SimulationConfig {
    let variables = match mode {
        DistributionMode::Discrete => indf_discrete_variables(),
        DistributionMode::Normal => indf_normal_variables(),
    };
    SimulationConfig {
        iterations: DEFAULT_ITERATIONS,
        seed: None,
        threads: 1,
        params: indf_parameters(),
        variables,
        reference_price: 7_700.0,
        bull_threshold: 11_500.0,
        currency: "Rp".to_string(),
        division: DivisionPolicy::True,
    }
}

/// Read a JSON config file.
pub fn load_config(path: &Path) -> Result<SimulationConfig, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open config '{}': {e}", path.display())))?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::config(format!("Invalid config JSON '{}': {e}", path.display())))
}

/// Check every invariant a run relies on. Returns the run's sampling mode.
pub fn validate(config: &SimulationConfig) -> Result<DistributionMode, AppError> {
    if config.iterations == 0 {
        return Err(AppError::config("Iteration count must be > 0."));
    }
    if config.threads == 0 {
        return Err(AppError::config("Thread count must be > 0."));
    }
    validate_parameters(&config.params)?;

    if !(config.reference_price.is_finite() && config.reference_price > 0.0) {
        return Err(AppError::config("Reference price must be finite and > 0."));
    }
    if !config.bull_threshold.is_finite() {
        return Err(AppError::config("Bull threshold must be finite."));
    }

    for (name, spec) in config.variables.named() {
        validate_spec(spec).map_err(|e| AppError::invalid_spec(format!("{name}: {e}")))?;
    }
    resolve_mode(&config.variables)
}

pub fn validate_parameters(params: &ValuationParameters) -> Result<(), AppError> {
    if params.fcf_projections.is_empty() {
        return Err(AppError::config("fcf_projections must not be empty."));
    }
    if params.fcf_projections.iter().any(|v| !v.is_finite()) {
        return Err(AppError::config("fcf_projections must be finite."));
    }
    let scalars = [
        ("total_net_debt", params.total_net_debt),
        ("unit_b_ebit", params.unit_b_ebit),
        ("unit_c_ebit", params.unit_c_ebit),
        ("fixed_unit_ev", params.fixed_unit_ev),
    ];
    for (name, value) in scalars {
        if !value.is_finite() {
            return Err(AppError::config(format!("{name} must be finite.")));
        }
    }
    if !(params.shares_outstanding.is_finite() && params.shares_outstanding > 0.0) {
        return Err(AppError::config("shares_outstanding must be finite and > 0."));
    }
    Ok(())
}

/// Validate one spec in isolation.
pub fn validate_spec(spec: &RandomVariableSpec) -> Result<(), AppError> {
    match spec {
        RandomVariableSpec::Discrete { outcomes } => {
            if outcomes.is_empty() {
                return Err(AppError::invalid_spec("discrete spec has no outcomes"));
            }
            if outcomes.iter().any(|o| !o.value.is_finite()) {
                return Err(AppError::invalid_spec("discrete values must be finite"));
            }
            if outcomes
                .iter()
                .any(|o| !(o.probability.is_finite() && o.probability >= 0.0))
            {
                return Err(AppError::invalid_spec("probabilities must be finite and >= 0"));
            }
            let total: f64 = outcomes.iter().map(|o| o.probability).sum();
            if (total - 1.0).abs() > WEIGHT_TOLERANCE {
                return Err(AppError::invalid_spec(format!(
                    "probabilities sum to {total}, expected 1"
                )));
            }
            Ok(())
        }
        RandomVariableSpec::Normal { mean, std_dev } => {
            if !mean.is_finite() {
                return Err(AppError::invalid_spec("normal mean must be finite"));
            }
            if !(std_dev.is_finite() && *std_dev >= 0.0) {
                return Err(AppError::invalid_spec("normal std_dev must be finite and >= 0"));
            }
            Ok(())
        }
    }
}

/// All five specs must use the same variant.
pub fn resolve_mode(variables: &VariableSpecs) -> Result<DistributionMode, AppError> {
    let mode = variables.discount_rate.mode();
    for (name, spec) in variables.named() {
        if spec.mode() != mode {
            return Err(AppError::invalid_spec(format!(
                "Mixed distribution modes: {name} is {} but discount_rate is {}.",
                spec.mode().display_name(),
                mode.display_name()
            )));
        }
    }
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn presets_validate() {
        assert_eq!(validate(&preset(DistributionMode::Discrete)).unwrap(), DistributionMode::Discrete);
        assert_eq!(validate(&preset(DistributionMode::Normal)).unwrap(), DistributionMode::Normal);
    }

    #[test]
    fn weights_must_sum_to_one() {
        let spec = RandomVariableSpec::discrete(&[1.0, 2.0], &[0.5, 0.4]);
        let err = validate_spec(&spec).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpec);

        // Float noise like 0.1 + 0.2 + 0.4 + 0.2 + 0.1 is tolerated.
        let spec = RandomVariableSpec::discrete(&[1.0, 2.0, 3.0, 4.0, 5.0], &SCENARIO_WEIGHTS);
        assert!(validate_spec(&spec).is_ok());
    }

    #[test]
    fn negative_std_dev_is_invalid() {
        let err = validate_spec(&RandomVariableSpec::normal(0.0, -1.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpec);
        assert!(validate_spec(&RandomVariableSpec::normal(0.0, 0.0)).is_ok());
    }

    #[test]
    fn mixed_modes_are_rejected() {
        let mut config = preset(DistributionMode::Discrete);
        config.variables.holding_discount = RandomVariableSpec::normal(0.5, 0.05);
        let err = validate(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpec);
        assert!(err.to_string().contains("holding_discount"));
    }

    #[test]
    fn parameter_invariants() {
        let mut config = preset(DistributionMode::Discrete);
        config.params.fcf_projections.clear();
        assert_eq!(validate(&config).unwrap_err().kind(), ErrorKind::Config);

        let mut config = preset(DistributionMode::Discrete);
        config.params.shares_outstanding = 0.0;
        assert_eq!(validate(&config).unwrap_err().kind(), ErrorKind::Config);

        let mut config = preset(DistributionMode::Discrete);
        config.iterations = 0;
        assert_eq!(validate(&config).unwrap_err().kind(), ErrorKind::Config);

        let mut config = preset(DistributionMode::Discrete);
        config.reference_price = 0.0;
        assert_eq!(validate(&config).unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn load_config_reports_missing_path() {
        let err = load_config(Path::new("does/not/exist.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn config_roundtrips_through_json_with_defaults() {
        let config = preset(DistributionMode::Normal);
        let json = serde_json::to_value(&config).unwrap();
        let mut obj = json.as_object().unwrap().clone();
        obj.remove("threads");
        obj.remove("currency");
        obj.remove("division");
        let back: SimulationConfig = serde_json::from_value(serde_json::Value::Object(obj)).unwrap();
        assert_eq!(back, config);
    }
}
