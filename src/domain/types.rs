//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - loaded from a JSON config file
//! - used in-memory during simulation
//! - exported as part of the statistics record

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Static financial inputs for the SOTP valuation.
///
/// Monetary values share one unit (the presets use millions of rupiah) and
/// `shares_outstanding` is expressed in the matching share unit, so the
/// resulting price is in currency per share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationParameters {
    /// Explicit-period free cash flows of the DCF unit, one per future year.
    pub fcf_projections: Vec<f64>,
    /// Net debt subtracted from the DCF enterprise value.
    pub total_net_debt: f64,
    /// EBIT of the first multiple-valued unit.
    pub unit_b_ebit: f64,
    /// EBIT of the second multiple-valued unit.
    pub unit_c_ebit: f64,
    /// Enterprise value of the unit held at a fixed valuation.
    pub fixed_unit_ev: f64,
    pub shares_outstanding: f64,
}

/// One `(value, probability)` pair of a discrete random variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedValue {
    pub value: f64,
    pub probability: f64,
}

/// How a single uncertain input is drawn each iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RandomVariableSpec {
    /// Pick one of the listed values with the given probabilities.
    Discrete { outcomes: Vec<WeightedValue> },
    /// Draw from `N(mean, std_dev^2)`. No clamping is applied.
    Normal { mean: f64, std_dev: f64 },
}

impl RandomVariableSpec {
    /// Build a discrete spec from parallel value/weight lists.
    pub fn discrete(values: &[f64], weights: &[f64]) -> Self {
        let outcomes = values
            .iter()
            .zip(weights)
            .map(|(&value, &probability)| WeightedValue { value, probability })
            .collect();
        RandomVariableSpec::Discrete { outcomes }
    }

    pub fn normal(mean: f64, std_dev: f64) -> Self {
        RandomVariableSpec::Normal { mean, std_dev }
    }

    pub fn mode(&self) -> DistributionMode {
        match self {
            RandomVariableSpec::Discrete { .. } => DistributionMode::Discrete,
            RandomVariableSpec::Normal { .. } => DistributionMode::Normal,
        }
    }
}

/// Sampling mode of a whole run. A run never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMode {
    /// Weighted discrete scenario lists.
    Discrete,
    /// Normal distributions (draws may fall outside the economic range).
    Normal,
}

impl DistributionMode {
    pub fn display_name(self) -> &'static str {
        match self {
            DistributionMode::Discrete => "discrete",
            DistributionMode::Normal => "normal",
        }
    }
}

/// One spec per uncertain input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpecs {
    pub discount_rate: RandomVariableSpec,
    pub growth_rate: RandomVariableSpec,
    pub multiple_b: RandomVariableSpec,
    pub multiple_c: RandomVariableSpec,
    pub holding_discount: RandomVariableSpec,
}

impl VariableSpecs {
    /// Specs paired with the input name they drive, in draw order.
    pub fn named(&self) -> [(&'static str, &RandomVariableSpec); 5] {
        [
            ("discount_rate", &self.discount_rate),
            ("growth_rate", &self.growth_rate),
            ("multiple_b", &self.multiple_b),
            ("multiple_c", &self.multiple_c),
            ("holding_discount", &self.holding_discount),
        ]
    }
}

/// How the aggregate SOTP value is divided by the share count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DivisionPolicy {
    /// Plain floating-point division.
    #[default]
    True,
    /// Floor of the quotient, as the old discrete-mode script computed it.
    LegacyFloor,
}

/// One realization of every uncertain input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationDraw {
    pub discount_rate: f64,
    pub growth_rate: f64,
    pub multiple_b: f64,
    pub multiple_c: f64,
    pub holding_discount: f64,
}

/// Full configuration of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub iterations: usize,
    /// Seed for the random source. `None` draws a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Worker count; `1` runs the sequential driver.
    #[serde(default = "default_threads")]
    pub threads: usize,
    pub params: ValuationParameters,
    pub variables: VariableSpecs,
    /// Current market price the upside is measured against.
    pub reference_price: f64,
    /// Price above which an outcome counts as the bull scenario.
    pub bull_threshold: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub division: DivisionPolicy,
}

fn default_threads() -> usize {
    1
}

fn default_currency() -> String {
    "Rp".to_string()
}

/// Descriptive statistics of a finished result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub trials: usize,
    pub mean: f64,
    pub percentile_25: f64,
    pub median: f64,
    pub percentile_75: f64,
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub reference_price: f64,
    pub bull_threshold: f64,
    /// `(mean - reference) / reference * 100`.
    pub mean_upside_percent: f64,
    /// Fraction of trials above `reference_price * 1.10`.
    pub prob_above_10pct_upside: f64,
    /// Fraction of trials above `bull_threshold`.
    pub prob_bull_scenario: f64,
}

/// Run metadata stored next to the statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub generated_at: DateTime<Utc>,
    pub mode: Option<DistributionMode>,
    pub seed: Option<u64>,
    pub attempted: Option<usize>,
    pub rejected: Option<usize>,
    pub currency: String,
}

/// On-disk statistics record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsFile {
    pub tool: String,
    pub run: RunMetadata,
    pub statistics: SummaryStatistics,
}
