//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - static valuation inputs (`ValuationParameters`)
//! - random-variable specs and the sampling mode (`RandomVariableSpec`, `DistributionMode`)
//! - run configuration and outputs (`SimulationConfig`, `SummaryStatistics`, etc.)

pub mod types;

pub use types::*;
