//! `sotp-montecarlo` library crate.
//!
//! Estimates the distribution of a company's fair share price with a
//! sum-of-the-parts valuation (DCF unit + two EV/EBIT-multiple units + a fixed
//! unit, less a holding discount) driven by Monte Carlo sampling.
//!
//! The binary (`sotp`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the simulation can be embedded without the file/report layers

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod sim;
pub mod stats;
