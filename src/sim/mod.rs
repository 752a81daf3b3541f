//! Monte Carlo core: sampling, per-iteration valuation, and the iteration loop.

pub mod driver;
pub mod engine;
pub mod sampler;

pub use driver::{CancelToken, ResultSet, RunSpec, run, run_parallel, run_with_cancel};
pub use engine::{DcfBreakdown, Rejection, Valuation, ValuationEngine, compute, dcf_breakdown};
pub use sampler::{DrawSampler, Sampler, sample};
