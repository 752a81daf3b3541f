//! Simulation driver: N independent draw-and-value cycles.
//!
//! Rejected draws are skipped (no retry), so the result set is usually
//! shorter than the iteration count. The gap is a useful diagnostic: a high
//! rejection rate means the random-variable config is poorly specified.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::domain::{DistributionMode, DivisionPolicy, ValuationParameters, VariableSpecs};
use crate::error::{AppError, ErrorKind};
use crate::sim::engine::{Rejection, Valuation, ValuationEngine};
use crate::sim::sampler::DrawSampler;

/// Shared flag checked between iterations.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Valid prices in insertion order, plus rejection bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    values: Vec<f64>,
    attempted: usize,
    rejections: [usize; Rejection::COUNT],
}

impl ResultSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    fn record(&mut self, valuation: Valuation) {
        self.attempted += 1;
        match valuation {
            Valuation::Price(price) => self.values.push(price),
            Valuation::Rejected(reason) => self.rejections[reason.index()] += 1,
        }
    }

    fn merge(&mut self, other: ResultSet) {
        self.values.extend(other.values);
        self.attempted += other.attempted;
        for (a, b) in self.rejections.iter_mut().zip(other.rejections) {
            *a += b;
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn rejected(&self) -> usize {
        self.attempted - self.values.len()
    }

    pub fn rejected_for(&self, reason: Rejection) -> usize {
        self.rejections[reason.index()]
    }

    pub fn rejection_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.rejected() as f64 / self.attempted as f64
        }
    }
}

/// Everything the driver needs besides the random source.
#[derive(Debug, Clone, Copy)]
pub struct RunSpec<'a> {
    pub iterations: usize,
    pub params: &'a ValuationParameters,
    pub specs: &'a VariableSpecs,
    pub mode: DistributionMode,
    pub division: DivisionPolicy,
}

/// Run all iterations on the caller's random source.
pub fn run<R: Rng + ?Sized>(spec: &RunSpec<'_>, rng: &mut R) -> Result<ResultSet, AppError> {
    run_with_cancel(spec, rng, &CancelToken::new())
}

pub fn run_with_cancel<R: Rng + ?Sized>(
    spec: &RunSpec<'_>,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<ResultSet, AppError> {
    let sampler = DrawSampler::new(spec.specs)?;
    let engine = ValuationEngine::new(spec.params, spec.mode, spec.division);
    run_chunk(&sampler, &engine, spec.iterations, rng, cancel)
}

/// Fan the iterations out over `threads` workers.
///
/// Worker `i` owns `StdRng::seed_from_u64(seed + i)`; buffers are concatenated
/// in worker order, so the output is a pure function of `(seed, threads)`.
pub fn run_parallel(
    spec: &RunSpec<'_>,
    seed: u64,
    threads: usize,
    cancel: &CancelToken,
) -> Result<ResultSet, AppError> {
    let sampler = DrawSampler::new(spec.specs)?;
    let engine = ValuationEngine::new(spec.params, spec.mode, spec.division);

    let threads = threads.max(1);
    let chunks = chunk_sizes(spec.iterations, threads);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| AppError::config(format!("Failed to build worker pool: {e}")))?;

    let partials: Vec<Result<ResultSet, AppError>> = pool.install(|| {
        chunks
            .par_iter()
            .enumerate()
            .map(|(worker, &n)| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(worker as u64));
                run_chunk(&sampler, &engine, n, &mut rng, cancel)
            })
            .collect()
    });

    let mut out = ResultSet::with_capacity(spec.iterations);
    for partial in partials {
        out.merge(partial?);
    }
    Ok(out)
}

fn run_chunk<R: Rng + ?Sized>(
    sampler: &DrawSampler,
    engine: &ValuationEngine<'_>,
    iterations: usize,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<ResultSet, AppError> {
    let mut out = ResultSet::with_capacity(iterations);
    for _ in 0..iterations {
        if cancel.is_cancelled() {
            return Err(AppError::new(ErrorKind::Cancelled, "Simulation cancelled."));
        }
        let draw = sampler.draw(rng);
        out.record(engine.compute(&draw));
    }
    Ok(out)
}

/// Split `total` into `parts` near-equal sizes (earlier parts take the remainder).
fn chunk_sizes(total: usize, parts: usize) -> Vec<usize> {
    let base = total / parts;
    let extra = total % parts;
    (0..parts).map(|i| base + usize::from(i < extra)).collect()
}
