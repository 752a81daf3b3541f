//! Draw realizations of the uncertain inputs.
//!
//! Specs are validated and turned into ready-to-sample distributions once,
//! before the first iteration, so a bad spec aborts the run up front and the
//! hot loop never re-checks weights.

use rand::Rng;
use rand::distributions::WeightedIndex;
use rand_distr::{Distribution, Normal};

use crate::config::validate_spec;
use crate::domain::{IterationDraw, RandomVariableSpec, VariableSpecs};
use crate::error::AppError;

/// A validated spec ready to produce draws.
#[derive(Debug, Clone)]
pub enum Sampler {
    Discrete {
        values: Vec<f64>,
        index: WeightedIndex<f64>,
    },
    Normal(Normal<f64>),
}

impl Sampler {
    pub fn new(spec: &RandomVariableSpec) -> Result<Self, AppError> {
        validate_spec(spec)?;
        match spec {
            RandomVariableSpec::Discrete { outcomes } => {
                let values = outcomes.iter().map(|o| o.value).collect();
                let index = WeightedIndex::new(outcomes.iter().map(|o| o.probability))
                    .map_err(|e| AppError::invalid_spec(format!("discrete weights: {e}")))?;
                Ok(Sampler::Discrete { values, index })
            }
            RandomVariableSpec::Normal { mean, std_dev } => {
                let normal = Normal::new(*mean, *std_dev)
                    .map_err(|e| AppError::invalid_spec(format!("normal distribution: {e}")))?;
                Ok(Sampler::Normal(normal))
            }
        }
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Discrete { values, index } => values[index.sample(rng)],
            Sampler::Normal(normal) => normal.sample(rng),
        }
    }
}

/// Validate `spec` and produce a single draw.
pub fn sample<R: Rng + ?Sized>(spec: &RandomVariableSpec, rng: &mut R) -> Result<f64, AppError> {
    Ok(Sampler::new(spec)?.draw(rng))
}

/// Samplers for all five inputs.
#[derive(Debug, Clone)]
pub struct DrawSampler {
    discount_rate: Sampler,
    growth_rate: Sampler,
    multiple_b: Sampler,
    multiple_c: Sampler,
    holding_discount: Sampler,
}

impl DrawSampler {
    pub fn new(specs: &VariableSpecs) -> Result<Self, AppError> {
        let build = |name: &str, spec: &RandomVariableSpec| {
            Sampler::new(spec).map_err(|e| AppError::invalid_spec(format!("{name}: {e}")))
        };
        Ok(Self {
            discount_rate: build("discount_rate", &specs.discount_rate)?,
            growth_rate: build("growth_rate", &specs.growth_rate)?,
            multiple_b: build("multiple_b", &specs.multiple_b)?,
            multiple_c: build("multiple_c", &specs.multiple_c)?,
            holding_discount: build("holding_discount", &specs.holding_discount)?,
        })
    }

    /// One independent draw of every input.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> IterationDraw {
        IterationDraw {
            discount_rate: self.discount_rate.draw(rng),
            growth_rate: self.growth_rate.draw(rng),
            multiple_b: self.multiple_b.draw(rng),
            multiple_c: self.multiple_c.draw(rng),
            holding_discount: self.holding_discount.draw(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn discrete_frequencies_converge_to_weights() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let weights = [0.10, 0.20, 0.40, 0.20, 0.10];
        let sampler = Sampler::new(&RandomVariableSpec::discrete(&values, &weights)).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let n = 100_000;
        let mut counts = [0usize; 5];
        for _ in 0..n {
            let v = sampler.draw(&mut rng);
            let idx = values.iter().position(|&x| x == v).unwrap();
            counts[idx] += 1;
        }

        for (count, weight) in counts.iter().zip(weights) {
            let freq = *count as f64 / n as f64;
            assert!((freq - weight).abs() < 0.01, "freq {freq} vs weight {weight}");
        }
    }

    #[test]
    fn normal_draws_are_not_clamped() {
        let sampler = Sampler::new(&RandomVariableSpec::normal(0.0, 1.0)).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let draws: Vec<f64> = (0..1_000).map(|_| sampler.draw(&mut rng)).collect();
        assert!(draws.iter().any(|&v| v < 0.0));
        assert!(draws.iter().any(|&v| v > 0.0));

        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        assert!(mean.abs() < 0.15, "mean {mean}");
    }

    #[test]
    fn zero_std_dev_is_a_point_mass() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(sample(&RandomVariableSpec::normal(0.25, 0.0), &mut rng).unwrap(), 0.25);
        }
    }

    #[test]
    fn bad_weights_fail_with_invalid_spec() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = sample(&RandomVariableSpec::discrete(&[1.0, 2.0], &[0.7, 0.7]), &mut rng).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSpec);
    }

    #[test]
    fn same_seed_same_draws() {
        let specs = crate::config::indf_normal_variables();
        let sampler = DrawSampler::new(&specs).unwrap();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            assert_eq!(sampler.draw(&mut a), sampler.draw(&mut b));
        }
    }
}
