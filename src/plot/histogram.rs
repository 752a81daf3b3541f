//! Equal-width histogram of simulated prices, with bins banded by region.

/// Where a bin's centre falls relative to the reference price and bull threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    BelowReference,
    AboveReference,
    Bull,
}

impl Band {
    pub fn classify(center: f64, reference_price: f64, bull_threshold: f64) -> Self {
        if center > bull_threshold {
            Band::Bull
        } else if center > reference_price {
            Band::AboveReference
        } else {
            Band::BelowReference
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin finite `values` into `bins` equal-width buckets over `[min, max]`.
    ///
    /// Returns `None` when there is nothing finite to bin.
    pub fn new(values: &[f64], bins: usize) -> Option<Self> {
        let bins = bins.max(1);
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values.iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        if !(min.is_finite() && max.is_finite()) {
            return None;
        }
        if (max - min).abs() < 1e-9 {
            min -= 0.5;
            max += 0.5;
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values.iter().filter(|v| v.is_finite()) {
            // The maximum lands in the last bin (closed upper edge).
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Self { min, max, counts })
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    pub fn bin_center(&self, idx: usize) -> f64 {
        self.min + (idx as f64 + 0.5) * self.bin_width()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn bands(&self, reference_price: f64, bull_threshold: f64) -> Vec<Band> {
        (0..self.counts.len())
            .map(|i| Band::classify(self.bin_center(i), reference_price, bull_threshold))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_cover_all_values() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 5.0];
        let hist = Histogram::new(&values, 4).unwrap();
        assert_eq!(hist.counts.iter().sum::<usize>(), values.len());
        assert_eq!(hist.counts, vec![1, 2, 1, 2]);
        assert!((hist.bin_width() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_values_get_a_unit_range() {
        let hist = Histogram::new(&[3.0, 3.0], 2).unwrap();
        assert!((hist.min - 2.5).abs() < 1e-12);
        assert!((hist.max - 3.5).abs() < 1e-12);
        assert_eq!(hist.counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn empty_input_has_no_histogram() {
        assert!(Histogram::new(&[], 10).is_none());
        assert!(Histogram::new(&[f64::NAN], 10).is_none());
    }

    #[test]
    fn bands_by_bin_center() {
        let hist = Histogram::new(&[0.0, 30.0], 3).unwrap();
        // Centres: 5, 15, 25.
        assert_eq!(
            hist.bands(10.0, 20.0),
            vec![Band::BelowReference, Band::AboveReference, Band::Bull]
        );
    }
}
