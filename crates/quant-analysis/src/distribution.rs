use analysis_core::Bar;
use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};

use crate::simple_returns;

pub const HISTOGRAM_BINS: usize = 50;

/// Shape of the daily return distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionReport {
    pub histogram: Vec<u64>,
    /// `histogram.len() + 1` bin edges
    pub bins: Vec<f64>,
    pub mean: f64,
    pub median: f64,
    pub skew: f64,
    /// Excess (Fisher) kurtosis
    pub kurtosis: f64,
}

impl DistributionReport {
    fn empty() -> Self {
        Self {
            histogram: vec![],
            bins: vec![],
            mean: 0.0,
            median: 0.0,
            skew: 0.0,
            kurtosis: 0.0,
        }
    }
}

/// Equal-width histogram over `[min, max]`, last bin closed on the right.
/// A degenerate range is widened to `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> (Vec<u64>, Vec<f64>) {
    if values.is_empty() || bins == 0 {
        return (vec![], vec![]);
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect();

    let mut counts = vec![0u64; bins];
    for &v in values {
        let idx = (((v - lo) / (hi - lo)) * bins as f64).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    (counts, edges)
}

fn central_moment(values: &[f64], mean: f64, order: i32) -> f64 {
    values.iter().map(|v| (v - mean).powi(order)).sum::<f64>() / values.len() as f64
}

/// Biased sample skewness `m3 / m2^1.5`
pub fn skewness(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.mean();
    let m2 = central_moment(values, mean, 2);
    if m2 == 0.0 {
        return 0.0;
    }
    central_moment(values, mean, 3) / m2.powf(1.5)
}

/// Biased excess kurtosis `m4 / m2^2 - 3`
pub fn excess_kurtosis(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.mean();
    let m2 = central_moment(values, mean, 2);
    if m2 == 0.0 {
        return 0.0;
    }
    central_moment(values, mean, 4) / (m2 * m2) - 3.0
}

pub fn distribution(bars: &[Bar]) -> DistributionReport {
    let returns = simple_returns(bars);
    if returns.is_empty() {
        return DistributionReport::empty();
    }

    let (histogram, bins) = histogram(&returns, HISTOGRAM_BINS);
    let median = Data::new(returns.clone()).median();

    DistributionReport {
        histogram,
        bins,
        mean: returns.as_slice().mean(),
        median,
        skew: skewness(&returns),
        kurtosis: excess_kurtosis(&returns),
    }
}
