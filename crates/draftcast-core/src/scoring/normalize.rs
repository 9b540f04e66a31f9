// Normalization helpers for projection and value sub-scores.

use serde::{Deserialize, Serialize};

/// Mean and standard deviation for a single quantity across a player pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
    pub min: f64,
    pub max: f64,
}

/// Threshold below which a spread is treated as zero.
const SPREAD_EPSILON: f64 = 1e-9;

/// Compute summary statistics for a slice of values.
///
/// Returns all zeros for an empty slice. Uses the population standard
/// deviation (N denominator), since the pool is the full set of remaining
/// players rather than a sample.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
            min: 0.0,
            max: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    PoolStats {
        mean,
        stdev: variance.sqrt(),
        min,
        max,
    }
}

/// Z-score of `value` within the pool. 0.0 when the pool has no spread.
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < SPREAD_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

/// Min-max scale `value` into `0.0..=1.0` within the pool.
///
/// A pool with no spread (one player, or all equal) puts every member at
/// 1.0: each of them is the best available at that position.
pub fn compute_min_max(value: f64, stats: &PoolStats) -> f64 {
    let spread = stats.max - stats.min;
    if spread < SPREAD_EPSILON {
        return 1.0;
    }
    ((value - stats.min) / spread).clamp(0.0, 1.0)
}

/// How projections are normalized within a position group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionNormalization {
    #[default]
    MinMax,
    ZScore,
}

impl ProjectionNormalization {
    pub fn apply(&self, value: f64, stats: &PoolStats) -> f64 {
        match self {
            ProjectionNormalization::MinMax => compute_min_max(value, stats),
            ProjectionNormalization::ZScore => compute_zscore(value, stats),
        }
    }
}
