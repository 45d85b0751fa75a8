//! Rank statistics over floating samples.
//!
//! Percentiles interpolate linearly between the closest ranks (the R-7
//! estimator). For `n` sorted samples `x` and a percentile `p` in
//! `(0, 100]`, the fractional rank is `h = (n - 1) * p / 100` and the
//! estimate is `x[⌊h⌋] + (h - ⌊h⌋) * (x[⌊h⌋ + 1] - x[⌊h⌋])`. `p = 100`
//! always yields the maximum and `p = 50` the conventional median.

use vigil_common::error::{EngineError, Result};

/// Estimates the `p`-th percentile of samples already sorted ascending.
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(EngineError::invalid_argument(
            "percentile of an empty sample is undefined",
        ));
    }
    if !(p > 0.0 && p <= 100.0) {
        return Err(EngineError::invalid_argument(format!(
            "percentile must be in (0, 100], got {p}"
        )));
    }

    let rank = (sorted.len() - 1) as f64 * p / 100.0;
    let lower = rank.floor() as usize;
    let fraction = rank - rank.floor();
    let base = sorted[lower];
    match sorted.get(lower + 1) {
        Some(upper) if fraction > 0.0 => Ok(base + fraction * (upper - base)),
        _ => Ok(base),
    }
}

/// Estimates the `p`-th percentile of unsorted samples.
pub fn percentile(values: &[f64], p: f64) -> Result<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_of_sorted(&sorted, p)
}

pub fn median(values: &[f64]) -> Result<f64> {
    percentile(values, 50.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_ranks() {
        let samples = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&samples, 50.0).unwrap(), 2.5);
        assert_eq!(percentile(&samples, 25.0).unwrap(), 1.75);
        assert_eq!(percentile(&samples, 100.0).unwrap(), 4.0);
    }

    #[test]
    fn exact_rank_returns_sample() {
        let samples = [5.0, 1.0, 3.0, 2.0, 4.0];
        assert_eq!(percentile(&samples, 50.0).unwrap(), 3.0);
        assert_eq!(percentile(&samples, 75.0).unwrap(), 4.0);
        assert_eq!(median(&samples).unwrap(), 3.0);
    }

    #[test]
    fn single_sample_is_every_percentile() {
        assert_eq!(percentile(&[7.5], 1.0).unwrap(), 7.5);
        assert_eq!(percentile(&[7.5], 100.0).unwrap(), 7.5);
    }

    #[test]
    fn rejects_out_of_range_percentiles() {
        assert!(percentile(&[1.0, 2.0], 0.0).is_err());
        assert!(percentile(&[1.0, 2.0], 100.5).is_err());
        assert!(percentile(&[1.0, 2.0], f64::NAN).is_err());
        assert!(percentile(&[], 50.0).is_err());
    }
}
