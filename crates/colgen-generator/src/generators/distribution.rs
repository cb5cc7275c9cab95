//! Expansion of a unique pool into a full-length shaped sequence.
//!
//! | distribution | expansion |
//! |---|---|
//! | unique  | pool returned as is (pool size equals slot count) |
//! | uniform | every value `n / k` times, remainder sampled without replacement |
//! | normal  | every value once, rest drawn with Gaussian weights over the sorted pool |
//! | gamma   | every value once, rest drawn with Gamma weights over the sorted pool |
//! | random  | `n` draws with replacement, no cardinality guarantee |
//!
//! Normal and Gamma weights are evaluated at `k` evenly spaced points, so the
//! pool must be sorted first: the smallest and largest values land in the tails
//! and the middle values near the mode.

use crate::generator::GeneratorError;
use crate::stats;
use colgen_core::{DistributionParams, Distribution, SpecError};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution as _;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Lower percentile of the Gamma support covered by the weights.
pub const GAMMA_LOWER_QUANTILE: f64 = 0.025;

/// Upper percentile of the Gamma support covered by the weights.
pub const GAMMA_UPPER_QUANTILE: f64 = 0.975;

/// Whether `distribution` weights positions of a sorted pool.
pub fn uses_sorted_pool(distribution: Distribution) -> bool {
    matches!(distribution, Distribution::Normal | Distribution::Gamma)
}

/// Sampling weights over `k` sorted pool positions.
///
/// Returns `None` for distributions that do not weight positions.
pub fn position_weights(
    distribution: Distribution,
    params: &DistributionParams,
    k: usize,
) -> Option<Vec<f64>> {
    match distribution {
        Distribution::Normal => {
            let std = params.std();
            let weights = stats::linspace(-2.0 * std, 2.0 * std, k)
                .into_iter()
                .map(|x| stats::normal_pdf(x, std))
                .collect();
            Some(weights)
        }
        Distribution::Gamma => {
            let (shape, scale) = (params.shape(), params.scale());
            let lo = stats::gamma_ppf(GAMMA_LOWER_QUANTILE, shape, scale);
            let hi = stats::gamma_ppf(GAMMA_UPPER_QUANTILE, shape, scale);
            let weights = stats::linspace(lo, hi, k)
                .into_iter()
                .map(|x| stats::gamma_pdf(x, shape, scale))
                .collect();
            Some(weights)
        }
        Distribution::Uniform | Distribution::Unique | Distribution::Random => None,
    }
}

/// Scale weights so the largest is 1.
///
/// Fails on non-finite weights so large pools cannot overflow the cumulative
/// sum inside the sampler.
fn normalized_weights(column: &str, weights: Vec<f64>) -> Result<Vec<f64>, GeneratorError> {
    let invalid = |reason: &str| GeneratorError::InvalidWeights {
        column: column.to_string(),
        reason: reason.to_string(),
    };
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(invalid("weights must be finite"));
    }
    let max = weights.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return Err(invalid("all weights are zero"));
    }
    Ok(weights.into_iter().map(|w| w / max).collect())
}

/// Expand `pool` to exactly `slots` values drawn only from the pool.
///
/// For Normal and Gamma the pool is expected to be sorted already.
pub fn expand<T: Clone, R: Rng>(
    column: &str,
    pool: Vec<T>,
    slots: usize,
    distribution: Distribution,
    params: &DistributionParams,
    rng: &mut R,
) -> Result<Vec<T>, GeneratorError> {
    let k = pool.len();
    if slots == 0 {
        return Ok(Vec::new());
    }
    if k == 0 {
        return Err(GeneratorError::EmptyPool {
            column: column.to_string(),
            slots,
        });
    }
    if k > slots {
        return Err(GeneratorError::PoolLargerThanSize {
            column: column.to_string(),
            pool: k,
            slots,
        });
    }

    match distribution {
        Distribution::Unique => {
            if k != slots {
                return Err(SpecError::UniqueCardinalityMismatch {
                    column: column.to_string(),
                    cardinality: k,
                    slots,
                }
                .into());
            }
            Ok(pool)
        }

        Distribution::Uniform => {
            let frequency = slots / k;
            let remainder = slots % k;

            let mut values = Vec::with_capacity(slots);
            for value in &pool {
                values.extend((0..frequency).map(|_| value.clone()));
            }
            values.extend(pool.choose_multiple(rng, remainder).cloned());
            Ok(values)
        }

        Distribution::Normal | Distribution::Gamma => {
            let weights = position_weights(distribution, params, k).unwrap_or_default();
            let weights = normalized_weights(column, weights)?;
            let sampler =
                WeightedIndex::new(&weights).map_err(|e| GeneratorError::InvalidWeights {
                    column: column.to_string(),
                    reason: e.to_string(),
                })?;

            let mut values = Vec::with_capacity(slots);
            values.extend(pool.iter().cloned());
            for _ in k..slots {
                values.push(pool[sampler.sample(rng)].clone());
            }
            Ok(values)
        }

        Distribution::Random => Ok((0..slots)
            .map(|_| pool[rng.random_range(0..k)].clone())
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn frequencies(values: &[i64]) -> HashMap<i64, usize> {
        let mut counts = HashMap::new();
        for v in values {
            *counts.entry(*v).or_insert(0) += 1;
        }
        counts
    }

    fn expand_ints(pool: Vec<i64>, slots: usize, distribution: Distribution) -> Vec<i64> {
        let mut rng = StdRng::seed_from_u64(42);
        expand(
            "a",
            pool,
            slots,
            distribution,
            &DistributionParams::new(),
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn test_uniform_even_split() {
        let values = expand_ints(vec![1, 2, 3, 4, 5], 10, Distribution::Uniform);
        assert_eq!(values.len(), 10);
        assert!(frequencies(&values).values().all(|&c| c == 2));
    }

    #[test]
    fn test_uniform_remainder_is_balanced() {
        let values = expand_ints(vec![1, 2, 3], 11, Distribution::Uniform);
        let counts = frequencies(&values);

        assert_eq!(values.len(), 11);
        assert_eq!(counts.len(), 3);
        // 11 = 3 * 3 + 2, so two values appear four times and one three times
        let mut sorted: Vec<_> = counts.values().copied().collect();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![3, 4, 4]);
    }

    #[test]
    fn test_unique_returns_pool() {
        let values = expand_ints(vec![9, 3, 7], 3, Distribution::Unique);
        assert_eq!(values, vec![9, 3, 7]);
    }

    #[test]
    fn test_unique_pool_mismatch() {
        let mut rng = StdRng::seed_from_u64(42);
        let err = expand(
            "a",
            vec![1, 2],
            3,
            Distribution::Unique,
            &DistributionParams::new(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::Spec(SpecError::UniqueCardinalityMismatch { .. })
        ));
    }

    #[test]
    fn test_normal_preserves_cardinality_and_peaks_in_middle() {
        let pool: Vec<i64> = (0..10).collect();
        let values = expand_ints(pool, 10_000, Distribution::Normal);
        let counts = frequencies(&values);

        assert_eq!(values.len(), 10_000);
        assert_eq!(counts.len(), 10);
        assert!(counts[&4] > 3 * counts[&0]);
        assert!(counts[&5] > 3 * counts[&9]);
    }

    #[test]
    fn test_gamma_is_right_skewed() {
        let pool: Vec<i64> = (0..10).collect();
        let values = expand_ints(pool, 10_000, Distribution::Gamma);
        let counts = frequencies(&values);

        assert_eq!(counts.len(), 10);
        // Gamma(2, 1) peaks at x = 1, close to the low end of [ppf(.025), ppf(.975)]
        let low: usize = (0..5).map(|v| counts[&v]).sum();
        let high: usize = (5..10).map(|v| counts[&v]).sum();
        assert!(low > 2 * high);
    }

    #[test]
    fn test_random_draws_from_pool() {
        let values = expand_ints(vec![10, 20, 30], 50, Distribution::Random);
        assert_eq!(values.len(), 50);
        assert!(values.iter().all(|v| [10, 20, 30].contains(v)));
    }

    #[test]
    fn test_pool_larger_than_slots() {
        let mut rng = StdRng::seed_from_u64(42);
        let err = expand(
            "a",
            vec![1, 2, 3],
            2,
            Distribution::Uniform,
            &DistributionParams::new(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, GeneratorError::PoolLargerThanSize { .. }));
    }

    #[test]
    fn test_empty_pool() {
        let mut rng = StdRng::seed_from_u64(42);
        let err = expand::<i64, _>(
            "a",
            vec![],
            2,
            Distribution::Normal,
            &DistributionParams::new(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, GeneratorError::EmptyPool { .. }));
    }

    #[test]
    fn test_normal_weights_symmetric() {
        let weights =
            position_weights(Distribution::Normal, &DistributionParams::new(), 5).unwrap();
        assert_eq!(weights.len(), 5);
        assert!((weights[0] - weights[4]).abs() < 1e-12);
        assert!(weights[2] > weights[1]);
        assert!(position_weights(Distribution::Uniform, &DistributionParams::new(), 5).is_none());
    }

    #[test]
    fn test_huge_densities_still_sample() {
        // densities near 1e299 would overflow the sampler's running total unscaled
        let params = DistributionParams::new().with("std", 1e-300);
        let mut rng = StdRng::seed_from_u64(42);
        let pool: Vec<i64> = (0..10).collect();
        let values = expand("a", pool, 1000, Distribution::Normal, &params, &mut rng).unwrap();

        let counts = frequencies(&values);
        assert_eq!(values.len(), 1000);
        assert_eq!(counts.len(), 10);
        assert!(counts[&4] > counts[&0]);
    }

    #[test]
    fn test_non_finite_weights_are_errors() {
        let err = normalized_weights("a", vec![1.0, f64::INFINITY, 2.0]).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidWeights { .. }));
        let err = normalized_weights("a", vec![1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidWeights { .. }));
        let err = normalized_weights("a", vec![0.0, 0.0]).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidWeights { .. }));

        let scaled = normalized_weights("a", vec![2.0, 8.0, 4.0]).unwrap();
        assert_eq!(scaled, vec![0.25, 1.0, 0.5]);
    }
}
