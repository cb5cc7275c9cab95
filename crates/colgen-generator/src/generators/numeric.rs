//! Unique numeric pools.

use super::attempt_budget;
use crate::generator::GeneratorError;
use colgen_core::DataType;
use rand::seq::index;
use rand::Rng;
use std::collections::HashSet;

/// Draw `count` distinct integers uniformly from `[min, max]`.
///
/// The range must hold at least `count` integers; column specs check this
/// before generation starts.
pub fn unique_integers<R: Rng>(
    column: &str,
    rng: &mut R,
    count: usize,
    min: i64,
    max: i64,
) -> Result<Vec<i64>, GeneratorError> {
    let span = (max as i128) - (min as i128) + 1;
    if span < count as i128 {
        return Err(GeneratorError::ValueSpaceExhausted {
            column: column.to_string(),
            dtype: DataType::Integer,
            requested: count,
            attempts: 0,
        });
    }

    match usize::try_from(span) {
        Ok(span) => Ok(index::sample(rng, span, count)
            .into_iter()
            .map(|offset| (min as i128 + offset as i128) as i64)
            .collect()),
        // Wider than the address space: collisions are negligible, reject them
        Err(_) => {
            let budget = attempt_budget(count);
            let mut seen = HashSet::with_capacity(count);
            let mut values = Vec::with_capacity(count);
            for _ in 0..budget {
                if values.len() == count {
                    break;
                }
                let value = rng.random_range(min..=max);
                if seen.insert(value) {
                    values.push(value);
                }
            }
            if values.len() < count {
                return Err(GeneratorError::ValueSpaceExhausted {
                    column: column.to_string(),
                    dtype: DataType::Integer,
                    requested: count,
                    attempts: budget,
                });
            }
            Ok(values)
        }
    }
}

/// Draw `count` distinct doubles uniformly from `[min, max]`.
///
/// Uniqueness is by bit pattern. Sampling gives up after a bounded number of
/// attempts instead of looping forever on a tiny range.
pub fn unique_doubles<R: Rng>(
    column: &str,
    rng: &mut R,
    count: usize,
    min: f64,
    max: f64,
) -> Result<Vec<f64>, GeneratorError> {
    let budget = attempt_budget(count);
    let mut seen = HashSet::with_capacity(count);
    let mut values = Vec::with_capacity(count);

    for _ in 0..budget {
        if values.len() == count {
            break;
        }
        let value = rng.random_range(min..=max);
        if seen.insert(value.to_bits()) {
            values.push(value);
        }
    }

    if values.len() < count {
        return Err(GeneratorError::ValueSpaceExhausted {
            column: column.to_string(),
            dtype: DataType::Double,
            requested: count,
            attempts: budget,
        });
    }
    Ok(values)
}
