//! Unique alphanumeric string pools.

use super::attempt_budget;
use crate::generator::GeneratorError;
use colgen_core::{DataType, StringLengthRange, STRING_ALPHABET};
use rand::Rng;
use std::collections::HashSet;

/// Generate one random string with a length drawn uniformly from `lengths`.
pub fn random_string<R: Rng>(rng: &mut R, lengths: StringLengthRange) -> String {
    let len = rng.random_range(lengths.min..=lengths.max);
    (0..len)
        .map(|_| char::from(STRING_ALPHABET[rng.random_range(0..STRING_ALPHABET.len())]))
        .collect()
}

/// Generate `count` distinct strings.
///
/// Fails with [`GeneratorError::ValueSpaceExhausted`] once the attempt budget
/// runs out, which happens when `count` is close to the number of strings the
/// length range can produce.
pub fn unique_strings<R: Rng>(
    column: &str,
    rng: &mut R,
    count: usize,
    lengths: StringLengthRange,
) -> Result<Vec<String>, GeneratorError> {
    let budget = attempt_budget(count);
    let mut seen = HashSet::with_capacity(count);
    let mut values = Vec::with_capacity(count);

    for _ in 0..budget {
        if values.len() == count {
            break;
        }
        let value = random_string(rng, lengths);
        if seen.insert(value.clone()) {
            values.push(value);
        }
    }

    if values.len() < count {
        return Err(GeneratorError::ValueSpaceExhausted {
            column: column.to_string(),
            dtype: DataType::String,
            requested: count,
            attempts: budget,
        });
    }
    Ok(values)
}
