//! Null injection.

use rand::seq::SliceRandom;
use rand::Rng;

/// Append `null_count` nulls to `values` and shuffle the result.
///
/// The non-null multiset is unchanged; only positions move.
pub fn inject_nulls<T, R: Rng>(values: Vec<T>, null_count: usize, rng: &mut R) -> Vec<Option<T>> {
    let mut column: Vec<Option<T>> = Vec::with_capacity(values.len() + null_count);
    column.extend(values.into_iter().map(Some));
    column.extend((0..null_count).map(|_| None));
    column.shuffle(rng);
    column
}

/// Row validity mask of length `size` with exactly `null_count` null rows.
pub fn validity_mask<R: Rng>(size: usize, null_count: usize, rng: &mut R) -> Vec<bool> {
    let mut mask = vec![true; size];
    for slot in mask.iter_mut().take(null_count) {
        *slot = false;
    }
    mask.shuffle(rng);
    mask
}
