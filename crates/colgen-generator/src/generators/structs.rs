//! Struct column composition.

use super::nulls;
use crate::context::GenerationContext;
use crate::generator::{generate_at, GeneratorError};
use colgen_core::{ColumnData, ColumnSpec, Compression, Distribution};
use rand::Rng;
use tracing::warn;

/// Generate the children of a struct and attach a row validity mask.
///
/// The struct's own null count marks whole rows null. Children fill only the
/// `size - null_count` valid rows, in row order, so a child's cardinality and
/// null count hold for the rows a reader can see. Each child runs the full
/// pipeline on its own stream, so children are independent of each other.
pub fn compose<R: Rng>(
    ctx: &GenerationContext,
    spec: &ColumnSpec,
    size: usize,
    path: &[&str],
    rng: &mut R,
) -> Result<ColumnData, GeneratorError> {
    warn_ignored_settings(spec);

    let valid_rows = size - spec.null_count();
    let mut fields = Vec::with_capacity(spec.children().len());
    for child in spec.children() {
        let mut child_path = path.to_vec();
        child_path.push(child.name());
        fields.push(generate_at(ctx, child, valid_rows, &child_path)?);
    }

    let validity = nulls::validity_mask(size, spec.null_count(), rng);
    Ok(ColumnData::Struct { fields, validity })
}

fn warn_ignored_settings(spec: &ColumnSpec) {
    if spec.distribution() != Distribution::default() {
        warn!(
            "Ignoring distribution '{}' on struct column '{}'",
            spec.distribution(),
            spec.name()
        );
    }
    if let Some(cardinality) = spec.cardinality() {
        warn!(
            "Ignoring cardinality {} on struct column '{}'",
            cardinality,
            spec.name()
        );
    }
    if !spec.dist_params().is_empty() {
        warn!(
            "Ignoring dist_params on struct column '{}'",
            spec.name()
        );
    }
    if spec.compression() != Compression::None {
        warn!(
            "Ignoring compression {} on struct column '{}'; set it on the fields instead",
            spec.compression(),
            spec.name()
        );
    }
}
