//! Dataset definitions loaded from the declarative JSON input.
//!
//! ```json
//! {
//!   "size": 1000,
//!   "seed": 7,
//!   "columns": [
//!     { "name": "id", "dtype": "int", "distribution": "unique", "encoding": "DELTA_BINARY_PACKED" },
//!     { "name": "tags", "dtype": "str", "num_repeated": 3, "str_length": [3, 6] },
//!     {
//!       "name": "point",
//!       "dtype": "struct",
//!       "num_null": 10,
//!       "fields": [
//!         { "name": "x", "dtype": "double", "dist_params": { "min": 0, "max": 1 } },
//!         { "name": "y", "dtype": "double", "compression": "SNAPPY" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Enum-valued keys are read as plain strings and parsed afterwards, so an
//! unknown dtype or codec is reported as the specific schema error instead of
//! a generic JSON error.

use crate::error::SpecError;
use crate::spec::{ensure_unique_names, ColumnSpec, DistributionParams};
use crate::types::{Compression, DataType, Distribution, Encoding};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn default_distribution() -> String {
    Distribution::default().as_str().to_string()
}

fn default_str_length() -> (usize, usize) {
    (5, 10)
}

fn default_num_repeated() -> usize {
    1
}

fn default_compression() -> String {
    Compression::default().as_str().to_string()
}

fn default_encoding() -> String {
    Encoding::default().as_str().to_string()
}

/// One column as written in the JSON input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,

    pub dtype: String,

    #[serde(default = "default_distribution")]
    pub distribution: String,

    #[serde(default = "default_str_length")]
    pub str_length: (usize, usize),

    #[serde(default)]
    pub num_null: usize,

    #[serde(default)]
    pub cardinality: Option<usize>,

    #[serde(default = "default_num_repeated")]
    pub num_repeated: usize,

    #[serde(default)]
    pub dist_params: BTreeMap<String, f64>,

    #[serde(default)]
    pub fields: Option<Vec<ColumnDescriptor>>,

    #[serde(default = "default_compression")]
    pub compression: String,

    #[serde(default = "default_encoding")]
    pub encoding: String,
}

impl TryFrom<ColumnDescriptor> for ColumnSpec {
    type Error = SpecError;

    fn try_from(desc: ColumnDescriptor) -> Result<Self, Self::Error> {
        let dtype: DataType = desc.dtype.parse()?;
        let distribution: Distribution = desc.distribution.parse()?;
        let compression: Compression = desc.compression.parse()?;
        let encoding: Encoding = desc.encoding.parse()?;

        let mut params = DistributionParams::new();
        for (key, value) in desc.dist_params {
            params.set(key, value);
        }

        let children = match (dtype, desc.fields) {
            (DataType::Struct, Some(fields)) => fields
                .into_iter()
                .map(ColumnSpec::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            (DataType::Struct, None) => return Err(SpecError::MissingStructFields(desc.name)),
            // Leaves ignore any `fields` key
            (_, _) => Vec::new(),
        };

        ColumnSpec::builder(desc.name, dtype)
            .distribution(distribution)
            .string_length(desc.str_length.0, desc.str_length.1)
            .null_count(desc.num_null)
            .maybe_cardinality(desc.cardinality)
            .repeat_count(desc.num_repeated)
            .dist_params(params)
            .children(children)
            .compression(compression)
            .encoding(encoding)
            .build()
    }
}

#[derive(Debug, Deserialize)]
struct DatasetDescriptor {
    size: i64,
    #[serde(default)]
    seed: Option<u64>,
    columns: Vec<ColumnDescriptor>,
}

/// A validated dataset: row count, optional seed and top-level columns.
///
/// Construction checks every column spec and, since the size is known here,
/// every capacity constraint as well. A `DatasetSpec` that exists can be
/// generated without configuration errors.
#[derive(Debug, Clone)]
pub struct DatasetSpec {
    size: usize,
    seed: Option<u64>,
    columns: Vec<ColumnSpec>,
}

impl DatasetSpec {
    /// Create a dataset from already-built column specs.
    pub fn new(size: usize, columns: Vec<ColumnSpec>) -> Result<Self, SpecError> {
        if size == 0 {
            return Err(SpecError::InvalidSize(0));
        }
        for column in &columns {
            column.validate()?;
        }
        ensure_unique_names(&columns)?;
        for column in &columns {
            column.check_capacity(size)?;
        }

        Ok(Self {
            size,
            seed: None,
            columns,
        })
    }

    /// Attach a seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a dataset from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SpecError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a dataset from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let desc: DatasetDescriptor = serde_json::from_str(json)?;
        if desc.size <= 0 {
            return Err(SpecError::InvalidSize(desc.size));
        }

        let columns = desc
            .columns
            .into_iter()
            .map(ColumnSpec::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let dataset = Self::new(desc.size as usize, columns)?;
        Ok(match desc.seed {
            Some(seed) => dataset.with_seed(seed),
            None => dataset,
        })
    }

    /// Number of rows in every generated column.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Seed from the input, if one was given.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Top-level columns in input order.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Look up a top-level column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Top-level column names in input order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    const SAMPLE_DATASET: &str = r#"
{
  "size": 100,
  "seed": 7,
  "columns": [
    { "name": "id", "dtype": "int", "distribution": "unique", "encoding": "DELTA_BINARY_PACKED" },
    { "name": "score", "dtype": "double", "distribution": "gamma", "cardinality": 20,
      "dist_params": { "shape": 3.0, "min": 0, "max": 50 }, "encoding": "BYTE_STREAM_SPLIT" },
    { "name": "tags", "dtype": "str", "num_repeated": 3, "str_length": [3, 6], "num_null": 4,
      "compression": "SNAPPY" },
    { "name": "point", "dtype": "struct", "fields": [
        { "name": "x", "dtype": "int" },
        { "name": "y", "dtype": "int", "distribution": "uniform", "cardinality": 5 }
    ] }
  ]
}
"#;

    #[test]
    fn test_parse_dataset() {
        let dataset = DatasetSpec::from_json(SAMPLE_DATASET).unwrap();

        assert_eq!(dataset.size(), 100);
        assert_eq!(dataset.seed(), Some(7));
        assert_eq!(dataset.column_names(), vec!["id", "score", "tags", "point"]);

        let id = dataset.column("id").unwrap();
        assert_eq!(id.distribution(), Distribution::Unique);
        assert_eq!(id.encoding(), Encoding::DeltaBinaryPacked);

        let score = dataset.column("score").unwrap();
        assert_eq!(score.cardinality(), Some(20));
        assert_eq!(score.dist_params().shape(), 3.0);
        assert_eq!(score.dist_params().double_bounds(), (0.0, 50.0));

        let tags = dataset.column("tags").unwrap();
        assert_eq!(tags.repeat_count(), 3);
        assert_eq!(tags.null_count(), 4);
        assert_eq!(tags.compression(), Compression::Snappy);
        assert_eq!(tags.string_length().min, 3);

        let point = dataset.column("point").unwrap();
        assert_eq!(point.children().len(), 2);
        assert_eq!(
            point.child("y").unwrap().distribution(),
            Distribution::Uniform
        );
    }

    #[test]
    fn test_defaults_applied() {
        let dataset =
            DatasetSpec::from_json(r#"{ "size": 10, "columns": [ { "name": "a", "dtype": "str" } ] }"#)
                .unwrap();
        let a = dataset.column("a").unwrap();

        assert_eq!(dataset.seed(), None);
        assert_eq!(a.distribution(), Distribution::Normal);
        assert_eq!(a.string_length().min, 5);
        assert_eq!(a.string_length().max, 10);
        assert_eq!(a.null_count(), 0);
        assert_eq!(a.repeat_count(), 1);
        assert_eq!(a.compression(), Compression::None);
        assert_eq!(a.encoding(), Encoding::Plain);
    }

    #[test]
    fn test_dist_params_not_shared_between_columns() {
        let json = r#"
{ "size": 10, "columns": [
    { "name": "a", "dtype": "int", "dist_params": { "std": 2.0 } },
    { "name": "b", "dtype": "int" }
] }"#;
        let dataset = DatasetSpec::from_json(json).unwrap();
        assert_eq!(dataset.column("a").unwrap().dist_params().std(), 2.0);
        assert!(dataset.column("b").unwrap().dist_params().is_empty());
    }

    #[test]
    fn test_unknown_strings_are_schema_errors() {
        let err = DatasetSpec::from_json(
            r#"{ "size": 10, "columns": [ { "name": "a", "dtype": "float" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::UnsupportedDataType(_)));
        assert_eq!(err.kind(), ErrorKind::Schema);

        let err = DatasetSpec::from_json(
            r#"{ "size": 10, "columns": [ { "name": "a", "dtype": "int", "compression": "ZSTD" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::UnsupportedCompression(_)));
    }

    #[test]
    fn test_struct_without_fields() {
        let err = DatasetSpec::from_json(
            r#"{ "size": 10, "columns": [ { "name": "s", "dtype": "struct" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::MissingStructFields(ref n) if n == "s"));
    }

    #[test]
    fn test_input_errors() {
        let err = DatasetSpec::from_json(r#"{ "size": 0, "columns": [] }"#).unwrap_err();
        assert!(matches!(err, SpecError::InvalidSize(0)));

        let err = DatasetSpec::from_json(r#"{ "size": -5, "columns": [] }"#).unwrap_err();
        assert!(matches!(err, SpecError::InvalidSize(-5)));

        let err = DatasetSpec::from_json(r#"{ "columns": [] }"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);

        let err = DatasetSpec::from_json("{ not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_capacity_checked_at_construction() {
        let err = DatasetSpec::from_json(
            r#"{ "size": 10, "columns": [ { "name": "a", "dtype": "int", "cardinality": 8, "num_null": 3 } ] }"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
    }

    #[test]
    fn test_duplicate_top_level_names() {
        let err = DatasetSpec::from_json(
            r#"{ "size": 10, "columns": [ { "name": "a", "dtype": "int" }, { "name": "a", "dtype": "str" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::DuplicateName(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_DATASET.as_bytes()).unwrap();

        let dataset = DatasetSpec::from_file(file.path()).unwrap();
        assert_eq!(dataset.columns().len(), 4);

        let err = DatasetSpec::from_file("/nonexistent/dataset.json").unwrap_err();
        assert!(matches!(err, SpecError::IoError(_)));
    }
}
