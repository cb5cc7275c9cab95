//! Per-leaf compression and encoding plan.
//!
//! Every leaf column of the spec tree gets one [`LeafPlan`]. Two of the input
//! encodings are writer modes rather than encodings:
//!
//! - `PLAIN_DICTIONARY` enables dictionary encoding for the leaf
//! - `BYTE_STREAM_SPLIT` sets the byte-stream-split flag for the leaf
//!
//! Every other encoding is applied explicitly with dictionary encoding turned
//! off, otherwise the writer would only use it as a dictionary fallback.

use colgen_core::{ColumnSpec, Compression, DataType, Encoding};
use parquet::basic::{
    BrotliLevel, Compression as ParquetCompression, Encoding as ParquetEncoding, GzipLevel,
};
use parquet::file::properties::{WriterProperties, WriterPropertiesBuilder};
use parquet::schema::types::ColumnPath;
use serde::Serialize;
use std::collections::BTreeMap;

/// Writer settings for one leaf column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafPlan {
    /// Dotted logical path, e.g. `point.x`
    pub logical_path: String,
    /// Parquet column path segments, including list levels (`tags.list.tags`)
    pub column_path: Vec<String>,
    pub dtype: DataType,
    pub compression: Compression,
    /// Explicit encoding, `None` when the encoding is a writer mode
    pub encoding: Option<Encoding>,
    pub dictionary: bool,
    pub byte_stream_split: bool,
}

impl LeafPlan {
    fn new(spec: &ColumnSpec, logical_path: String, column_path: Vec<String>) -> Self {
        let (encoding, dictionary, byte_stream_split) = match spec.encoding() {
            Encoding::PlainDictionary => (None, true, false),
            Encoding::ByteStreamSplit => (None, false, true),
            other => (Some(other), false, false),
        };

        Self {
            logical_path,
            column_path,
            dtype: spec.dtype(),
            compression: spec.compression(),
            encoding,
            dictionary,
            byte_stream_split,
        }
    }

    /// Parquet column path understood by [`WriterProperties`].
    pub fn parquet_path(&self) -> ColumnPath {
        ColumnPath::new(self.column_path.clone())
    }

    fn apply(&self, builder: WriterPropertiesBuilder) -> WriterPropertiesBuilder {
        let path = self.parquet_path();
        let builder = builder
            .set_column_compression(path.clone(), parquet_compression(self.compression))
            .set_column_dictionary_enabled(path.clone(), self.dictionary);

        if self.byte_stream_split {
            builder.set_column_encoding(path, ParquetEncoding::BYTE_STREAM_SPLIT)
        } else if let Some(encoding) = self.encoding {
            match parquet_encoding(encoding) {
                Some(encoding) => builder.set_column_encoding(path, encoding),
                None => builder,
            }
        } else {
            builder
        }
    }
}

/// Map a codec onto the Parquet writer's codec.
pub fn parquet_compression(compression: Compression) -> ParquetCompression {
    match compression {
        Compression::None => ParquetCompression::UNCOMPRESSED,
        Compression::Gzip => ParquetCompression::GZIP(GzipLevel::default()),
        Compression::Snappy => ParquetCompression::SNAPPY,
        Compression::Lz4 => ParquetCompression::LZ4_RAW,
        Compression::Brotli => ParquetCompression::BROTLI(BrotliLevel::default()),
    }
}

/// Map an explicit encoding onto the Parquet encoding; writer modes map to `None`.
pub fn parquet_encoding(encoding: Encoding) -> Option<ParquetEncoding> {
    match encoding {
        Encoding::Plain => Some(ParquetEncoding::PLAIN),
        Encoding::DeltaBinaryPacked => Some(ParquetEncoding::DELTA_BINARY_PACKED),
        Encoding::DeltaByteArray => Some(ParquetEncoding::DELTA_BYTE_ARRAY),
        Encoding::DeltaLengthByteArray => Some(ParquetEncoding::DELTA_LENGTH_BYTE_ARRAY),
        Encoding::PlainDictionary | Encoding::ByteStreamSplit => None,
    }
}

/// Compression and encoding settings for every leaf of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WritePlan {
    leaves: Vec<LeafPlan>,
}

impl WritePlan {
    /// Collect leaf plans from top-level columns, depth first.
    pub fn from_columns(columns: &[ColumnSpec]) -> Self {
        let mut leaves = Vec::new();
        for column in columns {
            collect_leaves(column, &[], &[], &mut leaves);
        }
        Self { leaves }
    }

    pub fn leaves(&self) -> &[LeafPlan] {
        &self.leaves
    }

    /// Look up a leaf by dotted logical path.
    pub fn leaf(&self, logical_path: &str) -> Option<&LeafPlan> {
        self.leaves.iter().find(|l| l.logical_path == logical_path)
    }

    /// Codec per dotted leaf path.
    pub fn compression_map(&self) -> BTreeMap<String, Compression> {
        self.leaves
            .iter()
            .map(|l| (l.logical_path.clone(), l.compression))
            .collect()
    }

    /// Explicit encodings per dotted leaf path (writer-mode leaves are omitted).
    pub fn encoding_map(&self) -> BTreeMap<String, Encoding> {
        self.leaves
            .iter()
            .filter_map(|l| l.encoding.map(|e| (l.logical_path.clone(), e)))
            .collect()
    }

    /// Leaves with dictionary encoding enabled.
    pub fn dictionary_columns(&self) -> Vec<&str> {
        self.leaves
            .iter()
            .filter(|l| l.dictionary)
            .map(|l| l.logical_path.as_str())
            .collect()
    }

    /// Leaves with byte-stream-split enabled.
    pub fn byte_stream_split_columns(&self) -> Vec<&str> {
        self.leaves
            .iter()
            .filter(|l| l.byte_stream_split)
            .map(|l| l.logical_path.as_str())
            .collect()
    }

    /// Build writer properties applying every leaf setting.
    pub fn writer_properties(&self, max_row_group_size: Option<usize>) -> WriterProperties {
        let mut builder = WriterProperties::builder();
        if let Some(size) = max_row_group_size {
            builder = builder.set_max_row_group_size(size);
        }
        for leaf in &self.leaves {
            builder = leaf.apply(builder);
        }
        builder.build()
    }
}

fn collect_leaves(
    spec: &ColumnSpec,
    logical_prefix: &[String],
    physical_prefix: &[String],
    leaves: &mut Vec<LeafPlan>,
) {
    let mut logical = logical_prefix.to_vec();
    logical.push(spec.name().to_string());

    let mut physical = physical_prefix.to_vec();
    physical.push(spec.name().to_string());
    if spec.is_repeated() {
        physical.push("list".to_string());
        physical.push(spec.name().to_string());
    }

    match spec.dtype() {
        DataType::Struct => {
            for child in spec.children() {
                collect_leaves(child, &logical, &physical, leaves);
            }
        }
        DataType::Integer | DataType::Double | DataType::String => {
            leaves.push(LeafPlan::new(spec, logical.join("."), physical));
        }
    }
}
