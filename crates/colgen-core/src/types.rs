//! Closed enumerations describing a column: dtype, distribution, codec and encoding.
//!
//! All four enums parse from the strings used in the JSON input and render back
//! to the same strings, so they round-trip through serde unchanged:
//!
//! ```json
//! { "dtype": "int", "distribution": "gamma", "compression": "SNAPPY", "encoding": "DELTA_BINARY_PACKED" }
//! ```

use crate::error::SpecError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Logical data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integer values
    Integer,
    /// 64-bit floating point values
    Double,
    /// Variable-length alphanumeric strings
    String,
    /// Nested column made of named child columns
    Struct,
}

impl DataType {
    /// String form used in the declarative input.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::Double => "double",
            Self::String => "str",
            Self::Struct => "struct",
        }
    }

    /// Whether this dtype carries values directly (everything except structs).
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Struct)
    }

    /// Encodings a leaf of this dtype may be written with.
    ///
    /// Structs have no encoding of their own; their leaves carry it.
    pub fn allowed_encodings(&self) -> &'static [Encoding] {
        match self {
            Self::Integer => &[
                Encoding::Plain,
                Encoding::DeltaBinaryPacked,
                Encoding::PlainDictionary,
            ],
            Self::Double => &[
                Encoding::Plain,
                Encoding::ByteStreamSplit,
                Encoding::PlainDictionary,
            ],
            Self::String => &[
                Encoding::Plain,
                Encoding::DeltaByteArray,
                Encoding::DeltaLengthByteArray,
                Encoding::PlainDictionary,
            ],
            Self::Struct => &[],
        }
    }
}

impl FromStr for DataType {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Self::Integer),
            "double" => Ok(Self::Double),
            "str" => Ok(Self::String),
            "struct" => Ok(Self::Struct),
            other => Err(SpecError::UnsupportedDataType(other.to_string())),
        }
    }
}

/// Target shape of the value-frequency histogram, or a sampling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Distribution {
    /// Every distinct value appears (almost) equally often
    Uniform,
    /// Bell-shaped frequencies over the sorted distinct values
    #[default]
    Normal,
    /// Right-skewed frequencies following a Gamma density
    Gamma,
    /// Every value distinct
    Unique,
    /// Unshaped sampling with replacement; no cardinality guarantee
    Random,
}

impl Distribution {
    /// String form used in the declarative input.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Normal => "normal",
            Self::Gamma => "gamma",
            Self::Unique => "unique",
            Self::Random => "random",
        }
    }

    /// Whether the distinct-value count is guaranteed to equal the cardinality.
    pub fn preserves_cardinality(&self) -> bool {
        !matches!(self, Self::Random)
    }
}

impl FromStr for Distribution {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(Self::Uniform),
            "normal" => Ok(Self::Normal),
            "gamma" => Ok(Self::Gamma),
            "unique" => Ok(Self::Unique),
            "random" => Ok(Self::Random),
            other => Err(SpecError::UnsupportedDistribution(other.to_string())),
        }
    }
}

/// Per-column compression codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compression {
    #[default]
    None,
    Gzip,
    Snappy,
    Lz4,
    Brotli,
}

impl Compression {
    /// String form used in the declarative input.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Gzip => "GZIP",
            Self::Snappy => "SNAPPY",
            Self::Lz4 => "LZ4",
            Self::Brotli => "BROTLI",
        }
    }
}

impl FromStr for Compression {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "GZIP" => Ok(Self::Gzip),
            "SNAPPY" => Ok(Self::Snappy),
            "LZ4" => Ok(Self::Lz4),
            "BROTLI" => Ok(Self::Brotli),
            other => Err(SpecError::UnsupportedCompression(other.to_string())),
        }
    }
}

/// Physical encoding of a leaf column.
///
/// `PlainDictionary` and `ByteStreamSplit` are writer *modes* rather than
/// explicit encodings; the write plan turns them into separate flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    #[default]
    Plain,
    PlainDictionary,
    DeltaBinaryPacked,
    ByteStreamSplit,
    DeltaByteArray,
    DeltaLengthByteArray,
}

impl Encoding {
    /// String form used in the declarative input.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "PLAIN",
            Self::PlainDictionary => "PLAIN_DICTIONARY",
            Self::DeltaBinaryPacked => "DELTA_BINARY_PACKED",
            Self::ByteStreamSplit => "BYTE_STREAM_SPLIT",
            Self::DeltaByteArray => "DELTA_BYTE_ARRAY",
            Self::DeltaLengthByteArray => "DELTA_LENGTH_BYTE_ARRAY",
        }
    }

    /// Check the encoding legality table for `dtype`.
    pub fn is_valid_for(&self, dtype: DataType) -> bool {
        dtype.allowed_encodings().contains(self)
    }
}

impl FromStr for Encoding {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLAIN" => Ok(Self::Plain),
            "PLAIN_DICTIONARY" => Ok(Self::PlainDictionary),
            "DELTA_BINARY_PACKED" => Ok(Self::DeltaBinaryPacked),
            "BYTE_STREAM_SPLIT" => Ok(Self::ByteStreamSplit),
            "DELTA_BYTE_ARRAY" => Ok(Self::DeltaByteArray),
            "DELTA_LENGTH_BYTE_ARRAY" => Ok(Self::DeltaLengthByteArray),
            other => Err(SpecError::UnsupportedEncoding(other.to_string())),
        }
    }
}

// Display and serde go through `as_str` / `FromStr` so every enum renders the
// same way in error messages, logs and JSON.
macro_rules! string_enum_impls {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serializer.serialize_str(self.as_str())
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    let value = String::deserialize(deserializer)?;
                    value.parse().map_err(serde::de::Error::custom)
                }
            }
        )+
    };
}

string_enum_impls!(DataType, Distribution, Compression, Encoding);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_types() {
        assert_eq!("int".parse::<DataType>().unwrap(), DataType::Integer);
        assert_eq!("double".parse::<DataType>().unwrap(), DataType::Double);
        assert_eq!("str".parse::<DataType>().unwrap(), DataType::String);
        assert_eq!("struct".parse::<DataType>().unwrap(), DataType::Struct);

        let err = "float".parse::<DataType>().unwrap_err();
        assert!(matches!(err, SpecError::UnsupportedDataType(ref s) if s == "float"));
    }

    #[test]
    fn test_parse_distribution_rejects_unknown() {
        assert_eq!(
            "gamma".parse::<Distribution>().unwrap(),
            Distribution::Gamma
        );
        assert!(matches!(
            "zipf".parse::<Distribution>(),
            Err(SpecError::UnsupportedDistribution(_))
        ));
        // Input strings are case sensitive
        assert!("Normal".parse::<Distribution>().is_err());
    }

    #[test]
    fn test_parse_compression() {
        for codec in ["NONE", "GZIP", "SNAPPY", "LZ4", "BROTLI"] {
            let parsed: Compression = codec.parse().unwrap();
            assert_eq!(parsed.as_str(), codec);
        }
        assert!(matches!(
            "ZSTD".parse::<Compression>(),
            Err(SpecError::UnsupportedCompression(_))
        ));
    }

    #[test]
    fn test_encoding_legality_table() {
        use Encoding::*;

        let all = [
            Plain,
            PlainDictionary,
            DeltaBinaryPacked,
            ByteStreamSplit,
            DeltaByteArray,
            DeltaLengthByteArray,
        ];

        let legal = |dtype: DataType| -> Vec<Encoding> {
            all.iter().copied().filter(|e| e.is_valid_for(dtype)).collect()
        };

        assert_eq!(
            legal(DataType::Integer),
            vec![Plain, PlainDictionary, DeltaBinaryPacked]
        );
        assert_eq!(
            legal(DataType::Double),
            vec![Plain, PlainDictionary, ByteStreamSplit]
        );
        assert_eq!(
            legal(DataType::String),
            vec![Plain, PlainDictionary, DeltaByteArray, DeltaLengthByteArray]
        );
        assert!(legal(DataType::Struct).is_empty());
    }

    #[test]
    fn test_serde_uses_input_strings() {
        let json = serde_json::to_string(&Encoding::DeltaLengthByteArray).unwrap();
        assert_eq!(json, "\"DELTA_LENGTH_BYTE_ARRAY\"");

        let parsed: Distribution = serde_json::from_str("\"unique\"").unwrap();
        assert_eq!(parsed, Distribution::Unique);

        assert!(serde_json::from_str::<DataType>("\"list\"").is_err());
    }
}
