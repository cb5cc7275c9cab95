//! Error taxonomy shared by every colgen crate.

/// Broad category of a configuration failure.
///
/// Every error type in the workspace maps onto one of these kinds so the
/// CLI (and tests) can tell schema mistakes apart from impossible requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unsupported or malformed column configuration
    Schema,
    /// The value space or slot count cannot satisfy the request
    Capacity,
    /// The declarative input could not be read or parsed
    Input,
}

/// Error type for column specification operations.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// Error reading the declarative input file
    #[error("Failed to read dataset file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing JSON
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Dataset row count must be positive
    #[error("Invalid dataset size {0}: size must be a positive integer")]
    InvalidSize(i64),

    /// Unknown dtype string
    #[error("Unsupported dtype: {0}")]
    UnsupportedDataType(String),

    /// Unknown distribution string
    #[error("Invalid distribution configuration: {0}")]
    UnsupportedDistribution(String),

    /// Unknown compression codec string
    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(String),

    /// Unknown encoding string
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Encoding exists but is not legal for the column dtype
    #[error("Encoding {encoding} is not valid for dtype {dtype} (column '{column}')")]
    InvalidEncoding {
        column: String,
        encoding: String,
        dtype: String,
    },

    /// Struct column declared without children
    #[error("Struct column '{0}' must have at least one field")]
    MissingStructFields(String),

    /// Column name is empty
    #[error("Column name must not be empty")]
    EmptyName,

    /// Two siblings share a name
    #[error("Duplicate column name '{0}'")]
    DuplicateName(String),

    /// String length range with min > max
    #[error("Invalid string length range [{min}, {max}] for column '{column}'")]
    InvalidStringLength {
        column: String,
        min: usize,
        max: usize,
    },

    /// Explicit cardinality of zero
    #[error("Cardinality for column '{0}' must be at least 1")]
    ZeroCardinality(String),

    /// Repeat count of zero
    #[error("num_repeated for column '{0}' must be at least 1")]
    ZeroRepeatCount(String),

    /// Distribution parameter outside its domain
    #[error("Invalid distribution parameter '{param}' for column '{column}': {reason}")]
    InvalidDistParam {
        column: String,
        param: String,
        reason: String,
    },

    /// Unique distribution with a cardinality that differs from the slot count
    #[error(
        "Column '{column}' uses the unique distribution but cardinality {cardinality} differs from the {slots} non-null slots"
    )]
    UniqueCardinalityMismatch {
        column: String,
        cardinality: usize,
        slots: usize,
    },

    /// More nulls requested than rows
    #[error("Column '{column}' requests {null_count} nulls but only {size} rows exist")]
    NullCountExceedsSize {
        column: String,
        null_count: usize,
        size: usize,
    },

    /// Cardinality larger than the non-null slot count
    #[error(
        "Can not generate column '{column}' with cardinality {cardinality}: only {slots} non-null slots available"
    )]
    CardinalityExceedsSlots {
        column: String,
        cardinality: usize,
        slots: usize,
    },

    /// Integer range smaller than the requested number of distinct values
    #[error("Cannot generate {requested} unique integers within the range [{min}, {max}] (column '{column}')")]
    IntegerRangeTooSmall {
        column: String,
        requested: usize,
        min: i64,
        max: i64,
    },

    /// Double range collapses to a single value
    #[error("Cannot generate {requested} unique doubles within the degenerate range [{min}, {max}] (column '{column}')")]
    DegenerateDoubleRange {
        column: String,
        requested: usize,
        min: f64,
        max: f64,
    },

    /// String length range cannot hold enough distinct strings
    #[error(
        "Cannot generate {requested} unique strings with lengths [{min_len}, {max_len}] (column '{column}')"
    )]
    StringSpaceTooSmall {
        column: String,
        requested: usize,
        min_len: usize,
        max_len: usize,
    },
}

impl SpecError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IoError(_) | Self::JsonError(_) | Self::InvalidSize(_) => ErrorKind::Input,
            Self::NullCountExceedsSize { .. }
            | Self::CardinalityExceedsSlots { .. }
            | Self::IntegerRangeTooSmall { .. }
            | Self::DegenerateDoubleRange { .. }
            | Self::StringSpaceTooSmall { .. } => ErrorKind::Capacity,
            _ => ErrorKind::Schema,
        }
    }
}
