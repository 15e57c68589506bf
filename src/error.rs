//! Error types for the data-preparation pipeline.
//!
//! Only two kinds of failure ever leave the pipeline as an `Err`:
//!
//! - **Schema violations**: a required column is absent from the source. These
//!   are fatal and reported once, naming every missing column.
//! - **Infrastructure failures**: the source cannot be read, the CSV parser or
//!   a query plan fails, or a configuration value is out of range.
//!
//! Data-quality defects (unparseable prices, malformed country tokens, invalid
//! vegetarian flags) are absorbed into the data and counted in reports instead.
//!
//! ```
//! use streetfood::error::PrepError;
//!
//! let err = PrepError::MissingColumns(vec!["TypicalPrice(USD)".to_owned()]);
//! assert_eq!(err.to_string(), "Missing required column(s): TypicalPrice(USD)");
//! ```

use polars::error::PolarsError;

/// Main error type for preparation operations.
#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    /// Required columns are absent from the table.
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A confidence level outside the open interval (0, 1).
    #[error("Confidence level must lie strictly between 0 and 1, got {0}")]
    InvalidConfidenceLevel(f64),

    /// Source file with an extension the loader does not read.
    #[error("Unsupported file extension: {0}")]
    UnsupportedFormat(String),

    /// File not found or not a regular file.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars parsing and query errors
    #[error("Data processing error: {0}")]
    DataProcessing(#[from] PolarsError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The aggregate cache lock was poisoned by a panicking holder.
    #[error("Aggregate cache is unavailable")]
    CachePoisoned,
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

/// Result type alias for preparation operations.
pub type Result<T> = std::result::Result<T, PrepError>;
