//! Error types for utility functions.

/// Errors that can occur during utility operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Column type that cannot be interpreted.
    #[error("column {column} has unsupported type {dtype}")]
    UnsupportedType {
        /// Column name.
        column: String,
        /// Data type found.
        dtype: String,
    },

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),
}
