//! Error types for panel construction.

use capsort_utils::UtilsError;

/// Errors that can occur while building a panel.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// Missing required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Column type that cannot be interpreted.
    #[error("column {column} has unsupported type {dtype}")]
    UnsupportedType {
        /// Column name.
        column: String,
        /// Data type found.
        dtype: String,
    },

    /// No usable observation.
    #[error("no usable observations")]
    Empty,

    /// Invalid configuration.
    #[error("invalid panel configuration: {0}")]
    InvalidConfig(String),

    /// Utility error.
    #[error("utils error: {0}")]
    Utils(#[from] UtilsError),

    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
