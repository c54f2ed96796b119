//! Pipeline trait definitions.

use capsort_primitives::PortfolioId;
use polars::prelude::*;

/// Errors that can occur while building portfolio returns.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// A missing return blocked compounding.
    #[error("missing return in {series} on {date}")]
    MissingReturn {
        /// Series name.
        series: String,
        /// Date of the gap.
        date: String,
    },

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] PolarsError),

    /// Any other failure in the pipeline.
    #[error("{0}")]
    Pipeline(String),
}

impl BuildError {
    /// Returns whether a caller can retry with a different gap policy or range.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingReturn { .. })
    }
}

/// Builds portfolio return and price frames from raw observations.
pub trait PortfolioBuilder: Send + Sync {
    /// Run the full pipeline.
    ///
    /// # Arguments
    /// * `observations` - Loader frame with | date | security_id | ticker | price |
    ///   shares_outstanding | return | (already pre-filtered)
    ///
    /// # Returns
    /// Tuple of (returns_df, prices_df), each with a `date` column and one
    /// column per portfolio.
    ///
    /// # Errors
    /// Returns `BuildError` if columns are missing, the configuration is
    /// invalid, or compounding meets a gap it may not fill.
    fn build(&self, observations: LazyFrame) -> Result<(DataFrame, DataFrame), BuildError>;

    /// The portfolios this builder produces, in column order.
    fn portfolios(&self) -> Vec<PortfolioId>;
}
