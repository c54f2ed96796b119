//! Error types for portfolio formation.

use capsort_math::MathError;
use capsort_panel::PanelError;
use capsort_primitives::Date;
use capsort_traits::{BuildError, RankError};

/// Errors that can occur while forming portfolios.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Panel construction error.
    #[error("panel error: {0}")]
    Panel(#[from] PanelError),

    /// Ranking error.
    #[error("ranking error: {0}")]
    Rank(#[from] RankError),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A missing return blocked compounding.
    #[error("missing return in {series} on {date}")]
    MissingReturn {
        /// Series name.
        series: String,
        /// Date of the gap.
        date: Date,
    },

    /// Two series share a name.
    #[error("duplicate series: {0}")]
    DuplicateSeries(String),
}

impl ModelError {
    /// Returns whether this error is recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingReturn { .. })
    }
}

impl From<ModelError> for BuildError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidConfig(msg) => Self::InvalidConfig(msg),
            ModelError::MissingReturn { series, date } => {
                Self::MissingReturn { series, date: date.to_string() }
            }
            ModelError::Panel(PanelError::MissingColumn(name)) => Self::MissingColumn(name),
            ModelError::Polars(e) => Self::Polars(e),
            other => Self::Pipeline(other.to_string()),
        }
    }
}
