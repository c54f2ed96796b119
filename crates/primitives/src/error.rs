//! Error types for parsing primitive values.

/// Errors raised when a name does not map to a known primitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Unknown rebalancing cadence.
    #[error("unknown cadence: {0}")]
    UnknownCadence(String),

    /// Unknown weighting scheme.
    #[error("unknown weighting: {0}")]
    UnknownWeighting(String),

    /// Unknown portfolio scheme.
    #[error("unknown portfolio scheme: {0}")]
    UnknownScheme(String),
}
