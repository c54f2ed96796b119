//! Error types for mathematical operations.

/// Errors that can occur during mathematical operations.
#[derive(Debug, thiserror::Error)]
pub enum MathError {
    /// A return needed for compounding is missing.
    #[error("missing return at position {index}")]
    MissingReturn {
        /// Position of the missing return in the series.
        index: usize,
    },

    /// Empty data.
    #[error("empty data provided")]
    EmptyData,

    /// Numerical instability (NaN or Inf).
    #[error("numerical instability: {0}")]
    NumericalInstability(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MathError::MissingReturn { index: 7 };
        assert!(err.to_string().contains('7'));

        let err = MathError::NumericalInstability("inf price".to_string());
        assert!(err.to_string().contains("inf price"));
    }
}
