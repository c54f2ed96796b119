//! Ranking trait definitions.

use capsort_primitives::{Date, RankKind, RankingSnapshot, SecurityId};

/// Errors that can occur while ranking a cross-section.
#[derive(Debug, thiserror::Error)]
pub enum RankError {
    /// Sizing metric is NaN or infinite.
    #[error("non-finite sizing metric for security {0}")]
    NonFinite(SecurityId),

    /// The same security appears twice in one cross-section.
    #[error("security {0} appears more than once in the cross-section")]
    DuplicateSecurity(SecurityId),
}

/// Assigns ranks to a cross-section of eligible securities.
///
/// Implementations must be deterministic: ties are broken by the order of
/// `metrics`, which callers supply in security-axis order.
pub trait Ranker: Send + Sync {
    /// How the produced ranks are to be read.
    fn kind(&self) -> RankKind;

    /// Rank the eligible securities on one date.
    ///
    /// # Arguments
    /// * `date` - Ranking date
    /// * `metrics` - (security, sizing metric) for every eligible security
    ///
    /// # Errors
    /// Returns `RankError` if a metric is not finite or a security repeats.
    fn snapshot(
        &self,
        date: Date,
        metrics: &[(SecurityId, f64)],
    ) -> Result<RankingSnapshot, RankError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_error_display() {
        let err = RankError::NonFinite(SecurityId(10107));
        assert_eq!(err.to_string(), "non-finite sizing metric for security 10107");
    }
}
