//! Portfolio weighting trait definitions.

use capsort_primitives::{PeriodReturn, SecurityId, Weighting};

/// What a portfolio member contributes to one period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberObservation {
    /// Member security.
    pub security: SecurityId,
    /// Return over the period, if valid.
    pub ret: Option<f64>,
    /// Market cap at the end of the prior period, if known.
    pub prior_cap: Option<f64>,
}

impl MemberObservation {
    /// Create a new member observation.
    #[must_use]
    pub const fn new(security: SecurityId, ret: Option<f64>, prior_cap: Option<f64>) -> Self {
        Self { security, ret, prior_cap }
    }
}

/// Combines member returns into one portfolio return.
pub trait WeightingScheme: Send + Sync {
    /// The weighting convention implemented.
    fn weighting(&self) -> Weighting;

    /// Aggregate the members of one portfolio for one period.
    ///
    /// `members` is the realized membership (already intersected with the
    /// securities observed in the period). An empty slice or a degenerate
    /// weighting yields `PeriodReturn::Missing`, never a zero return.
    fn aggregate(&self, members: &[MemberObservation]) -> PeriodReturn;
}
