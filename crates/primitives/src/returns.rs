//! Portfolio return value types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Date;

/// Why a period has no realized portfolio return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingReason {
    /// First period of a series; no prior ranking exists.
    NoPriorPeriod,
    /// No ranking snapshot applies to the period (e.g. a yearly transition
    /// without a December observation).
    NoRanking,
    /// The ranking date had no security with a market cap.
    NoEligible,
    /// Ranked members exist but none is observed in the period.
    EmptyMembership,
    /// Members are observed but none has a valid return.
    NoValidReturns,
    /// The total weight of the members is zero.
    ZeroWeight,
    /// The series does not cover the date (outer-join gap).
    NotCovered,
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoPriorPeriod => "no prior period",
            Self::NoRanking => "no ranking snapshot",
            Self::NoEligible => "no eligible securities",
            Self::EmptyMembership => "empty membership",
            Self::NoValidReturns => "no valid member returns",
            Self::ZeroWeight => "zero total weight",
            Self::NotCovered => "not covered",
        };
        f.write_str(s)
    }
}

/// Return of a portfolio over one period.
///
/// A missing return is never conflated with a zero return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodReturn {
    /// A realized return.
    Realized(f64),
    /// No realized return, with the reason.
    Missing(MissingReason),
}

impl PeriodReturn {
    /// The realized value, if any.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Realized(r) => Some(r),
            Self::Missing(_) => None,
        }
    }

    /// The missing reason, if any.
    #[must_use]
    pub const fn missing_reason(self) -> Option<MissingReason> {
        match self {
            Self::Realized(_) => None,
            Self::Missing(reason) => Some(reason),
        }
    }

    /// Whether the return is missing.
    #[must_use]
    pub const fn is_missing(self) -> bool {
        matches!(self, Self::Missing(_))
    }
}

impl From<Result<f64, MissingReason>> for PeriodReturn {
    fn from(r: Result<f64, MissingReason>) -> Self {
        match r {
            Ok(v) => Self::Realized(v),
            Err(reason) => Self::Missing(reason),
        }
    }
}

/// A named return series on its own date axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    /// Series name (column name in the merged table).
    pub name: String,
    /// Dates, strictly increasing.
    pub dates: Vec<Date>,
    /// One return per date.
    pub values: Vec<PeriodReturn>,
}

impl ReturnSeries {
    /// Create a new series.
    #[must_use]
    pub fn new(name: impl Into<String>, dates: Vec<Date>, values: Vec<PeriodReturn>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self { name: name.into(), dates, values }
    }

    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return on a specific date.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<PeriodReturn> {
        self.dates.binary_search(&date).ok().map(|i| self.values[i])
    }

    /// Number of realized periods.
    #[must_use]
    pub fn n_realized(&self) -> usize {
        self.values.iter().filter(|v| !v.is_missing()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn missing_is_not_zero() {
        let missing = PeriodReturn::Missing(MissingReason::EmptyMembership);
        assert_eq!(missing.value(), None);
        assert_ne!(missing, PeriodReturn::Realized(0.0));
        assert_eq!(missing.missing_reason(), Some(MissingReason::EmptyMembership));
    }

    #[test]
    fn series_lookup_by_date() {
        let series = ReturnSeries::new(
            "period_ew_d1",
            vec![d(2), d(3), d(4)],
            vec![
                PeriodReturn::Missing(MissingReason::NoPriorPeriod),
                PeriodReturn::Realized(1.5),
                PeriodReturn::Realized(-0.5),
            ],
        );

        assert_eq!(series.get(d(3)), Some(PeriodReturn::Realized(1.5)));
        assert_eq!(series.get(d(5)), None);
        assert_eq!(series.n_realized(), 2);
    }

    #[test]
    fn from_result() {
        assert_eq!(PeriodReturn::from(Ok(2.0)), PeriodReturn::Realized(2.0));
        assert_eq!(
            PeriodReturn::from(Err(MissingReason::ZeroWeight)),
            PeriodReturn::Missing(MissingReason::ZeroWeight)
        );
    }
}
