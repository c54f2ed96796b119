//! Return aggregation under equal and value weighting.

use std::collections::BTreeSet;

use capsort_math::{equal_weighted_mean, value_weighted_mean};
use capsort_panel::CrossSection;
use capsort_primitives::{MissingReason, PeriodReturn, SecurityId, Weighting};
use capsort_traits::{MemberObservation, WeightingScheme};

/// Arithmetic mean of the valid member returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualWeight;

impl WeightingScheme for EqualWeight {
    fn weighting(&self) -> Weighting {
        Weighting::Equal
    }

    fn aggregate(&self, members: &[MemberObservation]) -> PeriodReturn {
        if members.is_empty() {
            return PeriodReturn::Missing(MissingReason::EmptyMembership);
        }
        equal_weighted_mean(members.iter().filter_map(|m| m.ret))
            .ok_or(MissingReason::NoValidReturns)
            .into()
    }
}

/// Prior-period market cap weighted mean of member returns.
///
/// Members lacking either a return or a prior cap drop out of both sums.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueWeight;

impl WeightingScheme for ValueWeight {
    fn weighting(&self) -> Weighting {
        Weighting::Value
    }

    fn aggregate(&self, members: &[MemberObservation]) -> PeriodReturn {
        if members.is_empty() {
            return PeriodReturn::Missing(MissingReason::EmptyMembership);
        }
        if members.iter().all(|m| m.ret.is_none()) {
            return PeriodReturn::Missing(MissingReason::NoValidReturns);
        }
        value_weighted_mean(members.iter().filter_map(|m| m.ret.zip(m.prior_cap)))
            .ok_or(MissingReason::ZeroWeight)
            .into()
    }
}

/// The weighting scheme for a convention.
#[must_use]
pub fn weighting_scheme(weighting: Weighting) -> &'static dyn WeightingScheme {
    match weighting {
        Weighting::Equal => &EqualWeight,
        Weighting::Value => &ValueWeight,
    }
}

/// Aggregate one portfolio over one period.
///
/// # Arguments
/// * `members` - Resolved membership for the period
/// * `current` - Cross-section of the period (returns)
/// * `prior` - Cross-section of the preceding period (weights)
/// * `scheme` - Weighting scheme
#[must_use]
pub fn aggregate(
    members: &BTreeSet<SecurityId>,
    current: &CrossSection<'_>,
    prior: &CrossSection<'_>,
    scheme: &dyn WeightingScheme,
) -> PeriodReturn {
    let observations: Vec<MemberObservation> = members
        .iter()
        .map(|&id| MemberObservation::new(id, current.ret(id), prior.market_cap(id)))
        .collect();
    scheme.aggregate(&observations)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use capsort_panel::{Observation, PanelBuilder};
    use capsort_primitives::Date;
    use rstest::rstest;

    use super::*;

    fn member(id: u64, ret: Option<f64>, cap: Option<f64>) -> MemberObservation {
        MemberObservation::new(SecurityId(id), ret, cap)
    }

    #[rstest]
    #[case(Weighting::Equal)]
    #[case(Weighting::Value)]
    fn single_member_returns_its_return(#[case] weighting: Weighting) {
        let r = weighting_scheme(weighting).aggregate(&[member(1, Some(-2.5), Some(40.0))]);
        assert_eq!(r, PeriodReturn::Realized(-2.5));
    }

    #[test]
    fn equal_weight_skips_missing_returns() {
        let r = EqualWeight.aggregate(&[member(1, Some(5.0), None), member(2, None, Some(1.0))]);
        assert_eq!(r, PeriodReturn::Realized(5.0));
    }

    #[test]
    fn value_weight_scenario() {
        let r = ValueWeight
            .aggregate(&[member(1, Some(5.0), Some(100.0)), member(2, Some(-3.0), Some(10.0))]);
        assert_relative_eq!(r.value().unwrap(), 470.0 / 110.0, epsilon = 1e-12);
    }

    #[test]
    fn value_weight_excludes_missing_weight() {
        let r = ValueWeight
            .aggregate(&[member(1, Some(5.0), Some(100.0)), member(2, Some(-3.0), None)]);
        assert_eq!(r, PeriodReturn::Realized(5.0));
    }

    #[rstest]
    #[case(vec![], MissingReason::EmptyMembership)]
    #[case(vec![member(1, None, Some(3.0))], MissingReason::NoValidReturns)]
    #[case(vec![member(1, Some(1.0), Some(0.0))], MissingReason::ZeroWeight)]
    #[case(vec![member(1, Some(1.0), None)], MissingReason::ZeroWeight)]
    fn value_weight_missing_reasons(
        #[case] members: Vec<MemberObservation>,
        #[case] reason: MissingReason,
    ) {
        assert_eq!(ValueWeight.aggregate(&members), PeriodReturn::Missing(reason));
    }

    #[test]
    fn equal_weight_without_valid_returns() {
        let r = EqualWeight.aggregate(&[member(1, None, Some(1.0))]);
        assert_eq!(r, PeriodReturn::Missing(MissingReason::NoValidReturns));
    }

    #[test]
    fn weights_come_from_prior_period() {
        let d1 = Date::from_ymd_opt(2024, 1, 2).unwrap();
        let d2 = Date::from_ymd_opt(2024, 1, 3).unwrap();
        let mut builder = PanelBuilder::new();
        builder.extend([
            Observation::new(d1, SecurityId(1)).with_market_cap(Some(100.0)),
            Observation::new(d1, SecurityId(2)).with_market_cap(Some(10.0)),
            Observation::new(d2, SecurityId(1)).with_return(Some(5.0)).with_market_cap(Some(1.0)),
            Observation::new(d2, SecurityId(2)).with_return(Some(-3.0)).with_market_cap(Some(1e6)),
        ]);
        let (panel, _) = builder.build().unwrap();

        let members = BTreeSet::from([SecurityId(1), SecurityId(2)]);
        let r = aggregate(&members, &panel.cross_section(1), &panel.cross_section(0), &ValueWeight);
        assert_relative_eq!(r.value().unwrap(), 4.272_727_272_727, epsilon = 1e-9);
    }
}
