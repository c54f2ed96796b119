//! Compounding of return series into price indices.

use serde::{Deserialize, Serialize};

use crate::MathError;

/// Treatment of missing interior returns when compounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GapPolicy {
    /// Fail on the first missing return.
    #[default]
    Reject,
    /// Carry the last price through the gap.
    ForwardFill,
}

/// Compound a return series into a price index anchored at 1.0.
///
/// The first return is forced to 0, so `price[0] == 1`. Afterwards
/// `price[t] = price[t-1] * (1 + return[t])`. Returns must be decimal
/// fractions.
///
/// A leading run of missing returns is the period before the series goes
/// live; those prices are `None`, and the first realized return compounds
/// from the 1.0 anchor. Only gaps after the first realized return are
/// subject to `policy`.
///
/// # Arguments
/// * `returns` - Periodic returns, `None` where missing
/// * `policy` - What to do with missing returns after the first position
///
/// # Errors
/// Returns `MathError::EmptyData` for an empty series,
/// `MathError::MissingReturn` for a gap under `GapPolicy::Reject`, and
/// `MathError::NumericalInstability` if a price becomes non-finite.
pub fn compound(
    returns: &[Option<f64>],
    policy: GapPolicy,
) -> Result<Vec<Option<f64>>, MathError> {
    if returns.is_empty() {
        return Err(MathError::EmptyData);
    }

    let mut prices = Vec::with_capacity(returns.len());
    prices.push(Some(1.0));

    let mut price = 1.0;
    let mut live = false;
    for (index, r) in returns.iter().enumerate().skip(1) {
        match (r, policy) {
            (Some(r), _) => {
                price *= 1.0 + r;
                live = true;
            }
            (None, _) if !live => {
                prices.push(None);
                continue;
            }
            (None, GapPolicy::ForwardFill) => {}
            (None, GapPolicy::Reject) => return Err(MathError::MissingReturn { index }),
        }
        if !price.is_finite() {
            return Err(MathError::NumericalInstability(format!(
                "non-finite price at position {index}"
            )));
        }
        prices.push(Some(price));
    }

    Ok(prices)
}
