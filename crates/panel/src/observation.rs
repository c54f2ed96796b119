//! Raw observation records.

use capsort_primitives::{Date, SecurityId, Ticker};

/// One raw (date, security) row as handed over by a loader.
///
/// Numeric fields are `None` when the source value was absent or could not
/// be parsed. `market_cap` takes precedence over `price × shares` when set.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Observation date.
    pub date: Date,
    /// Security identifier.
    pub security: SecurityId,
    /// Periodic return.
    pub ret: Option<f64>,
    /// Closing price; negative values encode a bid/ask midpoint.
    pub price: Option<f64>,
    /// Shares outstanding.
    pub shares_outstanding: Option<f64>,
    /// Precomputed market capitalization.
    pub market_cap: Option<f64>,
    /// Ticker on that date.
    pub ticker: Option<Ticker>,
}

impl Observation {
    /// Create an observation with no values.
    #[must_use]
    pub const fn new(date: Date, security: SecurityId) -> Self {
        Self {
            date,
            security,
            ret: None,
            price: None,
            shares_outstanding: None,
            market_cap: None,
            ticker: None,
        }
    }

    /// Set the return.
    #[must_use]
    pub const fn with_return(mut self, ret: Option<f64>) -> Self {
        self.ret = ret;
        self
    }

    /// Set price and shares outstanding.
    #[must_use]
    pub const fn with_price(mut self, price: Option<f64>, shares: Option<f64>) -> Self {
        self.price = price;
        self.shares_outstanding = shares;
        self
    }

    /// Set a precomputed market cap.
    #[must_use]
    pub const fn with_market_cap(mut self, market_cap: Option<f64>) -> Self {
        self.market_cap = market_cap;
        self
    }

    /// Set the ticker.
    #[must_use]
    pub fn with_ticker(mut self, ticker: impl Into<Ticker>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    /// Market cap of the row: the precomputed value, else `|price| × shares`.
    #[must_use]
    pub fn resolved_market_cap(&self) -> Option<f64> {
        let cap = match self.market_cap {
            Some(cap) => Some(cap),
            None => self.price.zip(self.shares_outstanding).map(|(p, s)| p.abs() * s),
        };
        cap.filter(|c| c.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn obs() -> Observation {
        Observation::new(Date::from_ymd_opt(2024, 1, 31).unwrap(), SecurityId(10107))
    }

    #[rstest]
    #[case(Some(25.0), Some(4.0), Some(100.0))]
    #[case(Some(-25.0), Some(4.0), Some(100.0))]
    #[case(None, Some(4.0), None)]
    #[case(Some(25.0), None, None)]
    fn market_cap_from_price(
        #[case] price: Option<f64>,
        #[case] shares: Option<f64>,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(obs().with_price(price, shares).resolved_market_cap(), expected);
    }

    #[test]
    fn precomputed_market_cap_wins() {
        let o = obs().with_price(Some(1.0), Some(1.0)).with_market_cap(Some(5.0));
        assert_eq!(o.resolved_market_cap(), Some(5.0));
    }

    #[test]
    fn non_finite_market_cap_is_missing() {
        let o = obs().with_market_cap(Some(f64::NAN));
        assert_eq!(o.resolved_market_cap(), None);
    }
}
