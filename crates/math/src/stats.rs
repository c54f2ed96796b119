//! Annualized performance statistics.

use ndarray::Array1;

/// Compound annual growth rate of a price series.
///
/// `(last / first)^(1 / years) - 1`, where `years` is the number of prices
/// divided by `periods_per_year`.
#[must_use]
pub fn cagr(prices: &[f64], periods_per_year: f64) -> Option<f64> {
    let (first, last) = (prices.first()?, prices.last()?);
    let years = prices.len() as f64 / periods_per_year;
    if *first <= 0.0 || years <= 0.0 || !years.is_finite() {
        return None;
    }
    Some((last / first).powf(1.0 / years) - 1.0)
}

/// Sample standard deviation of periodic returns scaled by
/// `sqrt(periods_per_year)`.
#[must_use]
pub fn annualized_volatility(returns: &Array1<f64>, periods_per_year: f64) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }
    Some(returns.std(1.0) * periods_per_year.sqrt())
}

/// Annualized excess return over annualized volatility.
#[must_use]
pub fn sharpe_ratio(returns: &Array1<f64>, periods_per_year: f64, risk_free: f64) -> Option<f64> {
    let vol = annualized_volatility(returns, periods_per_year)?;
    if vol == 0.0 {
        return None;
    }
    let excess = returns.mean()? * periods_per_year - risk_free;
    Some(excess / vol)
}
