//! Performance summary of compounded price series.

use capsort_math::{annualized_volatility, cagr, sharpe_ratio};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{ModelError, PriceTable};

/// Settings for summary statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Periods per year used to annualize.
    pub periods_per_year: f64,
    /// Annual risk-free rate as a decimal fraction.
    pub risk_free: f64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self { periods_per_year: 252.0, risk_free: 0.02 }
    }
}

impl SummaryConfig {
    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidConfig` for a non-positive period count or
    /// a non-finite risk-free rate.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return Err(ModelError::InvalidConfig(format!(
                "periods_per_year must be positive, got {}",
                self.periods_per_year
            )));
        }
        if !self.risk_free.is_finite() {
            return Err(ModelError::InvalidConfig("risk_free must be finite".to_string()));
        }
        Ok(())
    }
}

/// Summary statistics of one price series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    /// Series name.
    pub name: String,
    /// Number of prices in the live span.
    pub periods: usize,
    /// Final index level.
    pub final_price: f64,
    /// Compound annual growth rate.
    pub cagr: Option<f64>,
    /// Annualized volatility of periodic returns.
    pub volatility: Option<f64>,
    /// Annualized Sharpe ratio.
    pub sharpe: Option<f64>,
}

/// Summarize a single price series over its live span.
///
/// Missing prices are dropped first, so a series that starts late is
/// annualized over the periods it actually covers.
#[must_use]
pub fn summarize_series(
    name: &str,
    prices: &[Option<f64>],
    config: &SummaryConfig,
) -> SeriesSummary {
    let prices: Vec<f64> = prices.iter().flatten().copied().collect();
    let returns: Array1<f64> = prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
    SeriesSummary {
        name: name.to_string(),
        periods: prices.len(),
        final_price: prices.last().copied().unwrap_or(f64::NAN),
        cagr: finite(cagr(&prices, config.periods_per_year)),
        volatility: finite(annualized_volatility(&returns, config.periods_per_year)),
        sharpe: finite(sharpe_ratio(&returns, config.periods_per_year, config.risk_free)),
    }
}

/// Summarize every series of a price table, in column order.
#[must_use]
pub fn summarize(prices: &PriceTable, config: &SummaryConfig) -> Vec<SeriesSummary> {
    prices.iter().map(|(name, values)| summarize_series(name, values, config)).collect()
}
