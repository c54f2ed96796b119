//! Panel builder configuration.

use serde::{Deserialize, Serialize};

use crate::PanelError;

/// Names of the loader columns read by the panel builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Observation date.
    pub date: String,
    /// Security identifier.
    pub security_id: String,
    /// Ticker, if present.
    pub ticker: Option<String>,
    /// Price.
    pub price: String,
    /// Shares outstanding.
    pub shares_outstanding: String,
    /// Precomputed market cap; when set, price and shares are not read.
    pub market_cap: Option<String>,
    /// Periodic return.
    pub ret: String,
}

impl Default for ColumnMap {
    /// CRSP stock file names.
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            security_id: "PERMNO".to_string(),
            ticker: Some("TICKER".to_string()),
            price: "PRC".to_string(),
            shares_outstanding: "SHROUT".to_string(),
            market_cap: None,
            ret: "RET".to_string(),
        }
    }
}

/// Configuration for panel construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Returns strictly below this floor are data errors and become missing.
    pub min_valid_return: f64,
    /// Loader column names.
    pub columns: ColumnMap,
    /// Per-date benchmark columns (e.g. `vwretd`, `ewretd`) to carry along.
    pub benchmark_columns: Vec<String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            min_valid_return: -60.0,
            columns: ColumnMap::default(),
            benchmark_columns: Vec::new(),
        }
    }
}

impl PanelConfig {
    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `PanelError::InvalidConfig` for a non-finite return floor.
    pub fn validate(&self) -> Result<(), PanelError> {
        if !self.min_valid_return.is_finite() {
            return Err(PanelError::InvalidConfig(format!(
                "min_valid_return must be finite, got {}",
                self.min_valid_return
            )));
        }
        Ok(())
    }
}
